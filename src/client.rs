//! Client facade orchestrating route → transport → decoder for token operations.

pub mod refresh;

pub use refresh::*;

// self
use crate::{_prelude::*, config::Configuration, http::HttpTransport};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestTokenClient = Client<ReqwestTransport>;

/// Executes token operations against a single configuration.
///
/// The client owns the configuration and a shared handle to the transport. It holds no
/// per-request state: every operation builds its own route and request, so concurrent calls
/// are independent and cloning a client is cheap.
pub struct Client<T>
where
	T: ?Sized + HttpTransport,
{
	/// Client identity and base web endpoint.
	pub configuration: Arc<Configuration>,
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
}
impl<T> Client<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that dispatches through the caller-provided transport.
	pub fn with_transport(configuration: Configuration, transport: impl Into<Arc<T>>) -> Self {
		Self {
			configuration: Arc::new(configuration),
			transport: transport.into(),
			refresh_metrics: Default::default(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(configuration: Configuration) -> Self {
		Self::with_transport(configuration, ReqwestTransport::default())
	}
}
impl<T> Clone for Client<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			configuration: Arc::clone(&self.configuration),
			transport: Arc::clone(&self.transport),
			refresh_metrics: Arc::clone(&self.refresh_metrics),
		}
	}
}
impl<T> Debug for Client<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("web_endpoint", &self.configuration.web_endpoint)
			.field("client_id", &self.configuration.client_id)
			.field("client_secret_set", &!self.configuration.client_secret.is_empty())
			.finish()
	}
}
