//! OAuth client identity plus the service's base web endpoint.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Base web endpoint used when a configuration does not name one.
pub const DEFAULT_WEB_ENDPOINT: &str = "https://bitbucket.org/";

/// Immutable client configuration shared read-only by every route.
///
/// The endpoint is kept as the caller supplied it; parsing happens when a route builds its
/// request so a malformed value surfaces as [`Error::MalformedUrl`] on the call that uses it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
	/// Base URL every route path is resolved against.
	#[serde(default = "default_web_endpoint")]
	pub web_endpoint: String,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	#[serde(default)]
	pub client_secret: TokenSecret,
}
impl Configuration {
	/// Creates a configuration for the provided client against [`DEFAULT_WEB_ENDPOINT`].
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<TokenSecret>) -> Self {
		Self {
			web_endpoint: default_web_endpoint(),
			client_id: client_id.into(),
			client_secret: client_secret.into(),
		}
	}

	/// Overrides the base web endpoint.
	pub fn with_web_endpoint(mut self, web_endpoint: impl Into<String>) -> Self {
		self.web_endpoint = web_endpoint.into();

		self
	}
}

fn default_web_endpoint() -> String {
	DEFAULT_WEB_ENDPOINT.into()
}
