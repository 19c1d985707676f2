//! Typed endpoint descriptions resolved into concrete HTTP requests.
//!
//! A [`Route`] names everything the wire needs (method, relative path, parameter encoding,
//! parameters) and [`Route::build_request`] resolves it against the configured web endpoint.
//! [`TokenRouter`] is the closed set of token endpoints; every accessor matches exhaustively so
//! adding a variant forces each operation to handle it.

mod encoding;

pub use encoding::*;

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	config::Configuration,
	error::MalformedUrlError,
	http::{BuiltRequest, HttpMethod},
	obs::RouteKind,
};

/// Ordered request parameters; order is preserved on the wire.
pub type Params = Vec<(&'static str, String)>;

/// Endpoint description that can be resolved into a [`BuiltRequest`].
pub trait Route {
	/// Configuration the route resolves against.
	fn configuration(&self) -> &Configuration;

	/// HTTP method used by the endpoint.
	fn method(&self) -> HttpMethod;

	/// Parameter encoding used by the endpoint.
	fn encoding(&self) -> HttpEncoding;

	/// Parameters sent with the request.
	fn params(&self) -> Params;

	/// Path relative to the configured web endpoint.
	fn path(&self) -> &'static str;

	/// Resolves the route into a dispatchable request.
	///
	/// Fails when the web endpoint or the composed URL cannot be parsed; never yields a
	/// partially built request.
	fn build_request(&self) -> Result<BuiltRequest, MalformedUrlError> {
		let configuration = self.configuration();
		let url = resolve(&configuration.web_endpoint, self.path())?;
		let mut request =
			self.encoding().encode(BuiltRequest::new(self.method(), url), &self.params());

		request.headers.push(("accept", "application/json".into()));

		if let Some(credentials) = basic_credentials(configuration) {
			request.headers.push(("authorization", credentials));
		}

		Ok(request)
	}
}

/// Token endpoints exposed by the service.
#[derive(Clone, Copy, Debug)]
pub enum TokenRouter<'a> {
	/// Exchanges a refresh token for a fresh access token.
	RefreshToken {
		/// Client configuration.
		configuration: &'a Configuration,
		/// Refresh token, passed through unvalidated.
		refresh_token: &'a str,
	},
}
impl<'a> TokenRouter<'a> {
	/// Creates the refresh-token route.
	pub fn refresh_token(configuration: &'a Configuration, refresh_token: &'a str) -> Self {
		Self::RefreshToken { configuration, refresh_token }
	}

	/// Observability label for the route.
	pub const fn kind(&self) -> RouteKind {
		match self {
			TokenRouter::RefreshToken { .. } => RouteKind::RefreshToken,
		}
	}
}
impl Route for TokenRouter<'_> {
	fn configuration(&self) -> &Configuration {
		match self {
			TokenRouter::RefreshToken { configuration, .. } => configuration,
		}
	}

	fn method(&self) -> HttpMethod {
		match self {
			TokenRouter::RefreshToken { .. } => HttpMethod::Post,
		}
	}

	fn encoding(&self) -> HttpEncoding {
		match self {
			TokenRouter::RefreshToken { .. } => HttpEncoding::Form,
		}
	}

	fn params(&self) -> Params {
		match self {
			TokenRouter::RefreshToken { refresh_token, .. } => vec![
				("refresh_token", (*refresh_token).to_owned()),
				("grant_type", "refresh_token".into()),
			],
		}
	}

	fn path(&self) -> &'static str {
		match self {
			TokenRouter::RefreshToken { .. } => "site/oauth2/access_token",
		}
	}
}

fn resolve(endpoint: &str, path: &'static str) -> Result<Url, MalformedUrlError> {
	let base = Url::parse(endpoint).map_err(|source| MalformedUrlError::InvalidEndpoint {
		endpoint: endpoint.to_owned(),
		source,
	})?;

	if !matches!(base.scheme(), "http" | "https") {
		return Err(MalformedUrlError::UnsupportedScheme { scheme: base.scheme().to_owned() });
	}

	base.join(path).map_err(|source| MalformedUrlError::InvalidPath {
		endpoint: endpoint.to_owned(),
		path,
		source,
	})
}

fn basic_credentials(configuration: &Configuration) -> Option<String> {
	if configuration.client_id.is_empty() {
		return None;
	}

	let pair =
		format!("{}:{}", configuration.client_id, configuration.client_secret.expose());

	Some(format!("Basic {}", STANDARD.encode(pair)))
}
