//! Request/response primitives and the transport capability the client dispatches through.
//!
//! [`HttpTransport`] is the crate's only dependency on an HTTP stack. Routes produce
//! [`BuiltRequest`] values, a transport turns each into a [`RawResponse`] (or a transport
//! error), and the decoder interprets the result. The default implementation wraps
//! [`ReqwestClient`] behind the `reqwest` feature.

// self
use crate::_prelude::*;

/// Future returned by [`HttpTransport::submit`].
///
/// Owns everything it needs so an in-flight exchange can outlive the call that started it.
pub type TransportFuture<E> = Pin<Box<dyn Future<Output = Result<RawResponse, E>> + Send>>;

/// HTTP methods a route may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl HttpMethod {
	/// Returns the method token as written on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
		}
	}

	/// Returns `true` when form parameters travel in the body rather than the query string.
	pub const fn carries_body(self) -> bool {
		!matches!(self, HttpMethod::Get | HttpMethod::Delete)
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved request ready for dispatch.
///
/// Built by [`Route::build_request`](crate::router::Route::build_request) and consumed by a
/// single [`HttpTransport::submit`] call.
#[derive(Clone, PartialEq, Eq)]
pub struct BuiltRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Absolute URL, including any encoded query string.
	pub url: Url,
	/// Header pairs with lowercase names, in insertion order.
	pub headers: Vec<(&'static str, String)>,
	/// Encoded body, when the route's encoding produced one.
	pub body: Option<Vec<u8>>,
}
impl BuiltRequest {
	/// Creates a body-less request without headers.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None }
	}

	/// Returns the first header value with the provided (lowercase) name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
	}

	/// Returns the body as UTF-8 text, when present and valid.
	pub fn body_str(&self) -> Option<&str> {
		self.body.as_deref().and_then(|body| std::str::from_utf8(body).ok())
	}
}
impl Debug for BuiltRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(key, value)| {
				let value = if *key == "authorization" { "<redacted>" } else { value.as_str() };

				(*key, value)
			})
			.collect::<Vec<_>>();

		f.debug_struct("BuiltRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.finish()
	}
}

/// Raw status and body returned by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Creates a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}
}

/// Asynchronous HTTP capability injected into the client.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared behind
/// `Arc` by concurrent operations, and the returned future must be `Send` so operations can be
/// spawned onto a multi-threaded runtime. A transport performs exactly one exchange per call:
/// no retries, no redirects, and any deadline is its own business.
///
/// The request is considered dispatched once `submit` returns; the returned future only
/// drives the exchange to its response.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted when no response could be obtained.
	type TransportError: 'static + Send + Sync + StdError;

	/// Dispatches the request and resolves with the raw response.
	fn submit(&self, request: BuiltRequest) -> TransportFuture<Self::TransportError>;
}
impl<T> HttpTransport for Arc<T>
where
	T: ?Sized + HttpTransport,
{
	type TransportError = T::TransportError;

	fn submit(&self, request: BuiltRequest) -> TransportFuture<Self::TransportError> {
		T::submit(self, request)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token requests should not follow redirects, matching OAuth 2.0 guidance that token
/// endpoints return results directly instead of delegating to another URI. Configure any
/// custom [`ReqwestClient`] passed to [`ReqwestTransport::with_client`] accordingly.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	type TransportError = ReqwestError;

	fn submit(&self, request: BuiltRequest) -> TransportFuture<Self::TransportError> {
		let mut builder = self.0.request(reqwest_method(request.method), request.url);

		for (name, value) in request.headers {
			builder = builder.header(name, value);
		}
		if let Some(body) = request.body {
			builder = builder.body(body);
		}

		let pending = builder.send();

		Box::pin(async move {
			let response = pending.await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(RawResponse { status, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn reqwest_method(method: HttpMethod) -> reqwest::Method {
	match method {
		HttpMethod::Get => reqwest::Method::GET,
		HttpMethod::Post => reqwest::Method::POST,
		HttpMethod::Put => reqwest::Method::PUT,
		HttpMethod::Patch => reqwest::Method::PATCH,
		HttpMethod::Delete => reqwest::Method::DELETE,
	}
}
