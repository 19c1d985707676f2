//! Router-level error types shared by the router, transport, decoder, and client facade.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
///
/// `Result<T>` is the single outcome delivered for every operation: exactly one of a decoded
/// value or a structured failure.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Structured domain tag carried by every [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	/// The request could not be built from the configured endpoint.
	MalformedUrl,
	/// The transport failed or returned no response.
	Network,
	/// The response body was not a JSON object or did not match the expected payload.
	Decode,
	/// The service answered with a non-200 status and a structured message.
	Api,
	/// The caller cancelled the in-flight operation.
	Cancelled,
}
impl ErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::MalformedUrl => "malformed_url",
			ErrorKind::Network => "network",
			ErrorKind::Decode => "decode",
			ErrorKind::Api => "api",
			ErrorKind::Cancelled => "cancelled",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Request could not be built.
	#[error(transparent)]
	MalformedUrl(#[from] MalformedUrlError),
	/// Transport failure (DNS, TCP, TLS, missing response).
	#[error(transparent)]
	Network(#[from] TransportError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Service rejected the request with a non-200 status.
	#[error("Token endpoint returned HTTP {status}{}.", api_detail(.error, .message))]
	Api {
		/// HTTP status code returned by the service.
		status: u16,
		/// OAuth `error` code, when the service supplied one.
		error: Option<String>,
		/// Human-readable `error_description`, empty when absent.
		message: String,
	},
	/// In-flight operation was cancelled through its handle.
	#[error("Operation was cancelled before it completed.")]
	Cancelled,
}
impl Error {
	/// Returns the structured domain tag for this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::MalformedUrl(_) => ErrorKind::MalformedUrl,
			Error::Network(_) => ErrorKind::Network,
			Error::Decode(_) => ErrorKind::Decode,
			Error::Api { .. } => ErrorKind::Api,
			Error::Cancelled => ErrorKind::Cancelled,
		}
	}

	/// Returns the HTTP status associated with the failure, if a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Error::Api { status, .. } => Some(*status),
			Error::Decode(err) => Some(err.status()),
			_ => None,
		}
	}
}

fn api_detail(error: &Option<String>, message: &str) -> String {
	match (message, error) {
		("", None) => String::new(),
		("", Some(code)) => format!(": {code}"),
		(message, _) => format!(": {message}"),
	}
}

/// Failures raised while resolving a route into a request.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum MalformedUrlError {
	/// Base endpoint cannot be parsed as an absolute URL.
	#[error("Web endpoint `{endpoint}` is not a valid URL.")]
	InvalidEndpoint {
		/// Endpoint string taken from the configuration.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Relative path cannot be resolved against the endpoint.
	#[error("Path `{path}` cannot be resolved against `{endpoint}`.")]
	InvalidPath {
		/// Endpoint string taken from the configuration.
		endpoint: String,
		/// Relative route path.
		path: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint uses a scheme other than HTTP(S).
	#[error("Web endpoint must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Scheme found on the endpoint.
		scheme: String,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures raised while interpreting a response body.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON.
	#[error("Token endpoint returned malformed JSON (HTTP {status}).")]
	Json {
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Body is valid JSON but not a key/value object.
	#[error("Token endpoint returned a JSON {found} instead of an object (HTTP {status}).")]
	NotAnObject {
		/// JSON type that was found instead.
		found: &'static str,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Object does not match the expected payload.
	#[error("Token endpoint returned an unexpected payload (HTTP {status}).")]
	Payload {
		/// Structured failure naming the offending field path.
		#[source]
		source: PayloadError,
		/// HTTP status code of the response.
		status: u16,
	},
}
impl DecodeError {
	/// HTTP status code of the response that failed to decode.
	pub fn status(&self) -> u16 {
		match self {
			DecodeError::Json { status, .. }
			| DecodeError::NotAnObject { status, .. }
			| DecodeError::Payload { status, .. } => *status,
		}
	}
}

/// Failures raised while constructing a typed payload from a JSON object.
#[derive(Debug, ThisError)]
pub enum PayloadError {
	/// A field is missing or has the wrong type.
	#[error("Token payload is invalid at `{}`: {}.", .0.path(), .0.inner())]
	Field(#[from] serde_path_to_error::Error<serde_json::Error>),
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}
