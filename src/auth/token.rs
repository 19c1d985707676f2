//! Token payload decoded from a successful token endpoint response.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, auth::TokenSecret, error::PayloadError};

/// Wire shape of a successful OAuth 2.0 token response.
#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
	token_type: String,
	#[serde(default)]
	scope: Option<String>,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	expires_in: Option<u64>,
}

/// Tokens issued by the service for a refresh request.
///
/// Only `access_token` and `token_type` are required; every other field is optional because
/// providers routinely omit them. The caller owns storage of the returned secrets.
#[derive(Clone)]
pub struct TokenConfiguration {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Token type reported by the provider (usually `bearer`).
	pub token_type: String,
	/// Space-delimited scope string, if the provider returned one.
	pub scope: Option<String>,
	/// Rotated refresh token, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Lifetime of the access token relative to [`received_at`](Self::received_at).
	pub expires_in: Option<Duration>,
	/// Instant the response was decoded.
	pub received_at: OffsetDateTime,
}
impl TokenConfiguration {
	/// Constructs a token configuration from a decoded JSON object, stamped with the current clock.
	pub fn from_json(object: Map<String, Value>) -> Result<Self, PayloadError> {
		Self::from_json_at(object, OffsetDateTime::now_utc())
	}

	/// Constructs a token configuration from a decoded JSON object received at `received_at`.
	pub fn from_json_at(
		object: Map<String, Value>,
		received_at: OffsetDateTime,
	) -> Result<Self, PayloadError> {
		let response: TokenResponse = serde_path_to_error::deserialize(Value::Object(object))?;
		let expires_in = response
			.expires_in
			.map(|secs| i64::try_from(secs).map(Duration::seconds))
			.transpose()
			.map_err(|_| PayloadError::ExpiresInOutOfRange)?;

		Ok(Self {
			access_token: TokenSecret::new(response.access_token),
			token_type: response.token_type,
			scope: response.scope,
			refresh_token: response.refresh_token.map(TokenSecret::new),
			expires_in,
			received_at,
		})
	}

	/// Iterates over the individual scopes granted to the token.
	pub fn scopes(&self) -> impl Iterator<Item = &str> {
		self.scope.as_deref().unwrap_or_default().split_whitespace()
	}

	/// Absolute expiry instant, when the provider reported a lifetime.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_in.and_then(|lifetime| self.received_at.checked_add(lifetime))
	}

	/// Returns `true` if the token is known to be expired at the provided instant.
	///
	/// Tokens without a reported lifetime are never considered expired.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at().is_some_and(|expires_at| instant >= expires_at)
	}
}
impl Debug for TokenConfiguration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenConfiguration")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("scope", &self.scope)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_in", &self.expires_in)
			.field("received_at", &self.received_at)
			.finish()
	}
}
