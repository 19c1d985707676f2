//! Uniform success/failure decoding for token endpoint responses.
//!
//! Every response goes through the same three steps: parse the body as any JSON value, require
//! a key/value object, then branch on the status. `200` builds the typed payload; anything else
//! becomes [`Error::Api`] carrying the status and the provider's `error_description`.

// crates.io
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::TokenConfiguration,
	error::{DecodeError, PayloadError},
	http::RawResponse,
};

/// Decodes a raw token endpoint response into a [`TokenConfiguration`].
pub fn decode_token_response(status: u16, body: &[u8]) -> Result<TokenConfiguration> {
	decode_with(status, body, TokenConfiguration::from_json)
}

/// Decodes a raw response into any deserializable success payload.
pub fn decode_response<T>(status: u16, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	decode_with(status, body, |object| {
		serde_path_to_error::deserialize(Value::Object(object)).map_err(PayloadError::from)
	})
}

impl RawResponse {
	/// Shorthand for [`decode_token_response`].
	pub fn decode_token(&self) -> Result<TokenConfiguration> {
		decode_token_response(self.status, &self.body)
	}
}

fn decode_with<T, F>(status: u16, body: &[u8], build: F) -> Result<T>
where
	F: FnOnce(Map<String, Value>) -> Result<T, PayloadError>,
{
	let value = serde_json::from_slice::<Value>(body)
		.map_err(|source| DecodeError::Json { source, status })?;
	let object = match value {
		Value::Object(object) => object,
		other => return Err(DecodeError::NotAnObject { found: json_type(&other), status }.into()),
	};

	if status != 200 {
		let message = object
			.get("error_description")
			.and_then(Value::as_str)
			.unwrap_or_default()
			.to_owned();
		let error = object.get("error").and_then(Value::as_str).map(str::to_owned);

		return Err(Error::Api { status, error, message });
	}

	build(object).map_err(|source| DecodeError::Payload { source, status }.into())
}

fn json_type(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
