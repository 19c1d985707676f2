// crates.io
use serde_json::{Map, Value};
use url::form_urlencoded::{self, Serializer};
// self
use crate::{
	_prelude::*,
	http::{BuiltRequest, HttpMethod},
	router::Params,
};

/// Parameter serialization applied when a route builds its request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpEncoding {
	/// `application/x-www-form-urlencoded` body, or query string for body-less methods.
	Form,
	/// `application/json` object body.
	Json,
}
impl HttpEncoding {
	/// Content type written for request bodies.
	pub const fn content_type(self) -> &'static str {
		match self {
			HttpEncoding::Form => "application/x-www-form-urlencoded",
			HttpEncoding::Json => "application/json",
		}
	}

	/// Applies the encoding to `params`, writing either the body or the query string.
	pub fn encode(self, mut request: BuiltRequest, params: &Params) -> BuiltRequest {
		match self {
			HttpEncoding::Form if !request.method.carries_body() => {
				if !params.is_empty() {
					request
						.url
						.query_pairs_mut()
						.extend_pairs(params.iter().map(|(key, value)| (*key, value.as_str())));
				}
			},
			HttpEncoding::Form => {
				request.headers.push(("content-type", self.content_type().into()));
				request.body = Some(encode_form(params).into_bytes());
			},
			HttpEncoding::Json => {
				request.headers.push(("content-type", self.content_type().into()));
				request.body = Some(encode_json(params).into_bytes());
			},
		}

		request
	}
}

/// Serializes parameters as `key=value&…`, preserving their order.
pub fn encode_form(params: &Params) -> String {
	Serializer::new(String::new())
		.extend_pairs(params.iter().map(|(key, value)| (*key, value.as_str())))
		.finish()
}

/// Parses a `key=value&…` string back into ordered pairs.
pub fn decode_form(encoded: &str) -> Vec<(String, String)> {
	form_urlencoded::parse(encoded.as_bytes()).into_owned().collect()
}

/// Serializes parameters as a flat JSON object.
pub fn encode_json(params: &Params) -> String {
	let object = params
		.iter()
		.map(|(key, value)| ((*key).to_owned(), Value::String(value.clone())))
		.collect::<Map<_, _>>();

	Value::Object(object).to_string()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn params() -> Params {
		vec![
			("refresh_token", "a b&c=d/é".into()),
			("grant_type", "refresh_token".into()),
			("empty", String::new()),
		]
	}

	fn request(method: HttpMethod) -> BuiltRequest {
		BuiltRequest::new(
			method,
			Url::parse("https://example.com/resource").expect("Fixture URL should parse."),
		)
	}

	#[test]
	fn form_round_trip_preserves_pairs() {
		let params = params();
		let decoded = decode_form(&encode_form(&params));
		let expected = params
			.iter()
			.map(|(key, value)| ((*key).to_owned(), value.clone()))
			.collect::<Vec<_>>();

		assert_eq!(decoded, expected);
	}

	#[test]
	fn form_post_writes_body() {
		let request = HttpEncoding::Form.encode(request(HttpMethod::Post), &params());

		assert_eq!(request.header("content-type"), Some("application/x-www-form-urlencoded"));
		assert_eq!(request.url.query(), None);
		assert!(request.body_str().is_some_and(|body| body.starts_with("refresh_token=a+b%26c")));
	}

	#[test]
	fn form_get_writes_query() {
		let request = HttpEncoding::Form.encode(request(HttpMethod::Get), &params());

		assert!(request.body.is_none());
		assert_eq!(request.header("content-type"), None);
		assert_eq!(
			decode_form(request.url.query().expect("GET requests should carry a query string.")),
			decode_form(&encode_form(&params())),
		);
	}

	#[test]
	fn json_writes_object_body() {
		let request = HttpEncoding::Json.encode(request(HttpMethod::Put), &params());
		let body: Value = serde_json::from_slice(
			request.body.as_deref().expect("JSON requests should carry a body."),
		)
		.expect("JSON body should parse.");

		assert_eq!(request.header("content-type"), Some("application/json"));
		assert_eq!(body["grant_type"], "refresh_token");
		assert_eq!(body["refresh_token"], "a b&c=d/é");
	}
}
