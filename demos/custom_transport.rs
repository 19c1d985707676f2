//! Demonstrates plugging a custom transport into the token client.
//!
//! 1. Implement [`HttpTransport`] so requests are answered without touching the network.
//! 2. Pass the transport to [`Client::with_transport`].
//! 3. Inspect how transport failures and provider rejections surface as [`ErrorKind`]s.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
};
// crates.io
use color_eyre::Result;
// self
use oauth2_token_router::{
	client::Client,
	config::Configuration,
	error::ErrorKind,
	http::{BuiltRequest, HttpTransport, RawResponse, TransportFuture},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let configuration = Configuration::new("demo-client", "demo-secret");
	let client = Client::<MockTransport>::with_transport(configuration.clone(), MockTransport::Success);
	let token = client.refresh_token("demo-refresh").await?;

	println!("Access token issued by the mock transport: {}.", token.access_token.expose());
	println!("Granted scopes: {:?}.", token.scopes().collect::<Vec<_>>());

	let failing = Client::<MockTransport>::with_transport(
		configuration.clone(),
		MockTransport::Failure(MockTransportError::DnsFailure { host: "bitbucket.org" }),
	);

	match failing.refresh_token("demo-refresh").await {
		Ok(_) => println!("Mock transport unexpectedly succeeded."),
		Err(e) => println!("Transport failure surfaced as {}: {e}", e.kind()),
	}

	let rejecting = Client::<MockTransport>::with_transport(configuration, MockTransport::Rejection);

	match rejecting.refresh_token("revoked-refresh").await {
		Err(e) if e.kind() == ErrorKind::Api =>
			println!("Provider rejected the refresh with HTTP {:?}: {e}", e.status()),
		Err(e) => println!("Unexpected failure: {e}."),
		Ok(_) => println!("Mock transport unexpectedly produced a token."),
	}

	Ok(())
}

#[derive(Clone, Debug)]
enum MockTransportError {
	DnsFailure { host: &'static str },
}
impl Display for MockTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::DnsFailure { host } => write!(f, "DNS lookup failed for {host}"),
		}
	}
}
impl StdError for MockTransportError {}

#[derive(Clone)]
enum MockTransport {
	Success,
	Failure(MockTransportError),
	Rejection,
}
impl HttpTransport for MockTransport {
	type TransportError = MockTransportError;

	fn submit(&self, request: BuiltRequest) -> TransportFuture<Self::TransportError> {
		let behavior = self.clone();

		println!("Mock transport received {request:?}.");

		Box::pin(async move {
			match behavior {
				Self::Success => Ok(RawResponse::new(
					200,
					r#"{"access_token":"mock-access","token_type":"bearer","scope":"account email","expires_in":900}"#,
				)),
				Self::Failure(error) => Err(error),
				Self::Rejection => Ok(RawResponse::new(
					400,
					r#"{"error":"invalid_grant","error_description":"Invalid refresh_token"}"#,
				)),
			}
		})
	}
}
