// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// crates.io
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::oneshot;
// self
use oauth2_token_router::{
	auth::TokenConfiguration,
	client::Client,
	config::Configuration,
	error::{DecodeError, Error, ErrorKind, MalformedUrlError, Result},
	http::{BuiltRequest, HttpMethod, HttpTransport, RawResponse, TransportFuture},
	router::decode_form,
};

const CLIENT_ID: &str = "client-refresh";
const CLIENT_SECRET: &str = "secret-refresh";

#[derive(Debug)]
enum FakeTransportError {
	ConnectionReset,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::ConnectionReset => write!(f, "Connection reset by peer."),
		}
	}
}
impl StdError for FakeTransportError {}

#[derive(Clone, Copy)]
enum Reply {
	Respond(u16, &'static str),
	Fail,
	EchoToken,
	Hang,
}

struct FakeTransport {
	reply: Reply,
	requests: Mutex<Vec<BuiltRequest>>,
}
impl FakeTransport {
	fn new(reply: Reply) -> Self {
		Self { reply, requests: Mutex::new(Vec::new()) }
	}

	fn recorded(&self) -> Vec<BuiltRequest> {
		self.requests.lock().clone()
	}
}
impl HttpTransport for FakeTransport {
	type TransportError = FakeTransportError;

	fn submit(&self, request: BuiltRequest) -> TransportFuture<Self::TransportError> {
		let reply = self.reply;

		self.requests.lock().push(request.clone());

		Box::pin(async move {
			match reply {
				Reply::Respond(status, body) => Ok(RawResponse::new(status, body)),
				Reply::Fail => Err(FakeTransportError::ConnectionReset),
				Reply::EchoToken => {
					let token = request
						.body_str()
						.map(decode_form)
						.unwrap_or_default()
						.into_iter()
						.find(|(key, _)| key == "refresh_token")
						.map(|(_, value)| value)
						.unwrap_or_default();

					// Longer tokens answer sooner so completions interleave.
					tokio::time::sleep(StdDuration::from_millis(40 - token.len() as u64)).await;

					let body =
						json!({ "access_token": format!("{token}-access"), "token_type": "bearer" });

					Ok(RawResponse::new(200, body.to_string()))
				},
				Reply::Hang => std::future::pending().await,
			}
		})
	}
}

fn configuration(endpoint: &str) -> Configuration {
	Configuration::new(CLIENT_ID, CLIENT_SECRET).with_web_endpoint(endpoint)
}

fn client(endpoint: &str, reply: Reply) -> (Client<FakeTransport>, Arc<FakeTransport>) {
	let transport = Arc::new(FakeTransport::new(reply));
	let client = Client::with_transport(configuration(endpoint), transport.clone());

	(client, transport)
}

#[tokio::test]
async fn refresh_posts_form_and_decodes_token() {
	let (client, transport) = client(
		"https://bitbucket.org",
		Reply::Respond(
			200,
			r#"{"access_token":"abc","token_type":"bearer","scope":"account","refresh_token":"next","expires_in":7200}"#,
		),
	);
	let token = client.refresh_token("refresh-1").await.expect("Refresh should succeed.");

	assert_eq!(token.access_token.expose(), "abc");
	assert_eq!(token.token_type, "bearer");
	assert_eq!(token.refresh_token.as_ref().map(|secret| secret.expose()), Some("next"));
	assert!(token.expires_at().is_some());

	let requests = transport.recorded();

	assert_eq!(requests.len(), 1, "Exactly one request should be dispatched.");

	let request = &requests[0];

	assert_eq!(request.method, HttpMethod::Post);
	assert_eq!(request.url.as_str(), "https://bitbucket.org/site/oauth2/access_token");
	assert_eq!(request.body_str(), Some("refresh_token=refresh-1&grant_type=refresh_token"));
	assert_eq!(request.header("content-type"), Some("application/x-www-form-urlencoded"));
	assert_eq!(client.refresh_metrics.attempts(), 1);
	assert_eq!(client.refresh_metrics.successes(), 1);
	assert_eq!(client.refresh_metrics.total_failures(), 0);
}

#[tokio::test]
async fn malformed_endpoint_fails_without_dispatch() {
	let (client, transport) = client("not a url", Reply::Respond(200, "{}"));
	let err = client
		.refresh_token("refresh-1")
		.await
		.expect_err("Malformed endpoints should surface an error.");

	assert!(matches!(err, Error::MalformedUrl(MalformedUrlError::InvalidEndpoint { .. })));
	assert_eq!(err.kind(), ErrorKind::MalformedUrl);
	assert!(transport.recorded().is_empty(), "No request should be dispatched.");
	assert_eq!(client.refresh_metrics.failures(ErrorKind::MalformedUrl), 1);
}

#[tokio::test]
async fn malformed_endpoint_completes_before_returning() {
	let (client, transport) = client("", Reply::Respond(200, "{}"));
	let (tx, mut rx) = oneshot::channel();
	let handle = client.refresh_token_with("refresh-1", move |outcome| {
		let _ = tx.send(outcome);
	});
	let err = rx
		.try_recv()
		.expect("Completion should run before the call returns.")
		.expect_err("Build failures should surface an error.");

	assert_eq!(err.kind(), ErrorKind::MalformedUrl);
	assert!(handle.is_finished());
	assert!(transport.recorded().is_empty(), "No request should be dispatched.");

	handle.cancel();
	handle.await.expect("Completion already ran; cancelling must not change the outcome.");
}

#[tokio::test]
async fn spawned_malformed_endpoint_survives_cancel() {
	let (client, _transport) = client("not a url", Reply::Respond(200, "{}"));
	let handle = client.spawn_refresh_token("refresh-1");

	assert!(handle.is_finished(), "Build failures should settle before the call returns.");

	handle.cancel();

	let err = handle.await.expect_err("Malformed endpoints should surface an error.");

	assert_eq!(err.kind(), ErrorKind::MalformedUrl);
	assert_eq!(client.refresh_metrics.failures(ErrorKind::MalformedUrl), 1);
	assert_eq!(client.refresh_metrics.failures(ErrorKind::Cancelled), 0);
}

#[tokio::test]
async fn spawned_refresh_dispatches_before_returning() {
	let (client, transport) = client("https://bitbucket.org/", Reply::Hang);
	let handle = client.spawn_refresh_token("refresh-1");

	assert_eq!(transport.recorded().len(), 1, "The request should be submitted on return.");
	assert_eq!(client.refresh_metrics.in_flight(), 1);

	handle.cancel();

	let err = handle.await.expect_err("Cancelled handles should report cancellation.");

	assert_eq!(err.kind(), ErrorKind::Cancelled);
	assert_eq!(client.refresh_metrics.failures(ErrorKind::Cancelled), 1);
	assert_eq!(client.refresh_metrics.in_flight(), 0);
}

#[tokio::test]
async fn transport_failure_completes_once_with_network_error() {
	let (client, transport) = client("https://bitbucket.org/", Reply::Fail);
	let calls = Arc::new(AtomicUsize::new(0));
	let (tx, rx) = oneshot::channel::<Result<TokenConfiguration>>();
	let counter = calls.clone();
	let handle = client.refresh_token_with("refresh-1", move |outcome| {
		counter.fetch_add(1, Ordering::SeqCst);

		let _ = tx.send(outcome);
	});

	handle.await.expect("Completion task should finish.");

	let err = rx
		.await
		.expect("Completion should be invoked for transport failures.")
		.expect_err("Transport failures should surface an error.");

	assert!(matches!(err, Error::Network(_)));
	assert!(
		StdError::source(&err).is_some_and(|source| source.to_string().contains("reset")),
		"Network errors should expose the transport failure as their source."
	);
	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert_eq!(transport.recorded().len(), 1, "Transport failures must not be retried.");
}

#[tokio::test]
async fn provider_rejection_yields_api_error() {
	let (client, _transport) = client(
		"https://bitbucket.org/",
		Reply::Respond(401, r#"{"error":"invalid_grant","error_description":"invalid_grant"}"#),
	);
	let err = client
		.refresh_token("expired")
		.await
		.expect_err("401 responses should surface an error.");

	match err {
		Error::Api { status, message, error } => {
			assert_eq!(status, 401);
			assert_eq!(message, "invalid_grant");
			assert_eq!(error.as_deref(), Some("invalid_grant"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn unparsable_error_body_yields_decode_error() {
	let (client, _transport) =
		client("https://bitbucket.org/", Reply::Respond(400, "<html>Bad Request</html>"));
	let err = client
		.refresh_token("refresh-1")
		.await
		.expect_err("Unparsable bodies should surface an error.");

	assert!(matches!(err, Error::Decode(DecodeError::Json { status: 400, .. })));
	assert_eq!(err.status(), Some(400));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_refreshes_do_not_share_parameters() {
	let (client, transport) = client("https://bitbucket.org/", Reply::EchoToken);
	let first = client.spawn_refresh_token("a");
	let second = client.spawn_refresh_token("token-bbbbbbbb");
	let (first, second) = tokio::join!(first, second);
	let first = first.expect("First refresh should succeed.");
	let second = second.expect("Second refresh should succeed.");

	assert_eq!(first.access_token.expose(), "a-access");
	assert_eq!(second.access_token.expose(), "token-bbbbbbbb-access");

	let mut bodies = transport
		.recorded()
		.iter()
		.filter_map(|request| request.body_str().map(str::to_owned))
		.collect::<Vec<_>>();

	bodies.sort();

	assert_eq!(
		bodies,
		[
			"refresh_token=a&grant_type=refresh_token",
			"refresh_token=token-bbbbbbbb&grant_type=refresh_token",
		]
	);
	assert_eq!(client.refresh_metrics.attempts(), 2);
	assert_eq!(client.refresh_metrics.successes(), 2);
}

#[tokio::test]
async fn cancelled_refresh_completes_with_cancelled() {
	let (client, transport) = client("https://bitbucket.org/", Reply::Hang);
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	let (tx, rx) = oneshot::channel();
	let handle = client.refresh_token_with("refresh-1", move |outcome| {
		counter.fetch_add(1, Ordering::SeqCst);

		let _ = tx.send(outcome);
	});

	assert_eq!(transport.recorded().len(), 1, "The request should be submitted on return.");

	handle.cancel();

	let err = handle.await.expect_err("Cancelled handles should report cancellation.");

	assert_eq!(err.kind(), ErrorKind::Cancelled);

	let outcome = rx
		.await
		.expect("Completion should run for cancelled refreshes.")
		.expect_err("Cancelled refreshes should not yield a token.");

	assert_eq!(outcome.kind(), ErrorKind::Cancelled);
	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert_eq!(client.refresh_metrics.failures(ErrorKind::Cancelled), 1);
}

#[tokio::test]
async fn spawned_refresh_reports_outcome() {
	let (client, _transport) = client(
		"https://bitbucket.org/",
		Reply::Respond(200, r#"{"access_token":"spawned","token_type":"bearer"}"#),
	);
	let handle = client.spawn_refresh_token(String::from("refresh-1"));
	let token = handle.await.expect("Spawned refresh should succeed.");

	assert_eq!(token.access_token.expose(), "spawned");
}
