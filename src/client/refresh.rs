//! Refresh-token round trips with exactly-once completion.
//!
//! [`Client::refresh_token`] is the core operation: it builds the refresh route, submits it
//! through the transport once, and decodes the response. Every path ends in exactly one
//! [`Result`]: a malformed endpoint, a transport failure, an undecodable body, and a provider
//! rejection all surface as [`Error`] variants instead of being dropped.
//!
//! [`Client::spawn_refresh_token`] and [`Client::refresh_token_with`] build and submit the
//! request before they return. A build failure settles on the spot; a dispatched request is
//! driven to its response on the Tokio runtime behind a [`RefreshHandle`].

mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::{
	task::{Context, Poll},
	time::Instant,
};
// crates.io
use tokio::task::JoinHandle;
// self
use crate::{
	_prelude::*,
	auth::TokenConfiguration,
	client::Client,
	error::TransportError,
	http::{HttpTransport, TransportFuture},
	obs::{self, RequestSpan, RouteKind},
	response,
	router::{Route, TokenRouter},
};

impl<T> Client<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges `refresh_token` for a fresh access token.
	///
	/// Performs exactly one transport call and never retries. The refresh token is passed
	/// through as-is, including when empty. Nothing is built or sent until the future is
	/// first polled.
	pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenConfiguration> {
		self.dispatch(refresh_token, "refresh_token").settle().await
	}

	/// Submits a refresh and returns a handle to its outcome.
	///
	/// The request has been built and handed to the transport by the time this returns. A
	/// malformed endpoint yields a handle that is already finished with
	/// [`Error::MalformedUrl`]; cancelling it changes nothing.
	///
	/// # Panics
	///
	/// Panics when a request is dispatched outside a Tokio runtime, like [`tokio::spawn`].
	pub fn spawn_refresh_token(
		&self,
		refresh_token: impl AsRef<str>,
	) -> RefreshHandle<TokenConfiguration> {
		match self.dispatch(refresh_token.as_ref(), "spawn_refresh_token").settle_build_failure() {
			Ok(in_flight) => RefreshHandle::spawn(in_flight.settle()),
			Err(err) => RefreshHandle::ready(Err(err)),
		}
	}

	/// Submits a refresh and hands its outcome to `completion`.
	///
	/// `completion` runs exactly once. A malformed endpoint invokes it with
	/// [`Error::MalformedUrl`] before this returns. Otherwise it runs on the Tokio runtime,
	/// possibly on another worker thread, with the decoded outcome, or with
	/// [`Error::Cancelled`] when the handle is cancelled first.
	///
	/// # Panics
	///
	/// Panics when a request is dispatched outside a Tokio runtime, like [`tokio::spawn`].
	pub fn refresh_token_with<F>(
		&self,
		refresh_token: impl AsRef<str>,
		completion: F,
	) -> RefreshHandle<()>
	where
		F: 'static + Send + FnOnce(Result<TokenConfiguration>),
	{
		match self.dispatch(refresh_token.as_ref(), "refresh_token_with").settle_build_failure() {
			Ok(in_flight) => {
				let completion = Completion::new(completion);

				RefreshHandle::spawn(async move {
					completion.deliver(in_flight.settle().await);

					Ok(())
				})
			},
			Err(err) => {
				completion(Err(err));

				RefreshHandle::ready(Ok(()))
			},
		}
	}

	fn dispatch(&self, refresh_token: &str, stage: &'static str) -> InFlight<T::TransportError> {
		let attempt = Attempt::begin(
			RouteKind::RefreshToken,
			RequestSpan::new(RouteKind::RefreshToken, stage, &self.configuration.web_endpoint),
			Arc::clone(&self.refresh_metrics),
		);
		let submitted = TokenRouter::refresh_token(&self.configuration, refresh_token)
			.build_request()
			.map(|request| self.transport.submit(request))
			.map_err(Error::from);

		InFlight { attempt, submitted }
	}
}

/// A refresh whose request has been built and, when that succeeded, submitted.
struct InFlight<E> {
	attempt: Attempt,
	submitted: Result<TransportFuture<E>>,
}
impl<E> InFlight<E>
where
	E: 'static + Send + Sync + StdError,
{
	/// Settles a build failure immediately, handing dispatched requests back untouched.
	fn settle_build_failure(self) -> Result<Self> {
		match self.submitted {
			Ok(submitted) => Ok(Self { attempt: self.attempt, submitted: Ok(submitted) }),
			Err(err) => {
				self.attempt.settle(Some(&err));

				Err(err)
			},
		}
	}

	/// Drives the exchange to its response and decodes it.
	async fn settle(self) -> Result<TokenConfiguration> {
		let Self { attempt, submitted } = self;
		let result = attempt
			.span
			.instrument(async move {
				let response = submitted?.await.map_err(TransportError::network)?;

				response::decode_token_response(response.status, &response.body)
			})
			.await;

		attempt.settle(result.as_ref().err());

		result
	}
}

/// Observability for one refresh from dispatch to outcome.
///
/// Dropped before [`settle`](Self::settle) means the refresh was abandoned; that is recorded
/// as [`Error::Cancelled`].
struct Attempt {
	route: RouteKind,
	span: RequestSpan,
	metrics: Arc<RefreshMetrics>,
	started: Instant,
	settled: bool,
}
impl Attempt {
	fn begin(route: RouteKind, span: RequestSpan, metrics: Arc<RefreshMetrics>) -> Self {
		obs::record_attempt(route);
		metrics.record_attempt();

		Self { route, span, metrics, started: Instant::now(), settled: false }
	}

	fn settle(mut self, failure: Option<&Error>) {
		self.settled = true;
		self.record(failure);
	}

	fn record(&self, failure: Option<&Error>) {
		let kind = failure.map(Error::kind);

		self.span.settle(failure);
		self.metrics.record_settled(kind);
		obs::record_settled(self.route, kind, self.started.elapsed());
	}
}
impl Drop for Attempt {
	fn drop(&mut self) {
		if !self.settled {
			self.record(Some(&Error::Cancelled));
		}
	}
}

/// Completion callback that fires exactly once, with [`Error::Cancelled`] if the task carrying
/// it is dropped before delivery.
struct Completion<F>
where
	F: FnOnce(Result<TokenConfiguration>),
{
	callback: Option<F>,
}
impl<F> Completion<F>
where
	F: FnOnce(Result<TokenConfiguration>),
{
	fn new(callback: F) -> Self {
		Self { callback: Some(callback) }
	}

	fn deliver(mut self, result: Result<TokenConfiguration>) {
		if let Some(callback) = self.callback.take() {
			callback(result);
		}
	}
}
impl<F> Drop for Completion<F>
where
	F: FnOnce(Result<TokenConfiguration>),
{
	fn drop(&mut self) {
		if let Some(callback) = self.callback.take() {
			callback(Err(Error::Cancelled));
		}
	}
}

/// Handle to a submitted refresh.
///
/// Awaiting the handle yields the operation's outcome, or [`Error::Cancelled`] after
/// [`cancel`](Self::cancel) stopped it first. Dropping the handle detaches the operation
/// without cancelling it.
#[derive(Debug)]
pub struct RefreshHandle<O> {
	state: HandleState<O>,
}
#[derive(Debug)]
enum HandleState<O> {
	Ready(Option<Result<O>>),
	Running(JoinHandle<Result<O>>),
}
impl<O> RefreshHandle<O>
where
	O: 'static + Send,
{
	fn spawn<F>(fut: F) -> Self
	where
		F: 'static + Send + Future<Output = Result<O>>,
	{
		Self { state: HandleState::Running(tokio::spawn(fut)) }
	}
}
impl<O> RefreshHandle<O> {
	fn ready(outcome: Result<O>) -> Self {
		Self { state: HandleState::Ready(Some(outcome)) }
	}

	/// Aborts the operation if it has not settled yet.
	pub fn cancel(&self) {
		if let HandleState::Running(task) = &self.state {
			task.abort();
		}
	}

	/// Returns `true` once the operation has settled or been cancelled.
	pub fn is_finished(&self) -> bool {
		match &self.state {
			HandleState::Ready(_) => true,
			HandleState::Running(task) => task.is_finished(),
		}
	}
}
// The outcome is only ever moved out, never pinned.
impl<O> Unpin for RefreshHandle<O> {}
impl<O> Future for RefreshHandle<O> {
	type Output = Result<O>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match &mut self.get_mut().state {
			HandleState::Ready(outcome) => match outcome.take() {
				Some(outcome) => Poll::Ready(outcome),
				None => panic!("`RefreshHandle` polled after completion"),
			},
			HandleState::Running(task) => match Pin::new(task).poll(cx) {
				Poll::Ready(Ok(result)) => Poll::Ready(result),
				Poll::Ready(Err(err)) if err.is_cancelled() => Poll::Ready(Err(Error::Cancelled)),
				Poll::Ready(Err(err)) => std::panic::resume_unwind(err.into_panic()),
				Poll::Pending => Poll::Pending,
			},
		}
	}
}
