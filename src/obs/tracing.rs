// self
use crate::{_prelude::*, obs::RouteKind};

/// Resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// Span covering one routed request, from dispatch until its outcome is decoded.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Opens a span for `route` issued from `stage` against `endpoint`.
	///
	/// `outcome` and `status` stay empty until [`settle`](Self::settle) fills them in.
	pub fn new(route: RouteKind, stage: &'static str, endpoint: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth2_token_router.request",
				route = route.as_str(),
				stage,
				endpoint,
				outcome = tracing::field::Empty,
				status = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (route, stage, endpoint);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Stamps the terminal outcome onto the span and emits one completion event inside it.
	///
	/// `failure` is `None` when the response decoded successfully.
	pub fn settle(&self, failure: Option<&Error>) {
		#[cfg(feature = "tracing")]
		self.span.in_scope(|| match failure {
			None => {
				self.span.record("outcome", "success");

				tracing::debug!("request settled");
			},
			Some(err) => {
				self.span.record("outcome", err.kind().as_str());

				if let Some(status) = err.status() {
					self.span.record("status", status);
				}

				tracing::debug!(error = %err, "request failed");
			},
		});

		#[cfg(not(feature = "tracing"))]
		let _ = failure;
	}
}
