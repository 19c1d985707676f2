// std
use std::time::Duration as StdDuration;
// self
#[cfg(feature = "metrics")] use crate::obs::RouteOutcome;
use crate::{error::ErrorKind, obs::RouteKind};

/// Counts a request entering the router.
pub fn record_attempt(route: RouteKind) {
	#[cfg(feature = "metrics")]
	count_request(route, RouteOutcome::Attempt);

	#[cfg(not(feature = "metrics"))]
	let _ = route;
}

/// Counts a settled request and records how long it took to settle.
///
/// `failure` is `None` for a decoded success; otherwise it names the failure's kind, which is
/// also counted on its own series.
pub fn record_settled(route: RouteKind, failure: Option<ErrorKind>, elapsed: StdDuration) {
	#[cfg(feature = "metrics")]
	{
		match failure {
			None => count_request(route, RouteOutcome::Success),
			Some(kind) => {
				count_request(route, RouteOutcome::Failure);
				metrics::counter!(
					"oauth2_token_router_failure_total",
					"route" => route.as_str(),
					"kind" => kind.as_str()
				)
				.increment(1);
			},
		}

		metrics::histogram!(
			"oauth2_token_router_request_duration_seconds",
			"route" => route.as_str()
		)
		.record(elapsed.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	let _ = (route, failure, elapsed);
}

#[cfg(feature = "metrics")]
fn count_request(route: RouteKind, outcome: RouteOutcome) {
	metrics::counter!(
		"oauth2_token_router_request_total",
		"route" => route.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
}
