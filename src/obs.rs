//! Optional observability helpers for routed requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_token_router.request` with the
//!   `route`, `stage` (call site), and `endpoint` fields. The span's `outcome` and `status`
//!   fields are filled in once the request settles.
//! - Enable `metrics` to increment `oauth2_token_router_request_total` (labels `route` +
//!   `outcome`) and `oauth2_token_router_failure_total` (labels `route` + `kind`), and to record
//!   settle latency in the `oauth2_token_router_request_duration_seconds` histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Routes observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteKind {
	/// Refresh token exchange.
	RefreshToken,
}
impl RouteKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RouteKind::RefreshToken => "refresh_token",
		}
	}
}
impl Display for RouteKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure delivered back to the caller.
	Failure,
}
impl RouteOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RouteOutcome::Attempt => "attempt",
			RouteOutcome::Success => "success",
			RouteOutcome::Failure => "failure",
		}
	}
}
impl Display for RouteOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
