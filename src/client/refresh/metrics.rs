// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::error::ErrorKind;

const KINDS: [ErrorKind; 5] = [
	ErrorKind::MalformedUrl,
	ErrorKind::Network,
	ErrorKind::Decode,
	ErrorKind::Api,
	ErrorKind::Cancelled,
];

/// Settled-outcome counters for a client's refreshes, with failures broken down by
/// [`ErrorKind`].
///
/// Every attempt eventually lands in exactly one bucket, so `attempts - settled` is the number
/// of refreshes still in flight.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	successes: AtomicU64,
	failures: [AtomicU64; KINDS.len()],
}
impl RefreshMetrics {
	/// Refreshes started, whether or not they have settled.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Refreshes that decoded a token.
	pub fn successes(&self) -> u64 {
		self.successes.load(Ordering::Relaxed)
	}

	/// Refreshes that settled with a failure of `kind`.
	pub fn failures(&self, kind: ErrorKind) -> u64 {
		self.failures[kind as usize].load(Ordering::Relaxed)
	}

	/// Refreshes that settled with any failure.
	pub fn total_failures(&self) -> u64 {
		KINDS.into_iter().map(|kind| self.failures(kind)).sum()
	}

	/// Refreshes started but not yet settled.
	pub fn in_flight(&self) -> u64 {
		self.attempts().saturating_sub(self.successes() + self.total_failures())
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_settled(&self, failure: Option<ErrorKind>) {
		let counter = match failure {
			None => &self.successes,
			Some(kind) => &self.failures[kind as usize],
		};

		counter.fetch_add(1, Ordering::Relaxed);
	}
}
