// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::{OpKind, OpOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"ismp_client_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Thread-safe in-process counters shared by one client instance.
#[derive(Debug, Default)]
pub struct ClientMetrics {
	refresh_attempts: AtomicU64,
	refresh_failures: AtomicU64,
	sandbox_fallbacks: AtomicU64,
	accepted: AtomicU64,
	rejected: AtomicU64,
	transport_failures: AtomicU64,
}
impl ClientMetrics {
	/// Returns the number of challenge/token round trips started.
	pub fn refresh_attempts(&self) -> u64 {
		self.refresh_attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes that ended in an error.
	pub fn refresh_failures(&self) -> u64 {
		self.refresh_failures.load(Ordering::Relaxed)
	}

	/// Returns how many times the sandbox placeholder token was issued.
	pub fn sandbox_fallbacks(&self) -> u64 {
		self.sandbox_fallbacks.load(Ordering::Relaxed)
	}

	/// Returns the number of submissions answered with HTTP 200.
	pub fn accepted(&self) -> u64 {
		self.accepted.load(Ordering::Relaxed)
	}

	/// Returns the number of submissions answered with any other status.
	pub fn rejected(&self) -> u64 {
		self.rejected.load(Ordering::Relaxed)
	}

	/// Returns the number of submissions that failed before a response was decoded.
	pub fn transport_failures(&self) -> u64 {
		self.transport_failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_refresh_attempt(&self) {
		self.refresh_attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_failure(&self) {
		self.refresh_failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_sandbox_fallback(&self) {
		self.sandbox_fallbacks.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_accepted(&self) {
		self.accepted.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_rejected(&self) {
		self.rejected.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_transport_failure(&self) {
		self.transport_failures.fetch_add(1, Ordering::Relaxed);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_op_outcome_noop_without_metrics() {
		record_op_outcome(OpKind::Submit, OpOutcome::Failure);
	}

	#[test]
	fn client_metrics_count_independently() {
		let metrics = ClientMetrics::default();

		metrics.record_refresh_attempt();
		metrics.record_refresh_attempt();
		metrics.record_sandbox_fallback();
		metrics.record_rejected();

		assert_eq!(metrics.refresh_attempts(), 2);
		assert_eq!(metrics.sandbox_fallbacks(), 1);
		assert_eq!(metrics.rejected(), 1);
		assert_eq!(metrics.accepted(), 0);
	}
}
