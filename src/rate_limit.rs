//! Fixed-window request limiter consulted before every submission attempt.
//!
//! [`RateLimiter`] admits at most `limit` operations per `period`. The window state lives
//! behind a short synchronous critical section: callers either take a slot and leave, or
//! learn when the current window closes and suspend on the injected [`Clock`] until then.
//! Nothing spins and nothing awaits while the lock is held, so dropping an
//! [`acquire`](RateLimiter::acquire) future at any point leaves the counter untouched.
//! A clock that steps back behind the current window start opens a fresh window.

// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	error::{Cancelled, ConfigError},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Result of a single non-blocking admission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
	/// The call was admitted and counted against the current window.
	Allow,
	/// The window is full; the call was not counted.
	Delay(RetryDirective),
}

/// Advises callers when to retry after a [`RateLimitDecision::Delay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryDirective {
	/// Instant when the current window closes.
	pub earliest_retry_at: OffsetDateTime,
	/// Time left until `earliest_retry_at`, never longer than one period.
	pub recommended_backoff: Duration,
}
impl RetryDirective {
	/// Creates a new directive with the provided timing metadata.
	pub fn new(earliest_retry_at: OffsetDateTime, recommended_backoff: Duration) -> Self {
		Self { earliest_retry_at, recommended_backoff }
	}
}

#[derive(Debug)]
struct RateWindow {
	window_start: Option<OffsetDateTime>,
	count: u32,
}

/// Admits at most `limit` calls within each `period`-long window.
pub struct RateLimiter {
	limit: u32,
	period: Duration,
	clock: Arc<dyn Clock>,
	window: Mutex<RateWindow>,
}
impl RateLimiter {
	/// Creates a limiter driven by the system clock.
	pub fn new(limit: u32, period: Duration) -> Result<Self, ConfigError> {
		Self::with_clock(limit, period, Arc::new(SystemClock))
	}

	/// Creates a limiter driven by `clock`.
	pub fn with_clock(
		limit: u32,
		period: Duration,
		clock: Arc<dyn Clock>,
	) -> Result<Self, ConfigError> {
		if limit == 0 {
			return Err(ConfigError::invalid("request_limit", "must be greater than zero"));
		}
		if !period.is_positive() {
			return Err(ConfigError::invalid("period", "must be a positive duration"));
		}

		let window = Mutex::new(RateWindow { window_start: None, count: 0 });

		Ok(Self { limit, period, clock, window })
	}

	/// Maximum admissions per window.
	pub fn limit(&self) -> u32 {
		self.limit
	}

	/// Window length.
	pub fn period(&self) -> Duration {
		self.period
	}

	/// Takes a slot if one is free in the current window, without waiting.
	pub fn try_acquire(&self) -> RateLimitDecision {
		let now = self.clock.now();
		let mut window = self.window.lock();
		let start = match window.window_start {
			Some(start) if start <= now && now < start + self.period => start,
			_ => {
				window.window_start = Some(now);
				window.count = 0;

				now
			},
		};

		if window.count < self.limit {
			window.count += 1;

			return RateLimitDecision::Allow;
		}

		let earliest_retry_at = start + self.period;
		let wait = (earliest_retry_at - now).clamp(Duration::NANOSECOND, self.period);

		RateLimitDecision::Delay(RetryDirective::new(earliest_retry_at, wait))
	}

	/// Waits until a slot is free, then takes it.
	///
	/// Dropping the returned future cancels the wait; a slot is only counted in the same
	/// synchronous step that resolves the future.
	pub async fn acquire(&self) {
		const KIND: OpKind = OpKind::Acquire;

		let span = OpSpan::new(KIND, "acquire");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);
		span.instrument(async {
			loop {
				match self.try_acquire() {
					RateLimitDecision::Allow => break,
					RateLimitDecision::Delay(directive) => {
						obs::debug_event!(
							backoff_ms = directive.recommended_backoff.whole_milliseconds() as u64,
							"rate window exhausted; suspending"
						);
						obs::record_op_outcome(KIND, OpOutcome::Delayed);
						self.clock.sleep(directive.recommended_backoff).await;
					},
				}
			}
		})
		.await;
		obs::record_op_outcome(KIND, OpOutcome::Success);
	}

	/// Same as [`acquire`](Self::acquire), but gives up as soon as `cancel` resolves.
	pub async fn acquire_or_cancel<F>(&self, cancel: F) -> Result<(), Cancelled>
	where
		F: Future<Output = ()>,
	{
		tokio::select! {
			biased;
			_ = cancel => {
				obs::record_op_outcome(OpKind::Acquire, OpOutcome::Failure);

				Err(Cancelled)
			},
			_ = self.acquire() => Ok(()),
		}
	}
}
impl Debug for RateLimiter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimiter")
			.field("limit", &self.limit)
			.field("period", &self.period)
			.field("window", &*self.window.lock())
			.finish()
	}
}
