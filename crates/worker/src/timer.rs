//! Cancelable one-shot timers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::TaskClass;
use crate::token::{GenerationClock, TaskToken};

/// Identifier returned by [`Timers::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
	pub const fn get(self) -> u64 {
		self.0
	}
}

#[derive(Debug, Default)]
struct TimersInner {
	pending: HashMap<TimerId, TaskToken>,
	closed: bool,
}

/// Schedules deferred callbacks on the worker runtime.
///
/// Every scheduled callback fires at most once. A timer removed by
/// [`Timers::cancel`] or [`Timers::cancel_all`] never fires, even if its
/// delay has already elapsed but the callback has not started yet.
#[derive(Debug, Clone, Default)]
pub struct Timers {
	clock: GenerationClock,
	inner: Arc<Mutex<TimersInner>>,
}

impl Timers {
	pub fn new() -> Self {
		Self::default()
	}

	/// Runs `callback` once `delay` has elapsed.
	///
	/// After [`Timers::cancel_all`] the set is closed and new timers are
	/// returned already cancelled.
	pub fn schedule<F>(&self, delay: Duration, callback: F) -> TimerId
	where
		F: FnOnce() + Send + 'static,
	{
		let token = self.clock.issue();
		let id = TimerId(token.generation());

		{
			let mut inner = self.inner.lock();
			if inner.closed {
				tracing::debug!(timer = id.0, "timer.schedule_after_close");
				return id;
			}
			inner.pending.insert(id, token.clone());
		}

		let inner = Arc::clone(&self.inner);
		crate::spawn(TaskClass::Timer, async move {
			tokio::select! {
				biased;
				_ = token.cancelled() => {}
				_ = tokio::time::sleep(delay) => {
					// Whoever removes the entry owns the outcome.
					let due = inner.lock().pending.remove(&id).is_some();
					if due {
						tracing::trace!(timer = id.0, "timer.fire");
						callback();
					}
				}
			}
		});
		id
	}

	/// Cancels a pending timer. Returns false if it already fired or was cancelled.
	pub fn cancel(&self, id: TimerId) -> bool {
		let token = self.inner.lock().pending.remove(&id);
		match token {
			Some(token) => {
				token.cancel();
				tracing::trace!(timer = id.0, "timer.cancel");
				true
			}
			None => false,
		}
	}

	/// Cancels every pending timer and refuses new ones.
	pub fn cancel_all(&self) {
		let drained: Vec<_> = {
			let mut inner = self.inner.lock();
			inner.closed = true;
			inner.pending.drain().collect()
		};
		if !drained.is_empty() {
			tracing::debug!(count = drained.len(), "timer.cancel_all");
		}
		for (_, token) in drained {
			token.cancel();
		}
	}

	/// Number of timers that have neither fired nor been cancelled.
	pub fn pending(&self) -> usize {
		self.inner.lock().pending.len()
	}

	pub fn is_closed(&self) -> bool {
		self.inner.lock().closed
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	async fn settle() {
		for _ in 0..8 {
			tokio::task::yield_now().await;
		}
	}

	#[tokio::test(start_paused = true)]
	async fn fires_after_delay() {
		let timers = Timers::new();
		let hits = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&hits);
		timers.schedule(Duration::from_secs(2), move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});
		settle().await;

		tokio::time::advance(Duration::from_millis(1999)).await;
		settle().await;
		assert_eq!(hits.load(Ordering::SeqCst), 0);

		tokio::time::advance(Duration::from_millis(2)).await;
		settle().await;
		assert_eq!(hits.load(Ordering::SeqCst), 1);
		assert_eq!(timers.pending(), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn cancelled_timer_never_fires() {
		let timers = Timers::new();
		let hits = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&hits);
		let id = timers.schedule(Duration::from_secs(1), move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});
		settle().await;

		assert!(timers.cancel(id));
		assert!(!timers.cancel(id));
		tokio::time::advance(Duration::from_secs(5)).await;
		settle().await;
		assert_eq!(hits.load(Ordering::SeqCst), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn cancel_all_closes_the_set() {
		let timers = Timers::new();
		let hits = Arc::new(AtomicUsize::new(0));
		for secs in 1..=3 {
			let counter = Arc::clone(&hits);
			timers.schedule(Duration::from_secs(secs), move || {
				counter.fetch_add(1, Ordering::SeqCst);
			});
		}
		settle().await;
		timers.cancel_all();
		assert_eq!(timers.pending(), 0);

		let counter = Arc::clone(&hits);
		timers.schedule(Duration::from_millis(1), move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});
		tokio::time::advance(Duration::from_secs(10)).await;
		settle().await;

		assert!(timers.is_closed());
		assert_eq!(hits.load(Ordering::SeqCst), 0);
	}
}
