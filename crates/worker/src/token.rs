//! Generation numbers and the cancellation flags stamped with them.
//!
//! A resource loader issues one token per load cycle and remembers the token
//! of the cycle it is waiting on. When a fetch settles it checks its own
//! token with [`TaskToken::is_live_in`] before touching shared state, so the
//! answer for a key the user already navigated away from is discarded.
//! Notice ids and timer ids come from the same kind of clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Hands out increasing ids, starting at 1. Clones share the counter.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	last: Arc<AtomicU64>,
}

impl GenerationClock {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn next(&self) -> u64 {
		self.last.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Starts a new cycle: draws the next id and returns a fresh token for it.
	pub fn issue(&self) -> TaskToken {
		TaskToken::new(self.next())
	}
}

/// Cancellation flag of one load cycle or timer.
///
/// Clones observe the same flag. Cancelling twice is a no-op.
#[derive(Debug, Clone)]
pub struct TaskToken {
	generation: u64,
	cancel: CancellationToken,
}

impl TaskToken {
	pub fn new(generation: u64) -> Self {
		Self {
			generation,
			cancel: CancellationToken::new(),
		}
	}

	pub const fn generation(&self) -> u64 {
		self.generation
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Resolves once [`cancel`](Self::cancel) has been called on any clone.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}

	/// True when this token is uncancelled and belongs to the same cycle as
	/// `current`, the token the owner is currently waiting on.
	pub fn is_live_in(&self, current: Option<&TaskToken>) -> bool {
		!self.is_cancelled() && current.is_some_and(|current| current.generation == self.generation)
	}
}
