//! Cancelable wrapper around one in-flight asynchronous operation.
//!
//! A [`CancelableTask`] mirrors the settlement of its source future, except that
//! once [`CancelableTask::cancel`] (or [`TaskToken::cancel`] on a handle obtained
//! from it) has been called, the outcome is never handed to the awaiting side:
//! awaiting the task yields `None` instead of `Some(outcome)`.
//!
//! In the default [`CancelMode::Suppress`] mode the source future is still
//! driven to completion so the underlying operation settles normally; only
//! delivery is suppressed. [`CancelMode::Abort`] drops the source as soon as
//! cancellation is observed, for transports that benefit from early teardown.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;

use crate::token::TaskToken;

/// A pinned, boxed future that is required to be Send and 'static.
pub type BoxFutureStatic<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// What happens to the source operation once the task is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelMode {
	/// Drive the source to settlement and drop its outcome.
	#[default]
	Suppress,
	/// Drop the source at the first poll after cancellation.
	Abort,
}

/// An asynchronous operation whose outcome can be suppressed after the fact.
///
/// The task is consumed by awaiting it, so an outcome is delivered at most once.
#[must_use = "a cancelable task does nothing unless awaited or spawned"]
pub struct CancelableTask<T> {
	token: TaskToken,
	source: BoxFutureStatic<T>,
	mode: CancelMode,
}

impl<T> fmt::Debug for CancelableTask<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CancelableTask")
			.field("generation", &self.token.generation())
			.field("cancelled", &self.token.is_cancelled())
			.field("mode", &self.mode)
			.finish_non_exhaustive()
	}
}

impl<T> CancelableTask<T>
where
	T: Send + 'static,
{
	/// Wraps `source` in generation 0 with suppression-only cancellation.
	pub fn wrap<F>(source: F) -> Self
	where
		F: Future<Output = T> + Send + 'static,
	{
		Self::with_token(TaskToken::new(0), source)
	}

	/// Wraps `source` using an existing token, so the owner can keep the
	/// token and cancel without holding the task itself.
	pub fn with_token<F>(token: TaskToken, source: F) -> Self
	where
		F: Future<Output = T> + Send + 'static,
	{
		Self {
			token,
			source: Box::pin(source),
			mode: CancelMode::Suppress,
		}
	}

	/// Switches the cancellation mode.
	pub fn mode(mut self, mode: CancelMode) -> Self {
		self.mode = mode;
		self
	}

	/// Returns a cloneable handle that cancels this task.
	pub fn handle(&self) -> TaskToken {
		self.token.clone()
	}

	/// Suppresses delivery of the outcome. Idempotent.
	pub fn cancel(&self) {
		self.token.cancel();
	}

	/// Returns true once cancellation has been requested.
	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	/// Spawns the task and hands a delivered outcome to `on_settle`.
	///
	/// `on_settle` is never called if the task is cancelled before settlement.
	pub fn spawn_with<C>(self, class: crate::TaskClass, on_settle: C) -> TaskToken
	where
		C: FnOnce(T) + Send + 'static,
	{
		let handle = self.handle();
		crate::spawn(class, async move {
			if let Some(outcome) = self.await {
				on_settle(outcome);
			}
		});
		handle
	}
}

impl<T> IntoFuture for CancelableTask<T>
where
	T: Send + 'static,
{
	type Output = Option<T>;
	type IntoFuture = BoxFutureStatic<Option<T>>;

	fn into_future(self) -> Self::IntoFuture {
		let Self { token, source, mode } = self;
		Box::pin(async move {
			let outcome = match mode {
				CancelMode::Suppress => source.await,
				CancelMode::Abort => {
					tokio::select! {
						biased;
						_ = token.cancelled() => {
							tracing::trace!(generation = token.generation(), "task.aborted");
							return None;
						}
						outcome = source => outcome,
					}
				}
			};

			if token.is_cancelled() {
				tracing::trace!(generation = token.generation(), "task.suppressed");
				None
			} else {
				Some(outcome)
			}
		})
	}
}
