//! Drives one cancelable fetch per current resource key.

use std::sync::Arc;

use curio_worker::{CancelMode, CancelableTask, GenerationClock, TaskClass, TaskToken};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::{LoaderError, Result};
use crate::fetch::Fetch;
use crate::state::{LoadState, LoaderPhase};

#[cfg(test)]
mod tests;

/// Hook run with freshly loaded data, before the new state is published.
pub type OnLoad<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
	key: Option<String>,
	current: Option<TaskToken>,
	phase: LoaderPhase,
	on_load: Option<OnLoad<T>>,
}

struct Shared<T, E> {
	inner: Mutex<Inner<T>>,
	state: watch::Sender<LoadState<T, E>>,
}

impl<T: Clone, E: Clone> Shared<T, E> {
	/// Applies a settled outcome if `token` is still the live task.
	///
	/// Liveness is checked under the same lock `start` and `stop` cancel
	/// under, once before the `on_load` hook and again before publishing.
	/// The hook itself runs unlocked; if it restarts or stops the loader the
	/// outcome is dropped.
	fn settle(&self, token: &TaskToken, outcome: std::result::Result<T, E>) {
		let hook = {
			let inner = self.inner.lock();
			if !token.is_live_in(inner.current.as_ref()) {
				tracing::trace!(generation = token.generation(), "loader.drop_stale");
				return;
			}
			inner.on_load.clone()
		};

		if let (Ok(data), Some(hook)) = (&outcome, hook) {
			hook(data);
		}

		let mut inner = self.inner.lock();
		if !token.is_live_in(inner.current.as_ref()) {
			tracing::debug!(generation = token.generation(), "loader.superseded_in_hook");
			return;
		}
		inner.current = None;

		match outcome {
			Ok(data) => {
				inner.phase = LoaderPhase::Ready;
				self.state.send_replace(LoadState::loaded(data));
				tracing::debug!(generation = token.generation(), key = ?inner.key, "loader.ready");
			}
			Err(error) => {
				inner.phase = LoaderPhase::Failed;
				self.state.send_replace(LoadState::failed(error));
				tracing::debug!(generation = token.generation(), key = ?inner.key, "loader.failed");
			}
		}
	}
}

/// Keeps a [`LoadState`] in sync with a changing resource key.
///
/// At most one fetch is live at a time. Starting a new load cancels the
/// previous one first, and a cancelled fetch never touches the state, so a
/// slow response for an old key can not overwrite data for the current one.
///
/// Lifecycle hooks map onto a view's mount/update/unmount:
/// [`on_attach`](Self::on_attach), [`on_key_change`](Self::on_key_change),
/// [`on_detach`](Self::on_detach).
pub struct ResourceLoader<F: Fetch> {
	fetcher: Arc<F>,
	shared: Arc<Shared<F::Output, F::Error>>,
	clock: GenerationClock,
	mode: CancelMode,
}

impl<F: Fetch> std::fmt::Debug for ResourceLoader<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner = self.shared.inner.lock();
		f.debug_struct("ResourceLoader")
			.field("key", &inner.key)
			.field("phase", &inner.phase)
			.field("mode", &self.mode)
			.finish_non_exhaustive()
	}
}

impl<F: Fetch> ResourceLoader<F> {
	pub fn new(fetcher: F) -> Self {
		Self::with_fetcher(Arc::new(fetcher))
	}

	/// Creates a loader sharing an existing fetcher.
	pub fn with_fetcher(fetcher: Arc<F>) -> Self {
		let (state, _) = watch::channel(LoadState::default());
		Self {
			fetcher,
			shared: Arc::new(Shared {
				inner: Mutex::new(Inner {
					key: None,
					current: None,
					phase: LoaderPhase::Idle,
					on_load: None,
				}),
				state,
			}),
			clock: GenerationClock::new(),
			mode: CancelMode::Suppress,
		}
	}

	/// Drops superseded fetches as soon as they are cancelled instead of
	/// letting them run to completion.
	pub fn with_cancel_mode(mut self, mode: CancelMode) -> Self {
		self.mode = mode;
		self
	}

	/// Installs the hook run with each successfully loaded value.
	///
	/// The hook runs before the new state is published, without the loader's
	/// lock held, so it may call back into this loader. Restarting or
	/// stopping the loader from the hook discards the value it was given.
	pub fn on_load<H>(&self, hook: H)
	where
		H: Fn(&F::Output) + Send + Sync + 'static,
	{
		self.shared.inner.lock().on_load = Some(Arc::new(hook));
	}

	/// Cancels any live fetch and starts loading `key`.
	///
	/// Returns the generation of the new fetch.
	pub fn start(&self, key: impl Into<String>) -> Result<u64> {
		let key = key.into();
		let mut inner = self.shared.inner.lock();
		if inner.phase == LoaderPhase::Stopped {
			tracing::warn!(%key, "loader.start_after_stop");
			return Err(LoaderError::Stopped);
		}
		if let Some(previous) = inner.current.take() {
			previous.cancel();
			tracing::debug!(generation = previous.generation(), "loader.cancel");
		}

		let token = self.clock.issue();
		let generation = token.generation();
		inner.key = Some(key.clone());
		inner.current = Some(token.clone());
		inner.phase = LoaderPhase::Loading;
		self.shared.state.send_modify(|state| {
			state.error = None;
			state.is_loading = true;
		});
		tracing::debug!(generation, %key, "loader.start");

		let fetcher = Arc::clone(&self.fetcher);
		let shared = Arc::clone(&self.shared);
		let settle_token = token.clone();
		CancelableTask::with_token(token, async move { fetcher.fetch(&key).await })
			.mode(self.mode)
			.spawn_with(TaskClass::Interactive, move |outcome| shared.settle(&settle_token, outcome));
		Ok(generation)
	}

	/// Cancels the live fetch and stops the loader for good.
	///
	/// The last published state is left as it was.
	pub fn stop(&self) {
		let mut inner = self.shared.inner.lock();
		if let Some(current) = inner.current.take() {
			current.cancel();
		}
		if inner.phase != LoaderPhase::Stopped {
			tracing::debug!(key = ?inner.key, "loader.stop");
		}
		inner.phase = LoaderPhase::Stopped;
	}

	/// Loads the current key again.
	pub fn refresh(&self) -> Result<u64> {
		let key = self.shared.inner.lock().key.clone().ok_or(LoaderError::NoKey)?;
		self.start(key)
	}

	pub fn on_attach(&self, key: impl Into<String>) -> Result<u64> {
		self.start(key)
	}

	/// Restarts only if `key` differs from the current key.
	///
	/// Returns the new generation, or `None` when the key is unchanged.
	pub fn on_key_change(&self, key: &str) -> Result<Option<u64>> {
		if self.shared.inner.lock().key.as_deref() == Some(key) {
			return Ok(None);
		}
		self.start(key).map(Some)
	}

	pub fn on_detach(&self) {
		self.stop();
	}

	/// Snapshot of the current state.
	pub fn state(&self) -> LoadState<F::Output, F::Error> {
		self.shared.state.borrow().clone()
	}

	pub fn phase(&self) -> LoaderPhase {
		self.shared.inner.lock().phase
	}

	pub fn key(&self) -> Option<String> {
		self.shared.inner.lock().key.clone()
	}

	/// Receiver notified on every state change.
	pub fn subscribe(&self) -> watch::Receiver<LoadState<F::Output, F::Error>> {
		self.shared.state.subscribe()
	}
}

impl<F: Fetch> Drop for ResourceLoader<F> {
	fn drop(&mut self) {
		if let Some(current) = self.shared.inner.lock().current.take() {
			current.cancel();
		}
	}
}
