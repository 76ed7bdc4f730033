use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

use crate::TaskClass;

/// Runtime backing loader fetches and notice timers started from a thread
/// that is not inside tokio, e.g. a key handler on the UI thread.
fn fallback() -> &'static Runtime {
	static FALLBACK: OnceLock<Runtime> = OnceLock::new();
	FALLBACK.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(2)
			.thread_name("curio-worker")
			.build()
			.expect("failed to build curio-worker fallback runtime")
	})
}

fn handle() -> Handle {
	Handle::try_current().unwrap_or_else(|_| fallback().handle().clone())
}

/// Spawns an async task labelled with its execution class.
///
/// Inside a runtime the task joins it, so paused-clock tests drive loader
/// fetches and notice timers alike.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	handle().spawn(fut)
}

#[cfg(test)]
mod tests {
	use std::sync::mpsc;
	use std::time::Duration;

	use super::*;

	#[test]
	fn spawn_outside_a_runtime_uses_the_fallback() {
		let (tx, rx) = mpsc::channel();
		spawn(TaskClass::Background, async move {
			let _ = tx.send(std::thread::current().name().map(str::to_owned));
		});
		let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
		assert_eq!(name.as_deref(), Some("curio-worker"));
	}

	#[tokio::test]
	async fn spawn_inside_a_runtime_joins_it() {
		let caller = std::thread::current().id();
		let ran_on = spawn(TaskClass::Interactive, async { std::thread::current().id() }).await.unwrap();
		assert_eq!(ran_on, caller);
	}
}
