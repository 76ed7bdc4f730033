use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::oneshot;

use super::*;

#[derive(Debug, Clone, PartialEq)]
struct Payload {
	x: u32,
}

type Outcome = std::result::Result<Payload, String>;

/// Fetcher whose requests stay pending until the test resolves them.
#[derive(Default)]
struct Gate {
	pending: Mutex<HashMap<String, Vec<oneshot::Sender<Outcome>>>>,
	calls: AtomicUsize,
}

impl Gate {
	fn resolve(&self, key: &str, outcome: Outcome) {
		let sender = self
			.pending
			.lock()
			.get_mut(key)
			.filter(|senders| !senders.is_empty())
			.map(|senders| senders.remove(0))
			.unwrap_or_else(|| panic!("no pending fetch for {key}"));
		let _ = sender.send(outcome);
	}

	fn is_abandoned(&self, key: &str) -> bool {
		self.pending.lock()[key].iter().all(|sender| sender.is_closed())
	}

	fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl Fetch for Gate {
	type Output = Payload;
	type Error = String;

	async fn fetch(&self, key: &str) -> Outcome {
		self.calls.fetch_add(1, Ordering::SeqCst);
		let (tx, rx) = oneshot::channel();
		self.pending.lock().entry(key.to_string()).or_default().push(tx);
		rx.await.unwrap_or_else(|_| Err("fetch abandoned".to_string()))
	}
}

fn loader() -> (Arc<Gate>, ResourceLoader<Gate>) {
	let gate = Arc::new(Gate::default());
	let loader = ResourceLoader::with_fetcher(Arc::clone(&gate));
	(gate, loader)
}

async fn settle() {
	for _ in 0..8 {
		tokio::task::yield_now().await;
	}
}

fn ready(x: u32) -> LoadState<Payload, String> {
	LoadState {
		data: Some(Payload { x }),
		error: None,
		is_loading: false,
	}
}

#[tokio::test]
async fn newer_key_wins_when_older_settles_first() {
	let (gate, loader) = loader();
	loader.start("/a").unwrap();
	settle().await;
	loader.start("/b").unwrap();
	settle().await;

	gate.resolve("/a", Ok(Payload { x: 1 }));
	settle().await;
	assert!(loader.state().is_loading);

	gate.resolve("/b", Ok(Payload { x: 2 }));
	settle().await;
	assert_eq!(loader.state(), ready(2));
	assert_eq!(loader.phase(), LoaderPhase::Ready);
}

#[tokio::test]
async fn newer_key_wins_when_older_settles_last() {
	let (gate, loader) = loader();
	loader.start("/a").unwrap();
	loader.start("/b").unwrap();
	settle().await;

	gate.resolve("/b", Ok(Payload { x: 2 }));
	settle().await;
	gate.resolve("/a", Ok(Payload { x: 1 }));
	settle().await;

	assert_eq!(loader.state(), ready(2));
}

#[tokio::test]
async fn only_the_last_of_many_starts_is_observed() {
	let (gate, loader) = loader();
	for n in 1..=5 {
		loader.start(format!("/k{n}")).unwrap();
	}
	settle().await;

	gate.resolve("/k5", Ok(Payload { x: 5 }));
	gate.resolve("/k2", Err("boom".to_string()));
	gate.resolve("/k1", Ok(Payload { x: 1 }));
	gate.resolve("/k4", Ok(Payload { x: 4 }));
	gate.resolve("/k3", Err("boom".to_string()));
	settle().await;

	assert_eq!(loader.state(), ready(5));
	assert_eq!(gate.calls(), 5);
}

#[tokio::test]
async fn failure_replaces_data_with_error() {
	let (gate, loader) = loader();
	loader.start("/a").unwrap();
	settle().await;
	gate.resolve("/a", Ok(Payload { x: 1 }));
	settle().await;

	loader.refresh().unwrap();
	settle().await;
	gate.resolve("/a", Err("Not found".to_string()));
	settle().await;

	assert_eq!(
		loader.state(),
		LoadState {
			data: None,
			error: Some("Not found".to_string()),
			is_loading: false,
		}
	);
	assert_eq!(loader.phase(), LoaderPhase::Failed);
}

#[tokio::test]
async fn restart_clears_error_and_shows_loading() {
	let (gate, loader) = loader();
	loader.start("/a").unwrap();
	settle().await;
	gate.resolve("/a", Err("offline".to_string()));
	settle().await;

	loader.refresh().unwrap();
	let state = loader.state();
	assert_eq!(state.error, None);
	assert!(state.is_loading);
	assert_eq!(loader.phase(), LoaderPhase::Loading);
}

#[tokio::test]
async fn stop_keeps_state_and_ignores_late_settlement() {
	let (gate, loader) = loader();
	loader.start("/a").unwrap();
	settle().await;
	gate.resolve("/a", Ok(Payload { x: 1 }));
	settle().await;

	loader.start("/b").unwrap();
	settle().await;
	let before = loader.state();
	loader.on_detach();
	gate.resolve("/b", Ok(Payload { x: 2 }));
	settle().await;

	assert_eq!(loader.state(), before);
	assert_eq!(loader.phase(), LoaderPhase::Stopped);
	assert_eq!(loader.start("/c"), Err(LoaderError::Stopped));
	assert_eq!(loader.refresh(), Err(LoaderError::Stopped));
}

#[tokio::test]
async fn refresh_requires_a_key() {
	let (gate, loader) = loader();
	assert_eq!(loader.refresh(), Err(LoaderError::NoKey));
	assert_eq!(loader.phase(), LoaderPhase::Idle);
	assert_eq!(gate.calls(), 0);
}

#[tokio::test]
async fn key_change_restarts_only_on_new_key() {
	let (gate, loader) = loader();
	loader.on_attach("/a").unwrap();
	settle().await;

	assert_eq!(loader.on_key_change("/a"), Ok(None));
	assert!(loader.on_key_change("/b").unwrap().is_some());
	settle().await;

	assert_eq!(gate.calls(), 2);
	assert_eq!(loader.key().as_deref(), Some("/b"));
}

#[tokio::test]
async fn on_load_runs_once_before_publish() {
	let (gate, loader) = loader();
	let seen = Arc::new(Mutex::new(Vec::new()));
	let rx = loader.subscribe();
	{
		let seen = Arc::clone(&seen);
		loader.on_load(move |data: &Payload| {
			seen.lock().push((data.x, rx.borrow().is_loading));
		});
	}

	loader.start("/a").unwrap();
	loader.start("/b").unwrap();
	settle().await;
	gate.resolve("/a", Ok(Payload { x: 1 }));
	gate.resolve("/b", Ok(Payload { x: 2 }));
	settle().await;

	assert_eq!(*seen.lock(), [(2, true)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn on_load_may_call_back_into_the_loader() {
	let (gate, loader) = loader();
	let loader = Arc::new(loader);
	let seen = Arc::new(Mutex::new(Vec::new()));
	{
		let seen = Arc::clone(&seen);
		let weak = Arc::downgrade(&loader);
		loader.on_load(move |_: &Payload| {
			if let Some(loader) = weak.upgrade() {
				seen.lock().push((loader.key(), loader.phase()));
			}
		});
	}
	let mut rx = loader.subscribe();

	loader.start("/a").unwrap();
	tokio::time::timeout(Duration::from_secs(5), async {
		while gate.pending.lock().is_empty() {
			tokio::task::yield_now().await;
		}
	})
	.await
	.unwrap();
	gate.resolve("/a", Ok(Payload { x: 1 }));

	tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|state| !state.is_loading))
		.await
		.expect("hook re-entering the loader must not block settlement")
		.unwrap();
	assert_eq!(loader.phase(), LoaderPhase::Ready);
	assert_eq!(*seen.lock(), [(Some("/a".to_string()), LoaderPhase::Loading)]);
}

#[tokio::test]
async fn restart_from_on_load_discards_the_loaded_value() {
	let (gate, loader) = loader();
	let loader = Arc::new(loader);
	let restarted = Arc::new(AtomicBool::new(false));
	{
		let weak = Arc::downgrade(&loader);
		let restarted = Arc::clone(&restarted);
		loader.on_load(move |_: &Payload| {
			if !restarted.swap(true, Ordering::SeqCst)
				&& let Some(loader) = weak.upgrade()
			{
				loader.refresh().unwrap();
			}
		});
	}

	loader.start("/a").unwrap();
	settle().await;
	gate.resolve("/a", Ok(Payload { x: 1 }));
	settle().await;

	assert_eq!(gate.calls(), 2);
	assert_eq!(loader.phase(), LoaderPhase::Loading);
	assert!(loader.state().is_loading);
	assert_eq!(loader.state().data, None);

	gate.resolve("/a", Ok(Payload { x: 2 }));
	settle().await;
	assert_eq!(loader.state(), ready(2));
}

#[tokio::test]
async fn subscribers_see_loading_then_settled() {
	let (gate, loader) = loader();
	let mut rx = loader.subscribe();
	rx.borrow_and_update();

	loader.start("/a").unwrap();
	assert!(rx.has_changed().unwrap());
	assert!(rx.borrow_and_update().is_loading);

	settle().await;
	gate.resolve("/a", Ok(Payload { x: 7 }));
	rx.changed().await.unwrap();
	assert_eq!(*rx.borrow(), ready(7));
}

#[tokio::test]
async fn abort_mode_drops_superseded_fetch() {
	let gate = Arc::new(Gate::default());
	let loader = ResourceLoader::with_fetcher(Arc::clone(&gate)).with_cancel_mode(CancelMode::Abort);
	loader.start("/a").unwrap();
	settle().await;
	assert!(!gate.is_abandoned("/a"));

	loader.start("/b").unwrap();
	settle().await;
	assert!(gate.is_abandoned("/a"));

	gate.resolve("/b", Ok(Payload { x: 2 }));
	settle().await;
	assert_eq!(loader.state(), ready(2));
}

#[tokio::test]
async fn dropping_the_loader_cancels_the_live_fetch() {
	let (gate, loader) = loader();
	let rx = loader.subscribe();
	loader.start("/a").unwrap();
	settle().await;

	drop(loader);
	gate.resolve("/a", Ok(Payload { x: 1 }));
	settle().await;
	assert!(rx.borrow().is_loading);
}
