//! Publish/subscribe channel for transient notices.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, SystemTime};

use curio_worker::{GenerationClock, TimerId, Timers};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::notice::{DEFAULT_DURATION, Notice, Notification, NotificationId};


/// Callback receiving each published notification.
pub type Subscriber = Arc<dyn Fn(&Notification) + Send + Sync>;

/// Handle returned by [`NotificationBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct BusState {
	/// Most recent first.
	visible: Vec<Notification>,
	expiry: HashMap<NotificationId, TimerId>,
	subscribers: Vec<(SubscriptionId, Subscriber)>,
	shut_down: bool,
}

struct BusInner {
	default_duration: Duration,
	ids: GenerationClock,
	timers: Timers,
	state: Mutex<BusState>,
	live: watch::Sender<Vec<Notification>>,
}

impl BusInner {
	/// Removes a visible notice. Shared by expiry and [`NotificationBus::dismiss`].
	fn remove(&self, id: NotificationId, reason: &'static str) -> bool {
		let mut state = self.state.lock();
		if state.shut_down {
			return false;
		}
		if let Some(timer) = state.expiry.remove(&id) {
			self.timers.cancel(timer);
		}
		let before = state.visible.len();
		state.visible.retain(|n| n.id != id);
		if state.visible.len() == before {
			return false;
		}
		tracing::debug!(notice = id.get(), reason, "notice.remove");
		self.live.send_replace(state.visible.clone());
		true
	}
}

impl Drop for BusInner {
	fn drop(&mut self) {
		self.timers.cancel_all();
	}
}

/// Shared bus for short-lived user-facing notices.
///
/// Construct one per application and hand clones to whoever publishes or
/// renders notices. Each notice expires on its own timer; the timers are
/// cancelled by [`NotificationBus::shutdown`] or when the last clone drops.
#[derive(Clone)]
pub struct NotificationBus {
	inner: Arc<BusInner>,
}

impl std::fmt::Debug for NotificationBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.inner.state.lock();
		f.debug_struct("NotificationBus")
			.field("visible", &state.visible.len())
			.field("subscribers", &state.subscribers.len())
			.field("shut_down", &state.shut_down)
			.finish()
	}
}

impl Default for NotificationBus {
	fn default() -> Self {
		Self::new()
	}
}

impl NotificationBus {
	pub fn new() -> Self {
		Self::with_default_duration(DEFAULT_DURATION)
	}

	/// Creates a bus whose notices live for `duration` unless they set their own.
	pub fn with_default_duration(duration: Duration) -> Self {
		let (live, _) = watch::channel(Vec::new());
		Self {
			inner: Arc::new(BusInner {
				default_duration: duration,
				ids: GenerationClock::new(),
				timers: Timers::new(),
				state: Mutex::new(BusState::default()),
				live,
			}),
		}
	}

	/// Publishes a notice and returns it as stored.
	///
	/// The notice is prepended to the live list, its expiry timer is armed,
	/// and every subscriber is called with it before this returns. After
	/// [`NotificationBus::shutdown`] the notice is returned but not shown.
	pub fn publish(&self, notice: Notice) -> Notification {
		let notification = Notification {
			id: NotificationId(self.inner.ids.next()),
			title: notice.title,
			message: notice.message,
			status: notice.status.unwrap_or_default(),
			created_at: SystemTime::now(),
			duration: notice.duration.unwrap_or(self.inner.default_duration),
		};

		let subscribers: Vec<Subscriber> = {
			let mut state = self.inner.state.lock();
			if state.shut_down {
				tracing::warn!(notice = notification.id.get(), "notice.publish_after_shutdown");
				return notification;
			}

			let id = notification.id;
			let weak: Weak<BusInner> = Arc::downgrade(&self.inner);
			let timer = self.inner.timers.schedule(notification.duration, move || {
				if let Some(inner) = weak.upgrade() {
					inner.remove(id, "expired");
				}
			});
			state.expiry.insert(id, timer);
			state.visible.insert(0, notification.clone());
			self.inner.live.send_replace(state.visible.clone());

			state.subscribers.iter().map(|(_, s)| Arc::clone(s)).collect()
		};

		tracing::debug!(
			notice = notification.id.get(),
			status = %notification.status,
			duration_ms = notification.duration.as_millis() as u64,
			subscribers = subscribers.len(),
			"notice.publish"
		);
		for subscriber in subscribers {
			subscriber(&notification);
		}
		notification
	}

	/// Registers a callback for every future published notification.
	pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
	where
		F: Fn(&Notification) + Send + Sync + 'static,
	{
		let id = SubscriptionId(self.inner.ids.next());
		self.inner.state.lock().subscribers.push((id, Arc::new(callback)));
		id
	}

	/// Removes a subscription. Returns false if it was not registered.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut state = self.inner.state.lock();
		let before = state.subscribers.len();
		state.subscribers.retain(|(sid, _)| *sid != id);
		state.subscribers.len() != before
	}

	/// Removes a visible notice ahead of its expiry.
	pub fn dismiss(&self, id: NotificationId) -> bool {
		self.inner.remove(id, "dismissed")
	}

	/// Current notices, most recent first.
	pub fn visible(&self) -> Vec<Notification> {
		self.inner.state.lock().visible.clone()
	}

	/// Receiver that sees the live list after every publish and removal.
	pub fn watch(&self) -> watch::Receiver<Vec<Notification>> {
		self.inner.live.subscribe()
	}

	/// Cancels all pending expiry timers and drops subscribers.
	///
	/// Notices already visible stay in the list; nothing is published or
	/// removed afterwards.
	pub fn shutdown(&self) {
		let mut state = self.inner.state.lock();
		if state.shut_down {
			return;
		}
		state.shut_down = true;
		state.expiry.clear();
		state.subscribers.clear();
		self.inner.timers.cancel_all();
		tracing::debug!(visible = state.visible.len(), "notice.shutdown");
	}
}
