//! Shared shortcut registry.
//!
//! The dispatcher maps each [`Combination`] to an ordered list of handlers.
//! Many components may bind the same keys; each bind adds one entry and each
//! unbind removes one, so components never disturb each other's handlers.
//! The underlying [`KeyListener`] slot for a combination exists exactly while
//! its handler list is non-empty.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::combination::Combination;
use crate::error::Result;
use crate::event::KeyEvent;
use crate::listener::{KeyListener, SequenceListener};

/// Callback invoked with the triggering event and the canonical combination text.
pub type ShortcutHandler = Arc<dyn Fn(&KeyEvent, &str) + Send + Sync>;

/// Wraps a closure as a [`ShortcutHandler`].
///
/// Keep the returned handle to unbind this exact handler later.
pub fn handler<F>(f: F) -> ShortcutHandler
where
	F: Fn(&KeyEvent, &str) + Send + Sync + 'static,
{
	Arc::new(f)
}

/// Process-wide shortcut registry.
///
/// Construct one at application start and share it (`Arc`) with every
/// component that needs shortcuts. Handlers run synchronously on the thread
/// that delivers the key event, in bind order. Handlers may bind and unbind
/// freely: dispatch works on a snapshot taken before the first handler runs.
pub struct KeyBindingDispatcher {
	listener: Arc<dyn KeyListener>,
	table: Mutex<HashMap<Combination, Vec<ShortcutHandler>>>,
}

impl fmt::Debug for KeyBindingDispatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let table = self.table.lock();
		let mut counts: Vec<_> = table.iter().map(|(combo, handlers)| (combo.to_string(), handlers.len())).collect();
		counts.sort();
		f.debug_struct("KeyBindingDispatcher").field("bindings", &counts).finish_non_exhaustive()
	}
}

impl Default for KeyBindingDispatcher {
	fn default() -> Self {
		Self::with_sequence_timeout(SequenceListener::DEFAULT_TIMEOUT)
	}
}

impl KeyBindingDispatcher {
	/// Creates a dispatcher driving `listener`.
	pub fn new(listener: Arc<dyn KeyListener>) -> Self {
		Self {
			listener,
			table: Mutex::new(HashMap::new()),
		}
	}

	/// Creates a dispatcher backed by a [`SequenceListener`].
	pub fn with_sequence_timeout(timeout: Duration) -> Self {
		Self::new(Arc::new(SequenceListener::new(timeout)))
	}

	/// Appends `handler` to the handlers for `keys`.
	///
	/// The first handler for a combination installs its listener slot. Binding
	/// the same handler twice creates two entries.
	pub fn bind(&self, keys: &str, handler: ShortcutHandler) -> Result<Combination> {
		let combination = Combination::parse(keys)?;
		let mut table = self.table.lock();
		let handlers = table.entry(combination.clone()).or_default();
		if handlers.is_empty() {
			self.listener.install(&combination);
			tracing::debug!(keys = %combination, "keymap.listener.install");
		}
		handlers.push(handler);
		tracing::trace!(keys = %combination, handlers = handlers.len(), "keymap.bind");
		Ok(combination)
	}

	/// Removes the first entry for `handler` under `keys`, or every entry when
	/// `handler` is `None`. Returns the number of entries removed.
	///
	/// Removing the last entry uninstalls the combination's listener slot.
	/// Unbinding keys that have no handlers is a no-op.
	pub fn unbind(&self, keys: &str, handler: Option<&ShortcutHandler>) -> Result<usize> {
		let combination = Combination::parse(keys)?;
		let mut table = self.table.lock();
		let Some(handlers) = table.get_mut(&combination) else {
			tracing::debug!(keys = %combination, "keymap.unbind_unbound");
			return Ok(0);
		};

		let removed = match handler {
			Some(target) => match handlers.iter().position(|h| Arc::ptr_eq(h, target)) {
				Some(index) => {
					handlers.remove(index);
					1
				}
				None => 0,
			},
			None => std::mem::take(handlers).len(),
		};

		if handlers.is_empty() {
			table.remove(&combination);
			self.listener.uninstall(&combination);
			tracing::debug!(keys = %combination, "keymap.listener.uninstall");
		}
		tracing::trace!(keys = %combination, removed, "keymap.unbind");
		Ok(removed)
	}

	/// Feeds a raw key press through the listener and dispatches every
	/// combination it completes. Returns the number of handlers invoked.
	///
	/// Presses typed into a field that holds shortcuts back never reach the
	/// listener, so they can not start or advance a sequence.
	pub fn handle_key(&self, event: &KeyEvent) -> usize {
		if event.focus.suppresses_shortcuts() {
			tracing::trace!(focus = ?event.focus.kind, "keymap.suppressed");
			return 0;
		}
		self.listener.feed(event).iter().map(|combination| self.trigger(combination, event)).sum()
	}

	/// Invokes the handlers bound to `combination`, in bind order.
	///
	/// Nothing runs when the event's focus target holds shortcuts back.
	pub fn trigger(&self, combination: &Combination, event: &KeyEvent) -> usize {
		if event.focus.suppresses_shortcuts() {
			tracing::trace!(keys = %combination, focus = ?event.focus.kind, "keymap.suppressed");
			return 0;
		}

		let handlers = self.table.lock().get(combination).cloned().unwrap_or_default();
		for handler in &handlers {
			handler(event, combination.as_str());
		}
		tracing::trace!(keys = %combination, handlers = handlers.len(), "keymap.dispatch");
		handlers.len()
	}

	/// Number of handlers currently bound to `keys`.
	pub fn handler_count(&self, keys: &str) -> Result<usize> {
		let combination = Combination::parse(keys)?;
		Ok(self.table.lock().get(&combination).map_or(0, Vec::len))
	}

	/// Combinations with at least one handler, sorted by canonical text.
	pub fn combinations(&self) -> Vec<Combination> {
		let mut combos: Vec<_> = self.table.lock().keys().cloned().collect();
		combos.sort_by(|a, b| a.as_str().cmp(b.as_str()));
		combos
	}
}
