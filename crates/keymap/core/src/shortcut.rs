//! Component-shaped wrapper around one binding.

use std::sync::Arc;

use crate::dispatcher::{KeyBindingDispatcher, ShortcutHandler};
use crate::error::Result;

/// One `(keys, handler)` binding that follows a component's lifecycle.
///
/// Call [`Shortcut::attach`] on mount, [`Shortcut::update`] whenever the
/// component's keys or handler may have changed, and [`Shortcut::detach`] on
/// unmount. Dropping an attached shortcut detaches it.
pub struct Shortcut {
	dispatcher: Arc<KeyBindingDispatcher>,
	keys: String,
	handler: ShortcutHandler,
	attached: bool,
}

impl std::fmt::Debug for Shortcut {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Shortcut")
			.field("keys", &self.keys)
			.field("attached", &self.attached)
			.finish_non_exhaustive()
	}
}

impl Shortcut {
	pub fn new(dispatcher: Arc<KeyBindingDispatcher>, keys: impl Into<String>, handler: ShortcutHandler) -> Self {
		Self {
			dispatcher,
			keys: keys.into(),
			handler,
			attached: false,
		}
	}

	pub fn keys(&self) -> &str {
		&self.keys
	}

	pub fn is_attached(&self) -> bool {
		self.attached
	}

	/// Binds the handler. Attaching twice binds once.
	pub fn attach(&mut self) -> Result<()> {
		if !self.attached {
			self.dispatcher.bind(&self.keys, Arc::clone(&self.handler))?;
			self.attached = true;
		}
		Ok(())
	}

	/// Replaces keys and handler, rebinding only if either changed.
	///
	/// On a parse error for the new keys the old binding has already been
	/// removed and the shortcut is left detached.
	pub fn update(&mut self, keys: &str, handler: ShortcutHandler) -> Result<()> {
		if keys == self.keys && Arc::ptr_eq(&handler, &self.handler) {
			return Ok(());
		}
		let was_attached = self.attached;
		self.detach();
		self.keys = keys.to_string();
		self.handler = handler;
		if was_attached {
			self.attach()?;
		}
		Ok(())
	}

	/// Unbinds this shortcut's handler, leaving other handlers for the same keys in place.
	pub fn detach(&mut self) {
		if !self.attached {
			return;
		}
		self.attached = false;
		if let Err(err) = self.dispatcher.unbind(&self.keys, Some(&self.handler)) {
			tracing::warn!(keys = %self.keys, error = %err, "keymap.shortcut.detach_failed");
		}
	}
}

impl Drop for Shortcut {
	fn drop(&mut self) {
		self.detach();
	}
}
