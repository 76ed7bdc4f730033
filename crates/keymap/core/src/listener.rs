//! Low-level key listeners.
//!
//! The dispatcher installs one listener slot per distinct combination and
//! asks the listener which combinations a raw key press completes.

use std::time::{Duration, Instant};

use curio_keymap_parser::Node;
use parking_lot::Mutex;

use crate::combination::Combination;
use crate::event::KeyEvent;

/// The key-event source the dispatcher drives.
///
/// Implementations are called with the dispatcher's table lock held and must
/// not call back into the dispatcher from `install` or `uninstall`.
pub trait KeyListener: Send + Sync {
	/// Starts listening for `combination`.
	fn install(&self, combination: &Combination);

	/// Stops listening for `combination`.
	fn uninstall(&self, combination: &Combination);

	/// Feeds one raw key press and returns the installed combinations it completes.
	fn feed(&self, event: &KeyEvent) -> Vec<Combination>;
}

#[derive(Debug, Default)]
struct SequenceState {
	installed: Vec<Combination>,
	pressed: Vec<Node>,
	last_press: Option<Instant>,
}

/// Listener that recognizes single keys and multi-key sequences (`"n o"`).
///
/// Presses further apart than the timeout start a new sequence. When a press
/// completes a sequence, only the sequences fire and the buffer resets. A
/// press that moves some sequence forward without completing it fires
/// nothing, so with `"n"` and `"n o"` both bound the lone `n` never fires.
/// Otherwise single-key combinations matching the press fire.
#[derive(Debug)]
pub struct SequenceListener {
	timeout: Duration,
	state: Mutex<SequenceState>,
}

impl Default for SequenceListener {
	fn default() -> Self {
		Self::new(Self::DEFAULT_TIMEOUT)
	}
}

impl SequenceListener {
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

	pub fn new(timeout: Duration) -> Self {
		Self {
			timeout,
			state: Mutex::new(SequenceState::default()),
		}
	}

	/// Installed combinations in install order.
	pub fn installed(&self) -> Vec<Combination> {
		self.state.lock().installed.clone()
	}

	/// [`KeyListener::feed`] with an explicit clock reading.
	pub fn feed_at(&self, event: &KeyEvent, now: Instant) -> Vec<Combination> {
		let mut state = self.state.lock();
		if state.installed.is_empty() {
			return Vec::new();
		}

		let stale = state
			.last_press
			.is_some_and(|last| now.saturating_duration_since(last) > self.timeout);
		if stale {
			state.pressed.clear();
		}
		state.last_press = Some(now);
		state.pressed.push(event.node);

		let longest = state.installed.iter().map(Combination::len).max().unwrap_or(1);
		let excess = state.pressed.len().saturating_sub(longest);
		state.pressed.drain(..excess);

		let sequences: Vec<_> = state
			.installed
			.iter()
			.filter(|combo| combo.is_sequence() && combo.completed_by(&state.pressed))
			.cloned()
			.collect();
		if !sequences.is_empty() {
			state.pressed.clear();
			return sequences;
		}
		if state.installed.iter().any(|combo| combo.advanced_by(&state.pressed)) {
			tracing::trace!(pressed = state.pressed.len(), "keymap.sequence.pending");
			return Vec::new();
		}

		state
			.installed
			.iter()
			.filter(|combo| !combo.is_sequence() && combo.completed_by(&state.pressed))
			.cloned()
			.collect()
	}
}

impl KeyListener for SequenceListener {
	fn install(&self, combination: &Combination) {
		let mut state = self.state.lock();
		if state.installed.contains(combination) {
			tracing::warn!(keys = %combination, "keymap.listener.double_install");
			return;
		}
		state.installed.push(combination.clone());
	}

	fn uninstall(&self, combination: &Combination) {
		let mut state = self.state.lock();
		state.installed.retain(|c| c != combination);
		if state.installed.is_empty() {
			state.pressed.clear();
		}
	}

	fn feed(&self, event: &KeyEvent) -> Vec<Combination> {
		self.feed_at(event, Instant::now())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn combo(keys: &str) -> Combination {
		keys.parse().unwrap()
	}

	fn names(found: Vec<Combination>) -> Vec<String> {
		found.into_iter().map(|c| c.to_string()).collect()
	}

	#[test]
	fn single_keys_fire_on_press() {
		let listener = SequenceListener::default();
		listener.install(&combo("f"));
		listener.install(&combo("["));

		let t0 = Instant::now();
		assert_eq!(names(listener.feed_at(&KeyEvent::char('f'), t0)), ["f"]);
		assert_eq!(names(listener.feed_at(&KeyEvent::char('['), t0)), ["["]);
		assert!(listener.feed_at(&KeyEvent::char('x'), t0).is_empty());
	}

	#[test]
	fn sequence_fires_on_last_key_and_shadows_singles() {
		let listener = SequenceListener::default();
		listener.install(&combo("n o"));
		listener.install(&combo("o"));

		let t0 = Instant::now();
		assert!(listener.feed_at(&KeyEvent::char('n'), t0).is_empty());
		let fired = listener.feed_at(&KeyEvent::char('o'), t0 + Duration::from_millis(200));
		assert_eq!(names(fired), ["n o"]);

		// Buffer was reset, so a lone `o` is a single-key press again.
		let fired = listener.feed_at(&KeyEvent::char('o'), t0 + Duration::from_millis(300));
		assert_eq!(names(fired), ["o"]);
	}

	#[test]
	fn sequence_prefix_holds_back_its_single_key() {
		let listener = SequenceListener::default();
		listener.install(&combo("n"));
		listener.install(&combo("n o"));
		listener.install(&combo("x"));

		let t0 = Instant::now();
		assert!(listener.feed_at(&KeyEvent::char('n'), t0).is_empty());
		assert_eq!(names(listener.feed_at(&KeyEvent::char('o'), t0)), ["n o"]);

		// A press that abandons the sequence falls back to single keys.
		assert!(listener.feed_at(&KeyEvent::char('n'), t0).is_empty());
		assert_eq!(names(listener.feed_at(&KeyEvent::char('x'), t0)), ["x"]);
	}

	#[test]
	fn slow_sequence_times_out() {
		let listener = SequenceListener::new(Duration::from_millis(500));
		listener.install(&combo("g g"));

		let t0 = Instant::now();
		listener.feed_at(&KeyEvent::char('g'), t0);
		assert!(listener.feed_at(&KeyEvent::char('g'), t0 + Duration::from_millis(900)).is_empty());
		assert_eq!(
			names(listener.feed_at(&KeyEvent::char('g'), t0 + Duration::from_millis(1000))),
			["g g"]
		);
	}

	#[test]
	fn uninstalled_combinations_stop_matching() {
		let listener = SequenceListener::default();
		let f = combo("f");
		listener.install(&f);
		listener.uninstall(&f);
		assert!(listener.installed().is_empty());
		assert!(listener.feed(&KeyEvent::char('f')).is_empty());
	}
}
