//! Structured key representation produced by the parser.

use std::fmt;
use std::str::FromStr;

/// Separator between modifiers and the key in the canonical form.
pub const KEY_SEP: char = '-';

/// Alternative separator accepted on input (`ctrl+s`).
pub const KEY_SEP_ALT: char = '+';

/// Bitset of [`Modifier`] flags.
pub type Modifiers = u8;

/// A modifier key held together with the main key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Modifier {
	Ctrl = 1,
	Alt = 1 << 1,
	Shift = 1 << 2,
	Meta = 1 << 3,
}

impl Modifier {
	/// Canonical ordering used when rendering a node.
	pub const ALL: [Modifier; 4] = [Modifier::Ctrl, Modifier::Alt, Modifier::Shift, Modifier::Meta];

	pub const fn name(self) -> &'static str {
		match self {
			Self::Ctrl => "ctrl",
			Self::Alt => "alt",
			Self::Shift => "shift",
			Self::Meta => "meta",
		}
	}
}

impl FromStr for Modifier {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"ctrl" | "control" => Ok(Self::Ctrl),
			"alt" | "option" => Ok(Self::Alt),
			"shift" => Ok(Self::Shift),
			"meta" | "cmd" | "command" => Ok(Self::Meta),
			_ => Err(()),
		}
	}
}

/// Character classes usable as a wildcard key (`@digit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharGroup {
	Digit,
	Lower,
	Upper,
	Alpha,
	Alnum,
	Any,
}

impl CharGroup {
	pub const fn name(self) -> &'static str {
		match self {
			Self::Digit => "digit",
			Self::Lower => "lower",
			Self::Upper => "upper",
			Self::Alpha => "alpha",
			Self::Alnum => "alnum",
			Self::Any => "any",
		}
	}

	/// Returns true if `ch` belongs to this group.
	pub fn matches(self, ch: char) -> bool {
		match self {
			Self::Digit => ch.is_ascii_digit(),
			Self::Lower => ch.is_ascii_lowercase(),
			Self::Upper => ch.is_ascii_uppercase(),
			Self::Alpha => ch.is_ascii_alphabetic(),
			Self::Alnum => ch.is_ascii_alphanumeric(),
			Self::Any => !ch.is_control(),
		}
	}
}

impl FromStr for CharGroup {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"digit" => Ok(Self::Digit),
			"lower" => Ok(Self::Lower),
			"upper" => Ok(Self::Upper),
			"alpha" => Ok(Self::Alpha),
			"alnum" => Ok(Self::Alnum),
			"any" => Ok(Self::Any),
			_ => Err(()),
		}
	}
}

/// The main key of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
	Char(char),
	F(u8),
	Group(CharGroup),
	Backspace,
	Delete,
	Down,
	End,
	Enter,
	Esc,
	Home,
	Insert,
	Left,
	PageDown,
	PageUp,
	Right,
	Space,
	Tab,
	Up,
}

impl Key {
	fn named(self) -> Option<&'static str> {
		Some(match self {
			Self::Backspace => "backspace",
			Self::Delete => "del",
			Self::Down => "down",
			Self::End => "end",
			Self::Enter => "enter",
			Self::Esc => "esc",
			Self::Home => "home",
			Self::Insert => "insert",
			Self::Left => "left",
			Self::PageDown => "pagedown",
			Self::PageUp => "pageup",
			Self::Right => "right",
			Self::Space => "space",
			Self::Tab => "tab",
			Self::Up => "up",
			Self::Char(_) | Self::F(_) | Self::Group(_) => return None,
		})
	}

	/// Returns true if a concrete pressed key satisfies this pattern key.
	pub fn accepts(self, pressed: Key) -> bool {
		match (self, pressed) {
			(Self::Group(group), Self::Char(ch)) => group.matches(ch),
			(Self::Char(' '), Self::Space) | (Self::Space, Self::Char(' ')) => true,
			(pattern, pressed) => pattern == pressed,
		}
	}
}

impl FromStr for Key {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s.to_ascii_lowercase().as_str() {
			"backspace" => Self::Backspace,
			"del" | "delete" => Self::Delete,
			"down" => Self::Down,
			"end" => Self::End,
			"enter" | "return" => Self::Enter,
			"esc" | "escape" => Self::Esc,
			"home" => Self::Home,
			"ins" | "insert" => Self::Insert,
			"left" => Self::Left,
			"pagedown" | "pgdn" => Self::PageDown,
			"pageup" | "pgup" => Self::PageUp,
			"right" => Self::Right,
			"space" => Self::Space,
			"tab" => Self::Tab,
			"up" => Self::Up,
			_ => return Err(()),
		})
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Char(ch) => write!(f, "{ch}"),
			Self::F(n) => write!(f, "f{n}"),
			Self::Group(group) => write!(f, "@{}", group.name()),
			other => f.write_str(other.named().unwrap_or_default()),
		}
	}
}

/// One key press: a set of modifiers plus a main key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node {
	pub modifiers: Modifiers,
	pub key: Key,
}

impl Node {
	pub const fn new(modifiers: Modifiers, key: Key) -> Self {
		Self { modifiers, key }
	}

	/// Returns true if `modifier` is held.
	pub const fn has(&self, modifier: Modifier) -> bool {
		self.modifiers & modifier as u8 != 0
	}

	/// Returns true if a concrete key press satisfies this pattern.
	pub fn accepts(&self, pressed: &Node) -> bool {
		self.modifiers == pressed.modifiers && self.key.accepts(pressed.key)
	}
}

impl From<Key> for Node {
	fn from(key: Key) -> Self {
		Self::new(0, key)
	}
}

impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for modifier in Modifier::ALL {
			if self.has(modifier) {
				write!(f, "{}{KEY_SEP}", modifier.name())?;
			}
		}
		write!(f, "{}", self.key)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_orders_modifiers() {
		let node = Node::new(Modifier::Shift as u8 | Modifier::Ctrl as u8, Key::Char('s'));
		assert_eq!(node.to_string(), "ctrl-shift-s");
		assert_eq!(Node::from(Key::PageDown).to_string(), "pagedown");
		assert_eq!(Node::from(Key::Group(CharGroup::Digit)).to_string(), "@digit");
	}

	#[test]
	fn group_pattern_accepts_members_only() {
		let pattern = Node::from(Key::Group(CharGroup::Digit));
		assert!(pattern.accepts(&Node::from(Key::Char('7'))));
		assert!(!pattern.accepts(&Node::from(Key::Char('x'))));
		assert!(!pattern.accepts(&Node::new(Modifier::Ctrl as u8, Key::Char('7'))));
	}

	#[test]
	fn space_spellings_are_interchangeable() {
		assert!(Key::Space.accepts(Key::Char(' ')));
		assert!(Key::Char(' ').accepts(Key::Space));
	}
}
