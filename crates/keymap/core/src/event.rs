//! Key events and the focus context they were raised in.

use curio_keymap_parser::{Key, Modifier, Node};

/// `type` of a focused `<input>`-like control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
	#[default]
	Text,
	Checkbox,
	Radio,
	Other,
}

/// Kind of element that has focus when a key is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementKind {
	/// No text-entry control focused (page body, buttons, links).
	#[default]
	Other,
	Input(InputType),
	Select,
	TextArea,
}

/// Focus context of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusTarget {
	pub kind: ElementKind,
	/// Element is explicitly marked as letting shortcuts through.
	pub shortcut_transparent: bool,
}

impl FocusTarget {
	pub const fn new(kind: ElementKind) -> Self {
		Self {
			kind,
			shortcut_transparent: false,
		}
	}

	pub const fn text_input() -> Self {
		Self::new(ElementKind::Input(InputType::Text))
	}

	pub const fn checkbox() -> Self {
		Self::new(ElementKind::Input(InputType::Checkbox))
	}

	pub const fn radio() -> Self {
		Self::new(ElementKind::Input(InputType::Radio))
	}

	pub const fn text_area() -> Self {
		Self::new(ElementKind::TextArea)
	}

	pub const fn select() -> Self {
		Self::new(ElementKind::Select)
	}

	/// Marks the element as shortcut-transparent.
	pub const fn transparent(mut self) -> Self {
		self.shortcut_transparent = true;
		self
	}

	/// Whether shortcuts must be held back so typing reaches the control.
	///
	/// Checkbox and radio inputs take no text, so shortcuts still apply
	/// while they have focus.
	pub fn suppresses_shortcuts(&self) -> bool {
		if self.shortcut_transparent {
			return false;
		}
		match self.kind {
			ElementKind::Input(InputType::Checkbox | InputType::Radio) => false,
			ElementKind::Input(_) | ElementKind::Select | ElementKind::TextArea => true,
			ElementKind::Other => false,
		}
	}
}

/// One raw key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
	pub node: Node,
	pub focus: FocusTarget,
}

impl KeyEvent {
	pub const fn new(node: Node) -> Self {
		Self {
			node,
			focus: FocusTarget::new(ElementKind::Other),
		}
	}

	/// Plain character press with nothing focused.
	pub const fn char(ch: char) -> Self {
		Self::new(Node::new(0, Key::Char(ch)))
	}

	pub const fn ctrl(ch: char) -> Self {
		Self::new(Node::new(Modifier::Ctrl as u8, Key::Char(ch)))
	}

	pub const fn with_focus(mut self, focus: FocusTarget) -> Self {
		self.focus = focus;
		self
	}
}
