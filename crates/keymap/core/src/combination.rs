use std::fmt;
use std::str::FromStr;

use curio_keymap_parser::{Modifier, Node, parse_seq};

use crate::error::KeymapError;

/// A normalized shortcut: one key press or a sequence of them.
///
/// Spellings that parse to the same nodes (`"ctrl+s"`, `"ctrl-s"`,
/// `"Ctrl-s"`) compare equal and render to the same canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination {
	nodes: Vec<Node>,
	text: String,
}

impl Combination {
	/// Parses a combination string.
	pub fn parse(keys: &str) -> Result<Self, KeymapError> {
		let nodes = parse_seq(keys).map_err(|source| KeymapError::InvalidCombination {
			keys: keys.to_string(),
			source,
		})?;
		Ok(Self::from_nodes(nodes))
	}

	fn from_nodes(nodes: Vec<Node>) -> Self {
		let text = nodes.iter().map(Node::to_string).collect::<Vec<_>>().join(" ");
		Self { nodes, text }
	}

	/// Canonical text, e.g. `"ctrl-s"` or `"n o"`.
	pub fn as_str(&self) -> &str {
		&self.text
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Number of key presses in the combination.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn is_sequence(&self) -> bool {
		self.nodes.len() > 1
	}

	/// Returns true if the most recent presses in `pressed` complete this combination.
	pub fn completed_by(&self, pressed: &[Node]) -> bool {
		let Some(start) = pressed.len().checked_sub(self.nodes.len()) else {
			return false;
		};
		self.nodes.iter().zip(&pressed[start..]).all(|(pattern, key)| pattern.accepts(key))
	}

	/// Returns true if the most recent presses in `pressed` are a strict
	/// prefix of this sequence, so more keys could still complete it.
	pub fn advanced_by(&self, pressed: &[Node]) -> bool {
		(1..self.nodes.len()).any(|len| {
			pressed.len() >= len
				&& self.nodes[..len]
					.iter()
					.zip(&pressed[pressed.len() - len..])
					.all(|(pattern, key)| pattern.accepts(key))
		})
	}

	/// Display text for a hint badge next to a control, e.g. `"Ctrl+S"` or `"N O"`.
	pub fn hint(&self) -> String {
		self.nodes
			.iter()
			.map(|node| {
				let mut parts: Vec<String> = Modifier::ALL
					.into_iter()
					.filter(|m| node.has(*m))
					.map(|m| capitalize(m.name()))
					.collect();
				parts.push(capitalize(&node.key.to_string()));
				parts.join("+")
			})
			.collect::<Vec<_>>()
			.join(" ")
	}
}

fn capitalize(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

impl FromStr for Combination {
	type Err = KeymapError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for Combination {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}
