//! # Parser
//!
//! Turns shortcut strings into [`Node`] sequences.
//!
//! ```text
//! sequence  = node (whitespace node)*
//! node      = (modifier sep)* key
//! sep       = "-" | "+"
//! modifier  = "ctrl" | "alt" | "shift" | "meta" | "cmd" | ...
//! key       = fn-key | named-key | group | char
//! fn-key    = "f" digit digit?
//! named-key = "esc" | "enter" | "pageup" | ...
//! group     = "@" ("digit" | "lower" | "upper" | "alnum" | "alpha" | "any")
//! char      = any single non-whitespace character
//! ```
//!
//! A lone separator character is a key of its own, so `"-"`, `"+"` and
//! `"ctrl--"` all parse.

use std::str::FromStr;

use crate::node::{CharGroup, KEY_SEP, KEY_SEP_ALT, Key, Modifier, Node};

#[cfg(test)]
mod tests;

/// Represents an error that occurred during parsing.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ParseError {
	/// Human-readable description of the parse error.
	pub message: String,
	/// Byte offset in the input where the error occurred.
	pub position: usize,
}

impl std::fmt::Display for ParseError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "parse error at position {}: {}", self.position, self.message)
	}
}

impl std::error::Error for ParseError {}

/// Cursor over one node's worth of input.
struct Cursor<'a> {
	rest: &'a str,
	position: usize,
}

impl<'a> Cursor<'a> {
	fn new(input: &'a str, offset: usize) -> Self {
		Self {
			rest: input,
			position: offset,
		}
	}

	fn peek(&self) -> Option<char> {
		self.rest.chars().next()
	}

	fn peek_at(&self, n: usize) -> Option<char> {
		self.rest.chars().nth(n)
	}

	fn bump(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.position += ch.len_utf8();
		self.rest = &self.rest[ch.len_utf8()..];
		Some(ch)
	}

	fn is_end(&self) -> bool {
		self.rest.is_empty()
	}

	/// Returns the leading run of chars satisfying `predicate` without consuming it.
	fn word(&self, predicate: impl Fn(char) -> bool) -> &'a str {
		let len = self.rest.find(|ch: char| !predicate(ch)).unwrap_or(self.rest.len());
		&self.rest[..len]
	}

	fn advance(&mut self, bytes: usize) {
		self.position += bytes;
		self.rest = &self.rest[bytes..];
	}

	fn error(&self, message: impl Into<String>) -> ParseError {
		ParseError {
			message: message.into(),
			position: self.position,
		}
	}
}

fn is_sep(ch: char) -> bool {
	ch == KEY_SEP || ch == KEY_SEP_ALT
}

/// Parses a single key expression such as `"ctrl-b"`, `"@digit"` or `"["`.
///
/// # Errors
///
/// Returns a [`ParseError`] if the input does not match the grammar.
pub fn parse(s: &str) -> Result<Node, ParseError> {
	parse_at(s, 0)
}

fn parse_at(s: &str, offset: usize) -> Result<Node, ParseError> {
	let mut cursor = Cursor::new(s, offset);
	if cursor.is_end() {
		return Err(cursor.error("empty key expression"));
	}

	let mut modifiers = 0u8;
	while let Some(modifier) = take_modifier(&mut cursor) {
		if modifiers & modifier as u8 != 0 {
			return Err(cursor.error(format!("duplicate modifier '{}'", modifier.name())));
		}
		modifiers |= modifier as u8;
	}

	let key = parse_key(&mut cursor)?;
	if let Some(ch) = cursor.peek() {
		return Err(cursor.error(format!("expected end of key, found '{ch}'")));
	}
	Ok(Node::new(modifiers, key))
}

/// Consumes `modifier sep` if present. A modifier name not followed by a
/// separator is left for the key parsers (`"shift"` alone is not valid, but
/// `"s"` is).
fn take_modifier(cursor: &mut Cursor) -> Option<Modifier> {
	let name = cursor.word(|ch| ch.is_ascii_alphabetic());
	if name.is_empty() {
		return None;
	}
	let modifier = name.parse::<Modifier>().ok()?;
	let sep = cursor.rest[name.len()..].chars().next()?;
	if !is_sep(sep) {
		return None;
	}
	cursor.advance(name.len() + sep.len_utf8());
	Some(modifier)
}

fn parse_key(cursor: &mut Cursor) -> Result<Key, ParseError> {
	if let Some(key) = take_fn_key(cursor)? {
		return Ok(key);
	}
	if let Some(key) = take_named_key(cursor) {
		return Ok(key);
	}
	if let Some(key) = take_group(cursor)? {
		return Ok(key);
	}
	match cursor.bump() {
		Some(ch) if !ch.is_whitespace() => Ok(Key::Char(ch)),
		_ => Err(cursor.error("expected a key")),
	}
}

/// `f1` through `f35`. Once `f<digit>` is seen the number must be valid.
fn take_fn_key(cursor: &mut Cursor) -> Result<Option<Key>, ParseError> {
	if cursor.peek() != Some('f') || !cursor.peek_at(1).is_some_and(|ch| ch.is_ascii_digit()) {
		return Ok(None);
	}
	cursor.advance(1);
	let digits = cursor.word(|ch| ch.is_ascii_digit());
	match digits.parse::<u8>() {
		Ok(n) if (1..=35).contains(&n) => {
			cursor.advance(digits.len());
			Ok(Some(Key::F(n)))
		}
		_ => Err(cursor.error("invalid function key number (must be 1-35)")),
	}
}

fn take_named_key(cursor: &mut Cursor) -> Option<Key> {
	let name = cursor.word(|ch| ch.is_ascii_alphabetic());
	if name.len() < 2 {
		return None;
	}
	let key = name.parse::<Key>().ok()?;
	cursor.advance(name.len());
	Some(key)
}

fn take_group(cursor: &mut Cursor) -> Result<Option<Key>, ParseError> {
	if cursor.peek() != Some('@') || cursor.peek_at(1).is_none() {
		return Ok(None);
	}
	cursor.advance(1);
	let name = cursor.word(|ch| ch.is_ascii_alphabetic());
	let group = name
		.parse::<CharGroup>()
		.map_err(|()| cursor.error(format!("unknown char group: '@{name}'")))?;
	cursor.advance(name.len());
	Ok(Some(Key::Group(group)))
}

/// Parses a whitespace-separated sequence of key expressions.
///
/// # Errors
///
/// Returns a [`ParseError`] if the input is blank or any segment fails to parse.
/// Positions are byte offsets into the whole input.
pub fn parse_seq(s: &str) -> Result<Vec<Node>, ParseError> {
	let mut nodes = Vec::new();
	let mut offset = 0;
	for part in s.split_whitespace() {
		let start = offset + s[offset..].find(part).unwrap_or(0);
		nodes.push(parse_at(part, start)?);
		offset = start + part.len();
	}

	if nodes.is_empty() {
		return Err(ParseError {
			message: "empty key sequence".to_string(),
			position: 0,
		});
	}
	Ok(nodes)
}

impl FromStr for Node {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse(s)
	}
}
