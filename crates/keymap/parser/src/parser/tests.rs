use pretty_assertions::assert_eq;

use super::*;

fn ctrl() -> u8 {
	Modifier::Ctrl as u8
}

#[test]
fn single_characters() {
	assert_eq!(parse("f").unwrap(), Node::from(Key::Char('f')));
	assert_eq!(parse("[").unwrap(), Node::from(Key::Char('[')));
	assert_eq!(parse("?").unwrap(), Node::from(Key::Char('?')));
	assert_eq!(parse("-").unwrap(), Node::from(Key::Char('-')));
}

#[test]
fn modifiers_with_either_separator() {
	let expected = Node::new(ctrl() | Modifier::Shift as u8, Key::Char('s'));
	assert_eq!(parse("ctrl-shift-s").unwrap(), expected);
	assert_eq!(parse("ctrl+shift+s").unwrap(), expected);
	assert_eq!(parse("shift-ctrl-s").unwrap(), expected);
	assert_eq!(parse("cmd-k").unwrap(), Node::new(Modifier::Meta as u8, Key::Char('k')));
}

#[test]
fn separator_as_key_after_modifier() {
	assert_eq!(parse("ctrl--").unwrap(), Node::new(ctrl(), Key::Char('-')));
	assert_eq!(parse("ctrl-+").unwrap(), Node::new(ctrl(), Key::Char('+')));
}

#[test]
fn named_and_function_keys() {
	assert_eq!(parse("esc").unwrap(), Node::from(Key::Esc));
	assert_eq!(parse("Enter").unwrap(), Node::from(Key::Enter));
	assert_eq!(parse("alt-pageup").unwrap(), Node::new(Modifier::Alt as u8, Key::PageUp));
	assert_eq!(parse("f1").unwrap(), Node::from(Key::F(1)));
	assert_eq!(parse("f35").unwrap(), Node::from(Key::F(35)));
}

#[test]
fn invalid_function_key_is_an_error() {
	let err = parse("f36").unwrap_err();
	assert!(err.message.contains("function key"), "{err}");
}

#[test]
fn char_groups() {
	assert_eq!(parse("@digit").unwrap(), Node::from(Key::Group(CharGroup::Digit)));
	let err = parse("@vowel").unwrap_err();
	assert_eq!(err.message, "unknown char group: '@vowel'");
}

#[test]
fn trailing_input_reports_position() {
	let err = parse("ab").unwrap_err();
	assert_eq!(err.position, 1);

	let err = parse("shift").unwrap_err();
	assert_eq!(err.position, 1);
}

#[test]
fn duplicate_modifier_rejected() {
	assert!(parse("ctrl-ctrl-a").is_err());
}

#[test]
fn sequences() {
	assert_eq!(
		parse_seq("n o").unwrap(),
		vec![Node::from(Key::Char('n')), Node::from(Key::Char('o'))]
	);
	assert_eq!(
		parse_seq("  g   ctrl-g ").unwrap(),
		vec![Node::from(Key::Char('g')), Node::new(ctrl(), Key::Char('g'))]
	);
}

#[test]
fn sequence_error_offsets_cover_whole_input() {
	let err = parse_seq("a @nope").unwrap_err();
	assert_eq!(err.position, 3);
}

#[test]
fn blank_input_rejected() {
	assert!(parse("").is_err());
	assert!(parse_seq("   ").is_err());
}

#[test]
fn display_round_trips_canonical_form() {
	for src in ["ctrl-shift-s", "f12", "@alpha", "[", "pagedown"] {
		assert_eq!(parse(src).unwrap().to_string(), src);
	}
}
