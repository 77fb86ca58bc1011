// keypad.rs

use itertools::Itertools;

use crate::calculator::{Key, UnknownKey};

/// Words accepted on the command line besides single-character keys.
pub const KEY_WORDS: [&str; 4] = ["C", "DEL", "History", "sqrt"];

/// Split one input line into keypad presses.
///
/// Digits, `.`, `=` and operator symbols are one key each, so `7+3=` is four
/// presses. Runs of letters form a word (`DEL`, `History`, `sqrt`).
/// Whitespace only separates. Nothing is returned unless every key is valid.
pub fn parse_line(line: &str) -> Result<Vec<Key>, UnknownKey> {
    let mut keys = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        if ch.is_alphabetic() {
            let word: String = chars.peeking_take_while(|c| c.is_alphabetic()).collect();
            keys.push(word.parse()?);
            continue;
        }
        chars.next();
        keys.push(ch.to_string().parse()?);
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Op;

    #[test]
    fn splits_compact_input() {
        assert_eq!(
            parse_line("7+3=").unwrap(),
            vec![
                Key::Digit('7'),
                Key::Op(Op::Add),
                Key::Digit('3'),
                Key::Evaluate
            ]
        );
    }

    #[test]
    fn words_and_symbols_mix() {
        assert_eq!(
            parse_line("C √9 DEL sqrt(4)").unwrap(),
            vec![
                Key::Clear,
                Key::Op(Op::Sqrt),
                Key::Digit('9'),
                Key::Delete,
                Key::Op(Op::Sqrt),
                Key::Op(Op::OpenParen),
                Key::Digit('4'),
                Key::Op(Op::CloseParen),
            ]
        );
        assert_eq!(parse_line("history").unwrap(), vec![Key::History]);
    }

    #[test]
    fn letters_after_digits_start_a_new_word() {
        assert_eq!(parse_line("12C").unwrap(), vec![Key::Digit('1'), Key::Digit('2'), Key::Clear]);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert_eq!(parse_line("2x3"), Err(UnknownKey("x".to_string())));
        assert_eq!(parse_line("1&2"), Err(UnknownKey("&".to_string())));
    }

    #[test]
    fn blank_line_is_no_keys() {
        assert!(parse_line("   ").unwrap().is_empty());
    }
}
