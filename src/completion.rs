// completion.rs

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

use crate::keypad::KEY_WORDS;

/// Completes keypad words (`DEL`, `History`, ...) at the cursor.
#[derive(Debug, Default)]
pub struct KeypadHelper;

impl KeypadHelper {
    pub fn new() -> Self {
        Self
    }

    fn matches(prefix: &str) -> Vec<&'static str> {
        let lower = prefix.to_ascii_lowercase();
        KEY_WORDS
            .into_iter()
            .filter(|w| w.len() > 1 && w.to_ascii_lowercase().starts_with(&lower))
            .collect()
    }
}

impl Completer for KeypadHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let before = &line[..pos];
        let start = before
            .char_indices()
            .rev()
            .find(|(_, c)| !c.is_alphabetic())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let prefix = &before[start..];
        if prefix.is_empty() {
            return Ok((pos, Vec::new()));
        }
        let completions = Self::matches(prefix)
            .into_iter()
            .map(|w| Pair {
                display: w.to_string(),
                replacement: w.to_string(),
            })
            .collect();
        Ok((start, completions))
    }
}

impl Hinter for KeypadHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for KeypadHelper {}

impl Validator for KeypadHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for KeypadHelper {}
