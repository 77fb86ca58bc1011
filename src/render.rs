// render.rs

use std::io::Write;

use itertools::Itertools;

use crate::calculator::LoadState;
use crate::history::{HistoryList, HISTORY_VIEW_SIZE};

pub fn writeln_ignore_broken_pipe<W: Write, S: AsRef<str>>(mut w: W, s: S) -> std::io::Result<()> {
    match writeln!(w, "{}", s.as_ref()) {
        Err(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// The two display lines: the expression (`0` when empty) and the result.
pub fn display(expression: &str, result: &str) -> String {
    let shown = if expression.is_empty() { "0" } else { expression };
    if result.is_empty() {
        format!("  {}", shown)
    } else {
        format!("  {}\n  {}", shown, result)
    }
}

/// The history view: a placeholder while loading or when empty, otherwise
/// the most recent records, oldest first.
pub fn history_view(state: LoadState, history: &HistoryList) -> String {
    let body = match state {
        LoadState::NotLoaded | LoadState::Loading => "Loading history...".to_string(),
        _ if history.is_empty() => "No history available".to_string(),
        _ => history
            .recent(HISTORY_VIEW_SIZE)
            .iter()
            .map(|record| format!("  {}", record))
            .join("\n"),
    };
    format!("── History ──\n{}\n─────────────", body)
}
