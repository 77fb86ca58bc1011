//! Calculator state and keypad handling
//!
//! [`Calculator`] owns the expression being typed, the last result and the
//! in-memory history. Every mutation goes through [`Calculator::handle_key`],
//! one branch per kind of key.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::error::{CalcError, HistoryError};
use crate::evaluator::{self, Evaluator, MevalEvaluator};
use crate::history::{HistoryList, HistoryStore, LOAD_FAILED_MESSAGE};
use crate::storage::KeyValueStore;

const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Operator keys. Each appends its symbol verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Sqrt,
    OpenParen,
    CloseParen,
}

impl Op {
    pub const ALL: [Op; 9] = [
        Op::Add,
        Op::Sub,
        Op::Mul,
        Op::Div,
        Op::Rem,
        Op::Pow,
        Op::Sqrt,
        Op::OpenParen,
        Op::CloseParen,
    ];

    pub fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
            Op::Rem => '%',
            Op::Pow => '^',
            Op::Sqrt => '√',
            Op::OpenParen => '(',
            Op::CloseParen => ')',
        }
    }

    pub fn from_symbol(c: char) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.symbol() == c)
    }
}

/// One keypad press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// An ASCII digit.
    Digit(char),
    Point,
    Op(Op),
    Clear,
    Delete,
    Evaluate,
    History,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    /// Parse a single keypad label such as `7`, `√`, `DEL` or `History`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_digit() {
                return Ok(Key::Digit(c));
            }
            if c == '.' {
                return Ok(Key::Point);
            }
            if c == '=' {
                return Ok(Key::Evaluate);
            }
            if let Some(op) = Op::from_symbol(c) {
                return Ok(Key::Op(op));
            }
        }
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Key::Clear),
            "del" => Ok(Key::Delete),
            "history" => Ok(Key::History),
            "sqrt" => Ok(Key::Op(Op::Sqrt)),
            _ => Err(UnknownKey(s.to_string())),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Digit(c) => write!(f, "{}", c),
            Key::Point => f.write_str("."),
            Key::Op(op) => write!(f, "{}", op.symbol()),
            Key::Clear => f.write_str("C"),
            Key::Delete => f.write_str("DEL"),
            Key::Evaluate => f.write_str("="),
            Key::History => f.write_str("History"),
        }
    }
}

/// What the front-end should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Redraw the display.
    Updated,
    /// Open the history view.
    ShowHistory,
}

/// Startup load lifecycle. `Loaded` and `LoadFailed` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
    LoadFailed,
}

pub struct Calculator<S> {
    expression: String,
    result: String,
    history: HistoryList,
    load_state: LoadState,
    pending_load: Option<oneshot::Receiver<Result<HistoryList, HistoryError>>>,
    store: HistoryStore<S>,
    evaluator: Box<dyn Evaluator>,
}

impl<S: KeyValueStore + 'static> Calculator<S> {
    pub fn new(store: HistoryStore<S>) -> Self {
        Self::with_evaluator(store, Box::new(MevalEvaluator))
    }

    pub fn with_evaluator(store: HistoryStore<S>, evaluator: Box<dyn Evaluator>) -> Self {
        Self {
            expression: String::new(),
            result: String::new(),
            history: HistoryList::new(),
            load_state: LoadState::NotLoaded,
            pending_load: None,
            store,
            evaluator,
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn history(&self) -> &HistoryList {
        &self.history
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Kick off the startup load. Only the first call has any effect.
    pub fn start_loading(&mut self) {
        if self.load_state != LoadState::NotLoaded {
            return;
        }
        self.pending_load = Some(self.store.spawn_load());
        self.load_state = LoadState::Loading;
    }

    /// Adopt the startup load outcome if it has arrived. Never blocks.
    pub fn poll_load(&mut self) {
        let Some(rx) = self.pending_load.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => Err(HistoryError::read("load task ended without a result")),
        };
        self.pending_load = None;

        match outcome {
            Ok(loaded) => {
                let had_session_records = !self.history.is_empty();
                self.history = HistoryList::merged_after(loaded, &self.history);
                self.load_state = LoadState::Loaded;
                if had_session_records {
                    // Earlier saves this session did not include the loaded records.
                    self.store.queue_persist(self.history.clone());
                }
            }
            Err(e) => {
                warn!(error = %e, "history unavailable for this session");
                self.load_state = LoadState::LoadFailed;
                self.result = LOAD_FAILED_MESSAGE.to_string();
            }
        }
    }

    /// Poll the startup load for at most `limit`, sleeping the calling
    /// thread in between. Must not run on a runtime worker.
    pub fn wait_for_load(&mut self, limit: Duration) {
        let deadline = Instant::now() + limit;
        loop {
            self.poll_load();
            if self.load_state != LoadState::Loading || Instant::now() >= deadline {
                return;
            }
            std::thread::sleep(LOAD_POLL_INTERVAL);
        }
    }

    /// Wait until every queued history save has been attempted.
    pub async fn flush_history(&self) {
        self.store.flush().await;
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        self.poll_load();
        debug!(%key, "key");
        match key {
            Key::Digit(c) => self.push_char(c),
            Key::Point => self.push_char('.'),
            Key::Op(op) => self.push_char(op.symbol()),
            Key::Clear => self.clear(),
            Key::Delete => self.delete_last(),
            Key::Evaluate => self.evaluate(),
            Key::History => return KeyOutcome::ShowHistory,
        }
        KeyOutcome::Updated
    }

    fn push_char(&mut self, c: char) {
        self.expression.push(c);
    }

    fn clear(&mut self) {
        self.expression.clear();
        self.result.clear();
    }

    fn delete_last(&mut self) {
        self.expression.pop();
    }

    fn evaluate(&mut self) {
        match self.compute() {
            Ok(value) => {
                debug!(expression = %self.expression, result = %value, "evaluated");
                let record = HistoryList::record(&self.expression, &value);
                self.result = value;
                self.history = self.store.append(record, &self.history);
                // While loading, a save would clobber records not read yet.
                // The merge in `poll_load` saves once the load is in.
                if self.load_state != LoadState::Loading {
                    self.store.queue_persist(self.history.clone());
                }
            }
            Err(e) => {
                debug!(expression = %self.expression, error = %e, "evaluation rejected");
                self.result = e.status_message().to_string();
            }
        }
    }

    fn compute(&self) -> Result<String, CalcError> {
        if self.expression.trim().is_empty() {
            return Err(CalcError::EmptyInput);
        }
        let normalized = evaluator::normalize(&self.expression);
        if evaluator::divides_by_literal_zero(&normalized) {
            return Err(CalcError::DivideByZero);
        }
        let value = self.evaluator.evaluate(&normalized)?;
        evaluator::format_value(value)
    }
}
