//! # Keypad calculator
//!
//! A calculator driven by keypad presses. The expression is built one key at
//! a time and evaluated on `=`; arithmetic is delegated to `meval`. Every
//! successful calculation is kept as an `"<expression> = <result>"` record in
//! a history of the ten most recent ones, stored as a JSON array of strings
//! under the `calcHistory` key and saved in the background.
//!
//! Keys:
//! * digits `0`-`9` and the decimal point
//! * operators `+ - * / % ^ √ ( )`
//! * `C` clears, `DEL` removes the last character, `=` evaluates,
//!   `History` opens the history view
//!
//! Division by a literal `0` is refused before evaluation. The check is
//! textual only: `1/(1-1)` gets through and yields `Infinity`.

pub mod calculator;
pub mod completion;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod keypad;
pub mod render;
pub mod repl;
pub mod storage;

pub use calculator::{Calculator, Key, KeyOutcome, LoadState, Op};
pub use error::{CalcError, HistoryError, StorageError};
pub use evaluator::{Evaluator, MevalEvaluator};
pub use history::{HistoryList, HistoryStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
