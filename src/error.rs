// error.rs

use thiserror::Error;

/// Errors raised while evaluating the current expression.
///
/// None of these ever reach the front-end as errors: the calculator turns
/// each one into the short status text shown in the result line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("empty input")]
    EmptyInput,

    #[error("division by a literal zero")]
    DivideByZero,

    #[error("evaluation failed: {0}")]
    Evaluation(String),
}

impl CalcError {
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Text shown in place of the result.
    pub fn status_message(&self) -> &'static str {
        match self {
            Self::EmptyInput => "Empty Input",
            Self::DivideByZero => "Cannot divide by zero",
            Self::Evaluation(_) => "Invalid Expression",
        }
    }
}

/// Errors from the key-value storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }
}

/// Errors from loading or saving the calculation history.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read history: {0}")]
    StorageRead(String),

    #[error("failed to write history: {0}")]
    StorageWrite(String),
}

impl HistoryError {
    pub fn read(msg: impl Into<String>) -> Self {
        Self::StorageRead(msg.into())
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self::StorageWrite(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_messages_are_fixed() {
        assert_eq!(CalcError::EmptyInput.status_message(), "Empty Input");
        assert_eq!(CalcError::DivideByZero.status_message(), "Cannot divide by zero");
        assert_eq!(
            CalcError::evaluation("unexpected token").status_message(),
            "Invalid Expression"
        );
    }
}
