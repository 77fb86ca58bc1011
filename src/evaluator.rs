//! Expression evaluation
//!
//! Arithmetic itself is delegated to `meval`. This module only adapts the
//! keypad notation to the evaluator's syntax, runs the divide-by-zero
//! pre-check and renders the numeric outcome for display.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CalcError;

/// Square-root function name understood by the evaluator.
pub const SQRT_FUNCTION: &str = "sqrt";

/// Exponentiation operator understood by the evaluator.
pub const POW_OPERATOR: &str = "^";

/// Capability to evaluate an infix arithmetic expression.
///
/// Must accept `+ - * / %`, parentheses, [`POW_OPERATOR`] and calls to
/// [`SQRT_FUNCTION`], and fail on malformed input.
pub trait Evaluator: Send {
    fn evaluate(&self, expression: &str) -> Result<f64, CalcError>;
}

/// Default evaluator backed by `meval`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MevalEvaluator;

impl Evaluator for MevalEvaluator {
    fn evaluate(&self, expression: &str) -> Result<f64, CalcError> {
        meval::eval_str(expression).map_err(|e| {
            CalcError::evaluation(format!("Failed to evaluate '{}': {}", expression, e))
        })
    }
}

static SQRT_OPERAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"√\s*(\d+(?:\.\d*)?|\.\d+)").expect("valid sqrt operand pattern"));

static LITERAL_ZERO_DIVISOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\s*0(?:[^.]|$)").expect("valid zero divisor pattern"));

/// Rewrite keypad notation into evaluator syntax.
///
/// `√` becomes [`SQRT_FUNCTION`]. A number written directly after `√` is
/// wrapped in parentheses (`√9` -> `sqrt(9)`), since the evaluator only
/// knows call syntax. `^` becomes [`POW_OPERATOR`].
pub fn normalize(expression: &str) -> String {
    let wrapped =
        SQRT_OPERAND.replace_all(expression, format!("{}(${{1}})", SQRT_FUNCTION).as_str());
    wrapped.replace('√', SQRT_FUNCTION).replace('^', POW_OPERATOR)
}

/// True when the expression divides by a bare literal `0`.
///
/// Purely syntactic: `5/0` and `5 / 00` match, `5/0.5` does not, and a
/// divisor that only evaluates to zero (`1/(1-1)`) is not detected.
pub fn divides_by_literal_zero(expression: &str) -> bool {
    LITERAL_ZERO_DIVISOR.is_match(expression)
}

/// Render an evaluation outcome for the result line.
///
/// Infinities render as `Infinity` / `-Infinity`; NaN is treated as a
/// failed evaluation.
pub fn format_value(value: f64) -> Result<String, CalcError> {
    if value.is_nan() {
        return Err(CalcError::evaluation("result is not a number"));
    }
    if value.is_infinite() {
        let rendered = if value.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        };
        return Ok(rendered.to_string());
    }
    if value == 0.0 {
        return Ok("0".to_string());
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_bare_sqrt_operand() {
        assert_eq!(normalize("√9"), "sqrt(9)");
        assert_eq!(normalize("√2.25+1"), "sqrt(2.25)+1");
        assert_eq!(normalize("√(7+9)"), "sqrt(7+9)");
    }

    #[test]
    fn normalize_keeps_power_operator() {
        assert_eq!(normalize("2^3"), "2^3");
    }

    #[test]
    fn divide_guard_only_matches_bare_zero() {
        assert!(divides_by_literal_zero("5/0"));
        assert!(divides_by_literal_zero("5/ 0+1"));
        assert!(divides_by_literal_zero("5/00"));
        assert!(!divides_by_literal_zero("5/0.5"));
        assert!(!divides_by_literal_zero("50/5"));
        assert!(!divides_by_literal_zero("1/(1-1)"));
    }

    #[test]
    fn meval_handles_keypad_operators() {
        let eval = MevalEvaluator;
        assert_eq!(eval.evaluate("7+3").unwrap(), 10.0);
        assert_eq!(eval.evaluate("2^3").unwrap(), 8.0);
        assert_eq!(eval.evaluate("sqrt(9)").unwrap(), 3.0);
        assert_eq!(eval.evaluate("10%4").unwrap(), 2.0);
        assert_eq!(eval.evaluate("(1+2)*3").unwrap(), 9.0);
    }

    #[test]
    fn meval_rejects_malformed_input() {
        assert!(MevalEvaluator.evaluate("7+").is_err());
        assert!(MevalEvaluator.evaluate("(1+2").is_err());
    }

    #[test]
    fn format_value_renders_like_a_calculator() {
        assert_eq!(format_value(10.0).unwrap(), "10");
        assert_eq!(format_value(-0.5).unwrap(), "-0.5");
        assert_eq!(format_value(-0.0).unwrap(), "0");
        assert_eq!(format_value(f64::INFINITY).unwrap(), "Infinity");
        assert_eq!(format_value(f64::NEG_INFINITY).unwrap(), "-Infinity");
        assert!(format_value(f64::NAN).is_err());
    }
}
