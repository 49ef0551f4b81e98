//! Score equivalence.

use serde_json::Value;

use crate::expr;

/// Relative tolerance when comparing evaluated scores.
const EPSILON: f64 = 1e-9;

/// Numeric value of a raw score, if it is a number or an arithmetic formula.
pub fn numeric_value(score: &Value) -> Option<f64> {
    match score {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => expr::evaluate(s).ok(),
        _ => None,
    }
}

/// Whether two recorded scores denote the same result.
///
/// Identical raw values are equal. Otherwise both sides must evaluate to the
/// same number: `"3+4+5"`, `"12"` and `12` are all equal. Text that is not
/// arithmetic only equals itself.
pub fn scores_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (numeric_value(a), numeric_value(b)) {
        (Some(x), Some(y)) => {
            let scale = x.abs().max(y.abs()).max(1.0);
            (x - y).abs() <= EPSILON * scale
        }
        _ => false,
    }
}
