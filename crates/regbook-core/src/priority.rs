//! # Priority Normalization
//!
//! `Priority` is always written as an integer. A blank cell becomes `0`;
//! numbers are rounded half to even, so `2.5` becomes `2` and `3.5`
//! becomes `4`. Numeric text (as produced by CSV exports) is parsed first.

use crate::error::RegbookError;
use crate::value::FieldValue;

/// Round to the nearest integer, ties to even.
pub fn round_half_even(x: f64) -> f64 {
    x.round_ties_even()
}

/// Normalize a `Priority` cell to an integer value.
///
/// # Errors
///
/// Returns [`RegbookError::InvalidPriority`] for non-numeric text,
/// booleans, lists, and non-finite numbers.
pub fn normalize_priority(value: &FieldValue) -> Result<FieldValue, RegbookError> {
    let invalid = || RegbookError::InvalidPriority {
        value: value.key_string(),
    };
    let number = match value {
        FieldValue::Empty => return Ok(FieldValue::Integer(0)),
        FieldValue::Integer(i) => return Ok(FieldValue::Integer(*i)),
        FieldValue::Number(f) => *f,
        FieldValue::Text(s) if s.trim().is_empty() => return Ok(FieldValue::Integer(0)),
        FieldValue::Text(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        FieldValue::Bool(_) | FieldValue::List(_) | FieldValue::Json(_) => return Err(invalid()),
    };
    if !number.is_finite() {
        return Err(invalid());
    }
    let rounded = round_half_even(number);
    if rounded.abs() >= i64::MAX as f64 {
        return Err(invalid());
    }
    Ok(FieldValue::Integer(rounded as i64))
}
