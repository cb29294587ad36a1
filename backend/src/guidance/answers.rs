//! Answer Decoding
//!
//! Turns the dynamic `answers` JSON value into a fixed-length integer vector.
//! Validation runs in a fixed order and stops at the first failure:
//! not a sequence, then wrong length, then a non-integer element.

use super::quiz::QUESTION_COUNT;
use serde_json::Value;
use thiserror::Error;

/// Validated quiz answers, one integer per question
pub type AnswerVector = [i64; QUESTION_COUNT];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnswerError {
    #[error("answers must be a list")]
    NotASequence,

    #[error("Provide {expected} answer values (1-5). Received {received}.")]
    WrongLength { expected: usize, received: usize },

    #[error("All answers must be integer-like (1-5).")]
    NonInteger,
}

/// Decode the `answers` field of a prediction request.
///
/// `None` stands for an absent field. Values outside 1-5 are accepted.
pub fn decode_answers(answers: Option<&Value>) -> Result<AnswerVector, AnswerError> {
    let items = match answers {
        Some(Value::Array(items)) => items,
        _ => return Err(AnswerError::NotASequence),
    };

    if items.len() != QUESTION_COUNT {
        return Err(AnswerError::WrongLength {
            expected: QUESTION_COUNT,
            received: items.len(),
        });
    }

    let mut vector = [0i64; QUESTION_COUNT];
    for (slot, item) in vector.iter_mut().zip(items) {
        *slot = coerce_integer(item).ok_or(AnswerError::NonInteger)?;
    }
    Ok(vector)
}

/// Integer coercion for a single JSON answer.
///
/// Floats truncate toward zero, booleans count as 0/1 and strings must
/// hold a base-10 integer.
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else if n.is_u64() {
                None
            } else {
                n.as_f64().and_then(truncate_float)
            }
        }
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => parse_integer_text(s),
        _ => None,
    }
}

fn truncate_float(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let t = f.trunc();
    if t < i64::MIN as f64 || t >= i64::MAX as f64 {
        return None;
    }
    Some(t as i64)
}

fn parse_integer_text(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);

    // Underscores are only allowed singly, between digits
    let well_formed = !digits.is_empty()
        && digits.starts_with(|c: char| c.is_ascii_digit())
        && digits.ends_with(|c: char| c.is_ascii_digit())
        && !digits.contains("__")
        && digits.chars().all(|c| c.is_ascii_digit() || c == '_');
    if !well_formed {
        return None;
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != '_').collect();
    cleaned.parse::<i64>().ok()
}
