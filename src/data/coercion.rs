// Coercion of string-encoded cell values
// Author: Gabriel Demetrios Lafis

use std::ops::RangeInclusive;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::Value;
use crate::utils::Logger;

/// Privacy redaction used by the datasets for counts below 15
pub const SMALL_COUNT_SENTINEL: &str = "<15";

/// Label substituted for missing string values
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Range drawn from under [`UnknownPolicy::RandomSmallOnUnknown`]
pub const RANDOM_SMALL_RANGE: RangeInclusive<i64> = 1..=15;

const NULL_STRINGS: [&str; 6] = ["", "NULL", "null", "None", "nan", "NaN"];

/// What an unknown or redacted count becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnknownPolicy {
    /// The fixed "unknown" marker 0
    ZeroOnUnknown,
    /// A pseudo-random value in [`RANDOM_SMALL_RANGE`]
    RandomSmallOnUnknown,
}

/// A cell that is neither a count, the sentinel, nor null
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot coerce '{value}' to {target}")]
pub struct CoercionError {
    pub value: String,
    pub target: &'static str,
}

/// Check whether a raw value is the small-count sentinel or null-like
pub fn is_unknown(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::Float(f) => f.is_nan(),
        Value::String(s) => {
            let s = s.trim();
            s == SMALL_COUNT_SENTINEL || NULL_STRINGS.contains(&s)
        }
        _ => false,
    }
}

/// Parse a raw cell as an integer count, `None` meaning unknown.
///
/// `+` markers are stripped (`"5+"` is 5) and integral float strings are
/// truncated (`"1088.0"` is 1088).
pub fn parse_count(raw: &Value) -> Result<Option<i64>, CoercionError> {
    if is_unknown(raw) {
        return Ok(None);
    }

    let error = || CoercionError {
        value: raw.to_label(),
        target: "int",
    };

    match raw {
        Value::Integer(i) => Ok(Some(*i)),
        Value::Float(f) if f.is_finite() => Ok(Some(f.trunc() as i64)),
        Value::Boolean(b) => Ok(Some(i64::from(*b))),
        Value::String(s) => {
            let cleaned = s.trim().trim_matches('+');
            if let Ok(i) = cleaned.parse::<i64>() {
                return Ok(Some(i));
            }
            match cleaned.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Some(f.trunc() as i64)),
                _ => Err(error()),
            }
        }
        _ => Err(error()),
    }
}

/// Parse a raw cell as an integer count, resolving unknowns per `policy`
pub fn string_to_int<R: Rng + ?Sized>(
    raw: &Value,
    policy: UnknownPolicy,
    rng: &mut R,
) -> Result<i64, CoercionError> {
    Ok(match parse_count(raw)? {
        Some(n) => n,
        None => match policy {
            UnknownPolicy::ZeroOnUnknown => 0,
            UnknownPolicy::RandomSmallOnUnknown => rng.gen_range(RANDOM_SMALL_RANGE),
        },
    })
}

/// Trimmed string, with `NULL` and empty values mapped to [`UNKNOWN_LABEL`]
pub fn string_to_label(raw: &Value) -> String {
    match raw {
        Value::Null => UNKNOWN_LABEL.to_string(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "NULL" {
                UNKNOWN_LABEL.to_string()
            } else {
                trimmed.to_string()
            }
        }
        other => other.to_label(),
    }
}

/// Interpret a `"0"`/`"1"` flag as a `"True"`/`"False"` label
pub fn boolish_to_label(raw: &Value) -> Result<&'static str, CoercionError> {
    let truth = match raw {
        Value::Boolean(b) => Some(*b),
        Value::Integer(i) => Some(*i != 0),
        Value::String(s) => s.trim().parse::<i64>().ok().map(|i| i != 0),
        _ => None,
    };

    match truth {
        Some(true) => Ok("True"),
        Some(false) => Ok("False"),
        None => Err(CoercionError {
            value: raw.to_label(),
            target: "bool",
        }),
    }
}

/// Date portion of an ISO date-time string
pub fn date_key_normalize(raw: &str) -> &str {
    raw.split('T').next().unwrap_or(raw)
}

/// Per-handler coercion context: the placeholder RNG and a log sink.
pub struct Coercer {
    rng: Mutex<StdRng>,
    logger: Logger,
}

impl Coercer {
    /// Create a coercer; a seed makes the random placeholders reproducible
    pub fn new(logger: Logger, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Coercer {
            rng: Mutex::new(rng),
            logger,
        }
    }

    /// Coerce a cell to an integer, logging and substituting 0 on failure
    pub fn to_int(&self, raw: &Value, policy: UnknownPolicy) -> i64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        match string_to_int(raw, policy, &mut *rng) {
            Ok(i) => i,
            Err(err) => {
                self.logger.warn(format_args!("{}, substituting 0", err));
                0
            }
        }
    }

    /// Boolean label of a flag cell, falling back to its string label
    pub fn to_bool_label(&self, raw: &Value) -> String {
        match boolish_to_label(raw) {
            Ok(label) => label.to_string(),
            Err(err) => {
                self.logger.warn(format_args!("{}, using label", err));
                string_to_label(raw)
            }
        }
    }
}
