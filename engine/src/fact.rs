//! Three-state fact lookup and value coercion.
//!
//! The collector writes the token [`NOT_MEASURED`] (or `null`) when it could
//! not gather a fact, and [`NOT_APPLICABLE`] when a fact does not apply to the
//! audited host. Every rule reads facts through [`Fact`] so the two gap states
//! can never be confused with a measured `false`, `0` or empty value.

use serde_json::Value;

use crate::paths::get_path;

/// Token written by the collector when a fact could not be gathered.
pub const NOT_MEASURED: &str = "non_mesurable";

/// Token written by the collector when a fact does not apply to the host.
pub const NOT_APPLICABLE: &str = "non_applicable";

/// A fact resolved from the facts document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fact<'a> {
    /// The collector measured a concrete value.
    Measured(&'a Value),
    /// Absent path, `null`, or the [`NOT_MEASURED`] token.
    NotMeasured,
    /// The [`NOT_APPLICABLE`] token.
    NotApplicable,
}

impl<'a> Fact<'a> {
    /// Looks up `path` in `facts` and classifies the result.
    pub fn lookup(facts: &'a Value, path: &str) -> Self {
        match get_path(facts, path) {
            None | Some(Value::Null) => Fact::NotMeasured,
            Some(Value::String(s)) if s == NOT_MEASURED => Fact::NotMeasured,
            Some(Value::String(s)) if s == NOT_APPLICABLE => Fact::NotApplicable,
            Some(value) => Fact::Measured(value),
        }
    }

    /// Returns true if a yes/no check cannot be assessed: the fact is not
    /// measured, or its measured value is not a boolean.
    pub fn is_unusable_flag(&self) -> bool {
        match self {
            Fact::Measured(value) => !value.is_boolean(),
            Fact::NotMeasured => true,
            Fact::NotApplicable => false,
        }
    }

    /// Returns true for the not-measured state.
    pub fn is_not_measured(&self) -> bool {
        matches!(self, Fact::NotMeasured)
    }

    /// Returns the measured value, if any.
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Fact::Measured(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the measured value if it is exactly the boolean `expected`.
    pub fn is_bool(&self, expected: bool) -> bool {
        self.value().and_then(Value::as_bool) == Some(expected)
    }

    /// Returns the measured string value.
    pub fn as_str(&self) -> Option<&'a str> {
        self.value().and_then(Value::as_str)
    }

    /// Returns the measured list value.
    pub fn as_list(&self) -> Option<&'a Vec<Value>> {
        self.value().and_then(Value::as_array)
    }

    /// Coerces the measured value to an integer. See [`as_int`].
    pub fn as_int(&self) -> Option<i64> {
        self.value().and_then(as_int)
    }

    /// Coerces the measured value to a float. See [`as_float`].
    pub fn as_float(&self) -> Option<f64> {
        self.value().and_then(as_float)
    }
}

/// Coerces a JSON value to an integer.
///
/// Integers pass through, floats are truncated toward zero, and strings made
/// only of ASCII digits are parsed. Booleans never coerce: `true` is not `1`.
/// `None` means "could not coerce" and callers treat it as non-measurable.
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}

/// Coerces a JSON value to a float.
///
/// Numbers pass through and strings are parsed after trimming. Booleans never
/// coerce, and `NaN` or infinite values count as not coercible.
pub fn as_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Renders a scalar JSON value as plain text (strings without quotes).
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
