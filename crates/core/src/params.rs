//! Typed parameter collections and key lookup.
//!
//! GA4 encodes event parameters and user properties as an ordered
//! array of `{key, value}` records where `value` is a struct with one
//! populated slot among string/int/float/double. Lookup resolves the
//! populated slot into a tagged [`Value`] so downstream code never has
//! to ask "which field is set".

use serde::{Deserialize, Serialize};

/// A resolved parameter value with exactly one active case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
}

impl Value {
    /// Returns the string case, or `None` for numeric values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer case, or `None` otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns a float for either numeric case.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Interprets the value as a boolean flag.
    ///
    /// GA4 sends flags like `session_engaged` as either the string
    /// `"1"`/`"true"` or the integer `1`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Str(s) => match s.as_str() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
            Self::Int(i) => Some(*i != 0),
            Self::Float(_) => None,
        }
    }

    /// Renders any case as a string.
    ///
    /// Used for identifier-like parameters (`ga_session_id`) that GA4
    /// delivers as integers but the derived tables store as strings.
    pub fn coerce_string(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
        }
    }
}

/// Wire-format value struct with one populated slot.
///
/// GA4 exports carry both `float_value` and `double_value`; both map
/// to [`Value::Float`]. Slot priority on resolution is fixed:
/// string, int, float, double.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamValue {
    #[serde(default)]
    pub string_value: Option<String>,
    #[serde(default)]
    pub int_value: Option<i64>,
    #[serde(default)]
    pub float_value: Option<f64>,
    #[serde(default)]
    pub double_value: Option<f64>,
}

impl ParamValue {
    /// Resolves the populated slot into a tagged value.
    ///
    /// Returns `None` when every slot is null. Tolerates multiple
    /// populated slots by taking the highest-priority one.
    pub fn resolve(&self) -> Option<Value> {
        if let Some(ref s) = self.string_value {
            return Some(Value::Str(s.clone()));
        }
        if let Some(i) = self.int_value {
            return Some(Value::Int(i));
        }
        if let Some(f) = self.float_value {
            return Some(Value::Float(f));
        }
        self.double_value.map(Value::Float)
    }
}

/// One key-tagged parameter record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventParam {
    pub key: String,
    #[serde(default)]
    pub value: ParamValue,
}

impl EventParam {
    pub fn new(key: impl Into<String>, value: ParamValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Looks up a parameter by key in collection order.
///
/// The first entry whose key matches and whose value resolves wins.
/// A matching entry with all-null slots does not short-circuit; later
/// entries with the same key are still considered. Total: missing
/// keys and empty collections yield `None`, never an error.
///
/// Used identically for event params and user properties.
pub fn lookup(params: &[EventParam], key: &str) -> Option<Value> {
    params
        .iter()
        .filter(|p| p.key == key)
        .find_map(|p| p.value.resolve())
}

/// Lookup returning only the string case.
pub fn lookup_str(params: &[EventParam], key: &str) -> Option<String> {
    lookup(params, key).and_then(|v| v.as_str().map(str::to_owned))
}

/// Lookup returning only integer values.
pub fn lookup_i64(params: &[EventParam], key: &str) -> Option<i64> {
    lookup(params, key).and_then(|v| v.as_i64())
}

/// Lookup coercing either numeric case to a float.
pub fn lookup_f64(params: &[EventParam], key: &str) -> Option<f64> {
    lookup(params, key).and_then(|v| v.as_f64())
}

/// Lookup interpreting the value as a flag.
pub fn lookup_bool(params: &[EventParam], key: &str) -> Option<bool> {
    lookup(params, key).and_then(|v| v.as_bool())
}

/// Lookup rendering any value case as a string.
pub fn lookup_string_like(params: &[EventParam], key: &str) -> Option<String> {
    lookup(params, key).map(|v| v.coerce_string())
}
