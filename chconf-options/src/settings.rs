//! Server-side session settings.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Settings forwarded to the server, keyed by setting name.
///
/// Iteration follows first insertion, which for DSNs is query order.
pub type Settings = IndexMap<String, SettingValue>;

/// A dynamically typed setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Boolean, sent to the server as `1` or `0`.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Any other value, sent verbatim.
    String(String),
}

impl SettingValue {
    /// Coerce a raw DSN query value.
    ///
    /// `true`/`false` in any case become [`SettingValue::Bool`], integers become
    /// [`SettingValue::Int`], and anything else is kept as the original string.
    pub fn coerce(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            Self::Bool(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Self::Bool(false)
        } else if let Ok(n) = raw.parse::<i64>() {
            Self::Int(n)
        } else {
            Self::String(raw.to_string())
        }
    }

    /// Integer view of the value; booleans map to 1 and 0.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Int(n) => Some(*n),
            Self::String(_) => None,
        }
    }

    /// String view of the value, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value as sent in session parameters.
    pub fn to_wire_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", u8::from(*b)),
            Self::Int(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}
