use std::fmt;

use indexmap::IndexMap;

/// Parsed document: variable names to values, in document order.
pub type EnvMap = IndexMap<String, EnvValue>;

/// Named constants substituted for matching bare values.
pub type Constants = IndexMap<String, EnvValue>;

/// Typed value of one assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvValue {
    /// `null`, or an assignment with no value.
    Null,
    /// `true`/`on`/`yes` or `false`/`off`/`no`.
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl EnvValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value; integers are widened.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

/// String form used when a value is interpolated into another one:
/// null and `false` are empty, `true` is `1`.
impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null | Self::Bool(false) => Ok(()),
            Self::Bool(true) => f.write_str("1"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for EnvValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for EnvValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for EnvValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for EnvValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for EnvValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}
