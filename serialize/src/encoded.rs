//! Encoded (URL-level) values.

use crate::Value;

/// The raw representation of a parameter as it appears in a query string.
///
/// A repeated key becomes [`EncodedValue::Multi`]; a bare key without `=`
/// is a `None` entry (or [`EncodedValue::Null`] when it is the only one).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EncodedValue {
    /// Not present; dropped when serialized.
    #[default]
    Undefined,
    /// Present without a value.
    Null,
    /// A single value.
    Single(String),
    /// A repeated key, in order of appearance.
    Multi(Vec<Option<String>>),
}

/// Nullity-aware view of an encoded value, as consumed by codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Raw<T> {
    /// The encoded value was undefined.
    Undefined,
    /// The encoded value was null (or empty where emptiness means null).
    Null,
    /// A usable value.
    Present(T),
}

impl<T> Raw<T> {
    /// Maps the present value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Raw<U> {
        match self {
            Self::Undefined => Raw::Undefined,
            Self::Null => Raw::Null,
            Self::Present(value) => Raw::Present(f(value)),
        }
    }

    /// Finishes a decode: undefined stays absent, null stays null, and a
    /// present value is handed to `f`.
    pub fn decode_with(self, f: impl FnOnce(T) -> Option<Value>) -> Option<Value> {
        match self {
            Self::Undefined => None,
            Self::Null => Some(Value::Null),
            Self::Present(value) => f(value),
        }
    }
}

impl EncodedValue {
    /// Creates a single encoded value.
    #[must_use]
    pub fn single(value: impl Into<String>) -> Self {
        Self::Single(value.into())
    }

    /// Creates a repeated-key value from non-null strings.
    #[must_use]
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Multi(values.into_iter().map(|s| Some(s.into())).collect())
    }

    /// Returns `true` for [`EncodedValue::Undefined`].
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for undefined or null.
    #[must_use]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Returns the scalar a single-valued codec should decode.
    ///
    /// Only the first entry of a repeated key is used; an empty sequence is
    /// null. An empty string is null unless `allow_empty` is set.
    #[must_use]
    pub fn scalar(&self, allow_empty: bool) -> Raw<&str> {
        let first = match self {
            Self::Undefined => return Raw::Undefined,
            Self::Null => return Raw::Null,
            Self::Single(s) => Some(s.as_str()),
            Self::Multi(values) => match values.first() {
                Some(first) => first.as_deref(),
                None => return Raw::Null,
            },
        };
        match first {
            None => Raw::Null,
            Some("") if !allow_empty => Raw::Null,
            Some(s) => Raw::Present(s),
        }
    }

    /// Returns every entry for array-shaped codecs.
    ///
    /// A lone value becomes a one-element sequence and an empty string an
    /// empty one.
    #[must_use]
    pub fn entries(&self) -> Raw<Vec<Option<&str>>> {
        match self {
            Self::Undefined => Raw::Undefined,
            Self::Null => Raw::Null,
            Self::Single(s) if s.is_empty() => Raw::Present(Vec::new()),
            Self::Single(s) => Raw::Present(vec![Some(s.as_str())]),
            Self::Multi(values) => Raw::Present(values.iter().map(Option::as_deref).collect()),
        }
    }

    /// Converts to a decoded value without interpretation.
    ///
    /// Used to pass unconfigured parameters through a decode.
    #[must_use]
    pub fn to_raw_value(&self) -> Option<Value> {
        match self {
            Self::Undefined => None,
            Self::Null => Some(Value::Null),
            Self::Single(s) => Some(Value::String(s.clone())),
            Self::Multi(values) => Some(Value::Array(
                values
                    .iter()
                    .map(|v| v.clone().map_or(Value::Null, Value::String))
                    .collect(),
            )),
        }
    }
}

impl From<&str> for EncodedValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for EncodedValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Option<String>> for EncodedValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Single)
    }
}

impl From<Vec<String>> for EncodedValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values.into_iter().map(Some).collect())
    }
}
