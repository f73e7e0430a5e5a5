//! Decoded application values.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::primitives::{format_date, format_date_time, format_number};

/// A decoded query parameter value.
///
/// "Absent" (the parameter should be cleared) is modelled as `Option::None`
/// around a `Value`; `Value::Null` is an explicit null that survives all the
/// way to the URL as a bare key.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null.
    Null,
    /// Text.
    String(String),
    /// Number; malformed numeric input decodes to `NaN`.
    Number(f64),
    /// Boolean.
    Bool(bool),
    /// Local calendar date-time (wall clock, no zone).
    Date(NaiveDateTime),
    /// Instant in UTC.
    DateTime(DateTime<Utc>),
    /// Ordered list; entries may be `Null`.
    Array(Vec<Value>),
    /// Flat key/value object; values are strings, numbers or `Null`.
    Object(BTreeMap<String, Value>),
    /// Arbitrary JSON document.
    Json(serde_json::Value),
}

impl Value {
    /// Creates a local date value at midnight.
    #[must_use]
    pub fn date(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Self::Date)
    }

    /// Creates an array of strings.
    #[must_use]
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Array(items.into_iter().map(|s| Self::String(s.into())).collect())
    }

    /// Returns `true` for `Value::Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice for `Value::String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number for `Value::Number`.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean for `Value::Bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the items for `Value::Array`.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries for `Value::Object`.
    #[must_use]
    pub const fn as_object(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Json(_) => "json",
        }
    }

    /// Generic stringification used for unconfigured parameters and for
    /// values handed to a codec of a different shape.
    ///
    /// Arrays join their entries with `,` (nulls become empty), objects are
    /// rendered as JSON.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::String(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
            Self::Date(dt) => format_date(dt.date()),
            Self::DateTime(dt) => format_date_time(dt),
            Self::Array(items) => items
                .iter()
                .map(|item| match item {
                    Self::Null => String::new(),
                    other => other.to_query_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Self::Object(_) => self.to_json().to_string(),
            Self::Json(serde_json::Value::String(s)) => s.clone(),
            Self::Json(json) => json.to_string(),
        }
    }

    /// Converts into a JSON document. Dates become ISO strings and
    /// non-finite numbers become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Date(dt) => serde_json::Value::String(format_date(dt.date())),
            Self::DateTime(dt) => serde_json::Value::String(format_date_time(dt)),
            Self::Array(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Self::Json(json) => json.clone(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value)
    }
}

impl From<BTreeMap<String, Self>> for Value {
    fn from(value: BTreeMap<String, Self>) -> Self {
        Self::Object(value)
    }
}
