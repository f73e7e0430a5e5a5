//! Codecs restricted to a fixed set of string values.
//!
//! A decode that finds anything outside the set yields `None` so the caller
//! falls back to its default.

use std::rc::Rc;

use crate::collections::{decode_delimited_strings, decode_string_entries, ArrayParam};
use crate::encoded::EncodedValue;
use crate::params::{decode_string, encode_present, ParamCodec, SharedCodec};
use crate::Value;

fn collect_values<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

fn member(values: &[String], item: &Value) -> bool {
    item.as_str()
        .is_some_and(|s| values.iter().any(|allowed| allowed == s))
}

fn all_members(values: &[String], decoded: Option<Value>) -> Option<Value> {
    match decoded {
        Some(Value::Array(items)) if items.iter().all(|item| member(values, item)) => {
            Some(Value::Array(items))
        }
        Some(Value::Null) => Some(Value::Null),
        _ => None,
    }
}

/// A single string from a fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumParam {
    pub values: Vec<String>,
}

impl EnumParam {
    /// Creates the codec accepting exactly `values`.
    #[must_use]
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: collect_values(values),
        }
    }
}

impl ParamCodec for EnumParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| EncodedValue::Single(v.to_query_string()))
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        match decode_string(input)? {
            Value::Null => Some(Value::Null),
            value if member(&self.values, &value) => Some(value),
            _ => None,
        }
    }
}

/// Repeated-key strings, each from a fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumArrayParam {
    pub values: Vec<String>,
}

impl EnumArrayParam {
    #[must_use]
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: collect_values(values),
        }
    }
}

impl ParamCodec for EnumArrayParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        ArrayParam.encode(value)
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        all_members(&self.values, decode_string_entries(input))
    }
}

/// Delimited strings, each from a fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDelimitedArrayParam {
    pub values: Vec<String>,
    pub separator: String,
}

impl EnumDelimitedArrayParam {
    /// Creates the codec with the default `_` separator.
    #[must_use]
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: collect_values(values),
            separator: crate::collections::DEFAULT_ENTRY_SEPARATOR.to_string(),
        }
    }

    /// Replaces the entry separator.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl ParamCodec for EnumDelimitedArrayParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| match v {
            Value::Array(items) => EncodedValue::Single(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Null => String::new(),
                        other => other.to_query_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(&self.separator),
            ),
            other => EncodedValue::Single(other.to_query_string()),
        })
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        all_members(
            &self.values,
            decode_delimited_strings(input, &self.separator),
        )
    }
}

/// Creates a shared enum codec.
#[must_use]
pub fn enumeration<I, S>(values: I) -> SharedCodec
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Rc::new(EnumParam::new(values))
}

/// Creates a shared repeated-key enum array codec.
#[must_use]
pub fn enum_array<I, S>(values: I) -> SharedCodec
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Rc::new(EnumArrayParam::new(values))
}

/// Creates a shared delimited enum array codec.
#[must_use]
pub fn enum_delimited_array<I, S>(values: I, separator: &str) -> SharedCodec
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Rc::new(EnumDelimitedArrayParam::new(values).separator(separator))
}
