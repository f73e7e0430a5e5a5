//! Array and flat-object codecs.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::encoded::EncodedValue;
use crate::params::{encode_present, number_text, ParamCodec, SharedCodec};
use crate::primitives::{parse_number, split_delimited, split_entry};
use crate::Value;

/// Default separator between delimited array entries and object entries.
pub const DEFAULT_ENTRY_SEPARATOR: &str = "_";

/// Default separator between an object key and its value.
pub const DEFAULT_KEY_VALUE_SEPARATOR: &str = "-";

fn item_text(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        other => Some(other.to_query_string()),
    }
}

fn number_item_text(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        other => Some(number_text(other)),
    }
}

fn numeric_entry(entry: Option<&str>) -> Value {
    match entry {
        None | Some("") => Value::Null,
        Some(text) => Value::Number(parse_number(text)),
    }
}

fn join_items(items: &[Value], separator: &str, text: fn(&Value) -> Option<String>) -> String {
    items
        .iter()
        .map(|item| text(item).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Strings in repeated keys (`?tag=a&tag=b`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayParam;

impl ParamCodec for ArrayParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| match v {
            Value::Array(items) => EncodedValue::Multi(items.iter().map(item_text).collect()),
            other => EncodedValue::Single(other.to_query_string()),
        })
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        decode_string_entries(input)
    }
}

pub(crate) fn decode_string_entries(input: &EncodedValue) -> Option<Value> {
    input.entries().decode_with(|entries| {
        Some(Value::Array(
            entries
                .into_iter()
                .map(|entry| entry.map_or(Value::Null, Value::from))
                .collect(),
        ))
    })
}

/// Numbers in repeated keys. Blank entries decode to null.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericArrayParam;

impl ParamCodec for NumericArrayParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| match v {
            Value::Array(items) => {
                EncodedValue::Multi(items.iter().map(number_item_text).collect())
            }
            other => EncodedValue::Single(number_text(other)),
        })
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        input.entries().decode_with(|entries| {
            Some(Value::Array(entries.into_iter().map(numeric_entry).collect()))
        })
    }
}

/// Strings packed into one value with a separator (`?tag=a_b`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedArrayParam {
    pub separator: String,
}

impl DelimitedArrayParam {
    /// Creates a delimited array codec with a custom separator.
    #[must_use]
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for DelimitedArrayParam {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRY_SEPARATOR)
    }
}

impl ParamCodec for DelimitedArrayParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| match v {
            Value::Array(items) => {
                EncodedValue::Single(join_items(items, &self.separator, item_text))
            }
            other => EncodedValue::Single(other.to_query_string()),
        })
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        decode_delimited_strings(input, &self.separator)
    }
}

pub(crate) fn decode_delimited_strings(input: &EncodedValue, separator: &str) -> Option<Value> {
    input.scalar(true).decode_with(|text| {
        Some(Value::Array(
            split_delimited(text, separator)
                .into_iter()
                .map(Value::from)
                .collect(),
        ))
    })
}

/// Numbers packed into one value with a separator. Empty segments decode to
/// null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedNumericArrayParam {
    pub separator: String,
}

impl DelimitedNumericArrayParam {
    /// Creates a delimited numeric array codec with a custom separator.
    #[must_use]
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for DelimitedNumericArrayParam {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRY_SEPARATOR)
    }
}

impl ParamCodec for DelimitedNumericArrayParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| match v {
            Value::Array(items) => {
                EncodedValue::Single(join_items(items, &self.separator, number_item_text))
            }
            other => EncodedValue::Single(number_text(other)),
        })
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        input.scalar(true).decode_with(|text| {
            Some(Value::Array(
                split_delimited(text, &self.separator)
                    .into_iter()
                    .map(|segment| numeric_entry(Some(segment)))
                    .collect(),
            ))
        })
    }
}

/// Separators used by the flat object codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSeparators {
    pub key_value: String,
    pub entry: String,
}

impl Default for ObjectSeparators {
    fn default() -> Self {
        Self {
            key_value: DEFAULT_KEY_VALUE_SEPARATOR.to_string(),
            entry: DEFAULT_ENTRY_SEPARATOR.to_string(),
        }
    }
}

impl ObjectSeparators {
    fn encode(&self, map: &BTreeMap<String, Value>, text: fn(&Value) -> Option<String>) -> String {
        map.iter()
            .map(|(key, value)| match text(value) {
                Some(value) => format!("{key}{}{value}", self.key_value),
                None => key.clone(),
            })
            .collect::<Vec<_>>()
            .join(&self.entry)
    }

    fn decode(&self, text: &str, value: fn(Option<&str>) -> Value) -> Value {
        let mut map = BTreeMap::new();
        for entry in split_delimited(text, &self.entry) {
            let (key, raw) = split_entry(entry, &self.key_value);
            map.insert(key.to_string(), value(raw));
        }
        Value::Object(map)
    }
}

/// Flat string-valued objects (`?filter=a-1_b-2`).
///
/// Values may contain the key/value separator; only the first occurrence
/// splits. An entry without a separator decodes to a null value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectParam {
    pub separators: ObjectSeparators,
}

impl ObjectParam {
    /// Creates an object codec with custom separators.
    #[must_use]
    pub fn new(key_value: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            separators: ObjectSeparators {
                key_value: key_value.into(),
                entry: entry.into(),
            },
        }
    }
}

impl ParamCodec for ObjectParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| match v {
            Value::Object(map) => EncodedValue::Single(self.separators.encode(map, item_text)),
            other => EncodedValue::Single(other.to_query_string()),
        })
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        input.scalar(true).decode_with(|text| {
            Some(
                self.separators
                    .decode(text, |raw| raw.map_or(Value::Null, Value::from)),
            )
        })
    }
}

/// Flat number-valued objects. Blank values decode to null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericObjectParam {
    pub separators: ObjectSeparators,
}

impl NumericObjectParam {
    /// Creates a numeric object codec with custom separators.
    #[must_use]
    pub fn new(key_value: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            separators: ObjectSeparators {
                key_value: key_value.into(),
                entry: entry.into(),
            },
        }
    }
}

impl ParamCodec for NumericObjectParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| match v {
            Value::Object(map) => {
                EncodedValue::Single(self.separators.encode(map, number_item_text))
            }
            other => EncodedValue::Single(other.to_query_string()),
        })
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        input
            .scalar(true)
            .decode_with(|text| Some(self.separators.decode(text, numeric_entry)))
    }
}

/// Creates a shared repeated-key string array codec.
#[must_use]
pub fn array() -> SharedCodec {
    Rc::new(ArrayParam)
}

/// Creates a shared repeated-key numeric array codec.
#[must_use]
pub fn numeric_array() -> SharedCodec {
    Rc::new(NumericArrayParam)
}

/// Creates a shared `_`-delimited string array codec.
#[must_use]
pub fn delimited_array() -> SharedCodec {
    Rc::new(DelimitedArrayParam::default())
}

/// Creates a shared `_`-delimited numeric array codec.
#[must_use]
pub fn delimited_numeric_array() -> SharedCodec {
    Rc::new(DelimitedNumericArrayParam::default())
}

/// Creates a shared flat object codec with the default separators.
#[must_use]
pub fn object() -> SharedCodec {
    Rc::new(ObjectParam::default())
}

/// Creates a shared flat numeric object codec with the default separators.
#[must_use]
pub fn numeric_object() -> SharedCodec {
    Rc::new(NumericObjectParam::default())
}
