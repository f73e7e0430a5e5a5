//! The codec contract and the scalar codecs.

use std::fmt;
use std::rc::Rc;

use chrono::{Local, TimeZone, Utc};

use crate::encoded::EncodedValue;
use crate::primitives::{
    format_date, format_date_time, format_number, parse_date, parse_date_time, parse_number,
};
use crate::Value;

/// A codec shared between parameter configs. Identity of the `Rc` is the
/// codec's identity for decode caching.
pub type SharedCodec = Rc<dyn ParamCodec>;

/// Structural equality override between two decoded values.
pub type EqualsFn = fn(&Value, &Value) -> bool;

/// Encode/decode pair for one value shape.
///
/// `None` stands for "absent": `encode(None)` must return
/// [`EncodedValue::Undefined`], `encode(Some(&Value::Null))` must return
/// [`EncodedValue::Null`], and `decode` must map undefined and null inputs
/// back the same way.
pub trait ParamCodec: fmt::Debug {
    /// Encodes a decoded value into its URL representation.
    fn encode(&self, value: Option<&Value>) -> EncodedValue;

    /// Decodes a URL representation.
    fn decode(&self, input: &EncodedValue) -> Option<Value>;

    /// Equality used to keep a previously decoded value when a fresh decode
    /// is equal to it.
    fn equality(&self) -> Option<EqualsFn> {
        None
    }

    /// Value substituted when a decode yields nothing.
    fn default_value(&self) -> Option<&Value> {
        None
    }
}

/// Returns `true` when both handles point at the same codec instance.
#[must_use]
pub fn same_codec(a: &SharedCodec, b: &SharedCodec) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

/// Applies the nullity contract around an encoder for present values.
pub fn encode_present(
    value: Option<&Value>,
    f: impl FnOnce(&Value) -> EncodedValue,
) -> EncodedValue {
    match value {
        None => EncodedValue::Undefined,
        Some(Value::Null) => EncodedValue::Null,
        Some(value) => f(value),
    }
}

/// Plain string values. An empty string decodes to `""`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParam;

impl ParamCodec for StringParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| EncodedValue::Single(v.to_query_string()))
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        decode_string(input)
    }
}

pub(crate) fn decode_string(input: &EncodedValue) -> Option<Value> {
    input
        .scalar(true)
        .decode_with(|s| Some(Value::String(s.to_string())))
}

/// Numbers. Non-numeric text decodes to `NaN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberParam;

impl ParamCodec for NumberParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| EncodedValue::Single(number_text(v)))
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        input
            .scalar(false)
            .decode_with(|s| Some(Value::Number(parse_number(s))))
    }
}

pub(crate) fn number_text(value: &Value) -> String {
    match value {
        Value::Number(n) => format_number(*n),
        other => other.to_query_string(),
    }
}

/// Booleans as `1` / `0`. Anything else decodes to null.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanParam;

impl ParamCodec for BooleanParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| match v {
            Value::Bool(true) => EncodedValue::single("1"),
            Value::Bool(false) => EncodedValue::single("0"),
            other => EncodedValue::Single(other.to_query_string()),
        })
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        input.scalar(false).decode_with(|s| match s {
            "1" => Some(Value::Bool(true)),
            "0" => Some(Value::Bool(false)),
            _ => Some(Value::Null),
        })
    }
}

/// Calendar dates as `YYYY-MM-DD`, decoded to local midnight.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateParam;

impl ParamCodec for DateParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| match v {
            Value::Date(dt) => EncodedValue::Single(format_date(dt.date())),
            Value::DateTime(dt) => {
                EncodedValue::Single(format_date(dt.with_timezone(&Local).date_naive()))
            }
            other => EncodedValue::Single(other.to_query_string()),
        })
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        input.scalar(false).decode_with(|s| {
            Some(
                parse_date(s)
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map_or(Value::Null, Value::Date),
            )
        })
    }

    fn equality(&self) -> Option<EqualsFn> {
        Some(same_calendar_day)
    }
}

fn same_calendar_day(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Date(a), Value::Date(b)) => a.date() == b.date(),
        _ => a == b,
    }
}

/// Instants as ISO-8601 UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeParam;

impl ParamCodec for DateTimeParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| match v {
            Value::DateTime(dt) => EncodedValue::Single(format_date_time(dt)),
            Value::Date(naive) => match Local.from_local_datetime(naive).earliest() {
                Some(local) => EncodedValue::Single(format_date_time(&local.with_timezone(&Utc))),
                None => EncodedValue::Single(v.to_query_string()),
            },
            other => EncodedValue::Single(other.to_query_string()),
        })
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        input
            .scalar(false)
            .decode_with(|s| Some(parse_date_time(s).map_or(Value::Null, Value::DateTime)))
    }

    fn equality(&self) -> Option<EqualsFn> {
        Some(same_instant)
    }
}

fn same_instant(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::DateTime(a), Value::DateTime(b)) => a.timestamp_millis() == b.timestamp_millis(),
        _ => a == b,
    }
}

/// Arbitrary JSON. Unparseable text decodes to null.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParam;

impl ParamCodec for JsonParam {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        encode_present(value, |v| match v {
            Value::Json(json) => EncodedValue::Single(json.to_string()),
            other => EncodedValue::Single(other.to_json().to_string()),
        })
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        input.scalar(true).decode_with(|s| {
            Some(
                serde_json::from_str::<serde_json::Value>(s)
                    .map_or(Value::Null, Value::Json),
            )
        })
    }
}

/// Creates a shared string codec.
#[must_use]
pub fn string() -> SharedCodec {
    Rc::new(StringParam)
}

/// Creates a shared number codec.
#[must_use]
pub fn number() -> SharedCodec {
    Rc::new(NumberParam)
}

/// Creates a shared boolean codec.
#[must_use]
pub fn boolean() -> SharedCodec {
    Rc::new(BooleanParam)
}

/// Creates a shared date codec.
#[must_use]
pub fn date() -> SharedCodec {
    Rc::new(DateParam)
}

/// Creates a shared date-time codec.
#[must_use]
pub fn date_time() -> SharedCodec {
    Rc::new(DateTimeParam)
}

/// Creates a shared JSON codec.
#[must_use]
pub fn json() -> SharedCodec {
    Rc::new(JsonParam)
}
