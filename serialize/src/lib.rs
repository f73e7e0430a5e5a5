//! Typed value codecs for URL query parameters.
//!
//! This crate converts application values ([`Value`]) to and from the string
//! forms that live in a query string ([`EncodedValue`]). Every codec
//! implements [`ParamCodec`] and is shared as a [`SharedCodec`].
//!
//! # Design Principles
//!
//! - **Total codecs** - Malformed input decodes to a sentinel (`NaN`, `Null`
//!   or nothing), never an error or a panic.
//! - **Nullity preserved** - Absent stays absent and null stays null through
//!   every codec.
//! - **No URL knowledge** - Percent-encoding and key framing belong to the
//!   `wire` crate.
//!
//! # Example
//!
//! ```
//! use serialize::{delimited_array, number, EncodedValue, Value};
//!
//! let n = number().decode(&EncodedValue::single("42"));
//! assert_eq!(n, Some(Value::Number(42.0)));
//!
//! let tags = delimited_array().decode(&EncodedValue::single("a__b"));
//! assert_eq!(tags, Some(Value::strings(["a", "", "b"])));
//! ```

mod collections;
mod default;
mod encoded;
mod enums;
mod params;
pub mod primitives;
mod value;

pub use collections::{
    array, delimited_array, delimited_numeric_array, numeric_array, numeric_object, object,
    ArrayParam, DelimitedArrayParam, DelimitedNumericArrayParam, NumericArrayParam,
    NumericObjectParam, ObjectParam, ObjectSeparators, DEFAULT_ENTRY_SEPARATOR,
    DEFAULT_KEY_VALUE_SEPARATOR,
};
pub use default::{with_default, with_default_keep_null, WithDefault};
pub use encoded::{EncodedValue, Raw};
pub use enums::{
    enum_array, enum_delimited_array, enumeration, EnumArrayParam, EnumDelimitedArrayParam,
    EnumParam,
};
pub use params::{
    boolean, date, date_time, encode_present, json, number, same_codec, string, BooleanParam,
    DateParam, DateTimeParam, EqualsFn, JsonParam, NumberParam, ParamCodec, SharedCodec,
    StringParam,
};
pub use value::Value;
