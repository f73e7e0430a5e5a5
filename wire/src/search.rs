//! Default search-string parsing and serialization.

use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serialize::EncodedValue;

/// Encoded parameters keyed by URL key, in sorted key order.
pub type EncodedQuery = BTreeMap<String, EncodedValue>;

/// Characters left unescaped by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Escapes one key or value for a query string.
#[must_use]
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Unescapes one key or value. `+` is a space; invalid UTF-8 is replaced.
#[must_use]
pub fn decode_component(text: &str) -> String {
    let spaced = text.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Parses a search string into an [`EncodedQuery`].
///
/// The leading `?` is optional. A bare `key` is null, `key=` is the empty
/// string and a repeated key collects every occurrence in order.
#[must_use]
pub fn search_string_to_object(search: &str) -> EncodedQuery {
    let search = search.strip_prefix('?').unwrap_or(search);
    let mut query = EncodedQuery::new();
    for segment in search.split('&').filter(|segment| !segment.is_empty()) {
        let (key, value) = match segment.split_once('=') {
            Some((key, value)) => (decode_component(key), Some(decode_component(value))),
            None => (decode_component(segment), None),
        };
        let slot = query.entry(key).or_default();
        *slot = append(std::mem::take(slot), value);
    }
    query
}

fn append(existing: EncodedValue, value: Option<String>) -> EncodedValue {
    match existing {
        EncodedValue::Undefined => EncodedValue::from(value),
        EncodedValue::Null => EncodedValue::Multi(vec![None, value]),
        EncodedValue::Single(first) => EncodedValue::Multi(vec![Some(first), value]),
        EncodedValue::Multi(mut values) => {
            values.push(value);
            EncodedValue::Multi(values)
        }
    }
}

/// Serializes an [`EncodedQuery`] without a leading `?`.
///
/// Undefined values are dropped, null values become a bare key and
/// repeated values repeat the key.
#[must_use]
pub fn object_to_search_string(query: &EncodedQuery) -> String {
    let mut parts = Vec::new();
    for (key, value) in query {
        let key = encode_component(key);
        match value {
            EncodedValue::Undefined => {}
            EncodedValue::Null => parts.push(key),
            EncodedValue::Single(value) => parts.push(pair(&key, value)),
            EncodedValue::Multi(values) => {
                parts.extend(values.iter().map(|value| match value {
                    Some(value) => pair(&key, value),
                    None => key.clone(),
                }));
            }
        }
    }
    parts.join("&")
}

fn pair(key: &str, value: &str) -> String {
    format!("{key}={}", encode_component(value))
}
