//! Whole-query encode and decode.

use std::collections::BTreeMap;

use serialize::{EncodedValue, Value};
use wire::EncodedQuery;

use crate::config::ParamConfigMap;

/// Decoded values keyed by logical parameter name. `None` is absent.
pub type DecodedQuery = BTreeMap<String, Option<Value>>;

/// Decodes every configured parameter from `encoded`.
///
/// Each parameter is read from its URL key; a missing key decodes from
/// [`EncodedValue::Undefined`]. Keys no parameter claims are passed through
/// as raw strings.
#[must_use]
pub fn decode_query_params(map: &ParamConfigMap, encoded: &EncodedQuery) -> DecodedQuery {
    let mut decoded = DecodedQuery::new();
    for (name, config) in map {
        let input = encoded
            .get(config.url_key(name))
            .unwrap_or(&EncodedValue::Undefined);
        decoded.insert(name.clone(), config.codec().decode(input));
    }
    for (url_key, value) in encoded {
        if map.name_for_url_key(url_key).is_some() {
            continue;
        }
        if cfg!(debug_assertions) {
            tracing::warn!(
                param = %url_key,
                "passing through query param that has no config"
            );
        }
        decoded
            .entry(url_key.clone())
            .or_insert_with(|| value.to_raw_value());
    }
    decoded
}

/// Encodes the entries of `decoded`, keyed by logical name.
///
/// Only keys present in `decoded` produce output. Unconfigured values are
/// stringified generically; nullish values keep their nullity.
#[must_use]
pub fn encode_query_params(map: &ParamConfigMap, decoded: &DecodedQuery) -> EncodedQuery {
    decoded
        .iter()
        .map(|(name, value)| {
            let encoded = match map.get(name) {
                Some(config) => config.codec().encode(value.as_ref()),
                None => match value {
                    None => EncodedValue::Undefined,
                    Some(Value::Null) => EncodedValue::Null,
                    Some(value) => EncodedValue::Single(value.to_query_string()),
                },
            };
            (name.clone(), encoded)
        })
        .collect()
}

/// Renames logical keys to their configured URL keys.
#[must_use]
pub fn apply_url_names(map: &ParamConfigMap, encoded: EncodedQuery) -> EncodedQuery {
    encoded
        .into_iter()
        .map(|(name, value)| match map.get(&name) {
            Some(config) => (config.url_key(&name).to_string(), value),
            None => (name, value),
        })
        .collect()
}
