//! Cache-backed decoding of the latest parameter values.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use schema::ParamConfigMap;
use serialize::Value;
use wire::EncodedQuery;

use crate::cache::DecodedParamCache;

/// Latest decoded values keyed by logical name. `None` is absent.
pub type LatestValues = BTreeMap<String, Option<Rc<Value>>>;

/// Decodes every parameter in `map` from `parsed`, reusing cached decodes.
///
/// A decode that produces nothing falls back to the codec's default. When a
/// codec with an equality override re-decodes an input that another codec
/// instance decoded before, the earlier `Rc` is kept if the values are equal.
/// Absent results are never cached.
pub fn get_latest_decoded_values(
    parsed: &EncodedQuery,
    map: &ParamConfigMap,
    cache: &DecodedParamCache,
) -> LatestValues {
    let mut values = LatestValues::new();
    for (name, config) in map {
        let encoded = parsed
            .get(config.url_key(name))
            .cloned()
            .unwrap_or_default();
        let codec = config.codec();

        let decoded = if cache.has(name, &encoded, Some(codec)) {
            cache.get(name)
        } else {
            let fresh = codec
                .decode(&encoded)
                .or_else(|| codec.default_value().cloned());
            fresh.map(|fresh| {
                let previous = match codec.equality() {
                    Some(equals) if cache.has(name, &encoded, None) => cache
                        .get(name)
                        .filter(|previous| equals(previous, &fresh)),
                    _ => None,
                };
                let decoded = previous.unwrap_or_else(|| Rc::new(fresh));
                cache.set(name, encoded, Rc::clone(&decoded), Rc::clone(codec));
                decoded
            })
        };
        values.insert(name.clone(), decoded);
    }
    values
}

/// Display policy for null and empty-string decodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValuePolicy {
    pub keep_null: bool,
    pub keep_empty_string: bool,
}

impl ValuePolicy {
    #[must_use]
    pub const fn new(keep_null: bool, keep_empty_string: bool) -> Self {
        Self {
            keep_null,
            keep_empty_string,
        }
    }

    /// Turns null and `""` into absent unless kept.
    #[must_use]
    pub fn apply(self, value: Option<Rc<Value>>) -> Option<Rc<Value>> {
        match value.as_deref() {
            Some(Value::Null) if !self.keep_null => None,
            Some(Value::String(s)) if s.is_empty() && !self.keep_empty_string => None,
            _ => value,
        }
    }

    #[must_use]
    pub fn apply_all(self, values: LatestValues) -> LatestValues {
        values
            .into_iter()
            .map(|(name, value)| (name, self.apply(value)))
            .collect()
    }
}

fn same_entry(a: Option<&Rc<Value>>, b: Option<&Rc<Value>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b) || a == b,
        _ => false,
    }
}

fn shallow_equal(a: &LatestValues, b: &LatestValues) -> bool {
    a.len() == b.len()
        && a.iter().all(|(name, value)| {
            b.get(name)
                .is_some_and(|other| same_entry(value.as_ref(), other.as_ref()))
        })
}

/// Hands out the previous values map while nothing in it changed.
#[derive(Debug, Default)]
pub struct StableDecoder {
    last: RefCell<Option<Rc<LatestValues>>>,
}

impl StableDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous map if `fresh` matches it entry by entry,
    /// otherwise remembers and returns `fresh`.
    pub fn stabilize(&self, fresh: LatestValues) -> Rc<LatestValues> {
        if let Some(previous) = self.last.borrow().as_ref() {
            if shallow_equal(previous, &fresh) {
                return Rc::clone(previous);
            }
        }
        let fresh = Rc::new(fresh);
        *self.last.borrow_mut() = Some(Rc::clone(&fresh));
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::ParamConfig;
    use serialize::{date, number, string};
    use wire::search_string_to_object;

    fn map() -> ParamConfigMap {
        ParamConfigMap::builder()
            .param("n", number())
            .param("s", ParamConfig::new(string()).url_name("str"))
            .build()
            .unwrap()
    }

    #[test]
    fn decodes_from_url_keys() {
        let cache = DecodedParamCache::new();
        let values =
            get_latest_decoded_values(&search_string_to_object("?n=2&str=x"), &map(), &cache);
        assert_eq!(values["n"].as_deref(), Some(&Value::from(2)));
        assert_eq!(values["s"].as_deref(), Some(&Value::from("x")));
    }

    #[test]
    fn unchanged_input_keeps_rc() {
        let cache = DecodedParamCache::new();
        let map = map();
        let first = get_latest_decoded_values(&search_string_to_object("?n=2&str=x"), &map, &cache);
        let second =
            get_latest_decoded_values(&search_string_to_object("?n=3&str=x"), &map, &cache);
        assert!(Rc::ptr_eq(
            first["s"].as_ref().unwrap(),
            second["s"].as_ref().unwrap()
        ));
        assert!(!Rc::ptr_eq(
            first["n"].as_ref().unwrap(),
            second["n"].as_ref().unwrap()
        ));
    }

    #[test]
    fn absent_is_not_cached() {
        let cache = DecodedParamCache::new();
        let values = get_latest_decoded_values(&EncodedQuery::new(), &map(), &cache);
        assert_eq!(values["n"], None);
        assert!(cache.is_empty());
    }

    #[test]
    fn default_is_cached_and_stable() {
        let cache = DecodedParamCache::new();
        let map = ParamConfigMap::builder()
            .param("p", ParamConfig::new(number()).with_default(1))
            .build()
            .unwrap();
        let a = get_latest_decoded_values(&EncodedQuery::new(), &map, &cache);
        let b = get_latest_decoded_values(&EncodedQuery::new(), &map, &cache);
        assert_eq!(a["p"].as_deref(), Some(&Value::from(1)));
        assert!(Rc::ptr_eq(a["p"].as_ref().unwrap(), b["p"].as_ref().unwrap()));
    }

    #[test]
    fn equality_override_survives_codec_churn() {
        let cache = DecodedParamCache::new();
        let parsed = search_string_to_object("?d=2020-05-05");
        let first_map = ParamConfigMap::builder().param("d", date()).build().unwrap();
        let second_map = ParamConfigMap::builder().param("d", date()).build().unwrap();
        let a = get_latest_decoded_values(&parsed, &first_map, &cache);
        let b = get_latest_decoded_values(&parsed, &second_map, &cache);
        assert!(Rc::ptr_eq(a["d"].as_ref().unwrap(), b["d"].as_ref().unwrap()));
    }

    #[test]
    fn codec_churn_without_equality_decodes_fresh() {
        let cache = DecodedParamCache::new();
        let parsed = search_string_to_object("?n=1");
        let first_map = ParamConfigMap::builder().param("n", number()).build().unwrap();
        let second_map = ParamConfigMap::builder().param("n", number()).build().unwrap();
        let a = get_latest_decoded_values(&parsed, &first_map, &cache);
        let b = get_latest_decoded_values(&parsed, &second_map, &cache);
        assert!(!Rc::ptr_eq(a["n"].as_ref().unwrap(), b["n"].as_ref().unwrap()));
        assert_eq!(a, b);
    }

    #[test]
    fn policy_drops_null_and_empty() {
        let policy = ValuePolicy::default();
        assert_eq!(policy.apply(Some(Rc::new(Value::Null))), None);
        assert_eq!(policy.apply(Some(Rc::new(Value::from("")))), None);
        assert!(policy.apply(Some(Rc::new(Value::from("a")))).is_some());

        let keeping = ValuePolicy::new(true, true);
        assert!(keeping.apply(Some(Rc::new(Value::Null))).is_some());
        assert!(keeping.apply(Some(Rc::new(Value::from("")))).is_some());
    }

    #[test]
    fn stable_decoder_reuses_map() {
        let stable = StableDecoder::new();
        let shared = Rc::new(Value::from(1));
        let mut fresh = LatestValues::new();
        fresh.insert("a".into(), Some(Rc::clone(&shared)));
        fresh.insert("b".into(), None);
        let first = stable.stabilize(fresh.clone());
        let second = stable.stabilize(fresh);
        assert!(Rc::ptr_eq(&first, &second));

        let mut changed = LatestValues::new();
        changed.insert("a".into(), Some(Rc::new(Value::from(2))));
        changed.insert("b".into(), None);
        let third = stable.stabilize(changed);
        assert!(!Rc::ptr_eq(&second, &third));
    }

    #[test]
    fn stable_decoder_detects_key_changes() {
        let stable = StableDecoder::new();
        let mut one = LatestValues::new();
        one.insert("a".into(), None);
        let first = stable.stabilize(one);
        let mut two = LatestValues::new();
        two.insert("b".into(), None);
        let second = stable.stabilize(two);
        assert!(!Rc::ptr_eq(&first, &second));
        assert!(second.contains_key("b"));
    }
}
