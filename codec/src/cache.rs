//! Decoded-value cache keyed by parameter name.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serialize::{same_codec, EncodedValue, SharedCodec, Value};

/// The last decode of one parameter.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub encoded: EncodedValue,
    pub decoded: Rc<Value>,
    pub codec: SharedCodec,
}

/// Remembers the last encoded input and decoded output per parameter.
///
/// Repeated decodes of an unchanged input hand out the same `Rc`. Entries
/// live while at least one binding has the parameter registered.
///
/// All methods take `&self`; no internal borrow outlives a call.
#[derive(Debug, Default)]
pub struct DecodedParamCache {
    entries: RefCell<HashMap<String, CacheEntry>>,
    registered: RefCell<HashMap<String, usize>>,
}

impl DecodedParamCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the entry for `name` was decoded from `encoded`
    /// (and, when `codec` is given, by that same codec instance).
    #[must_use]
    pub fn has(&self, name: &str, encoded: &EncodedValue, codec: Option<&SharedCodec>) -> bool {
        self.entries.borrow().get(name).is_some_and(|entry| {
            entry.encoded == *encoded && codec.map_or(true, |codec| same_codec(&entry.codec, codec))
        })
    }

    /// Returns the cached decode for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Rc<Value>> {
        self.entries
            .borrow()
            .get(name)
            .map(|entry| Rc::clone(&entry.decoded))
    }

    /// Records a decode, replacing any previous entry for `name`.
    pub fn set(&self, name: &str, encoded: EncodedValue, decoded: Rc<Value>, codec: SharedCodec) {
        self.entries.borrow_mut().insert(
            name.to_string(),
            CacheEntry {
                encoded,
                decoded,
                codec,
            },
        );
    }

    /// Adds one consumer for each name.
    pub fn register_params<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registered = self.registered.borrow_mut();
        for name in names {
            *registered.entry(name.as_ref().to_string()).or_insert(0) += 1;
        }
    }

    /// Removes one consumer for each name, evicting entries nobody uses.
    pub fn unregister_params<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registered = self.registered.borrow_mut();
        let mut entries = self.entries.borrow_mut();
        for name in names {
            let name = name.as_ref();
            let Some(count) = registered.get_mut(name) else {
                continue;
            };
            *count = count.saturating_sub(1);
            if *count == 0 {
                registered.remove(name);
                entries.remove(name);
            }
        }
    }

    /// Number of consumers registered for `name`.
    #[must_use]
    pub fn registered_count(&self, name: &str) -> usize {
        self.registered.borrow().get(name).copied().unwrap_or(0)
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drops every entry and registration.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
        self.registered.borrow_mut().clear();
    }
}
