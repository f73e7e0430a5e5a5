//! Merging decoded changes into a search string.

use std::fmt;

use schema::{
    apply_url_names, encode_query_params, extend_for_keys, DecodedQuery, ParamConfigMap,
};
use serialize::{string, EncodedValue};
use wire::{EncodedQuery, ParseCache, SharedSearchFormat};

use crate::cache::DecodedParamCache;
use crate::latest::{get_latest_decoded_values, LatestValues};
use crate::types::UpdateType;

/// Changes to apply, either as values or computed from the latest values.
pub enum ChangeSet {
    Values(DecodedQuery),
    Function(Box<dyn FnOnce(&LatestValues) -> DecodedQuery>),
}

impl ChangeSet {
    /// Wraps a function of the latest decoded values.
    pub fn from_fn(f: impl FnOnce(&LatestValues) -> DecodedQuery + 'static) -> Self {
        Self::Function(Box::new(f))
    }
}

impl fmt::Debug for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Values(values) => f.debug_tuple("Values").field(values).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<DecodedQuery> for ChangeSet {
    fn from(values: DecodedQuery) -> Self {
        Self::Values(values)
    }
}

/// One setter call, captured with everything needed to apply it later.
#[derive(Debug)]
pub struct PendingUpdate {
    pub changes: ChangeSet,
    /// Params of the binding that issued the update.
    pub params: ParamConfigMap,
    /// Params available to keys the binding does not configure.
    pub inherited: ParamConfigMap,
    pub search_format: SharedSearchFormat,
    pub update_type: UpdateType,
    pub remove_defaults_from_url: bool,
    pub skip_update_when_no_change: bool,
    /// Search string when the update was issued.
    pub current_search: String,
}

/// Shared state the reconciliation reads and refreshes.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileContext<'a> {
    pub cache: &'a DecodedParamCache,
    pub parse_cache: &'a ParseCache,
}

/// Sets changed values that encode the same as their default to undefined.
fn remove_defaults(encoded: &mut EncodedQuery, map: &ParamConfigMap) {
    for (name, value) in encoded.iter_mut() {
        let Some(config) = map.get(name) else {
            continue;
        };
        let Some(default) = config.default() else {
            continue;
        };
        if config.codec().encode(Some(default)) == *value {
            *value = EncodedValue::Undefined;
        }
    }
}

/// Change keys that neither the binding nor the inherited params configure.
fn unconfigured_keys<'a>(
    changes: &'a DecodedQuery,
    params: &ParamConfigMap,
    inherited: &ParamConfigMap,
) -> Vec<&'a str> {
    changes
        .keys()
        .filter(|key| !params.contains(key) && !inherited.contains(key))
        .map(String::as_str)
        .collect()
}

/// Computes the search string that results from applying `update` to
/// `current_search`.
///
/// The result is empty or starts with `?`.
pub fn updated_search_string(
    update: PendingUpdate,
    current_search: &str,
    cx: ReconcileContext<'_>,
) -> String {
    let PendingUpdate {
        changes,
        params,
        inherited,
        search_format,
        update_type,
        remove_defaults_from_url,
        ..
    } = update;

    let parsed = cx.parse_cache.parse(current_search, &search_format);
    let changes = match changes {
        ChangeSet::Values(values) => values,
        ChangeSet::Function(f) => {
            let latest = get_latest_decoded_values(&parsed, &params, cx.cache);
            f(&latest)
        }
    };

    if cfg!(debug_assertions) {
        for key in unconfigured_keys(&changes, &params, &inherited) {
            tracing::warn!(
                param = %key,
                "updating query param that has no config, encoding as string"
            );
        }
    }
    let fallback = string();
    let map = extend_for_keys(&params, changes.keys(), &inherited, Some(&fallback));
    let mut encoded = encode_query_params(&map, &changes);
    if remove_defaults_from_url {
        remove_defaults(&mut encoded, &map);
    }
    let encoded = apply_url_names(&map, encoded);

    let query = if update_type.is_merge() {
        let mut merged = (*parsed).clone();
        merged.extend(encoded);
        merged
    } else {
        encoded
    };

    let search = search_format.stringify(&query);
    if search.is_empty() {
        search
    } else {
        format!("?{search}")
    }
}
