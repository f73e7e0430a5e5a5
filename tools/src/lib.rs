//! Inspection and debugging tools for qsync query strings.
//!
//! This crate backs the `qsync-tools` binary:
//!
//! - Parse a search string and show its encoded entries
//! - Decode a search string against a JSON schema file
//! - Compute the search string an update would navigate to
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Same code paths** - Every command goes through the library functions
//!   the bindings use.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use codec::{
    get_latest_decoded_values, updated_search_string, ChangeSet, DecodedParamCache,
    PendingUpdate, ReconcileContext, UpdateType, ValuePolicy,
};
use schema::{DecodedQuery, ParamConfigMap, SchemaDef};
use serde::Serialize;
use serialize::{string, EncodedValue};
use wire::{search_string_to_object, url_search_format, ParseCache};

/// Loads a config map from a [`SchemaDef`] JSON document.
pub fn parse_schema(json: &str) -> Result<ParamConfigMap> {
    let def: SchemaDef = serde_json::from_str(json).context("parse schema json")?;
    def.to_config_map()
        .map_err(|err| anyhow::anyhow!("schema validation failed: {err}"))
}

/// Encoded entries of a search string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub search: String,
    pub keys: usize,
    /// Each key's value: a string, `null` for a bare key, or an array for a
    /// repeated key.
    pub params: BTreeMap<String, serde_json::Value>,
}

fn encoded_to_json(value: &EncodedValue) -> serde_json::Value {
    match value {
        EncodedValue::Undefined | EncodedValue::Null => serde_json::Value::Null,
        EncodedValue::Single(s) => serde_json::Value::String(s.clone()),
        EncodedValue::Multi(values) => values
            .iter()
            .map(|value| {
                value
                    .clone()
                    .map_or(serde_json::Value::Null, serde_json::Value::String)
            })
            .collect(),
    }
}

#[must_use]
pub fn inspect_search(search: &str) -> InspectReport {
    let parsed = search_string_to_object(search);
    InspectReport {
        search: search.to_string(),
        keys: parsed.len(),
        params: parsed
            .iter()
            .map(|(key, value)| (key.clone(), encoded_to_json(value)))
            .collect(),
    }
}

/// Decodes every schema param from `search`.
///
/// Absent params are left out; null decodes appear only when the policy
/// keeps them.
#[must_use]
pub fn decode_search(
    map: &ParamConfigMap,
    search: &str,
    policy: ValuePolicy,
) -> BTreeMap<String, serde_json::Value> {
    let cache = DecodedParamCache::new();
    let parsed = search_string_to_object(search);
    let latest = policy.apply_all(get_latest_decoded_values(&parsed, map, &cache));
    latest
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value.to_json())))
        .collect()
}

/// Splits `name=raw`.
pub fn parse_assignment(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some(("", _)) => Err(format!("missing parameter name in {text:?}")),
        Some((name, raw)) => Ok((name.to_string(), raw.to_string())),
        None => Err(format!("expected name=value, got {text:?}")),
    }
}

/// An update described from the command line.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub current: String,
    /// Raw encoded values, decoded through each param's codec.
    pub set: Vec<(String, String)>,
    pub unset: Vec<String>,
    pub update_type: UpdateType,
    pub remove_defaults: bool,
}

impl UpdateRequest {
    fn changes(&self, map: &ParamConfigMap) -> DecodedQuery {
        let fallback = string();
        let mut changes = DecodedQuery::new();
        for (name, raw) in &self.set {
            let codec = map.get(name).map_or(&fallback, |config| config.codec());
            changes.insert(name.clone(), codec.decode(&EncodedValue::single(raw.as_str())));
        }
        for name in &self.unset {
            changes.insert(name.clone(), None);
        }
        changes
    }
}

/// Returns the search string `request` would navigate to.
#[must_use]
pub fn update_search(map: &ParamConfigMap, request: &UpdateRequest) -> String {
    let changes = request.changes(map);
    tracing::debug!(changes = changes.len(), update_type = %request.update_type, "applying update");
    let cache = DecodedParamCache::new();
    let parse_cache = ParseCache::new();
    let update = PendingUpdate {
        changes: ChangeSet::Values(changes),
        params: map.clone(),
        inherited: ParamConfigMap::new(),
        search_format: url_search_format(),
        update_type: request.update_type,
        remove_defaults_from_url: request.remove_defaults,
        skip_update_when_no_change: true,
        current_search: request.current.clone(),
    };
    updated_search_string(
        update,
        &request.current,
        ReconcileContext {
            cache: &cache,
            parse_cache: &parse_cache,
        },
    )
}

/// Renders values as `name = json` lines.
#[must_use]
pub fn format_values_pretty(values: &BTreeMap<String, serde_json::Value>) -> String {
    let width = values.keys().map(String::len).max().unwrap_or(0);
    values
        .iter()
        .map(|(name, value)| format!("{name:<width$} = {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
