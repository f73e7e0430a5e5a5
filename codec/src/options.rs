//! Provider options and per-binding overrides.

use schema::{extend_for_keys, ParamConfigMap};
use wire::{url_search_format, SharedSearchFormat};

use crate::types::UpdateType;

/// Options shared by every binding of a provider.
#[derive(Debug, Clone)]
pub struct QueryParamOptions {
    /// Params usable by bindings that do not configure them.
    pub params: ParamConfigMap,
    /// Parse/stringify pair for search strings.
    pub search_format: SharedSearchFormat,
    /// Update type used when a setter does not pass one.
    pub update_type: UpdateType,
    /// Widen a binding with inherited params present in the URL.
    /// Unset means "on only for bindings without local config".
    pub include_known_params: Option<bool>,
    /// Widen a binding with every key in the URL.
    pub include_all_params: bool,
    /// Drop changed values that encode the same as their default.
    pub remove_defaults_from_url: bool,
    /// Coalesce updates issued before the next flush into one navigation.
    pub enable_batching: bool,
    /// Flush a batch as soon as it is queued instead of deferring it.
    pub immediate_flush: bool,
    /// Skip navigation when the search string would not change.
    pub skip_update_when_no_change: bool,
    /// Report null decodes instead of treating them as absent.
    pub keep_null: bool,
    /// Report empty-string decodes instead of treating them as absent.
    pub keep_empty_string: bool,
}

impl Default for QueryParamOptions {
    fn default() -> Self {
        Self {
            params: ParamConfigMap::new(),
            search_format: url_search_format(),
            update_type: UpdateType::PushIn,
            include_known_params: None,
            include_all_params: false,
            remove_defaults_from_url: false,
            enable_batching: false,
            immediate_flush: false,
            skip_update_when_no_change: true,
            keep_null: false,
            keep_empty_string: false,
        }
    }
}

impl QueryParamOptions {
    /// Applies `overrides` on top of these options.
    ///
    /// Override params are added to the inherited ones, winning on name
    /// clashes.
    #[must_use]
    pub fn merge(&self, overrides: &OptionsOverride) -> Self {
        let params = match &overrides.params {
            None => self.params.clone(),
            Some(local) => {
                let names: Vec<&str> = self.params.names().collect();
                extend_for_keys(local, names, &self.params, None).into_owned()
            }
        };
        Self {
            params,
            search_format: overrides
                .search_format
                .clone()
                .unwrap_or_else(|| self.search_format.clone()),
            update_type: overrides.update_type.unwrap_or(self.update_type),
            include_known_params: overrides
                .include_known_params
                .or(self.include_known_params),
            include_all_params: overrides
                .include_all_params
                .unwrap_or(self.include_all_params),
            remove_defaults_from_url: overrides
                .remove_defaults_from_url
                .unwrap_or(self.remove_defaults_from_url),
            enable_batching: overrides.enable_batching.unwrap_or(self.enable_batching),
            immediate_flush: overrides.immediate_flush.unwrap_or(self.immediate_flush),
            skip_update_when_no_change: overrides
                .skip_update_when_no_change
                .unwrap_or(self.skip_update_when_no_change),
            keep_null: overrides.keep_null.unwrap_or(self.keep_null),
            keep_empty_string: overrides
                .keep_empty_string
                .unwrap_or(self.keep_empty_string),
        }
    }
}

/// Per-binding option overrides. Unset fields inherit from the provider.
#[derive(Debug, Clone, Default)]
pub struct OptionsOverride {
    pub params: Option<ParamConfigMap>,
    pub search_format: Option<SharedSearchFormat>,
    pub update_type: Option<UpdateType>,
    pub include_known_params: Option<bool>,
    pub include_all_params: Option<bool>,
    pub remove_defaults_from_url: Option<bool>,
    pub enable_batching: Option<bool>,
    pub immediate_flush: Option<bool>,
    pub skip_update_when_no_change: Option<bool>,
    pub keep_null: Option<bool>,
    pub keep_empty_string: Option<bool>,
}

impl OptionsOverride {
    #[must_use]
    pub fn params(mut self, params: ParamConfigMap) -> Self {
        self.params = Some(params);
        self
    }

    #[must_use]
    pub fn search_format(mut self, format: SharedSearchFormat) -> Self {
        self.search_format = Some(format);
        self
    }

    #[must_use]
    pub const fn update_type(mut self, update_type: UpdateType) -> Self {
        self.update_type = Some(update_type);
        self
    }

    #[must_use]
    pub const fn include_known_params(mut self, enabled: bool) -> Self {
        self.include_known_params = Some(enabled);
        self
    }

    #[must_use]
    pub const fn include_all_params(mut self, enabled: bool) -> Self {
        self.include_all_params = Some(enabled);
        self
    }

    #[must_use]
    pub const fn remove_defaults_from_url(mut self, enabled: bool) -> Self {
        self.remove_defaults_from_url = Some(enabled);
        self
    }

    #[must_use]
    pub const fn enable_batching(mut self, enabled: bool) -> Self {
        self.enable_batching = Some(enabled);
        self
    }

    #[must_use]
    pub const fn immediate_flush(mut self, enabled: bool) -> Self {
        self.immediate_flush = Some(enabled);
        self
    }

    #[must_use]
    pub const fn skip_update_when_no_change(mut self, enabled: bool) -> Self {
        self.skip_update_when_no_change = Some(enabled);
        self
    }

    #[must_use]
    pub const fn keep_null(mut self, enabled: bool) -> Self {
        self.keep_null = Some(enabled);
        self
    }

    #[must_use]
    pub const fn keep_empty_string(mut self, enabled: bool) -> Self {
        self.keep_empty_string = Some(enabled);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::ParamConfig;
    use serialize::{number, string};

    #[test]
    fn defaults() {
        let options = QueryParamOptions::default();
        assert_eq!(options.update_type, UpdateType::PushIn);
        assert!(options.skip_update_when_no_change);
        assert!(!options.enable_batching);
        assert!(!options.keep_null);
        assert!(options.include_known_params.is_none());
        assert!(options.params.is_empty());
    }

    #[test]
    fn empty_override_changes_nothing() {
        let options = QueryParamOptions {
            keep_null: true,
            ..QueryParamOptions::default()
        };
        let merged = options.merge(&OptionsOverride::default());
        assert!(merged.keep_null);
        assert_eq!(merged.update_type, UpdateType::PushIn);
    }

    #[test]
    fn override_wins() {
        let merged = QueryParamOptions::default().merge(
            &OptionsOverride::default()
                .update_type(UpdateType::Replace)
                .remove_defaults_from_url(true)
                .include_known_params(false),
        );
        assert_eq!(merged.update_type, UpdateType::Replace);
        assert!(merged.remove_defaults_from_url);
        assert_eq!(merged.include_known_params, Some(false));
    }

    #[test]
    fn override_params_extend_inherited() {
        let options = QueryParamOptions {
            params: ParamConfigMap::builder()
                .param("a", number())
                .param("b", number())
                .build()
                .unwrap(),
            ..QueryParamOptions::default()
        };
        let local = ParamConfigMap::builder()
            .param("b", ParamConfig::new(string()).url_name("bee"))
            .build()
            .unwrap();
        let merged = options.merge(&OptionsOverride::default().params(local));
        assert_eq!(merged.params.len(), 2);
        assert_eq!(merged.params.get("b").unwrap().url_key("b"), "bee");
        assert!(merged.params.contains("a"));
    }
}
