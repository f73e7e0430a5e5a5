//! Parameter configs and validated config maps.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashMap;

use serialize::{EqualsFn, SharedCodec, Value, WithDefault};

use crate::error::{SchemaError, SchemaResult};

/// How one logical parameter is read from and written to the URL.
#[derive(Debug, Clone)]
pub struct ParamConfig {
    codec: SharedCodec,
    url_name: Option<String>,
}

impl ParamConfig {
    /// Creates a config stored under its logical name.
    #[must_use]
    pub const fn new(codec: SharedCodec) -> Self {
        Self {
            codec,
            url_name: None,
        }
    }

    /// Substitutes `default` for absent and null decodes.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.codec = WithDefault::new(self.codec, default.into()).into_shared();
        self
    }

    /// Substitutes `default` for absent decodes only.
    #[must_use]
    pub fn with_default_keep_null(mut self, default: impl Into<Value>) -> Self {
        self.codec = WithDefault::new(self.codec, default.into())
            .include_null(false)
            .into_shared();
        self
    }

    /// Stores the parameter under a different URL key.
    #[must_use]
    pub fn url_name(mut self, url_name: impl Into<String>) -> Self {
        self.url_name = Some(url_name.into());
        self
    }

    #[must_use]
    pub const fn codec(&self) -> &SharedCodec {
        &self.codec
    }

    /// The configured default, if the codec carries one.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.codec.default_value()
    }

    #[must_use]
    pub fn equality(&self) -> Option<EqualsFn> {
        self.codec.equality()
    }

    /// The URL key for a parameter configured under `name`.
    #[must_use]
    pub fn url_key<'a>(&'a self, name: &'a str) -> &'a str {
        self.url_name.as_deref().unwrap_or(name)
    }
}

impl From<SharedCodec> for ParamConfig {
    fn from(codec: SharedCodec) -> Self {
        Self::new(codec)
    }
}

/// Logical parameter names mapped to their configs.
///
/// Every name is non-empty and no two parameters share a URL key.
#[derive(Debug, Clone, Default)]
pub struct ParamConfigMap {
    params: BTreeMap<String, ParamConfig>,
}

impl ParamConfigMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            params: BTreeMap::new(),
        }
    }

    /// Creates a config map builder.
    #[must_use]
    pub fn builder() -> ParamConfigMapBuilder {
        ParamConfigMapBuilder::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamConfig> {
        self.params.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates parameters in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamConfig> {
        self.params.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// Returns the logical name of the parameter stored under `url_key`.
    #[must_use]
    pub fn name_for_url_key(&self, url_key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, config)| config.url_key(name) == url_key)
            .map(|(name, _)| name.as_str())
    }

    /// Adds a parameter if its name and URL key are both free.
    ///
    /// Returns `false` and leaves the map unchanged otherwise.
    pub(crate) fn try_insert(&mut self, name: &str, config: ParamConfig) -> bool {
        if name.is_empty()
            || self.params.contains_key(name)
            || self.name_for_url_key(config.url_key(name)).is_some()
        {
            return false;
        }
        self.params.insert(name.to_string(), config);
        true
    }

    fn validate(&self) -> SchemaResult<()> {
        let mut url_keys: HashMap<&str, &str> = HashMap::new();
        for (name, config) in &self.params {
            if name.is_empty() {
                return Err(SchemaError::EmptyParamName);
            }
            if let Some(first) = url_keys.insert(config.url_key(name), name) {
                return Err(SchemaError::UrlKeyCollision {
                    url_key: config.url_key(name).to_string(),
                    first: first.to_string(),
                    second: name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ParamConfigMap {
    type Item = (&'a String, &'a ParamConfig);
    type IntoIter = btree_map::Iter<'a, String, ParamConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Builder for [`ParamConfigMap`].
#[derive(Debug, Default)]
pub struct ParamConfigMapBuilder {
    params: Vec<(String, ParamConfig)>,
}

impl ParamConfigMapBuilder {
    /// Adds a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, config: impl Into<ParamConfig>) -> Self {
        self.params.push((name.into(), config.into()));
        self
    }

    /// Builds the map after validation.
    pub fn build(self) -> SchemaResult<ParamConfigMap> {
        let mut params = BTreeMap::new();
        for (name, config) in self.params {
            if params.contains_key(&name) {
                return Err(SchemaError::DuplicateParam { name });
            }
            params.insert(name, config);
        }
        let map = ParamConfigMap { params };
        map.validate()?;
        Ok(map)
    }
}
