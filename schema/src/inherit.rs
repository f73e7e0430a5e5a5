//! Widening config maps with inherited parameters.

use std::borrow::Cow;

use serialize::{string, SharedCodec};

use crate::config::{ParamConfig, ParamConfigMap};
use crate::error::SchemaResult;

/// What a binding was asked to manage.
#[derive(Debug, Clone, Default)]
pub enum ParamsInput {
    /// Nothing configured locally; everything comes from inherited params.
    #[default]
    NoConfig,
    /// Parameter names resolved against inherited params.
    Names(Vec<String>),
    /// An explicit config map.
    Map(ParamConfigMap),
}

impl ParamsInput {
    /// Creates a names input.
    #[must_use]
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Names(names.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub const fn is_no_config(&self) -> bool {
        matches!(self, Self::NoConfig)
    }
}

impl From<ParamConfigMap> for ParamsInput {
    fn from(map: ParamConfigMap) -> Self {
        Self::Map(map)
    }
}

/// Resolves a [`ParamsInput`] into a config map.
///
/// Names without an inherited config fall back to a string codec.
pub fn resolve_params_input(
    input: &ParamsInput,
    inherited: &ParamConfigMap,
) -> SchemaResult<ParamConfigMap> {
    match input {
        ParamsInput::NoConfig => Ok(ParamConfigMap::new()),
        ParamsInput::Map(map) => Ok(map.clone()),
        ParamsInput::Names(names) => {
            let mut builder = ParamConfigMap::builder();
            let mut seen = Vec::with_capacity(names.len());
            for name in names {
                if seen.contains(&name) {
                    continue;
                }
                seen.push(name);
                let config = inherited
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| ParamConfig::new(string()));
                builder = builder.param(name.clone(), config);
            }
            builder.build()
        }
    }
}

/// Adds configs for `keys` that `base` does not configure.
///
/// Each missing key takes the inherited config when there is one, otherwise
/// a config around `fallback`; without a fallback the key is left out. A key
/// whose URL key is already claimed is left out too. The base map is borrowed
/// unchanged when nothing was added.
pub fn extend_for_keys<'a, I, S>(
    base: &'a ParamConfigMap,
    keys: I,
    inherited: &ParamConfigMap,
    fallback: Option<&SharedCodec>,
) -> Cow<'a, ParamConfigMap>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extended: Cow<'a, ParamConfigMap> = Cow::Borrowed(base);
    for key in keys {
        let key = key.as_ref();
        if extended.contains(key) {
            continue;
        }
        let config = match (inherited.get(key), fallback) {
            (Some(config), _) => config.clone(),
            (None, Some(codec)) => ParamConfig::new(SharedCodec::clone(codec)),
            (None, None) => continue,
        };
        if extended.name_for_url_key(config.url_key(key)).is_some() {
            continue;
        }
        extended.to_mut().try_insert(key, config);
    }
    extended
}
