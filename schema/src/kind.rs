//! Declarative parameter definitions.
//!
//! With the `serde` feature these types describe a config map as data, for
//! example in a JSON schema file.

use serialize::{
    ArrayParam, BooleanParam, DateParam, DateTimeParam, DelimitedArrayParam,
    DelimitedNumericArrayParam, EncodedValue, EnumArrayParam, EnumDelimitedArrayParam,
    EnumParam, JsonParam, NumberParam, NumericArrayParam, NumericObjectParam, ObjectParam,
    SharedCodec, StringParam, Value, DEFAULT_ENTRY_SEPARATOR, DEFAULT_KEY_VALUE_SEPARATOR,
};
use std::rc::Rc;

use crate::config::{ParamConfig, ParamConfigMap};
use crate::error::{SchemaError, SchemaResult};

fn entry_separator() -> String {
    DEFAULT_ENTRY_SEPARATOR.to_string()
}

fn key_value_separator() -> String {
    DEFAULT_KEY_VALUE_SEPARATOR.to_string()
}

/// Names one of the built-in codecs together with its settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum CodecKind {
    String,
    Number,
    Boolean,
    Date,
    DateTime,
    Json,
    Array,
    NumericArray,
    DelimitedArray {
        #[cfg_attr(feature = "serde", serde(default = "entry_separator"))]
        separator: String,
    },
    DelimitedNumericArray {
        #[cfg_attr(feature = "serde", serde(default = "entry_separator"))]
        separator: String,
    },
    Object {
        #[cfg_attr(feature = "serde", serde(default = "key_value_separator"))]
        key_value_separator: String,
        #[cfg_attr(feature = "serde", serde(default = "entry_separator"))]
        entry_separator: String,
    },
    NumericObject {
        #[cfg_attr(feature = "serde", serde(default = "key_value_separator"))]
        key_value_separator: String,
        #[cfg_attr(feature = "serde", serde(default = "entry_separator"))]
        entry_separator: String,
    },
    Enum {
        values: Vec<String>,
    },
    EnumArray {
        values: Vec<String>,
    },
    EnumDelimitedArray {
        values: Vec<String>,
        #[cfg_attr(feature = "serde", serde(default = "entry_separator"))]
        separator: String,
    },
}

impl CodecKind {
    /// A delimited string array with the default separator.
    #[must_use]
    pub fn delimited_array() -> Self {
        Self::DelimitedArray {
            separator: entry_separator(),
        }
    }

    /// A flat string object with the default separators.
    #[must_use]
    pub fn object() -> Self {
        Self::Object {
            key_value_separator: key_value_separator(),
            entry_separator: entry_separator(),
        }
    }

    /// Instantiates the codec for parameter `param`.
    pub fn build(&self, param: &str) -> SchemaResult<SharedCodec> {
        let empty_separator = match self {
            Self::DelimitedArray { separator }
            | Self::DelimitedNumericArray { separator }
            | Self::EnumDelimitedArray { separator, .. } => separator.is_empty(),
            Self::Object {
                key_value_separator,
                entry_separator,
            }
            | Self::NumericObject {
                key_value_separator,
                entry_separator,
            } => key_value_separator.is_empty() || entry_separator.is_empty(),
            _ => false,
        };
        if empty_separator {
            return Err(SchemaError::EmptySeparator {
                param: param.to_string(),
            });
        }

        let codec: SharedCodec = match self {
            Self::String => Rc::new(StringParam),
            Self::Number => Rc::new(NumberParam),
            Self::Boolean => Rc::new(BooleanParam),
            Self::Date => Rc::new(DateParam),
            Self::DateTime => Rc::new(DateTimeParam),
            Self::Json => Rc::new(JsonParam),
            Self::Array => Rc::new(ArrayParam),
            Self::NumericArray => Rc::new(NumericArrayParam),
            Self::DelimitedArray { separator } => Rc::new(DelimitedArrayParam::new(separator)),
            Self::DelimitedNumericArray { separator } => {
                Rc::new(DelimitedNumericArrayParam::new(separator))
            }
            Self::Object {
                key_value_separator,
                entry_separator,
            } => Rc::new(ObjectParam::new(key_value_separator, entry_separator)),
            Self::NumericObject {
                key_value_separator,
                entry_separator,
            } => Rc::new(NumericObjectParam::new(key_value_separator, entry_separator)),
            Self::Enum { values } => Rc::new(EnumParam::new(values.iter().cloned())),
            Self::EnumArray { values } => Rc::new(EnumArrayParam::new(values.iter().cloned())),
            Self::EnumDelimitedArray { values, separator } => Rc::new(
                EnumDelimitedArrayParam::new(values.iter().cloned()).separator(separator),
            ),
        };
        Ok(codec)
    }
}

/// One parameter of a [`SchemaDef`].
///
/// `default` is written in the codec's encoded form, e.g. `"1_2"` for a
/// delimited numeric array.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamDef {
    pub name: String,
    pub codec: CodecKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub default: Option<String>,
    /// Keep null decodes instead of replacing them with the default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub keep_null: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub url_name: Option<String>,
}

impl ParamDef {
    #[must_use]
    pub fn new(name: impl Into<String>, codec: CodecKind) -> Self {
        Self {
            name: name.into(),
            codec,
            default: None,
            keep_null: false,
            url_name: None,
        }
    }

    #[must_use]
    pub fn default_text(mut self, text: impl Into<String>) -> Self {
        self.default = Some(text.into());
        self
    }

    #[must_use]
    pub fn url_name(mut self, url_name: impl Into<String>) -> Self {
        self.url_name = Some(url_name.into());
        self
    }

    /// Builds the runtime config.
    pub fn to_config(&self) -> SchemaResult<ParamConfig> {
        let codec = self.codec.build(&self.name)?;
        let mut config = match &self.default {
            None => ParamConfig::new(codec),
            Some(text) => {
                let default = decode_default(&codec, text).ok_or_else(|| {
                    SchemaError::InvalidDefault {
                        param: self.name.clone(),
                        text: text.clone(),
                    }
                })?;
                if self.keep_null {
                    ParamConfig::new(codec).with_default_keep_null(default)
                } else {
                    ParamConfig::new(codec).with_default(default)
                }
            }
        };
        if let Some(url_name) = &self.url_name {
            config = config.url_name(url_name.clone());
        }
        Ok(config)
    }
}

fn decode_default(codec: &SharedCodec, text: &str) -> Option<Value> {
    match codec.decode(&EncodedValue::single(text)) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value),
    }
}

/// A whole config map described as data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaDef {
    pub params: Vec<ParamDef>,
}

impl SchemaDef {
    /// Builds and validates the config map.
    pub fn to_config_map(&self) -> SchemaResult<ParamConfigMap> {
        self.params
            .iter()
            .try_fold(ParamConfigMap::builder(), |builder, def| {
                Ok(builder.param(def.name.clone(), def.to_config()?))
            })?
            .build()
    }
}
