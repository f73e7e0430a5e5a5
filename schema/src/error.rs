//! Parameter configuration errors.

use std::fmt;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating a parameter config map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A parameter was given an empty logical name.
    EmptyParamName,

    /// The same logical name was configured twice.
    DuplicateParam { name: String },

    /// Two parameters resolve to the same URL key.
    UrlKeyCollision {
        url_key: String,
        first: String,
        second: String,
    },

    /// A delimited or object codec was given an empty separator.
    EmptySeparator { param: String },

    /// A declared default does not decode to a value.
    InvalidDefault { param: String, text: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyParamName => write!(f, "parameter name must not be empty"),
            Self::DuplicateParam { name } => write!(f, "parameter {name:?} configured twice"),
            Self::UrlKeyCollision {
                url_key,
                first,
                second,
            } => {
                write!(
                    f,
                    "parameters {first:?} and {second:?} both map to URL key {url_key:?}"
                )
            }
            Self::EmptySeparator { param } => {
                write!(f, "empty separator for parameter {param:?}")
            }
            Self::InvalidDefault { param, text } => {
                write!(f, "default {text:?} for parameter {param:?} does not decode")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_both_params() {
        let err = SchemaError::UrlKeyCollision {
            url_key: "q".into(),
            first: "query".into(),
            second: "q".into(),
        };
        let text = err.to_string();
        assert!(text.contains("\"query\""));
        assert!(text.contains("URL key \"q\""));
    }

    #[test]
    fn display_duplicate() {
        let err = SchemaError::DuplicateParam { name: "x".into() };
        assert_eq!(err.to_string(), "parameter \"x\" configured twice");
    }
}
