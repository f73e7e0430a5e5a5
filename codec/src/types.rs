//! Core types for the codec.

use std::fmt;
use std::str::FromStr;

/// How an update is written to the URL.
///
/// `Replace` and `Push` keep only the changed keys; the `*In` variants merge
/// the changes into the current query. `Push*` creates a history entry,
/// `Replace*` does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateType {
    Replace,
    ReplaceIn,
    Push,
    #[default]
    PushIn,
}

impl UpdateType {
    /// Returns `true` if the update creates a history entry.
    #[must_use]
    pub const fn is_push(self) -> bool {
        matches!(self, Self::Push | Self::PushIn)
    }

    /// Returns `true` if the changes merge into the current query.
    #[must_use]
    pub const fn is_merge(self) -> bool {
        matches!(self, Self::ReplaceIn | Self::PushIn)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::ReplaceIn => "replaceIn",
            Self::Push => "push",
            Self::PushIn => "pushIn",
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown update type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseUpdateTypeError {
    pub input: String,
}

impl fmt::Display for ParseUpdateTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown update type {:?} (expected replace, replaceIn, push or pushIn)",
            self.input
        )
    }
}

impl std::error::Error for ParseUpdateTypeError {}

impl FromStr for UpdateType {
    type Err = ParseUpdateTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Self::Replace),
            "replaceIn" => Ok(Self::ReplaceIn),
            "push" => Ok(Self::Push),
            "pushIn" => Ok(Self::PushIn),
            other => Err(ParseUpdateTypeError {
                input: other.to_string(),
            }),
        }
    }
}
