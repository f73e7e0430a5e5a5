//! Default-substituting codec wrapper.

use std::rc::Rc;

use crate::encoded::EncodedValue;
use crate::params::{EqualsFn, ParamCodec, SharedCodec};
use crate::Value;

/// Wraps a codec so that a missing decode produces a default value.
///
/// When `include_null` is set (the default) a null decode is replaced too.
#[derive(Debug, Clone)]
pub struct WithDefault {
    inner: SharedCodec,
    default: Value,
    include_null: bool,
}

impl WithDefault {
    /// Wraps `inner`, replacing absent and null decodes with `default`.
    #[must_use]
    pub fn new(inner: SharedCodec, default: Value) -> Self {
        Self {
            inner,
            default,
            include_null: true,
        }
    }

    /// Sets whether a null decode is replaced by the default.
    #[must_use]
    pub const fn include_null(mut self, include_null: bool) -> Self {
        self.include_null = include_null;
        self
    }

    /// The wrapped codec.
    #[must_use]
    pub const fn inner(&self) -> &SharedCodec {
        &self.inner
    }

    /// Wraps the codec for sharing between configs.
    #[must_use]
    pub fn into_shared(self) -> SharedCodec {
        Rc::new(self)
    }
}

impl ParamCodec for WithDefault {
    fn encode(&self, value: Option<&Value>) -> EncodedValue {
        self.inner.encode(value)
    }

    fn decode(&self, input: &EncodedValue) -> Option<Value> {
        match self.inner.decode(input) {
            None => Some(self.default.clone()),
            Some(Value::Null) if self.include_null => Some(self.default.clone()),
            decoded => decoded,
        }
    }

    fn equality(&self) -> Option<EqualsFn> {
        self.inner.equality()
    }

    fn default_value(&self) -> Option<&Value> {
        Some(&self.default)
    }
}

/// Wraps `inner` with a default that also replaces null decodes.
#[must_use]
pub fn with_default(inner: SharedCodec, default: impl Into<Value>) -> SharedCodec {
    WithDefault::new(inner, default.into()).into_shared()
}

/// Wraps `inner` with a default that leaves null decodes alone.
#[must_use]
pub fn with_default_keep_null(inner: SharedCodec, default: impl Into<Value>) -> SharedCodec {
    WithDefault::new(inner, default.into())
        .include_null(false)
        .into_shared()
}
