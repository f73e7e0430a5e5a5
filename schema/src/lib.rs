//! Parameter configuration and query orchestration for qsync.
//!
//! This crate defines how logical parameters map onto a query string:
//! - [`ParamConfig`] pairs a codec with an optional URL key
//! - [`ParamConfigMap`] is a validated set of parameters
//! - [`ParamsInput`] and [`extend_for_keys`] widen maps with inherited params
//! - [`decode_query_params`] / [`encode_query_params`] apply a map to a
//!   whole query
//!
//! # Design Principles
//!
//! - **Validated maps** - Empty names and URL key collisions are rejected up front.
//! - **Runtime-first** - Maps are built in code or, with the `serde`
//!   feature, loaded from a [`SchemaDef`].
//! - **Pass-through** - Unknown URL keys are never dropped by a decode.

mod config;
mod error;
mod inherit;
mod kind;
mod query;

pub use config::{ParamConfig, ParamConfigMap, ParamConfigMapBuilder};
pub use error::{SchemaError, SchemaResult};
pub use inherit::{extend_for_keys, resolve_params_input, ParamsInput};
pub use kind::{CodecKind, ParamDef, SchemaDef};
pub use query::{apply_url_names, decode_query_params, encode_query_params, DecodedQuery};
