//! Decoded-value caching and URL update reconciliation for qsync.
//!
//! This crate ties serialize, wire and schema together into bindings that
//! read typed values from a location and write changes back to it:
//! - [`QueryParamProvider`] owns the shared caches and the update queue
//! - [`QueryParams`] / [`QueryParam`] read values and issue updates
//! - [`Adapter`] is the seam to the host's history
//! - [`Scheduler`] decides when batched updates are flushed
//!
//! # Update types
//!
//! - `replaceIn` / `pushIn` merge the changes into the current query
//! - `replace` / `push` keep only the changed parameters
//!
//! # Design Principles
//!
//! - **Stable references** - An unchanged input yields the same `Rc`, and an
//!   unchanged set of values yields the same map.
//! - **One navigation per batch** - Queued updates fold into one search string.
//! - **No borrow across callbacks** - Adapters, schedulers and update
//!   functions may call back into bindings.

mod adapter;
mod batch;
mod cache;
mod error;
mod latest;
mod options;
mod provider;
mod types;
mod update;

pub use adapter::{navigate, Adapter, Location, MemoryAdapter, Navigation};
pub use batch::{flush_updates, ImmediateScheduler, Scheduler, Task, TaskQueue, UpdateQueue};
pub use cache::{CacheEntry, DecodedParamCache};
pub use error::{SyncError, SyncResult};
pub use latest::{get_latest_decoded_values, LatestValues, StableDecoder, ValuePolicy};
pub use options::{OptionsOverride, QueryParamOptions};
pub use provider::{QueryParam, QueryParamProvider, QueryParams};
pub use types::{ParseUpdateTypeError, UpdateType};
pub use update::{updated_search_string, ChangeSet, PendingUpdate, ReconcileContext};
