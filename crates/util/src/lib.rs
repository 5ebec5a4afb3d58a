//! Small shared helpers: the reference token grammar and an async-to-sync
//! bridge for dispatch runners.

pub mod async_runtime;
pub mod refs;

pub use async_runtime::block_on_future;
pub use refs::{AttributeRef, PHYSICAL_ID_ATTRIBUTE, find_refs, replace_refs};
