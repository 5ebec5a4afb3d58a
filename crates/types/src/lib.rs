//! Shared wire types for the deployment protocol: resource kinds, per-kind
//! property schemas, and the action envelopes exchanged with executors.
//!
//! Everything here is plain data. Lifecycle tracking, dependency ordering,
//! and dispatch live in `lakedeploy-engine`; HTTP transport lives in
//! `lakedeploy-api`.

pub mod envelope;
pub mod kind;
pub mod resources;

pub use envelope::{ActionRequest, ActionResponse, DispatchStatus, RequestType};
pub use kind::{ResourceKind, UnknownKindError};
pub use resources::ResourceProperties;
