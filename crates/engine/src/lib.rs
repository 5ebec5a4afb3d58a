//! Dispatch core for declarative platform resources.
//!
//! A deployment unit declares kind-tagged resource payloads against executor
//! endpoints ([`context`]), the planner orders them along their dependency
//! edges and diffs them against the previous snapshot ([`plan`]), and the
//! driver walks the plan, one envelope per lifecycle transition, folding
//! each executor response back into the snapshot ([`deployment`],
//! [`lifecycle`]). Derived attributes flow between resources through
//! reference tokens substituted just before dispatch ([`resolve`]).
//!
//! The engine never retries and never rolls back: failures mark the
//! resource, dependents are skipped, independent resources keep going.

pub mod context;
pub mod deployment;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod plan;
pub mod resolve;

pub use context::{DeclaredUnit, ExecutorRef, ResourceDescriptor, ResourceHandle, SecretScopeHandle, StackBuilder};
pub use deployment::{Deployment, DeploymentReport, Outcome, ResourceOutcome};
pub use dispatch::{ExecutorRunner, HttpExecutorRunner, NoopRunner};
pub use error::DeployError;
pub use lifecycle::{DeployedResource, ResourceState, StackState};
pub use resolve::AttributeContext;
