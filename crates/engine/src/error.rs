//! Engine failure taxonomy.
//!
//! Declaration and planning problems are caught before any envelope leaves
//! the process; dispatch-time variants carry enough context to name the
//! resource and the executor's stated reason.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("duplicate resource identifier detected: '{0}'")]
    DuplicateResource(String),

    #[error("resource '{dependent}' depends on unknown resource '{prerequisite}'")]
    UnknownDependency { dependent: String, prerequisite: String },

    #[error("resource '{0}' cannot depend on itself")]
    SelfDependency(String),

    #[error("no deployed record exists for '{0}'")]
    UnknownResource(String),

    #[error("dependency cycle detected involving: {0}")]
    DependencyCycle(String),

    #[error("resource '{consumer}' references attribute '{attribute}' of '{producer}', which was never reported")]
    MissingAttribute {
        consumer: String,
        producer: String,
        attribute: String,
    },

    #[error("payload for '{logical_id}' could not be rebuilt after reference substitution: {detail}")]
    PayloadSubstitution { logical_id: String, detail: String },

    #[error("create of '{0}' reported success without a physical resource id")]
    MissingPhysicalId(String),

    #[error("executor reported physical id '{reported}' for '{logical_id}' but '{stored}' is recorded")]
    PhysicalIdMutation {
        logical_id: String,
        stored: String,
        reported: String,
    },

    /// A delete was acknowledged as failed. The platform object may still
    /// exist; its record is kept for operator intervention.
    #[error("delete of '{logical_id}' failed, resource orphaned (physical id '{physical_id}'): {reason}")]
    OrphanedResource {
        logical_id: String,
        physical_id: String,
        reason: String,
    },
}
