//! Per-resource lifecycle tracking and the stack-state snapshot.
//!
//! Each resource moves through `Absent → Creating → Present → Updating →
//! Present → Deleting → Absent`, with `Failed` reachable from any in-flight
//! state. Every transition out of an in-flight state is driven by exactly one
//! executor response; [`StackState`] applies those responses under the
//! protocol's identity invariants and snapshots the surviving records.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use lakedeploy_types::{ActionResponse, RequestType, ResourceKind, ResourceProperties};
use serde::{Deserialize, Serialize};

use crate::error::DeployError;

/// Where a resource stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Absent,
    Creating,
    Present,
    Updating,
    Deleting,
    Failed,
}

impl ResourceState {
    /// The in-flight state entered when an envelope of the given type is
    /// dispatched.
    pub fn dispatching(request_type: RequestType) -> Self {
        match request_type {
            RequestType::Create => Self::Creating,
            RequestType::Update => Self::Updating,
            RequestType::Delete => Self::Deleting,
        }
    }

    /// Settle an in-flight state on the executor's answer. Settled states
    /// are returned unchanged.
    pub fn settle(self, success: bool) -> Self {
        match (self, success) {
            (Self::Creating | Self::Updating, true) => Self::Present,
            (Self::Deleting, true) => Self::Absent,
            (Self::Creating | Self::Updating | Self::Deleting, false) => Self::Failed,
            (settled, _) => settled,
        }
    }
}

/// One deployed resource as recorded between runs.
///
/// `properties` is the payload as last dispatched, references substituted;
/// `depends_on` preserves the dependency edges so deletes in later runs can
/// be ordered against the graph this record was created under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployedResource {
    pub kind: ResourceKind,
    pub executor_address: String,
    pub properties: ResourceProperties,
    pub physical_resource_id: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

/// Snapshot of every deployed record, keyed by logical id in deployment
/// order. Persisting it between runs is the caller's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackState {
    #[serde(default)]
    pub resources: IndexMap<String, DeployedResource>,
}

impl StackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, logical_id: &str) -> Option<&DeployedResource> {
        self.resources.get(logical_id)
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Record a successful create. The physical id is written exactly once,
    /// here; a success without one is a protocol violation.
    pub fn apply_create(
        &mut self,
        logical_id: &str,
        kind: ResourceKind,
        executor_address: String,
        properties: ResourceProperties,
        depends_on: Vec<String>,
        response: &ActionResponse,
    ) -> Result<(), DeployError> {
        let physical_resource_id = response
            .physical_resource_id
            .clone()
            .ok_or_else(|| DeployError::MissingPhysicalId(logical_id.to_string()))?;
        self.resources.insert(
            logical_id.to_string(),
            DeployedResource {
                kind,
                executor_address,
                properties,
                physical_resource_id,
                attributes: response.attributes.clone(),
                depends_on,
            },
        );
        Ok(())
    }

    /// Record a successful update. Identity must not move; attributes are
    /// replaced wholesale so stale keys drop out.
    pub fn apply_update(
        &mut self,
        logical_id: &str,
        properties: ResourceProperties,
        depends_on: Vec<String>,
        response: &ActionResponse,
    ) -> Result<(), DeployError> {
        let Some(record) = self.resources.get_mut(logical_id) else {
            return Err(DeployError::UnknownResource(logical_id.to_string()));
        };
        if let Some(reported) = &response.physical_resource_id
            && reported != &record.physical_resource_id
        {
            return Err(DeployError::PhysicalIdMutation {
                logical_id: logical_id.to_string(),
                stored: record.physical_resource_id.clone(),
                reported: reported.clone(),
            });
        }
        record.properties = properties;
        record.attributes = response.attributes.clone();
        record.depends_on = depends_on;
        Ok(())
    }

    /// Forget a record after a successful delete.
    pub fn apply_delete(&mut self, logical_id: &str) {
        self.resources.shift_remove(logical_id);
    }

    /// Load a snapshot from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("read stack state from '{}'", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("parse stack state in '{}'", path.display()))
    }

    /// Write the snapshot to a YAML file.
    pub fn store(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("serialize stack state")?;
        fs::write(path, content).with_context(|| format!("write stack state to '{}'", path.display()))
    }
}
