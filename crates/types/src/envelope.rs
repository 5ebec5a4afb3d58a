//! Action envelopes exchanged with executors.
//!
//! A request carries the lifecycle phase, the current property payload, the
//! previous payload on updates, and the physical id once the resource exists.
//! The response reports success or failure plus the physical id and the
//! derived attributes other resources may reference.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::resources::ResourceProperties;

/// Lifecycle phase requested of the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome reported by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchStatus {
    Success,
    Failed,
}

/// One action sent to an executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub request_type: RequestType,
    pub resource_properties: ResourceProperties,
    /// Previous payload, present only on updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<ResourceProperties>,
    /// Present on updates and deletes; never on creates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
}

impl ActionRequest {
    pub fn create(resource_properties: ResourceProperties) -> Self {
        Self {
            request_type: RequestType::Create,
            resource_properties,
            old_resource_properties: None,
            physical_resource_id: None,
        }
    }

    pub fn update(
        resource_properties: ResourceProperties,
        old_resource_properties: ResourceProperties,
        physical_resource_id: impl Into<String>,
    ) -> Self {
        Self {
            request_type: RequestType::Update,
            resource_properties,
            old_resource_properties: Some(old_resource_properties),
            physical_resource_id: Some(physical_resource_id.into()),
        }
    }

    pub fn delete(resource_properties: ResourceProperties, physical_resource_id: impl Into<String>) -> Self {
        Self {
            request_type: RequestType::Delete,
            resource_properties,
            old_resource_properties: None,
            physical_resource_id: Some(physical_resource_id.into()),
        }
    }
}

/// Executor's answer to one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: DispatchStatus,
    /// Identifier of the concrete platform object. Set on every successful
    /// create; echoed back on updates and deletes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    /// Derived attributes, all stringly typed on the wire.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    /// Human-readable failure explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ActionResponse {
    pub fn is_success(&self) -> bool {
        self.status == DispatchStatus::Success
    }

    /// Synthesize a failure the way transport errors surface: no physical
    /// id, no attributes, only a reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: DispatchStatus::Failed,
            physical_resource_id: None,
            attributes: IndexMap::new(),
            reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{CredentialsProperties, ResourceProperties};
    use serde_json::json;

    fn credentials() -> ResourceProperties {
        ResourceProperties::Credentials(CredentialsProperties {
            credentials_name: "main".into(),
            role_arn: "arn:aws:iam::1:role/cross-account".into(),
        })
    }

    #[test]
    fn create_request_omits_old_properties_and_physical_id() {
        let request = ActionRequest::create(credentials());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["request_type"], json!("Create"));
        assert_eq!(value["resource_properties"]["action"], json!("credentials"));
        assert!(value.get("old_resource_properties").is_none());
        assert!(value.get("physical_resource_id").is_none());
    }

    #[test]
    fn delete_request_carries_physical_id() {
        let request = ActionRequest::delete(credentials(), "cred-123");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["request_type"], json!("Delete"));
        assert_eq!(value["physical_resource_id"], json!("cred-123"));
    }

    #[test]
    fn response_parses_with_defaulted_attributes() {
        let value = json!({"status": "Success", "physical_resource_id": "123"});
        let response: ActionResponse = serde_json::from_value(value).unwrap();
        assert!(response.is_success());
        assert_eq!(response.physical_resource_id.as_deref(), Some("123"));
        assert!(response.attributes.is_empty());
    }

    #[test]
    fn failure_response_round_trips_reason() {
        let value = json!({"status": "Failed", "reason": "role not assumable"});
        let response: ActionResponse = serde_json::from_value(value).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.reason.as_deref(), Some("role not assumable"));
        assert!(response.physical_resource_id.is_none());
    }
}
