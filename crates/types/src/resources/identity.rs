//! Identity resource schemas: users, groups, service principals, and
//! workspace access tokens.

use serde::{Deserialize, Serialize};

/// SCIM user in a workspace. Returns a `user_id` attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProperties {
    pub workspace_url: String,
    pub user_name: String,
}

/// A group member, either a user or a nested group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupMember {
    User { user_name: String },
    Group { group_name: String },
}

/// SCIM group with its member list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupProperties {
    pub workspace_url: String,
    pub group_name: String,
    pub members: Vec<GroupMember>,
}

/// Opaque complex value as used by the SCIM API for entitlements, roles, and
/// group references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Service principal settings as accepted by the SCIM API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicePrincipalSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlements: Option<Vec<ComplexValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<ComplexValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<ComplexValue>>,
}

/// Service principal in a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePrincipalProperties {
    pub workspace_url: String,
    pub service_principal: ServicePrincipalSpec,
}

/// OAuth secret minted for an account-level service principal. Returns the
/// secret value as a derived attribute; the executor stores it, the
/// declarative side only forwards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePrincipalSecretsProperties {
    pub service_principal_id: u64,
}

/// Workspace personal access token. Returns a `token_value` attribute (and,
/// in the original deployment, the ARN of the secret holding it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenProperties {
    pub workspace_url: String,
    pub token_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime_seconds: Option<u64>,
}
