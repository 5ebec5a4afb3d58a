//! Account-level resource schemas: credentials, storage configurations,
//! networks, and workspaces. These are provisioned against the platform's
//! account API rather than an individual workspace.

use serde::{Deserialize, Serialize};

/// Cross-account credentials configuration registered with the platform
/// account. The executor returns `credentials_id` and `external_id`
/// attributes on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialsProperties {
    pub credentials_name: String,
    pub role_arn: String,
}

/// Root bucket registration for workspace storage. Returns a
/// `storage_configuration_id` attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfigurationProperties {
    pub storage_configuration_name: String,
    pub bucket_name: String,
}

/// Customer-managed VPC registration. Returns a `network_id` attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkProperties {
    pub network_name: String,
    pub vpc_id: String,
    pub subnet_ids: Vec<String>,
    pub security_group_ids: Vec<String>,
}

/// Workspace deployment. `credentials_id`, `storage_configuration_id`, and
/// the optional `network_id` are usually derived attributes of sibling
/// account resources. Returns `workspace_id` and `workspace_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceProperties {
    pub workspace_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_name: Option<String>,
    pub aws_region: String,
    pub credentials_id: String,
    pub storage_configuration_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_services_customer_managed_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_customer_managed_key_id: Option<String>,
}
