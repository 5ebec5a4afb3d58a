//! Unity Catalog resource schemas: metastores and their workspace
//! assignments, catalogs, schemas, external locations, storage credentials,
//! and volumes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Metastore settings; `storage_root` is the bucket backing managed tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetastoreSpec {
    pub name: String,
    pub storage_root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// Account-level metastore. Returns a `metastore_id` attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnityMetastoreProperties {
    pub workspace_url: String,
    pub metastore: MetastoreSpec,
    pub iam_role: String,
}

/// Attaches a metastore to a workspace. `workspace_id` and `metastore_id`
/// are usually derived attributes of the workspace and metastore resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetastoreAssignmentProperties {
    pub workspace_url: String,
    pub workspace_id: String,
    pub metastore_id: String,
    pub default_catalog_name: String,
}

/// Catalog settings within a metastore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProperties {
    pub workspace_url: String,
    pub catalog: CatalogSpec,
}

/// Schema settings; schemas nest under a catalog by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSpec {
    pub name: String,
    pub catalog_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperties {
    pub workspace_url: String,
    pub schema: SchemaSpec,
}

/// External storage location bound to a storage credential by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalLocationSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub url: String,
    pub credential_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalLocationProperties {
    pub workspace_url: String,
    pub external_location: ExternalLocationSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwsIamRole {
    pub role_arn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AzureServicePrincipal {
    pub directory_id: String,
    pub application_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcpServiceAccountKey {
    pub email: String,
    pub private_key_id: String,
    pub private_key: String,
}

/// Storage credential; exactly one of the cloud-specific blocks is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageCredentialSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_iam_role: Option<AwsIamRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_service_principal: Option<AzureServicePrincipal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcp_service_account_key: Option<GcpServiceAccountKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageCredentialProperties {
    pub workspace_url: String,
    pub storage_credential: StorageCredentialSpec,
}

/// Volume type: managed by the metastore or external under a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeType {
    #[serde(rename = "MANAGED")]
    Managed,
    #[serde(rename = "EXTERNAL")]
    External,
}

/// Volume nested under a catalog and schema by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSpec {
    pub name: String,
    pub schema_name: String,
    pub catalog_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<VolumeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProperties {
    pub workspace_url: String,
    pub volume: VolumeSpec,
}
