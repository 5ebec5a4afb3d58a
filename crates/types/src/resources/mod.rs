//! Per-kind property schemas and the tagged union multiplexing them.
//!
//! Every declared platform resource is one variant of [`ResourceProperties`].
//! The enum is internally tagged on `action`, so serializing a payload yields
//! the flat `{"action": "<kind>", ...snake_case fields}` mapping the executor
//! consumes, and deserializing an executor-bound payload picks the schema by
//! tag. Kinds contribute shape only; all behavior lives in the dispatch
//! protocol that carries them.

pub mod account;
pub mod compute;
pub mod identity;
pub mod jobs;
pub mod mlflow;
pub mod permissions;
pub mod secrets;
pub mod unity;
pub mod warehouse;

use serde::{Deserialize, Serialize};

pub use account::{CredentialsProperties, NetworkProperties, StorageConfigurationProperties, WorkspaceProperties};
pub use compute::{
    AutoScale, AwsAttributes, ClusterPolicyProperties, ClusterPolicySpec, ClusterProperties, ClusterSpec, DockerImage,
    InitScriptInfo, InstancePoolProperties, InstancePoolSpec, InstanceProfileProperties,
};
pub use identity::{
    GroupMember, GroupProperties, ServicePrincipalProperties, ServicePrincipalSecretsProperties, ServicePrincipalSpec,
    TokenProperties, UserProperties,
};
pub use jobs::{JobCluster, JobProperties, JobSettings, JobTaskSettings, NewCluster};
pub use mlflow::{ExperimentProperties, RegisteredModelProperties};
pub use permissions::{
    AccessControlEntry, CatalogPermissionProperties, ClusterPermissionsProperties, ClusterPolicyPermissionsProperties,
    ExperimentPermissionProperties, JobPermissionsProperties, Principal, PrivilegeAssignment, PrivilegeAssignments,
    RegisteredModelPermissionProperties, VolumePermissionsProperties, WarehousePermissionsProperties,
};
pub use secrets::{DbfsFileProperties, SecretProperties, SecretScopeProperties};
pub use unity::{
    CatalogProperties, CatalogSpec, ExternalLocationProperties, MetastoreAssignmentProperties, SchemaProperties,
    StorageCredentialProperties, UnityMetastoreProperties, VolumeProperties, VolumeSpec, VolumeType,
};
pub use warehouse::{WarehouseProperties, WarehouseSpec};

use crate::kind::ResourceKind;

/// Property payload for one declared resource, tagged by its action kind.
///
/// The variant set is closed and matches [`ResourceKind`] one to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ResourceProperties {
    #[serde(rename = "credentials")]
    Credentials(CredentialsProperties),
    #[serde(rename = "storage-configurations")]
    StorageConfiguration(StorageConfigurationProperties),
    #[serde(rename = "networks")]
    Network(NetworkProperties),
    #[serde(rename = "workspaces")]
    Workspace(WorkspaceProperties),
    #[serde(rename = "instance-profile")]
    InstanceProfile(InstanceProfileProperties),
    #[serde(rename = "cluster")]
    Cluster(ClusterProperties),
    #[serde(rename = "cluster-policy")]
    ClusterPolicy(ClusterPolicyProperties),
    #[serde(rename = "instance-pool")]
    InstancePool(InstancePoolProperties),
    #[serde(rename = "user")]
    User(UserProperties),
    #[serde(rename = "group")]
    Group(GroupProperties),
    #[serde(rename = "service-principal")]
    ServicePrincipal(ServicePrincipalProperties),
    #[serde(rename = "service-principal-secrets")]
    ServicePrincipalSecrets(ServicePrincipalSecretsProperties),
    #[serde(rename = "token")]
    Token(TokenProperties),
    #[serde(rename = "secret-scope")]
    SecretScope(SecretScopeProperties),
    #[serde(rename = "secret")]
    Secret(SecretProperties),
    #[serde(rename = "dbfs-file")]
    DbfsFile(DbfsFileProperties),
    #[serde(rename = "job")]
    Job(JobProperties),
    #[serde(rename = "warehouse")]
    Warehouse(WarehouseProperties),
    #[serde(rename = "mlflow-experiment")]
    MlflowExperiment(ExperimentProperties),
    #[serde(rename = "mlflow-registered-model")]
    MlflowRegisteredModel(RegisteredModelProperties),
    #[serde(rename = "unity-metastore")]
    UnityMetastore(UnityMetastoreProperties),
    #[serde(rename = "metastore-assignment")]
    MetastoreAssignment(MetastoreAssignmentProperties),
    #[serde(rename = "catalog")]
    Catalog(CatalogProperties),
    #[serde(rename = "schema")]
    Schema(SchemaProperties),
    #[serde(rename = "unity-external-location")]
    UnityExternalLocation(ExternalLocationProperties),
    #[serde(rename = "unity-storage-credentials")]
    UnityStorageCredentials(StorageCredentialProperties),
    #[serde(rename = "volume")]
    Volume(VolumeProperties),
    #[serde(rename = "catalog-permission")]
    CatalogPermission(CatalogPermissionProperties),
    #[serde(rename = "cluster-permissions")]
    ClusterPermissions(ClusterPermissionsProperties),
    #[serde(rename = "cluster-policy-permissions")]
    ClusterPolicyPermissions(ClusterPolicyPermissionsProperties),
    #[serde(rename = "job-permissions")]
    JobPermissions(JobPermissionsProperties),
    #[serde(rename = "warehouse-permissions")]
    WarehousePermissions(WarehousePermissionsProperties),
    #[serde(rename = "experiment-permission")]
    ExperimentPermission(ExperimentPermissionProperties),
    #[serde(rename = "registered-model-permission")]
    RegisteredModelPermission(RegisteredModelPermissionProperties),
    #[serde(rename = "volume-permissions")]
    VolumePermissions(VolumePermissionsProperties),
}

impl ResourceProperties {
    /// The action kind this payload belongs to.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Credentials(_) => ResourceKind::Credentials,
            Self::StorageConfiguration(_) => ResourceKind::StorageConfiguration,
            Self::Network(_) => ResourceKind::Network,
            Self::Workspace(_) => ResourceKind::Workspace,
            Self::InstanceProfile(_) => ResourceKind::InstanceProfile,
            Self::Cluster(_) => ResourceKind::Cluster,
            Self::ClusterPolicy(_) => ResourceKind::ClusterPolicy,
            Self::InstancePool(_) => ResourceKind::InstancePool,
            Self::User(_) => ResourceKind::User,
            Self::Group(_) => ResourceKind::Group,
            Self::ServicePrincipal(_) => ResourceKind::ServicePrincipal,
            Self::ServicePrincipalSecrets(_) => ResourceKind::ServicePrincipalSecrets,
            Self::Token(_) => ResourceKind::Token,
            Self::SecretScope(_) => ResourceKind::SecretScope,
            Self::Secret(_) => ResourceKind::Secret,
            Self::DbfsFile(_) => ResourceKind::DbfsFile,
            Self::Job(_) => ResourceKind::Job,
            Self::Warehouse(_) => ResourceKind::Warehouse,
            Self::MlflowExperiment(_) => ResourceKind::MlflowExperiment,
            Self::MlflowRegisteredModel(_) => ResourceKind::MlflowRegisteredModel,
            Self::UnityMetastore(_) => ResourceKind::UnityMetastore,
            Self::MetastoreAssignment(_) => ResourceKind::MetastoreAssignment,
            Self::Catalog(_) => ResourceKind::Catalog,
            Self::Schema(_) => ResourceKind::Schema,
            Self::UnityExternalLocation(_) => ResourceKind::UnityExternalLocation,
            Self::UnityStorageCredentials(_) => ResourceKind::UnityStorageCredentials,
            Self::Volume(_) => ResourceKind::Volume,
            Self::CatalogPermission(_) => ResourceKind::CatalogPermission,
            Self::ClusterPermissions(_) => ResourceKind::ClusterPermissions,
            Self::ClusterPolicyPermissions(_) => ResourceKind::ClusterPolicyPermissions,
            Self::JobPermissions(_) => ResourceKind::JobPermissions,
            Self::WarehousePermissions(_) => ResourceKind::WarehousePermissions,
            Self::ExperimentPermission(_) => ResourceKind::ExperimentPermission,
            Self::RegisteredModelPermission(_) => ResourceKind::RegisteredModelPermission,
            Self::VolumePermissions(_) => ResourceKind::VolumePermissions,
        }
    }

    /// Serialize to the flat wire mapping carried in envelopes.
    pub fn to_wire_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            // Internally tagged variants always serialize to objects.
            _ => serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn credentials_payload_is_flat_with_action_tag() {
        let properties = ResourceProperties::Credentials(CredentialsProperties {
            credentials_name: "c1".into(),
            role_arn: "r1".into(),
        });
        let value = serde_json::to_value(&properties).unwrap();
        assert_eq!(
            value,
            json!({"action": "credentials", "credentials_name": "c1", "role_arn": "r1"})
        );
    }

    #[test]
    fn payload_deserializes_by_action_tag() {
        let value = json!({
            "action": "secret",
            "workspace_url": "https://ws.example.com",
            "scope": "ingest",
            "key": "api-key",
            "string_value": "hunter2"
        });
        let properties: ResourceProperties = serde_json::from_value(value).unwrap();
        assert_eq!(properties.kind(), ResourceKind::Secret);
        match properties {
            ResourceProperties::Secret(secret) => assert_eq!(secret.scope, "ingest"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn optional_fields_stay_off_the_wire() {
        let properties = ResourceProperties::Workspace(WorkspaceProperties {
            workspace_name: "main".into(),
            deployment_name: None,
            aws_region: "eu-west-1".into(),
            credentials_id: "cred-1".into(),
            storage_configuration_id: "stor-1".into(),
            network_id: None,
            managed_services_customer_managed_key_id: None,
            pricing_tier: None,
            storage_customer_managed_key_id: None,
        });
        let map = properties.to_wire_map();
        assert!(map.contains_key("workspace_name"));
        assert!(!map.contains_key("deployment_name"));
        assert!(!map.contains_key("network_id"));
    }

    #[test]
    fn kind_matches_wire_tag_for_every_variant_tested() {
        let properties = ResourceProperties::UnityStorageCredentials(StorageCredentialProperties {
            workspace_url: "https://ws.example.com".into(),
            storage_credential: unity::StorageCredentialSpec {
                name: "cred".into(),
                comment: None,
                aws_iam_role: Some(unity::AwsIamRole {
                    role_arn: "arn:aws:iam::1:role/x".into(),
                }),
                azure_service_principal: None,
                gcp_service_account_key: None,
            },
        });
        let map = properties.to_wire_map();
        assert_eq!(map["action"], json!(properties.kind().as_str()));
    }
}
