use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Discriminator identifying which resource schema and platform operation an
/// envelope concerns.
///
/// The set is closed: the executor rejects tags it does not know, so adding a
/// variant here must be paired with executor support. Tags serialize in
/// kebab-case, matching the `action` field of the wire payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "credentials")]
    Credentials,
    #[serde(rename = "storage-configurations")]
    StorageConfiguration,
    #[serde(rename = "networks")]
    Network,
    #[serde(rename = "workspaces")]
    Workspace,
    #[serde(rename = "instance-profile")]
    InstanceProfile,
    #[serde(rename = "cluster")]
    Cluster,
    #[serde(rename = "cluster-policy")]
    ClusterPolicy,
    #[serde(rename = "instance-pool")]
    InstancePool,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "group")]
    Group,
    #[serde(rename = "service-principal")]
    ServicePrincipal,
    #[serde(rename = "service-principal-secrets")]
    ServicePrincipalSecrets,
    #[serde(rename = "token")]
    Token,
    #[serde(rename = "secret-scope")]
    SecretScope,
    #[serde(rename = "secret")]
    Secret,
    #[serde(rename = "dbfs-file")]
    DbfsFile,
    #[serde(rename = "job")]
    Job,
    #[serde(rename = "warehouse")]
    Warehouse,
    #[serde(rename = "mlflow-experiment")]
    MlflowExperiment,
    #[serde(rename = "mlflow-registered-model")]
    MlflowRegisteredModel,
    #[serde(rename = "unity-metastore")]
    UnityMetastore,
    #[serde(rename = "metastore-assignment")]
    MetastoreAssignment,
    #[serde(rename = "catalog")]
    Catalog,
    #[serde(rename = "schema")]
    Schema,
    #[serde(rename = "unity-external-location")]
    UnityExternalLocation,
    #[serde(rename = "unity-storage-credentials")]
    UnityStorageCredentials,
    #[serde(rename = "volume")]
    Volume,
    #[serde(rename = "catalog-permission")]
    CatalogPermission,
    #[serde(rename = "cluster-permissions")]
    ClusterPermissions,
    #[serde(rename = "cluster-policy-permissions")]
    ClusterPolicyPermissions,
    #[serde(rename = "job-permissions")]
    JobPermissions,
    #[serde(rename = "warehouse-permissions")]
    WarehousePermissions,
    #[serde(rename = "experiment-permission")]
    ExperimentPermission,
    #[serde(rename = "registered-model-permission")]
    RegisteredModelPermission,
    #[serde(rename = "volume-permissions")]
    VolumePermissions,
}

impl ResourceKind {
    /// Wire tag for this kind, as carried in the envelope `action` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::StorageConfiguration => "storage-configurations",
            Self::Network => "networks",
            Self::Workspace => "workspaces",
            Self::InstanceProfile => "instance-profile",
            Self::Cluster => "cluster",
            Self::ClusterPolicy => "cluster-policy",
            Self::InstancePool => "instance-pool",
            Self::User => "user",
            Self::Group => "group",
            Self::ServicePrincipal => "service-principal",
            Self::ServicePrincipalSecrets => "service-principal-secrets",
            Self::Token => "token",
            Self::SecretScope => "secret-scope",
            Self::Secret => "secret",
            Self::DbfsFile => "dbfs-file",
            Self::Job => "job",
            Self::Warehouse => "warehouse",
            Self::MlflowExperiment => "mlflow-experiment",
            Self::MlflowRegisteredModel => "mlflow-registered-model",
            Self::UnityMetastore => "unity-metastore",
            Self::MetastoreAssignment => "metastore-assignment",
            Self::Catalog => "catalog",
            Self::Schema => "schema",
            Self::UnityExternalLocation => "unity-external-location",
            Self::UnityStorageCredentials => "unity-storage-credentials",
            Self::Volume => "volume",
            Self::CatalogPermission => "catalog-permission",
            Self::ClusterPermissions => "cluster-permissions",
            Self::ClusterPolicyPermissions => "cluster-policy-permissions",
            Self::JobPermissions => "job-permissions",
            Self::WarehousePermissions => "warehouse-permissions",
            Self::ExperimentPermission => "experiment-permission",
            Self::RegisteredModelPermission => "registered-model-permission",
            Self::VolumePermissions => "volume-permissions",
        }
    }

    /// All known kinds, in declaration order.
    pub fn all() -> &'static [ResourceKind] {
        use ResourceKind::*;
        &[
            Credentials,
            StorageConfiguration,
            Network,
            Workspace,
            InstanceProfile,
            Cluster,
            ClusterPolicy,
            InstancePool,
            User,
            Group,
            ServicePrincipal,
            ServicePrincipalSecrets,
            Token,
            SecretScope,
            Secret,
            DbfsFile,
            Job,
            Warehouse,
            MlflowExperiment,
            MlflowRegisteredModel,
            UnityMetastore,
            MetastoreAssignment,
            Catalog,
            Schema,
            UnityExternalLocation,
            UnityStorageCredentials,
            Volume,
            CatalogPermission,
            ClusterPermissions,
            ClusterPolicyPermissions,
            JobPermissions,
            WarehousePermissions,
            ExperimentPermission,
            RegisteredModelPermission,
            VolumePermissions,
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKindError(s.to_string()))
    }
}

/// Error returned when a string does not name a known resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKindError(pub String);

impl fmt::Display for UnknownKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown resource kind: '{}'", self.0)
    }
}

impl std::error::Error for UnknownKindError {}
