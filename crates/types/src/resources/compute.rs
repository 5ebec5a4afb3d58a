//! Compute resource schemas: clusters, cluster policies, instance pools, and
//! instance profiles. The nested definition types mirror the platform's
//! compute API payloads field for field; everything optional stays off the
//! wire when unset.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Worker-count autoscaling bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoScale {
    pub min_workers: u32,
    pub max_workers: u32,
}

/// Cloud-provider placement and volume settings for cluster nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AwsAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_on_demand: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    pub zone_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_profile_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_bid_price_percent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_iops: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_throughput: Option<u32>,
}

/// A storage destination for logs or init scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageInfo {
    pub destination: String,
}

/// S3 storage destination with region and encryption options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3StorageInfo {
    pub destination: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_encryption: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canned_acl: Option<String>,
}

/// Init script location, discriminated by the single key present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InitScriptInfo {
    #[serde(rename = "dbfs")]
    Dbfs(StorageInfo),
    #[serde(rename = "file")]
    File(StorageInfo),
    #[serde(rename = "s3")]
    S3(S3StorageInfo),
}

/// Credentials for a private container registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockerBasicAuth {
    pub username: String,
    pub password: String,
}

/// Custom container image for cluster nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockerImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<DockerBasicAuth>,
}

/// Full cluster specification as accepted by the platform clusters API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscale: Option<AutoScale>,
    pub cluster_name: String,
    pub spark_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<DockerImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_conf: Option<IndexMap<String, String>>,
    pub aws_attributes: AwsAttributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_node_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_public_keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_tags: Option<IndexMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_log_conf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_scripts: Option<Vec<InitScriptInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_env_vars: Option<IndexMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autotermination_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_elastic_disk: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_instance_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_policy_default_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_local_disk_encryption: Option<bool>,
}

/// All-purpose cluster pinned to a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterProperties {
    pub workspace_url: String,
    pub cluster: ClusterSpec,
}

/// Policy definition. `definition` is the policy JSON document serialized to a
/// string, exactly as the platform API expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterPolicySpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub definition: String,
}

/// Cluster policy pinned to a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterPolicyProperties {
    pub workspace_url: String,
    pub cluster_policy: ClusterPolicySpec,
}

/// Placement settings for pooled instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstancePoolAwsAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_bid_price_percent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
}

/// Warm instance pool specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstancePoolSpec {
    pub instance_pool_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_idle_instances: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_attributes: Option<InstancePoolAwsAttributes>,
    pub node_type_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_tags: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_instance_autotermination_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_elastic_disk: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_spec: Option<IndexMap<String, Value>>,
    pub preloaded_spark_versions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preloaded_docker_images: Option<Vec<DockerImage>>,
}

/// Instance pool pinned to a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstancePoolProperties {
    pub workspace_url: String,
    pub instance_pool: InstancePoolSpec,
}

/// IAM instance profile registration in a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceProfileProperties {
    pub workspace_url: String,
    pub instance_profile_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_meta_instance_profile: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_validation: Option<bool>,
}
