//! SQL warehouse schemas.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseTagPair {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarehouseTags {
    pub custom_tags: Vec<WarehouseTagPair>,
}

/// Release channel the warehouse tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
}

/// SQL warehouse specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseSpec {
    pub name: String,
    pub cluster_size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_num_clusters: Option<u32>,
    pub max_num_clusters: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_stop_mins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<WarehouseTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_instance_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_photon: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_serverless_compute: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
}

/// SQL warehouse pinned to a workspace. The physical identifier doubles as
/// the endpoint id used by warehouse permissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseProperties {
    pub workspace_url: String,
    pub warehouse: WarehouseSpec,
}
