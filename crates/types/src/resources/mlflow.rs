//! MLflow resource schemas: experiments and registered models.

use serde::{Deserialize, Serialize};

/// MLflow experiment. The physical identifier is the experiment id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentProperties {
    pub workspace_url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredModelTag {
    pub key: String,
    pub value: String,
}

/// Registered model in the workspace model registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredModelProperties {
    pub workspace_url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<RegisteredModelTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
