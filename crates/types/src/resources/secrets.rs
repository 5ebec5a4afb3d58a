//! Secret scopes, secrets, and DBFS file uploads.

use serde::{Deserialize, Serialize};

/// Secret scope in a workspace. Secrets nest under a scope, so a secret
/// descriptor must depend on its scope even when it consumes none of the
/// scope's attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretScopeProperties {
    pub workspace_url: String,
    pub scope: String,
    pub initial_manage_principal: String,
}

/// A single secret value stored under a scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretProperties {
    pub workspace_url: String,
    pub scope: String,
    pub key: String,
    pub string_value: String,
}

/// File written to the workspace's DBFS root; content travels base64-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbfsFileProperties {
    pub workspace_url: String,
    pub path: String,
    pub base64_bytes: String,
}
