//! Permission resource schemas. All workspace-object permission kinds share
//! one access-control entry shape; Unity Catalog securables use privilege
//! assignments instead.

use serde::{Deserialize, Serialize};

/// Principal granted a permission level on a workspace object. Exactly one
/// of the principal fields is set; the shape discriminates on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccessControlEntry {
    User {
        user_name: String,
        permission_level: String,
    },
    Group {
        group_name: String,
        permission_level: String,
    },
    ServicePrincipal {
        service_principal_name: String,
        permission_level: String,
    },
}

/// Principal without a permission level, used for job ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Principal {
    User { user_name: String },
    Group { group_name: String },
    ServicePrincipal { service_principal_name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterPermissionsProperties {
    pub workspace_url: String,
    pub cluster_id: String,
    pub access_control_list: Vec<AccessControlEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterPolicyPermissionsProperties {
    pub workspace_url: String,
    pub cluster_policy_id: String,
    pub access_control_list: Vec<AccessControlEntry>,
}

/// Job permissions. The owner is set separately from the granted list; the
/// executor folds it into the platform's IS_OWNER grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPermissionsProperties {
    pub workspace_url: String,
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_control_list: Vec<AccessControlEntry>,
    pub owner: Principal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehousePermissionsProperties {
    pub workspace_url: String,
    pub endpoint_id: String,
    pub access_control_list: Vec<AccessControlEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentPermissionProperties {
    pub workspace_url: String,
    pub experiment_id: String,
    pub access_control_list: Vec<AccessControlEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredModelPermissionProperties {
    pub workspace_url: String,
    pub registered_model_id: String,
    pub access_control_list: Vec<AccessControlEntry>,
}

/// Unity Catalog privilege grant for one principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivilegeAssignment {
    pub principal: String,
    pub privileges: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivilegeAssignments {
    pub privilege_assignments: Vec<PrivilegeAssignment>,
}

/// Grants on a Unity Catalog securable, addressed by securable type and id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPermissionProperties {
    pub workspace_url: String,
    pub sec_type: String,
    pub sec_id: String,
    pub permissions: PrivilegeAssignments,
}

/// Grants on a volume, addressed by its full three-level name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumePermissionsProperties {
    pub workspace_url: String,
    pub volume_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub privilege_assignments: Vec<PrivilegeAssignment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn access_control_entries_discriminate_by_field() {
        let list = vec![
            AccessControlEntry::User {
                user_name: "ada@example.com".into(),
                permission_level: "CAN_MANAGE".into(),
            },
            AccessControlEntry::ServicePrincipal {
                service_principal_name: "deploy-sp".into(),
                permission_level: "CAN_RESTART".into(),
            },
        ];
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(
            value,
            json!([
                {"user_name": "ada@example.com", "permission_level": "CAN_MANAGE"},
                {"service_principal_name": "deploy-sp", "permission_level": "CAN_RESTART"}
            ])
        );
        let back: Vec<AccessControlEntry> = serde_json::from_value(value).unwrap();
        assert_eq!(back, list);
    }
}
