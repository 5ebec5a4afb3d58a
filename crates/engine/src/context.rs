//! Deployment-unit declaration.
//!
//! A [`StackBuilder`] accumulates resource descriptors against executor
//! references and validates the whole set in [`StackBuilder::finish`]. There
//! is no ambient registry: every descriptor names its executor explicitly,
//! and cross-unit wiring happens through the exports map.

use indexmap::IndexMap;
use lakedeploy_types::ResourceProperties;
use lakedeploy_types::resources::{SecretProperties, SecretScopeProperties};
use lakedeploy_util::refs::{AttributeRef, PHYSICAL_ID_ATTRIBUTE};
use tracing::debug;

use crate::error::DeployError;
use crate::resolve::collect_references;

/// Capability to mint descriptors against one executor endpoint.
///
/// Owning and imported references are the same type; a descriptor cannot
/// tell which constructor produced the reference it was declared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorRef {
    address: String,
    owned: bool,
}

impl ExecutorRef {
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Whether this unit published the executor itself, as opposed to
    /// importing another unit's export.
    pub fn is_owned(&self) -> bool {
        self.owned
    }
}

/// Cheap handle to a declared resource. Its methods mint the reference
/// tokens other payloads embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    logical_id: String,
}

impl ResourceHandle {
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// Token resolving to a named attribute from the executor's response.
    pub fn attr(&self, attribute: &str) -> String {
        AttributeRef::new(&self.logical_id, attribute).token()
    }

    /// Token resolving to the resource's physical identifier.
    pub fn physical_id(&self) -> String {
        self.attr(PHYSICAL_ID_ATTRIBUTE)
    }
}

/// Handle to a declared secret scope, carrying enough of the scope's shape
/// to declare secrets under it with the structural edge wired in.
#[derive(Debug, Clone)]
pub struct SecretScopeHandle {
    handle: ResourceHandle,
    workspace_url: String,
    scope: String,
}

impl SecretScopeHandle {
    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }
}

/// One declared resource: a kind-tagged payload pinned to an executor
/// address, plus its dependency edges. Immutable once declared.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    pub logical_id: String,
    pub executor_address: String,
    pub properties: ResourceProperties,
    pub depends_on: Vec<String>,
}

/// A validated deployment unit, ready for planning.
#[derive(Debug, Clone)]
pub struct DeclaredUnit {
    pub name: String,
    pub resources: Vec<ResourceDescriptor>,
    pub exports: IndexMap<String, String>,
}

struct PendingResource {
    executor_address: String,
    properties: ResourceProperties,
}

/// Accumulates a unit's descriptors, explicit edges, and exports.
pub struct StackBuilder {
    name: String,
    resources: IndexMap<String, PendingResource>,
    explicit_edges: Vec<(String, String)>,
    exports: IndexMap<String, String>,
}

impl StackBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: IndexMap::new(),
            explicit_edges: Vec::new(),
            exports: IndexMap::new(),
        }
    }

    /// Publish an executor this unit owns. The address is exported under
    /// `<unit>/executor` for other units to import.
    pub fn executor(&mut self, address: impl Into<String>) -> ExecutorRef {
        let export_name = format!("{}/executor", self.name);
        self.executor_as(export_name, address)
    }

    /// Publish an executor under a caller-chosen export name.
    pub fn executor_as(&mut self, export_name: impl Into<String>, address: impl Into<String>) -> ExecutorRef {
        let address = address.into();
        self.exports.insert(export_name.into(), address.clone());
        ExecutorRef { address, owned: true }
    }

    /// Adopt an executor address exported by another unit. Descriptors
    /// declared against it are indistinguishable from owned ones.
    pub fn import_executor(&self, address: impl Into<String>) -> ExecutorRef {
        ExecutorRef {
            address: address.into(),
            owned: false,
        }
    }

    /// Declare one resource. The logical id must be unique within the unit.
    pub fn declare(
        &mut self,
        logical_id: impl Into<String>,
        executor: &ExecutorRef,
        properties: ResourceProperties,
    ) -> Result<ResourceHandle, DeployError> {
        let logical_id = logical_id.into();
        if self.resources.contains_key(&logical_id) {
            return Err(DeployError::DuplicateResource(logical_id));
        }
        debug!(logical_id = %logical_id, kind = %properties.kind(), "resource declared");
        self.resources.insert(
            logical_id.clone(),
            PendingResource {
                executor_address: executor.address.clone(),
                properties,
            },
        );
        Ok(ResourceHandle { logical_id })
    }

    /// Declare a secret scope and keep its shape around so secrets can be
    /// declared under it.
    pub fn secret_scope(
        &mut self,
        logical_id: impl Into<String>,
        executor: &ExecutorRef,
        properties: SecretScopeProperties,
    ) -> Result<SecretScopeHandle, DeployError> {
        let workspace_url = properties.workspace_url.clone();
        let scope = properties.scope.clone();
        let handle = self.declare(logical_id, executor, ResourceProperties::SecretScope(properties))?;
        Ok(SecretScopeHandle {
            handle,
            workspace_url,
            scope,
        })
    }

    /// Declare a secret under a scope. The structural dependency on the
    /// scope is wired automatically.
    pub fn secret(
        &mut self,
        logical_id: impl Into<String>,
        executor: &ExecutorRef,
        scope: &SecretScopeHandle,
        key: impl Into<String>,
        string_value: impl Into<String>,
    ) -> Result<ResourceHandle, DeployError> {
        let properties = SecretProperties {
            workspace_url: scope.workspace_url.clone(),
            scope: scope.scope.clone(),
            key: key.into(),
            string_value: string_value.into(),
        };
        let handle = self.declare(logical_id, executor, ResourceProperties::Secret(properties))?;
        self.add_dependency(&handle, scope.handle());
        Ok(handle)
    }

    /// Record a structural edge: `dependent` waits for `prerequisite` even
    /// though no attribute flows between them.
    pub fn add_dependency(&mut self, dependent: &ResourceHandle, prerequisite: &ResourceHandle) {
        self.explicit_edges
            .push((dependent.logical_id.clone(), prerequisite.logical_id.clone()));
    }

    /// Publish an arbitrary named value for other units.
    pub fn export(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.exports.insert(name.into(), value.into());
    }

    /// Validate the declared set and fold attribute references into the
    /// dependency edges. Cycles are caught later, at planning.
    pub fn finish(self) -> Result<DeclaredUnit, DeployError> {
        let mut descriptors = Vec::with_capacity(self.resources.len());

        for (logical_id, pending) in &self.resources {
            let mut depends_on: Vec<String> = Vec::new();

            for (dependent, prerequisite) in &self.explicit_edges {
                if dependent != logical_id {
                    continue;
                }
                if prerequisite == logical_id {
                    return Err(DeployError::SelfDependency(logical_id.clone()));
                }
                if !self.resources.contains_key(prerequisite) {
                    return Err(DeployError::UnknownDependency {
                        dependent: logical_id.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
                if !depends_on.contains(prerequisite) {
                    depends_on.push(prerequisite.clone());
                }
            }

            for reference in collect_references(&pending.properties) {
                if reference.logical_id == *logical_id {
                    return Err(DeployError::SelfDependency(logical_id.clone()));
                }
                if !self.resources.contains_key(&reference.logical_id) {
                    return Err(DeployError::UnknownDependency {
                        dependent: logical_id.clone(),
                        prerequisite: reference.logical_id,
                    });
                }
                if !depends_on.contains(&reference.logical_id) {
                    depends_on.push(reference.logical_id);
                }
            }

            descriptors.push(ResourceDescriptor {
                logical_id: logical_id.clone(),
                executor_address: pending.executor_address.clone(),
                properties: pending.properties.clone(),
                depends_on,
            });
        }

        Ok(DeclaredUnit {
            name: self.name,
            resources: descriptors,
            exports: self.exports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lakedeploy_types::resources::{CredentialsProperties, StorageConfigurationProperties, WorkspaceProperties};

    fn credentials(name: &str) -> ResourceProperties {
        ResourceProperties::Credentials(CredentialsProperties {
            credentials_name: name.into(),
            role_arn: "arn:aws:iam::1:role/cross-account".into(),
        })
    }

    #[test]
    fn duplicate_logical_ids_are_rejected_at_declaration() {
        let mut builder = StackBuilder::new("platform");
        let executor = builder.executor("http://localhost:9000");
        builder.declare("creds", &executor, credentials("a")).unwrap();
        let error = builder.declare("creds", &executor, credentials("b")).unwrap_err();
        assert!(matches!(error, DeployError::DuplicateResource(id) if id == "creds"));
    }

    #[test]
    fn owning_executor_publishes_its_address() {
        let mut builder = StackBuilder::new("platform");
        let owned = builder.executor("http://localhost:9000");
        assert!(owned.is_owned());

        let unit = builder.finish().unwrap();
        assert_eq!(unit.exports.get("platform/executor").map(String::as_str), Some("http://localhost:9000"));

        let consumer = StackBuilder::new("workloads");
        let imported = consumer.import_executor(&unit.exports["platform/executor"]);
        assert!(!imported.is_owned());
        assert_eq!(imported.address(), owned.address());
    }

    #[test]
    fn attribute_references_become_dependency_edges() {
        let mut builder = StackBuilder::new("platform");
        let executor = builder.executor("http://localhost:9000");
        let creds = builder.declare("creds", &executor, credentials("main")).unwrap();
        let storage = builder
            .declare(
                "storage",
                &executor,
                ResourceProperties::StorageConfiguration(StorageConfigurationProperties {
                    storage_configuration_name: "root".into(),
                    bucket_name: "platform-root".into(),
                }),
            )
            .unwrap();
        builder
            .declare(
                "workspace",
                &executor,
                ResourceProperties::Workspace(WorkspaceProperties {
                    workspace_name: "main".into(),
                    deployment_name: None,
                    aws_region: "eu-west-1".into(),
                    credentials_id: creds.attr("credentials_id"),
                    storage_configuration_id: storage.attr("storage_configuration_id"),
                    network_id: None,
                    managed_services_customer_managed_key_id: None,
                    pricing_tier: None,
                    storage_customer_managed_key_id: None,
                }),
            )
            .unwrap();

        let unit = builder.finish().unwrap();
        let workspace = unit.resources.iter().find(|r| r.logical_id == "workspace").unwrap();
        assert_eq!(workspace.depends_on, vec!["creds", "storage"]);
    }

    #[test]
    fn references_to_undeclared_resources_fail_validation() {
        let mut builder = StackBuilder::new("platform");
        let executor = builder.executor("http://localhost:9000");
        builder
            .declare(
                "workspace",
                &executor,
                ResourceProperties::Workspace(WorkspaceProperties {
                    workspace_name: "main".into(),
                    deployment_name: None,
                    aws_region: "eu-west-1".into(),
                    credentials_id: "${{ resources.ghost.credentials_id }}".into(),
                    storage_configuration_id: "stor-1".into(),
                    network_id: None,
                    managed_services_customer_managed_key_id: None,
                    pricing_tier: None,
                    storage_customer_managed_key_id: None,
                }),
            )
            .unwrap();

        let error = builder.finish().unwrap_err();
        assert!(matches!(
            error,
            DeployError::UnknownDependency { dependent, prerequisite }
                if dependent == "workspace" && prerequisite == "ghost"
        ));
    }

    #[test]
    fn scoped_secret_waits_on_its_scope() {
        let mut builder = StackBuilder::new("platform");
        let executor = builder.executor("http://localhost:9000");
        let scope = builder
            .secret_scope(
                "ingest-scope",
                &executor,
                SecretScopeProperties {
                    workspace_url: "https://ws.example.com".into(),
                    scope: "ingest".into(),
                    initial_manage_principal: "users".into(),
                },
            )
            .unwrap();
        builder.secret("api-key", &executor, &scope, "api-key", "hunter2").unwrap();

        let unit = builder.finish().unwrap();
        let secret = unit.resources.iter().find(|r| r.logical_id == "api-key").unwrap();
        assert_eq!(secret.depends_on, vec!["ingest-scope"]);
        match &secret.properties {
            ResourceProperties::Secret(properties) => {
                assert_eq!(properties.scope, "ingest");
                assert_eq!(properties.workspace_url, "https://ws.example.com");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
