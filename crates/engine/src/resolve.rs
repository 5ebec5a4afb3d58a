//! Derived-attribute resolution.
//!
//! Property payloads may embed `${{ resources.<id>.<attribute> }}` tokens in
//! their string fields. During a run the engine accumulates the attributes
//! each executor reported into an [`AttributeContext`] and substitutes the
//! tokens just before dispatch. The plan guarantees the producing resource
//! ran first, so an unresolvable token means the executor never reported
//! that attribute, and the dependent fails before anything leaves the
//! process.

use std::collections::HashMap;

use indexmap::IndexMap;
use lakedeploy_types::ResourceProperties;
use lakedeploy_util::refs::{AttributeRef, PHYSICAL_ID_ATTRIBUTE, find_refs, replace_refs};
use serde_json::Value;

use crate::error::DeployError;
use crate::lifecycle::StackState;

/// Attributes available for substitution, per logical id. The physical id
/// rides along under [`PHYSICAL_ID_ATTRIBUTE`] next to whatever the executor
/// reported.
#[derive(Debug, Default, Clone)]
pub struct AttributeContext {
    resources: HashMap<String, IndexMap<String, String>>,
}

impl AttributeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the context from a previous run's snapshot so unchanged
    /// resources keep satisfying their dependents.
    pub fn from_state(state: &StackState) -> Self {
        let mut context = Self::new();
        for (logical_id, record) in &state.resources {
            context.record(logical_id, &record.physical_resource_id, &record.attributes);
        }
        context
    }

    /// Record a resource's identity and attributes after a successful
    /// create or update, replacing anything recorded before.
    pub fn record(&mut self, logical_id: &str, physical_resource_id: &str, attributes: &IndexMap<String, String>) {
        let mut merged = attributes.clone();
        merged.insert(PHYSICAL_ID_ATTRIBUTE.to_string(), physical_resource_id.to_string());
        self.resources.insert(logical_id.to_string(), merged);
    }

    /// Drop a resource after a successful delete.
    pub fn forget(&mut self, logical_id: &str) {
        self.resources.remove(logical_id);
    }

    pub fn lookup(&self, reference: &AttributeRef) -> Option<&str> {
        self.resources
            .get(&reference.logical_id)
            .and_then(|attributes| attributes.get(&reference.attribute))
            .map(String::as_str)
    }
}

/// Scan a payload for every attribute reference it embeds, first occurrence
/// order, deduplicated.
pub fn collect_references(properties: &ResourceProperties) -> Vec<AttributeRef> {
    let mut references = Vec::new();
    collect_from_value(&properties.to_wire_map().into(), &mut references);
    references
}

fn collect_from_value(value: &Value, references: &mut Vec<AttributeRef>) {
    match value {
        Value::String(text) => {
            for reference in find_refs(text) {
                if !references.contains(&reference) {
                    references.push(reference);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_from_value(item, references);
            }
        }
        Value::Object(map) => {
            for nested in map.values() {
                collect_from_value(nested, references);
            }
        }
        _ => {}
    }
}

/// Substitute every reference token in a payload, failing on the first
/// token the context cannot satisfy.
pub fn interpolate_properties(
    logical_id: &str,
    properties: &ResourceProperties,
    context: &AttributeContext,
) -> Result<ResourceProperties, DeployError> {
    for reference in collect_references(properties) {
        if context.lookup(&reference).is_none() {
            return Err(DeployError::MissingAttribute {
                consumer: logical_id.to_string(),
                producer: reference.logical_id,
                attribute: reference.attribute,
            });
        }
    }

    let raw = serde_json::to_value(properties).map_err(|error| DeployError::PayloadSubstitution {
        logical_id: logical_id.to_string(),
        detail: error.to_string(),
    })?;
    let substituted = interpolate_value(&raw, context);
    serde_json::from_value(substituted).map_err(|error| DeployError::PayloadSubstitution {
        logical_id: logical_id.to_string(),
        detail: error.to_string(),
    })
}

/// Recursively substitute reference tokens in a JSON value. Tokens the
/// context cannot satisfy are left in place for the caller to report.
pub fn interpolate_value(value: &Value, context: &AttributeContext) -> Value {
    match value {
        Value::String(text) => Value::String(replace_refs(text, |reference| {
            context.lookup(reference).map(str::to_string)
        })),
        Value::Array(items) => Value::Array(items.iter().map(|item| interpolate_value(item, context)).collect()),
        Value::Object(map) => {
            let mut substituted = serde_json::Map::new();
            for (key, nested) in map {
                substituted.insert(key.clone(), interpolate_value(nested, context));
            }
            Value::Object(substituted)
        }
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;
    use lakedeploy_types::resources::{ResourceProperties, WorkspaceProperties};

    fn workspace_payload() -> ResourceProperties {
        ResourceProperties::Workspace(WorkspaceProperties {
            workspace_name: "main".into(),
            deployment_name: None,
            aws_region: "eu-west-1".into(),
            credentials_id: "${{ resources.creds.credentials_id }}".into(),
            storage_configuration_id: "${{ resources.storage.storage_configuration_id }}".into(),
            network_id: None,
            managed_services_customer_managed_key_id: None,
            pricing_tier: None,
            storage_customer_managed_key_id: None,
        })
    }

    #[test]
    fn collects_references_across_fields() {
        let references = collect_references(&workspace_payload());
        assert_eq!(
            references,
            vec![
                AttributeRef::new("creds", "credentials_id"),
                AttributeRef::new("storage", "storage_configuration_id"),
            ]
        );
    }

    #[test]
    fn substitutes_recorded_attributes() {
        let mut context = AttributeContext::new();
        context.record("creds", "cred-1", &indexmap! {"credentials_id".to_string() => "cred-1".to_string()});
        context.record(
            "storage",
            "stor-1",
            &indexmap! {"storage_configuration_id".to_string() => "stor-1".to_string()},
        );

        let substituted = interpolate_properties("workspace", &workspace_payload(), &context).unwrap();
        match substituted {
            ResourceProperties::Workspace(workspace) => {
                assert_eq!(workspace.credentials_id, "cred-1");
                assert_eq!(workspace.storage_configuration_id, "stor-1");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn missing_attribute_names_producer_and_consumer() {
        let mut context = AttributeContext::new();
        context.record("creds", "cred-1", &IndexMap::new());

        let error = interpolate_properties("workspace", &workspace_payload(), &context).unwrap_err();
        match error {
            DeployError::MissingAttribute {
                consumer,
                producer,
                attribute,
            } => {
                assert_eq!(consumer, "workspace");
                assert_eq!(producer, "creds");
                assert_eq!(attribute, "credentials_id");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn physical_id_is_always_available() {
        let mut context = AttributeContext::new();
        context.record("scope", "ingest-scope", &IndexMap::new());
        let reference = AttributeRef::new("scope", PHYSICAL_ID_ATTRIBUTE);
        assert_eq!(context.lookup(&reference), Some("ingest-scope"));
    }
}
