//! Dependency ordering and run planning.
//!
//! A plan is the declared unit diffed against the previous snapshot:
//! creates and revisits in topological dependency order, deletes in reverse
//! order of the graph the deleted records were deployed under. Kind changes
//! for a surviving logical id plan as a replacement: the old record's delete
//! runs before the create phase, preceded by any removed record that
//! depended on it.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;

use crate::context::{DeclaredUnit, ResourceDescriptor};
use crate::error::DeployError;
use crate::lifecycle::{DeployedResource, StackState};

/// What the driver should do for one declared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    /// No record exists; dispatch a create.
    Create,
    /// A record of the same kind exists; update or skip once the payload
    /// is substituted and compared.
    Reconcile,
}

#[derive(Debug)]
pub struct PlannedStep<'a> {
    pub descriptor: &'a ResourceDescriptor,
    pub action: PlannedAction,
}

/// A delete the driver must dispatch, carrying the record it was planned
/// from so the envelope survives the record's removal from state.
#[derive(Debug, Clone)]
pub struct PlannedDelete {
    pub logical_id: String,
    pub record: DeployedResource,
}

#[derive(Debug)]
pub struct DeploymentPlan<'a> {
    /// Old records of kind-changed logical ids, preceded by any removed
    /// record that depends on one of them; dispatched before creates,
    /// dependents first.
    pub replacements: Vec<PlannedDelete>,
    /// Declared resources in dependency order.
    pub steps: Vec<PlannedStep<'a>>,
    /// Remaining records with no surviving declaration; dispatched after
    /// the steps, dependents first.
    pub removals: Vec<PlannedDelete>,
}

/// Diff the declared unit against the previous snapshot.
pub fn plan<'a>(unit: &'a DeclaredUnit, state: &StackState) -> Result<DeploymentPlan<'a>, DeployError> {
    let ordered = order_for_execution(&unit.resources)?;

    let declared_ids: HashSet<&str> = unit.resources.iter().map(|r| r.logical_id.as_str()).collect();
    let mut replaced_ids: HashSet<&str> = HashSet::new();

    let mut steps = Vec::with_capacity(ordered.len());
    for descriptor in ordered {
        let action = match state.get(&descriptor.logical_id) {
            Some(record) if record.kind == descriptor.properties.kind() => PlannedAction::Reconcile,
            Some(_) => {
                replaced_ids.insert(descriptor.logical_id.as_str());
                PlannedAction::Create
            }
            None => PlannedAction::Create,
        };
        steps.push(PlannedStep { descriptor, action });
    }

    // A removed record that depends on a replaced one must be deleted
    // before it, so it moves into the replacement phase. delete_order
    // already puts dependents first; the partition preserves that order.
    let replacement_dependents = transitive_dependents(&state.resources, &replaced_ids);
    let mut replacements = Vec::new();
    let mut removals = Vec::new();
    for logical_id in delete_order(&state.resources) {
        let record = state.resources[&logical_id].clone();
        let planned = PlannedDelete {
            logical_id: logical_id.clone(),
            record,
        };
        if replaced_ids.contains(logical_id.as_str()) {
            replacements.push(planned);
        } else if !declared_ids.contains(logical_id.as_str()) {
            if replacement_dependents.contains(&logical_id) {
                replacements.push(planned);
            } else {
                removals.push(planned);
            }
        }
    }

    Ok(DeploymentPlan {
        replacements,
        steps,
        removals,
    })
}

/// Records that transitively depend on any of the given roots, per the
/// edges stored in the snapshot.
fn transitive_dependents(records: &IndexMap<String, DeployedResource>, roots: &HashSet<&str>) -> HashSet<String> {
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    for (logical_id, record) in records {
        for dependency in &record.depends_on {
            dependents.entry(dependency.as_str()).or_default().push(logical_id.as_str());
        }
    }

    let mut reached: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<&str> = roots.iter().copied().collect();
    while let Some(logical_id) = queue.pop_front() {
        if let Some(children) = dependents.get(logical_id) {
            for &child in children {
                if reached.insert(child.to_string()) {
                    queue.push_back(child);
                }
            }
        }
    }
    reached
}

/// Build a topologically ordered resource list for execution.
///
/// Returns an error for duplicate identifiers, unknown dependencies,
/// self-dependencies, or cycles.
pub fn order_for_execution(resources: &[ResourceDescriptor]) -> Result<Vec<&ResourceDescriptor>, DeployError> {
    let mut lookup: IndexMap<String, &ResourceDescriptor> = IndexMap::new();
    for resource in resources {
        if lookup.contains_key(&resource.logical_id) {
            return Err(DeployError::DuplicateResource(resource.logical_id.clone()));
        }
        lookup.insert(resource.logical_id.clone(), resource);
    }

    let mut in_degrees: HashMap<String, usize> = lookup.keys().map(|id| (id.clone(), 0)).collect();
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();

    for (logical_id, resource) in &lookup {
        let mut seen_dependencies = HashSet::new();
        for dependency in &resource.depends_on {
            if !lookup.contains_key(dependency) {
                return Err(DeployError::UnknownDependency {
                    dependent: logical_id.clone(),
                    prerequisite: dependency.clone(),
                });
            }
            if dependency == logical_id {
                return Err(DeployError::SelfDependency(logical_id.clone()));
            }
            if !seen_dependencies.insert(dependency) {
                continue;
            }
            *in_degrees.get_mut(logical_id).expect("in-degree entry exists") += 1;
            adjacency.entry(dependency.clone()).or_default().push(logical_id.clone());
        }
    }

    let mut queue: VecDeque<String> = lookup
        .keys()
        .filter(|id| in_degrees.get(*id).copied().unwrap_or(0) == 0)
        .cloned()
        .collect();

    let mut ordered = Vec::with_capacity(lookup.len());
    while let Some(logical_id) = queue.pop_front() {
        ordered.push(logical_id.clone());

        if let Some(children) = adjacency.get(&logical_id) {
            for child in children {
                let degree = in_degrees.get_mut(child).expect("dependent resource should exist in degrees");
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(child.clone());
                }
            }
        }
    }

    if ordered.len() != lookup.len() {
        let mut remaining: Vec<String> = in_degrees
            .into_iter()
            .filter(|(_, degree)| *degree > 0)
            .map(|(id, _)| id)
            .collect();
        remaining.sort();
        return Err(DeployError::DependencyCycle(remaining.join(", ")));
    }

    Ok(ordered.into_iter().map(|id| lookup[&id]).collect())
}

/// Reverse dependency order over deployed records: dependents before their
/// prerequisites. Edges to records that no longer exist are ignored; the
/// graph was acyclic when deployed, so any leftover (a hand-edited
/// snapshot) is appended rather than rejected.
pub fn delete_order(records: &IndexMap<String, DeployedResource>) -> Vec<String> {
    let mut in_degrees: HashMap<&str, usize> = records.keys().map(|id| (id.as_str(), 0)).collect();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();

    for (logical_id, record) in records {
        for dependency in &record.depends_on {
            if !records.contains_key(dependency) || dependency == logical_id {
                continue;
            }
            *in_degrees.get_mut(logical_id.as_str()).expect("in-degree entry exists") += 1;
            adjacency.entry(dependency.as_str()).or_default().push(logical_id.as_str());
        }
    }

    let mut queue: VecDeque<&str> = records
        .keys()
        .map(String::as_str)
        .filter(|id| in_degrees.get(id).copied().unwrap_or(0) == 0)
        .collect();

    let mut ordered: Vec<String> = Vec::with_capacity(records.len());
    let mut seen: HashSet<&str> = HashSet::new();
    while let Some(logical_id) = queue.pop_front() {
        if !seen.insert(logical_id) {
            continue;
        }
        ordered.push(logical_id.to_string());
        if let Some(children) = adjacency.get(logical_id) {
            for &child in children {
                if let Some(degree) = in_degrees.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(child);
                    }
                }
            }
        }
    }

    for logical_id in records.keys() {
        if !seen.contains(logical_id.as_str()) {
            ordered.push(logical_id.clone());
        }
    }

    ordered.reverse();
    ordered
}
