//! Deployment driver.
//!
//! Executes a plan against an [`ExecutorRunner`]: replacement deletes first,
//! then creates and updates in dependency order, then removals in reverse
//! order of the previous graph. Dependents of a failed resource are skipped,
//! independent resources keep going, and nothing is rolled back. A failed
//! delete orphans the resource and aborts the run; the record is kept for
//! operator intervention.

use std::collections::HashMap;

use lakedeploy_types::{ActionRequest, ActionResponse};
use tracing::{debug, info, warn};

use crate::context::DeclaredUnit;
use crate::dispatch::ExecutorRunner;
use crate::error::DeployError;
use crate::lifecycle::{ResourceState, StackState};
use crate::plan::{self, PlannedAction, PlannedDelete};
use crate::resolve::{AttributeContext, interpolate_properties};

/// Per-resource result of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    /// Substituted payload matched the deployed record; nothing dispatched.
    Unchanged,
    Deleted,
    Failed { reason: String },
    /// Never dispatched because a prerequisite did not succeed.
    Skipped { blocked_on: String },
}

#[derive(Debug, Clone)]
pub struct ResourceOutcome {
    pub logical_id: String,
    pub outcome: Outcome,
}

/// Ordered record of everything a run did. A replaced logical id appears
/// twice: once for the old record's delete, once for the new create.
#[derive(Debug, Clone, Default)]
pub struct DeploymentReport {
    pub outcomes: Vec<ResourceOutcome>,
}

impl DeploymentReport {
    fn push(&mut self, logical_id: impl Into<String>, outcome: Outcome) {
        self.outcomes.push(ResourceOutcome {
            logical_id: logical_id.into(),
            outcome,
        });
    }

    /// The last outcome recorded for a logical id.
    pub fn outcome_for(&self, logical_id: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .rev()
            .find(|entry| entry.logical_id == logical_id)
            .map(|entry| &entry.outcome)
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|entry| matches!(entry.outcome, Outcome::Failed { .. }))
            .count()
    }
}

/// One declared unit bound to the snapshot it converges.
pub struct Deployment {
    unit: DeclaredUnit,
    state: StackState,
}

impl Deployment {
    pub fn new(unit: DeclaredUnit, state: StackState) -> Self {
        Self { unit, state }
    }

    /// The snapshot as of the last completed dispatch. Valid to persist
    /// even after a run aborts on an orphaned resource.
    pub fn state(&self) -> &StackState {
        &self.state
    }

    pub fn into_state(self) -> StackState {
        self.state
    }

    /// Converge the snapshot onto the declared unit.
    pub fn run(&mut self, runner: &dyn ExecutorRunner) -> Result<DeploymentReport, DeployError> {
        let plan = plan::plan(&self.unit, &self.state)?;
        let mut context = AttributeContext::from_state(&self.state);
        let mut report = DeploymentReport::default();

        info!(
            unit = %self.unit.name,
            steps = plan.steps.len(),
            replacements = plan.replacements.len(),
            removals = plan.removals.len(),
            "deployment run started"
        );

        for planned in &plan.replacements {
            delete_record(&mut self.state, &mut context, runner, planned, &mut report)?;
        }

        let mut succeeded: HashMap<String, bool> = HashMap::new();
        for step in &plan.steps {
            let descriptor = step.descriptor;
            let logical_id = descriptor.logical_id.as_str();

            if let Some(blocked_on) = blocked_dependency(&descriptor.depends_on, &succeeded) {
                info!(logical_id, blocked_on, "resource skipped due to dependency");
                report.push(
                    logical_id,
                    Outcome::Skipped {
                        blocked_on: blocked_on.to_string(),
                    },
                );
                succeeded.insert(logical_id.to_string(), false);
                continue;
            }

            let properties = match interpolate_properties(logical_id, &descriptor.properties, &context) {
                Ok(properties) => properties,
                Err(error @ DeployError::MissingAttribute { .. }) => {
                    warn!(logical_id, error = %error, "payload references an unreported attribute");
                    report.push(logical_id, Outcome::Failed { reason: error.to_string() });
                    succeeded.insert(logical_id.to_string(), false);
                    continue;
                }
                Err(error) => return Err(error),
            };

            match step.action {
                PlannedAction::Create => {
                    let request = ActionRequest::create(properties.clone());
                    let response = dispatch_or_fold(runner, &descriptor.executor_address, &request);
                    let settled = ResourceState::dispatching(request.request_type).settle(response.is_success());
                    if response.is_success() {
                        self.state.apply_create(
                            logical_id,
                            properties.kind(),
                            descriptor.executor_address.clone(),
                            properties,
                            descriptor.depends_on.clone(),
                            &response,
                        )?;
                        if let Some(record) = self.state.get(logical_id) {
                            context.record(logical_id, &record.physical_resource_id, &record.attributes);
                        }
                        debug!(logical_id, state = ?settled, "resource created");
                        report.push(logical_id, Outcome::Created);
                        succeeded.insert(logical_id.to_string(), true);
                    } else {
                        let reason = failure_reason(&response);
                        warn!(logical_id, state = ?settled, reason = %reason, "create failed; resource treated as never created");
                        report.push(logical_id, Outcome::Failed { reason });
                        succeeded.insert(logical_id.to_string(), false);
                    }
                }
                PlannedAction::Reconcile => {
                    let Some(previous) = self.state.get(logical_id).cloned() else {
                        return Err(DeployError::UnknownResource(logical_id.to_string()));
                    };
                    if properties == previous.properties {
                        debug!(logical_id, "payload unchanged, dispatch skipped");
                        report.push(logical_id, Outcome::Unchanged);
                        succeeded.insert(logical_id.to_string(), true);
                        continue;
                    }
                    let request = ActionRequest::update(
                        properties.clone(),
                        previous.properties.clone(),
                        previous.physical_resource_id.clone(),
                    );
                    let response = dispatch_or_fold(runner, &descriptor.executor_address, &request);
                    let settled = ResourceState::dispatching(request.request_type).settle(response.is_success());
                    if response.is_success() {
                        self.state
                            .apply_update(logical_id, properties, descriptor.depends_on.clone(), &response)?;
                        if let Some(record) = self.state.get(logical_id) {
                            context.record(logical_id, &record.physical_resource_id, &record.attributes);
                        }
                        debug!(logical_id, state = ?settled, "resource updated");
                        report.push(logical_id, Outcome::Updated);
                        succeeded.insert(logical_id.to_string(), true);
                    } else {
                        let reason = failure_reason(&response);
                        warn!(logical_id, state = ?settled, reason = %reason, "update failed; deployed record untouched");
                        report.push(logical_id, Outcome::Failed { reason });
                        succeeded.insert(logical_id.to_string(), false);
                    }
                }
            }
        }

        for planned in &plan.removals {
            delete_record(&mut self.state, &mut context, runner, planned, &mut report)?;
        }

        info!(
            unit = %self.unit.name,
            outcomes = report.outcomes.len(),
            failed = report.failed_count(),
            "deployment run finished"
        );
        Ok(report)
    }

    /// Delete every deployed record, dependents first.
    pub fn destroy(&mut self, runner: &dyn ExecutorRunner) -> Result<DeploymentReport, DeployError> {
        let order = plan::delete_order(&self.state.resources);
        let mut context = AttributeContext::from_state(&self.state);
        let mut report = DeploymentReport::default();

        info!(unit = %self.unit.name, records = order.len(), "destroy started");
        for logical_id in order {
            let Some(record) = self.state.get(&logical_id).cloned() else {
                continue;
            };
            let planned = PlannedDelete { logical_id, record };
            delete_record(&mut self.state, &mut context, runner, &planned, &mut report)?;
        }
        Ok(report)
    }
}

fn delete_record(
    state: &mut StackState,
    context: &mut AttributeContext,
    runner: &dyn ExecutorRunner,
    planned: &PlannedDelete,
    report: &mut DeploymentReport,
) -> Result<(), DeployError> {
    let request = ActionRequest::delete(planned.record.properties.clone(), planned.record.physical_resource_id.clone());
    let response = dispatch_or_fold(runner, &planned.record.executor_address, &request);
    let settled = ResourceState::dispatching(request.request_type).settle(response.is_success());
    if response.is_success() {
        state.apply_delete(&planned.logical_id);
        context.forget(&planned.logical_id);
        debug!(logical_id = %planned.logical_id, state = ?settled, "resource deleted");
        report.push(planned.logical_id.clone(), Outcome::Deleted);
        Ok(())
    } else {
        let reason = failure_reason(&response);
        warn!(
            logical_id = %planned.logical_id,
            physical_resource_id = %planned.record.physical_resource_id,
            state = ?settled,
            reason = %reason,
            "delete failed; record kept for operator intervention"
        );
        Err(DeployError::OrphanedResource {
            logical_id: planned.logical_id.clone(),
            physical_id: planned.record.physical_resource_id.clone(),
            reason,
        })
    }
}

/// Transport errors fold into a synthetic failure so the lifecycle sees one
/// uniform answer shape.
fn dispatch_or_fold(runner: &dyn ExecutorRunner, address: &str, request: &ActionRequest) -> ActionResponse {
    match runner.dispatch(address, request) {
        Ok(response) => response,
        Err(error) => {
            warn!(address, error = %format!("{error:#}"), "executor unreachable");
            ActionResponse::failed(format!("executor unreachable: {error:#}"))
        }
    }
}

fn failure_reason(response: &ActionResponse) -> String {
    response
        .reason
        .clone()
        .unwrap_or_else(|| "executor reported failure without a reason".to_string())
}

/// First prerequisite that has not succeeded in this run, if any.
fn blocked_dependency<'a>(dependencies: &'a [String], succeeded: &HashMap<String, bool>) -> Option<&'a str> {
    dependencies
        .iter()
        .find(|dependency| !succeeded.get(*dependency).copied().unwrap_or(false))
        .map(String::as_str)
}
