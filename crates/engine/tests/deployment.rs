//! End-to-end deployment scenarios over scripted executor doubles.

use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::{Result, bail};
use indexmap::{IndexMap, indexmap};
use lakedeploy_engine::{Deployment, DeployError, ExecutorRunner, NoopRunner, Outcome, StackBuilder, StackState};
use lakedeploy_types::{ActionRequest, ActionResponse, DispatchStatus, RequestType, ResourceKind, ResourceProperties};
use lakedeploy_types::resources::{
    ClusterPolicyProperties, ClusterPolicySpec, CredentialsProperties, SecretScopeProperties,
    StorageConfigurationProperties, UserProperties, WorkspaceProperties,
};

/// Captures every envelope and answers from a script keyed by kind tag and
/// request type. Unscripted envelopes succeed, echoing the request's
/// physical id when it carries one and minting a synthetic id otherwise.
#[derive(Default)]
struct RecordingRunner {
    requests: RefCell<Vec<(String, ActionRequest)>>,
    scripted: HashMap<(String, RequestType), ActionResponse>,
}

impl RecordingRunner {
    fn script(mut self, kind: ResourceKind, request_type: RequestType, response: ActionResponse) -> Self {
        self.scripted.insert((kind.as_str().to_string(), request_type), response);
        self
    }

    fn dispatched(&self) -> Vec<(String, RequestType)> {
        self.requests
            .borrow()
            .iter()
            .map(|(_, request)| (request.resource_properties.kind().as_str().to_string(), request.request_type))
            .collect()
    }

    fn request_at(&self, index: usize) -> ActionRequest {
        self.requests.borrow()[index].1.clone()
    }
}

impl ExecutorRunner for RecordingRunner {
    fn dispatch(&self, address: &str, request: &ActionRequest) -> Result<ActionResponse> {
        self.requests.borrow_mut().push((address.to_string(), request.clone()));
        let key = (request.resource_properties.kind().as_str().to_string(), request.request_type);
        if let Some(response) = self.scripted.get(&key) {
            return Ok(response.clone());
        }
        // Updates and deletes must report the identity they were handed.
        if let Some(physical_resource_id) = &request.physical_resource_id {
            return Ok(success(physical_resource_id, IndexMap::new()));
        }
        Ok(success(
            &format!("{}-1", request.resource_properties.kind()),
            IndexMap::new(),
        ))
    }
}

/// Fails transport-level for one kind, succeeds for everything else.
struct UnreachableFor(ResourceKind);

impl ExecutorRunner for UnreachableFor {
    fn dispatch(&self, _address: &str, request: &ActionRequest) -> Result<ActionResponse> {
        if request.resource_properties.kind() == self.0 {
            bail!("connection refused");
        }
        if let Some(physical_resource_id) = &request.physical_resource_id {
            return Ok(success(physical_resource_id, IndexMap::new()));
        }
        Ok(success(
            &format!("{}-1", request.resource_properties.kind()),
            IndexMap::new(),
        ))
    }
}

fn success(physical_resource_id: &str, attributes: IndexMap<String, String>) -> ActionResponse {
    ActionResponse {
        status: DispatchStatus::Success,
        physical_resource_id: Some(physical_resource_id.into()),
        attributes,
        reason: None,
    }
}

fn failed(reason: &str) -> ActionResponse {
    ActionResponse::failed(reason)
}

fn credentials_properties() -> CredentialsProperties {
    CredentialsProperties {
        credentials_name: "main".into(),
        role_arn: "arn:aws:iam::1:role/cross-account".into(),
    }
}

fn account_unit() -> lakedeploy_engine::DeclaredUnit {
    let mut builder = StackBuilder::new("platform");
    let executor = builder.executor("http://localhost:9000");
    let creds = builder
        .declare("creds", &executor, ResourceProperties::Credentials(credentials_properties()))
        .unwrap();
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
    builder.finish().unwrap()
}

/// Runner whose creds and storage responses carry the attributes the
/// workspace payload references.
fn scripted_account_runner() -> RecordingRunner {
    RecordingRunner::default()
        .script(
            ResourceKind::Credentials,
            RequestType::Create,
            success("cred-1", indexmap! {"credentials_id".to_string() => "cred-1".to_string()}),
        )
        .script(
            ResourceKind::StorageConfiguration,
            RequestType::Create,
            success("stor-1", indexmap! {"storage_configuration_id".to_string() => "stor-1".to_string()}),
        )
}

#[test]
fn create_dispatches_flat_payload_and_records_identity() {
    let mut builder = StackBuilder::new("platform");
    let executor = builder.executor("http://localhost:9000");
    builder
        .declare("creds", &executor, ResourceProperties::Credentials(credentials_properties()))
        .unwrap();
    let unit = builder.finish().unwrap();

    let runner = RecordingRunner::default().script(
        ResourceKind::Credentials,
        RequestType::Create,
        success("123", indexmap! {"credentials_id".to_string() => "123".to_string()}),
    );

    let mut deployment = Deployment::new(unit, StackState::new());
    let report = deployment.run(&runner).unwrap();

    assert_eq!(report.outcome_for("creds"), Some(&Outcome::Created));
    let record = deployment.state().get("creds").unwrap();
    assert_eq!(record.physical_resource_id, "123");
    assert_eq!(record.attributes["credentials_id"], "123");

    let request = runner.request_at(0);
    assert_eq!(request.request_type, RequestType::Create);
    assert!(request.physical_resource_id.is_none());
    let wire = serde_json::to_value(&request.resource_properties).unwrap();
    assert_eq!(wire["action"], "credentials");
    assert_eq!(wire["credentials_name"], "main");
    assert_eq!(wire["role_arn"], "arn:aws:iam::1:role/cross-account");
}

#[test]
fn workspace_waits_for_its_prerequisites_and_sees_their_attributes() {
    let runner = RecordingRunner::default()
        .script(
            ResourceKind::Credentials,
            RequestType::Create,
            success("cred-1", indexmap! {"credentials_id".to_string() => "cred-1".to_string()}),
        )
        .script(
            ResourceKind::StorageConfiguration,
            RequestType::Create,
            success("stor-1", indexmap! {"storage_configuration_id".to_string() => "stor-1".to_string()}),
        );

    let mut deployment = Deployment::new(account_unit(), StackState::new());
    let report = deployment.run(&runner).unwrap();
    assert_eq!(report.outcome_for("workspace"), Some(&Outcome::Created));

    let dispatched = runner.dispatched();
    assert_eq!(
        dispatched.last(),
        Some(&("workspaces".to_string(), RequestType::Create)),
        "workspace must dispatch after its prerequisites: {dispatched:?}"
    );

    let workspace_request = runner.request_at(2);
    match workspace_request.resource_properties {
        ResourceProperties::Workspace(workspace) => {
            assert_eq!(workspace.credentials_id, "cred-1");
            assert_eq!(workspace.storage_configuration_id, "stor-1");
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn failed_create_skips_dependents_and_leaves_no_record() {
    let runner = RecordingRunner::default().script(
        ResourceKind::Credentials,
        RequestType::Create,
        failed("role not assumable"),
    );

    let mut deployment = Deployment::new(account_unit(), StackState::new());
    let report = deployment.run(&runner).unwrap();

    assert!(matches!(
        report.outcome_for("creds"),
        Some(Outcome::Failed { reason }) if reason == "role not assumable"
    ));
    assert!(matches!(
        report.outcome_for("workspace"),
        Some(Outcome::Skipped { blocked_on }) if blocked_on == "creds"
    ));
    // Independent of the failed branch, storage still deploys.
    assert_eq!(report.outcome_for("storage"), Some(&Outcome::Created));

    assert!(deployment.state().get("creds").is_none());
    // Never created, so a later destroy must not dispatch a delete for it.
    let destroy_runner = RecordingRunner::default();
    deployment.destroy(&destroy_runner).unwrap();
    assert!(
        !destroy_runner
            .dispatched()
            .iter()
            .any(|(kind, _)| kind == "credentials")
    );
}

#[test]
fn unchanged_payload_is_not_dispatched_again() {
    let runner = scripted_account_runner();
    let mut deployment = Deployment::new(account_unit(), StackState::new());
    deployment.run(&runner).unwrap();
    let first_run_count = runner.dispatched().len();
    assert_eq!(first_run_count, 3);

    let state = deployment.into_state();
    let second_runner = RecordingRunner::default();
    let mut second = Deployment::new(account_unit(), state);
    let report = second.run(&second_runner).unwrap();

    assert!(second_runner.dispatched().is_empty());
    assert_eq!(report.outcome_for("creds"), Some(&Outcome::Unchanged));
    assert_eq!(report.outcome_for("workspace"), Some(&Outcome::Unchanged));
}

#[test]
fn update_echoes_stored_identity_and_previous_payload() {
    let mut builder = StackBuilder::new("platform");
    let executor = builder.executor("http://localhost:9000");
    builder
        .declare("creds", &executor, ResourceProperties::Credentials(credentials_properties()))
        .unwrap();
    let mut deployment = Deployment::new(builder.finish().unwrap(), StackState::new());
    deployment.run(&NoopRunner).unwrap();
    let state = deployment.into_state();

    let mut builder = StackBuilder::new("platform");
    let executor = builder.executor("http://localhost:9000");
    builder
        .declare(
            "creds",
            &executor,
            ResourceProperties::Credentials(CredentialsProperties {
                credentials_name: "renamed".into(),
                role_arn: "arn:aws:iam::1:role/cross-account".into(),
            }),
        )
        .unwrap();
    let unit = builder.finish().unwrap();

    let runner = RecordingRunner::default();
    let mut second = Deployment::new(unit, state);
    let report = second.run(&runner).unwrap();

    assert_eq!(report.outcome_for("creds"), Some(&Outcome::Updated));
    let update = runner
        .requests
        .borrow()
        .iter()
        .map(|(_, request)| request.clone())
        .find(|request| request.request_type == RequestType::Update)
        .unwrap();
    assert_eq!(update.physical_resource_id.as_deref(), Some("noop-credentials"));
    match update.old_resource_properties.unwrap() {
        ResourceProperties::Credentials(previous) => assert_eq!(previous.credentials_name, "main"),
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn failed_update_keeps_identity_and_attributes() {
    let runner = RecordingRunner::default().script(
        ResourceKind::ClusterPolicy,
        RequestType::Create,
        success("policy-1", indexmap! {"policy_id".to_string() => "policy-1".to_string()}),
    );

    let policy = |definition: &str| {
        ResourceProperties::ClusterPolicy(ClusterPolicyProperties {
            workspace_url: "https://ws.example.com".into(),
            cluster_policy: ClusterPolicySpec {
                name: "pinned".into(),
                description: None,
                definition: definition.into(),
            },
        })
    };

    let mut builder = StackBuilder::new("workloads");
    let executor = builder.executor("http://localhost:9000");
    builder.declare("policy", &executor, policy("{}")).unwrap();
    let mut deployment = Deployment::new(builder.finish().unwrap(), StackState::new());
    deployment.run(&runner).unwrap();
    let state = deployment.into_state();

    let mut builder = StackBuilder::new("workloads");
    let executor = builder.executor("http://localhost:9000");
    builder
        .declare("policy", &executor, policy(r#"{"spark_version":{"type":"fixed"}}"#))
        .unwrap();
    let failing = RecordingRunner::default().script(ResourceKind::ClusterPolicy, RequestType::Update, failed("definition rejected"));
    let mut second = Deployment::new(builder.finish().unwrap(), state);
    let report = second.run(&failing).unwrap();

    assert!(matches!(
        report.outcome_for("policy"),
        Some(Outcome::Failed { reason }) if reason == "definition rejected"
    ));
    let record = second.state().get("policy").unwrap();
    assert_eq!(record.physical_resource_id, "policy-1");
    assert_eq!(record.attributes["policy_id"], "policy-1");
    match &record.properties {
        ResourceProperties::ClusterPolicy(stored) => assert_eq!(stored.cluster_policy.definition, "{}"),
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn removed_resources_delete_in_reverse_dependency_order() {
    let mut deployment = Deployment::new(account_unit(), StackState::new());
    deployment.run(&scripted_account_runner()).unwrap();
    let state = deployment.into_state();

    let mut builder = StackBuilder::new("platform");
    builder.executor("http://localhost:9000");
    let unit = builder.finish().unwrap();

    let runner = RecordingRunner::default();
    let mut second = Deployment::new(unit, state);
    let report = second.run(&runner).unwrap();

    let dispatched = runner.dispatched();
    assert_eq!(dispatched[0], ("workspaces".to_string(), RequestType::Delete));
    assert!(dispatched[1..]
        .iter()
        .all(|(_, request_type)| *request_type == RequestType::Delete));
    assert_eq!(report.outcome_for("workspace"), Some(&Outcome::Deleted));
    assert!(second.state().is_empty());
}

#[test]
fn failed_delete_orphans_the_resource_and_keeps_its_record() {
    let mut builder = StackBuilder::new("platform");
    let executor = builder.executor("http://localhost:9000");
    builder
        .declare("creds", &executor, ResourceProperties::Credentials(credentials_properties()))
        .unwrap();
    let mut deployment = Deployment::new(builder.finish().unwrap(), StackState::new());
    deployment.run(&NoopRunner).unwrap();
    let state = deployment.into_state();

    let runner = RecordingRunner::default().script(ResourceKind::Credentials, RequestType::Delete, failed("still in use"));
    let mut builder = StackBuilder::new("platform");
    builder.executor("http://localhost:9000");
    let mut second = Deployment::new(builder.finish().unwrap(), state);

    let error = second.run(&runner).unwrap_err();
    assert!(matches!(
        error,
        DeployError::OrphanedResource { ref logical_id, ref physical_id, .. }
            if logical_id == "creds" && physical_id == "noop-credentials"
    ));
    // The record survives for operator intervention.
    assert_eq!(second.state().get("creds").unwrap().physical_resource_id, "noop-credentials");
}

#[test]
fn unreachable_executor_folds_into_failure_without_mutating_state() {
    let runner = UnreachableFor(ResourceKind::Credentials);
    let mut deployment = Deployment::new(account_unit(), StackState::new());
    let report = deployment.run(&runner).unwrap();

    assert!(matches!(
        report.outcome_for("creds"),
        Some(Outcome::Failed { reason }) if reason.contains("executor unreachable")
    ));
    assert!(deployment.state().get("creds").is_none());
    assert!(matches!(report.outcome_for("workspace"), Some(Outcome::Skipped { .. })));
}

#[test]
fn kind_change_replaces_delete_first_then_create() {
    let mut builder = StackBuilder::new("workloads");
    let executor = builder.executor("http://localhost:9000");
    builder
        .declare("principal", &executor, ResourceProperties::Credentials(credentials_properties()))
        .unwrap();
    let mut deployment = Deployment::new(builder.finish().unwrap(), StackState::new());
    deployment.run(&NoopRunner).unwrap();
    let state = deployment.into_state();

    let mut builder = StackBuilder::new("workloads");
    let executor = builder.executor("http://localhost:9000");
    builder
        .declare(
            "principal",
            &executor,
            ResourceProperties::User(UserProperties {
                workspace_url: "https://ws.example.com".into(),
                user_name: "ada@example.com".into(),
            }),
        )
        .unwrap();

    let runner = RecordingRunner::default();
    let mut second = Deployment::new(builder.finish().unwrap(), state);
    let report = second.run(&runner).unwrap();

    let dispatched = runner.dispatched();
    assert_eq!(
        dispatched,
        vec![
            ("credentials".to_string(), RequestType::Delete),
            ("user".to_string(), RequestType::Create),
        ]
    );
    assert_eq!(report.outcome_for("principal"), Some(&Outcome::Created));
    assert_eq!(second.state().get("principal").unwrap().kind, ResourceKind::User);
}

#[test]
fn removed_dependents_of_a_replaced_record_delete_before_it() {
    let mut deployment = Deployment::new(account_unit(), StackState::new());
    deployment.run(&scripted_account_runner()).unwrap();
    let state = deployment.into_state();

    // "creds" changes kind while "workspace" (which depends on it) and
    // "storage" are dropped. The workspace delete must precede the old
    // creds record's delete; storage is independent and stays in the
    // trailing removal phase.
    let mut builder = StackBuilder::new("platform");
    let executor = builder.executor("http://localhost:9000");
    builder
        .declare(
            "creds",
            &executor,
            ResourceProperties::User(UserProperties {
                workspace_url: "https://ws.example.com".into(),
                user_name: "ada@example.com".into(),
            }),
        )
        .unwrap();

    let runner = RecordingRunner::default();
    let mut second = Deployment::new(builder.finish().unwrap(), state);
    let report = second.run(&runner).unwrap();

    assert_eq!(
        runner.dispatched(),
        vec![
            ("workspaces".to_string(), RequestType::Delete),
            ("credentials".to_string(), RequestType::Delete),
            ("user".to_string(), RequestType::Create),
            ("storage-configurations".to_string(), RequestType::Delete),
        ]
    );
    assert_eq!(report.outcome_for("workspace"), Some(&Outcome::Deleted));
    assert_eq!(report.outcome_for("creds"), Some(&Outcome::Created));
    assert_eq!(second.state().get("creds").unwrap().kind, ResourceKind::User);
}

#[test]
fn independent_resources_deploy_regardless_of_declaration_order() {
    let mut builder = StackBuilder::new("identity");
    let executor = builder.executor("http://localhost:9000");
    for name in ["carol", "alice", "bob"] {
        builder
            .declare(
                name,
                &executor,
                ResourceProperties::User(UserProperties {
                    workspace_url: "https://ws.example.com".into(),
                    user_name: format!("{name}@example.com"),
                }),
            )
            .unwrap();
    }

    let runner = RecordingRunner::default();
    let mut deployment = Deployment::new(builder.finish().unwrap(), StackState::new());
    let report = deployment.run(&runner).unwrap();

    assert_eq!(runner.dispatched().len(), 3);
    for name in ["carol", "alice", "bob"] {
        assert_eq!(report.outcome_for(name), Some(&Outcome::Created));
    }
}

#[test]
fn scoped_secret_deploys_after_its_scope_and_destroy_reverses() {
    let mut builder = StackBuilder::new("secrets");
    let executor = builder.executor("http://localhost:9000");
    let scope = builder
        .secret_scope(
            "scope",
            &executor,
            SecretScopeProperties {
                workspace_url: "https://ws.example.com".into(),
                scope: "ingest".into(),
                initial_manage_principal: "users".into(),
            },
        )
        .unwrap();
    builder.secret("api-key", &executor, &scope, "api-key", "hunter2").unwrap();

    let runner = RecordingRunner::default();
    let mut deployment = Deployment::new(builder.finish().unwrap(), StackState::new());
    deployment.run(&runner).unwrap();
    assert_eq!(
        runner.dispatched(),
        vec![
            ("secret-scope".to_string(), RequestType::Create),
            ("secret".to_string(), RequestType::Create),
        ]
    );

    let destroy_runner = RecordingRunner::default();
    deployment.destroy(&destroy_runner).unwrap();
    assert_eq!(
        destroy_runner.dispatched(),
        vec![
            ("secret".to_string(), RequestType::Delete),
            ("secret-scope".to_string(), RequestType::Delete),
        ]
    );
    assert!(deployment.state().is_empty());
}
