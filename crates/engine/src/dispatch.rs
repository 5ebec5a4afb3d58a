//! Executor dispatch runners.
//!
//! The engine hands every envelope to an [`ExecutorRunner`] and treats the
//! round trip as its only suspension point. The default runner echoes
//! synthetic successes for tests and previews; the HTTP runner rides on
//! `lakedeploy-api` and blocks on the async client.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use lakedeploy_api::ExecutorClient;
use lakedeploy_types::{ActionRequest, ActionResponse, DispatchStatus, RequestType};
use lakedeploy_util::block_on_future;
use tracing::debug;

/// Dispatch a single action envelope to the executor at `address`.
///
/// Engines can provide concrete implementations that call HTTP or other
/// backends. Errors are transport-level; an executor that answers `Failed`
/// is a successful dispatch.
pub trait ExecutorRunner {
    fn dispatch(&self, address: &str, request: &ActionRequest) -> Result<ActionResponse>;
}

/// A runner that acknowledges every envelope without side effects. Creates
/// mint a synthetic physical id; updates and deletes echo the id they were
/// given. Useful for tests and previews.
#[derive(Debug, Default)]
pub struct NoopRunner;

impl ExecutorRunner for NoopRunner {
    fn dispatch(&self, _address: &str, request: &ActionRequest) -> Result<ActionResponse> {
        let physical_resource_id = match request.request_type {
            RequestType::Create => Some(format!("noop-{}", request.resource_properties.kind())),
            RequestType::Update | RequestType::Delete => request.physical_resource_id.clone(),
        };
        Ok(ActionResponse {
            status: DispatchStatus::Success,
            physical_resource_id,
            attributes: IndexMap::new(),
            reason: None,
        })
    }
}

/// HTTP-backed runner. Clients are built once per executor address and
/// reused across dispatches.
#[derive(Debug, Default)]
pub struct HttpExecutorRunner {
    clients: Mutex<HashMap<String, ExecutorClient>>,
}

impl HttpExecutorRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn client_for(&self, address: &str) -> Result<ExecutorClient> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|_| anyhow::anyhow!("executor client cache poisoned"))?;
        if let Some(client) = clients.get(address) {
            return Ok(client.clone());
        }
        let client = ExecutorClient::new(address).with_context(|| format!("configure executor at '{address}'"))?;
        clients.insert(address.to_string(), client.clone());
        Ok(client)
    }
}

impl ExecutorRunner for HttpExecutorRunner {
    fn dispatch(&self, address: &str, request: &ActionRequest) -> Result<ActionResponse> {
        debug!(
            address = %address,
            request_type = %request.request_type,
            kind = %request.resource_properties.kind(),
            "http runner dispatching envelope"
        );
        let client = self.client_for(address)?;
        let request = request.clone();
        block_on_future(async move { client.dispatch(&request).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lakedeploy_types::ResourceProperties;
    use lakedeploy_types::resources::CredentialsProperties;

    fn credentials() -> ResourceProperties {
        ResourceProperties::Credentials(CredentialsProperties {
            credentials_name: "main".into(),
            role_arn: "arn:aws:iam::1:role/x".into(),
        })
    }

    #[test]
    fn noop_runner_mints_ids_for_creates() {
        let response = NoopRunner.dispatch("http://localhost:9000", &ActionRequest::create(credentials())).unwrap();
        assert!(response.is_success());
        assert_eq!(response.physical_resource_id.as_deref(), Some("noop-credentials"));
    }

    #[test]
    fn noop_runner_echoes_ids_for_deletes() {
        let response = NoopRunner
            .dispatch("http://localhost:9000", &ActionRequest::delete(credentials(), "cred-1"))
            .unwrap();
        assert!(response.is_success());
        assert_eq!(response.physical_resource_id.as_deref(), Some("cred-1"));
    }
}
