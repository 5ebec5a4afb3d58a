//! Executor endpoint client.
//!
//! This module provides a lightweight HTTP client for dispatching action
//! envelopes to an executor service. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Discovering a bearer token from `LAKEDEPLOY_EXECUTOR_TOKEN`
//! - Validating the executor address for safety
//! - Posting [`ActionRequest`] payloads and decoding [`ActionResponse`]s
//!
//! The primary entry point is [`ExecutorClient`]. Create an instance via
//! [`ExecutorClient::new`], then dispatch envelopes with
//! [`ExecutorClient::dispatch`].

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use lakedeploy_types::{ActionRequest, ActionResponse};
use reqwest::{Client, Url, header};
use tracing::debug;

/// Environment variable holding the bearer token presented to executors.
pub const EXECUTOR_TOKEN_ENV: &str = "LAKEDEPLOY_EXECUTOR_TOKEN";

/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Executor actions can take minutes; workspace provisioning is the worst
/// offender. The deadline applies per dispatched envelope.
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(300);

const USER_AGENT: &str = concat!("lakedeploy/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for one executor
/// endpoint.
///
/// The client pre-configures default headers and posts envelopes to a
/// validated address. Authentication is read from the environment at
/// construction time.
pub struct ExecutorClient {
    pub address: String,
    pub http: Client,
}

impl ExecutorClient {
    /// Construct an [`ExecutorClient`] for the given endpoint address.
    ///
    /// A bearer token is taken from `LAKEDEPLOY_EXECUTOR_TOKEN` when set;
    /// unauthenticated executors are accepted for local development.
    /// Non-localhost addresses must use HTTPS.
    pub fn new(address: &str) -> Result<Self> {
        validate_executor_address(address)?;

        let mut default_headers = header::HeaderMap::new();
        if let Ok(token) = env::var(EXECUTOR_TOKEN_ENV) {
            let authorization_header_value = format!("Bearer {}", token);
            default_headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&authorization_header_value)
                    .context("executor token is not a valid header value")?,
            );
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers)
            .timeout(DISPATCH_TIMEOUT)
            .build()
            .context("build http client")?;

        Ok(Self {
            address: address.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Post one action envelope and decode the executor's answer.
    ///
    /// Transport and decode failures surface as errors; a `Failed` status in
    /// a well-formed response does not.
    pub async fn dispatch(&self, request: &ActionRequest) -> Result<ActionResponse> {
        let url = self.address.clone();
        debug!(%url, request_type = %request.request_type, "dispatching action");

        let http_response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("executor at '{}' unreachable", self.address))?;

        let status = http_response.status();
        if !status.is_success() {
            let body = http_response.text().await.unwrap_or_default();
            return Err(anyhow!("executor at '{}' answered {}: {}", self.address, status, body));
        }

        http_response
            .json::<ActionResponse>()
            .await
            .with_context(|| format!("executor at '{}' returned an undecodable response", self.address))
    }
}

/// Validate that an executor address is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_executor_address(address: &str) -> Result<()> {
    let parsed = Url::parse(address).map_err(|e| anyhow!("Invalid executor address '{}': {}", address, e))?;

    let host_name = parsed
        .host_str()
        .ok_or_else(|| anyhow!("executor address must include a host"))?;

    // Local development allowances: localhost/127.0.0.1 with any scheme.
    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        return Err(anyhow!(
            "executor address must use https for non-localhost hosts; got '{}://'",
            parsed.scheme()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_accepts_plain_http() {
        assert!(validate_executor_address("http://localhost:9000/dispatch").is_ok());
        assert!(validate_executor_address("http://127.0.0.1:9000").is_ok());
    }

    #[test]
    fn remote_hosts_require_https() {
        assert!(validate_executor_address("https://executor.internal.example.com/dispatch").is_ok());
        let err = validate_executor_address("http://executor.internal.example.com/dispatch").unwrap_err();
        assert!(err.to_string().contains("https"));
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        assert!(validate_executor_address("not a url").is_err());
        assert!(validate_executor_address("file:///tmp/executor").is_err());
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client = ExecutorClient::new("http://localhost:9000/dispatch/").unwrap();
        assert_eq!(client.address, "http://localhost:9000/dispatch");
    }
}
