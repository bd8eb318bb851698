// SPDX-License-Identifier: Apache-2.0

//! HTTP health probing.
//!
//! Services expose a well-known health path; the API backend additionally
//! reports whether its dictionary engine is loaded in the response body.
//! The body is parsed structurally (tolerating unknown fields), never by
//! substring matching.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{StackError, StackResult};
use crate::types::ServiceName;

/// How long a probe waits before a service counts as not responding.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimal schema of the API health response. The backend sends more
/// fields (status text, auth info); only the capability flag matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthSnapshot {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub dictionary_loaded: bool,
}

impl HealthSnapshot {
    /// Parse a health response body. Returns None for anything that is not
    /// a JSON object - the caller falls back to reporting the raw body.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

/// Raw result of one HTTP GET against a health endpoint.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// True when the endpoint answered with a success status.
    pub reachable: bool,
    /// Response body (empty when the endpoint did not answer).
    pub body: String,
}

impl ProbeOutcome {
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            body: String::new(),
        }
    }
}

/// Capability: can be queried for health at a URL. A connection failure or
/// non-2xx status is an unreachable outcome, not an error - health checks
/// are best-effort diagnostics.
pub trait HealthProbe {
    fn get(&self, url: &str) -> impl Future<Output = ProbeOutcome> + Send;
}

/// Health state of one service endpoint.
#[derive(Debug, Clone)]
pub struct EndpointHealth {
    pub name: ServiceName,
    pub base_url: String,
    pub health_url: String,
    pub reachable: bool,
    /// Whether this endpoint's body is the one carrying the capability
    /// snapshot (`inspect_body` in the service config).
    pub inspected: bool,
    /// Raw response body, when the endpoint answered.
    pub body: Option<String>,
    /// Parsed capability snapshot, for endpoints whose body is inspected.
    pub snapshot: Option<HealthSnapshot>,
}

impl EndpointHealth {
    /// Whether the service reports its dictionary engine as loaded.
    /// None when the endpoint's body is not inspected or did not parse.
    pub fn dictionary_loaded(&self) -> Option<bool> {
        self.snapshot.as_ref().map(|s| s.dictionary_loaded)
    }
}

/// Per-endpoint health, probed independently: one endpoint failing never
/// suppresses the check of another.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub endpoints: Vec<EndpointHealth>,
}

impl HealthReport {
    pub fn all_healthy(&self) -> bool {
        self.endpoints.iter().all(|e| e.reachable)
    }
}

/// Production probe over a reqwest client with a fixed request timeout.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> StackResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| StackError::HttpClient {
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl HealthProbe for HttpProbe {
    async fn get(&self, url: &str) -> ProbeOutcome {
        match self.client.get(url).send().await {
            Ok(response) => {
                let reachable = response.status().is_success();
                let body = response.text().await.unwrap_or_default();
                ProbeOutcome { reachable, body }
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Health probe failed");
                ProbeOutcome::unreachable()
            }
        }
    }
}
