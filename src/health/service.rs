// src/health/service.rs
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::compat::{is_compatible_with, CompatibilityMap};
use crate::health::dependencies::DependencyChecker;
use crate::health::status::{CompatibleWithReport, HealthStatus, Status};
use crate::remote::RemoteCompatibilityClient;
use crate::version::is_valid_range;

/// Explicit identity of the running service, injected at construction
/// rather than read from process-global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceIdentity {
    pub name: String,
    pub version: String,
}

/// Hook invoked after every health computation, for metrics or logging.
/// Its return value is ignored; a panic inside it is not swallowed.
pub type HealthHook = Box<dyn Fn() + Send + Sync>;

/// One service instance's health state: immutable configuration plus the
/// construction instant used for uptime. Safe to share across tasks; every
/// computation is an independent pass producing a fresh result.
pub struct HealthService {
    identity: ServiceIdentity,
    compatible_with: CompatibilityMap,
    checker: Arc<dyn DependencyChecker>,
    on_health: Option<HealthHook>,
    remote: RemoteCompatibilityClient,
    started: Instant,
}

impl HealthService {
    pub fn new(
        identity: ServiceIdentity,
        compatible_with: CompatibilityMap,
        checker: Arc<dyn DependencyChecker>,
    ) -> Self {
        Self {
            identity,
            compatible_with,
            checker,
            on_health: None,
            remote: RemoteCompatibilityClient::new(),
            started: Instant::now(),
        }
    }

    /// Install the optional health-computed hook.
    pub fn with_on_health(mut self, hook: HealthHook) -> Self {
        self.on_health = Some(hook);
        self
    }

    /// Swap the HTTP client used for peer queries, e.g. to impose a timeout
    /// at the transport boundary.
    pub fn with_remote_client(mut self, client: reqwest::Client) -> Self {
        self.remote = RemoteCompatibilityClient::with_client(client);
        self
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn compatible_with(&self) -> &CompatibilityMap {
        &self.compatible_with
    }

    /// Compute a fresh health report.
    ///
    /// Invalid declared ranges are collected as error strings; they mark the
    /// status `ERRORED` but never abort the computation. A failure of the
    /// dependency checker itself does abort: it propagates to the caller,
    /// which owns turning it into an error response.
    pub async fn compute_health(&self) -> Result<HealthStatus> {
        let errors: Vec<String> = self
            .compatible_with
            .iter()
            .filter(|(_, range)| !is_valid_range(range))
            .map(|(name, _)| {
                format!("invalid semantic version range on compatibleWith['{name}']")
            })
            .collect();

        let dependencies = self.checker.check().await?;

        let status = if !errors.is_empty() || !dependencies.deps_were_ok {
            Status::Errored
        } else {
            Status::Up
        };

        if let Some(hook) = &self.on_health {
            hook();
        }

        Ok(HealthStatus {
            name: self.identity.name.clone(),
            version: self.identity.version.clone(),
            status,
            uptime: self.started.elapsed().as_secs_f64(),
            compatible_with: CompatibleWithReport {
                declared: self.compatible_with.clone(),
                error: errors,
            },
            dependencies,
        })
    }

    /// Decide whether `(name, version)` satisfies this instance's declared
    /// constraints. Fails closed for unknown names and unparseable input.
    pub fn is_compatible_with(&self, name: &str, version: &str) -> bool {
        is_compatible_with(&self.compatible_with, name, version)
    }

    /// Fetch a peer's self-reported identity from its health endpoint and
    /// check it against the local constraints. Any remote failure reports
    /// `false`; unreachable and incompatible are indistinguishable here.
    pub async fn check_compatibility_with(&self, peer_health_url: &str) -> bool {
        self.remote
            .check_compatibility_with(&self.compatible_with, peer_health_url)
            .await
    }
}
