// src/health/dependencies.rs
// Seam for the external dependency-health collaborator.
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Result of a dependency-health check. Everything beyond `deps_were_ok` is
/// opaque detail passed through to the health report untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyReport {
    pub deps_were_ok: bool,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl DependencyReport {
    pub fn ok() -> Self {
        Self {
            deps_were_ok: true,
            details: serde_json::Map::new(),
        }
    }
}

/// External collaborator that reports whether the process's dependencies are
/// satisfied. A failing check is a real error and is propagated, not folded
/// into the report.
#[async_trait]
pub trait DependencyChecker: Send + Sync {
    async fn check(&self) -> Result<DependencyReport>;
}

/// Checker for deployments with nothing to verify: always reports ok,
/// stamped with the check time.
pub struct NoopChecker;

#[async_trait]
impl DependencyChecker for NoopChecker {
    async fn check(&self) -> Result<DependencyReport> {
        let mut details = serde_json::Map::new();
        details.insert("checkedAt".to_string(), serde_json::json!(Utc::now()));
        Ok(DependencyReport {
            deps_were_ok: true,
            details,
        })
    }
}
