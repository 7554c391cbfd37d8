// src/health/status.rs
use serde::{Deserialize, Serialize};

use crate::compat::CompatibilityMap;
use crate::health::dependencies::DependencyReport;

/// Overall service status as reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Up,
    Errored,
}

/// The declared compatibility map echoed back to callers, together with the
/// validation errors found in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibleWithReport {
    #[serde(flatten)]
    pub declared: CompatibilityMap,
    pub error: Vec<String>,
}

/// One health computation result. Built fresh on every query and never
/// mutated after return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub name: String,
    pub version: String,
    pub status: Status,
    /// Seconds since this service instance was constructed.
    pub uptime: f64,
    #[serde(rename = "compatibleWith")]
    pub compatible_with: CompatibleWithReport,
    pub dependencies: DependencyReport,
}
