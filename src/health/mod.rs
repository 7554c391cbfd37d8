// src/health/mod.rs
mod dependencies;
mod service;
mod status;

pub use dependencies::{DependencyChecker, DependencyReport, NoopChecker};
pub use service::{HealthHook, HealthService, ServiceIdentity};
pub use status::{CompatibleWithReport, HealthStatus, Status};
