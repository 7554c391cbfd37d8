// src/lib.rs
pub mod compat;
pub mod config;
pub mod health;
pub mod remote;
pub mod server;
pub mod version;

pub use compat::{is_compatible_with, CompatibilityMap};
pub use health::{HealthService, HealthStatus, ServiceIdentity, Status};
pub use server::{HealthServer, ServerHandle};
