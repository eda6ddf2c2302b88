//! bluegreen-hook - ECS blue/green deployment test hook
//!
//! Probes the green target group through the load balancer's test listener and
//! reports `SUCCEEDED`, `IN_PROGRESS` or `FAILED` back to the deployment.

pub mod config;
pub mod error;
pub mod hook;
pub mod probe;

pub use config::{AppConfig, ConfigError, LogFormat, ProbeConfig};
pub use error::ProbeError;
pub use hook::{function_handler, HookResponse, HookStatus};
pub use probe::Prober;
