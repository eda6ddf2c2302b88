//! ECS blue/green lifecycle hook surface.
//!
//! The orchestrator invokes the hook with an opaque payload and expects a single
//! `hookStatus` field back. `SUCCEEDED` lets the rollout continue, `IN_PROGRESS`
//! asks to be invoked again later, and `FAILED` rolls the deployment back.

use std::fmt;

use lambda_runtime::LambdaEvent;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;

use crate::error::ProbeError;
use crate::probe::Prober;

/// Outcome reported to the deployment orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookStatus {
    Succeeded,
    InProgress,
    Failed,
}

impl HookStatus {
    /// Only an exact 200 counts as healthy; any other status means "not yet".
    pub fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::OK {
            HookStatus::Succeeded
        } else {
            HookStatus::InProgress
        }
    }

    pub fn from_result(result: &Result<StatusCode, ProbeError>) -> Self {
        match result {
            Ok(status) => Self::from_status(*status),
            Err(_) => HookStatus::Failed,
        }
    }

    /// Process exit code for one-shot command line runs
    pub fn exit_code(self) -> u8 {
        match self {
            HookStatus::Succeeded => 0,
            HookStatus::Failed => 1,
            HookStatus::InProgress => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HookStatus::Succeeded => "SUCCEEDED",
            HookStatus::InProgress => "IN_PROGRESS",
            HookStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for HookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hook response body: `{"hookStatus": "..."}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookResponse {
    pub hook_status: HookStatus,
}

impl From<HookStatus> for HookResponse {
    fn from(hook_status: HookStatus) -> Self {
        Self { hook_status }
    }
}

/// Lambda entry point. The payload is accepted and ignored.
///
/// Always returns `Ok`; probe errors are reported as `FAILED`.
pub async fn function_handler(
    prober: &Prober,
    event: LambdaEvent<Value>,
) -> Result<HookResponse, lambda_runtime::Error> {
    let span = tracing::info_span!("hook", request_id = %event.context.request_id);
    let status = prober.probe().instrument(span).await;
    Ok(status.into())
}
