use std::fmt::Display;

use serde::Serialize;
use utoipa::ToSchema;

/// Overall service status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The catalog store answered.
    Ok,
    /// The catalog store did not answer.
    Degraded,
}

/// Body of the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Why the catalog store failed its ping, when it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_error: Option<String>,
}

impl HealthResponse {
    /// The store answered its ping.
    pub fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
            storage_error: None,
        }
    }

    /// The store could not be reached.
    pub fn degraded(reason: impl Display) -> Self {
        Self {
            status: HealthStatus::Degraded,
            storage_error: Some(reason.to_string()),
        }
    }
}
