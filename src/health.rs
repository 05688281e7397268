use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::transport::{CredentialsMode, FetchRequest, Transport};

pub const HEALTH_PATH: &str = "/health";

/// Body served by the API's health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Check the health endpoint. Does not send cookies.
pub async fn check_health(transport: &dyn Transport) -> Result<HealthStatus> {
    let request = FetchRequest::get(HEALTH_PATH, CredentialsMode::Omit);
    let response = transport.get(&request).await?;

    let status = response.status();
    if status != 200 {
        return Err(AppError::Health(format!("{HEALTH_PATH} returned {status}")));
    }

    let health: HealthStatus = response.json().await?;
    tracing::info!(status = %health.status, message = %health.message, "Health check");

    if !health.is_ok() {
        return Err(AppError::Health(format!(
            "Service reported {}: {}",
            health.status, health.message
        )));
    }

    Ok(health)
}
