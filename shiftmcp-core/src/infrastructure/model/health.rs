//! Provider connectivity results

use super::types::ModelError;
use crate::domain::outcome::ErrorKind;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    Unreachable,
    AuthFailed,
}

/// Result of the most recent explicit probe of one provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderHealth {
    pub status: HealthStatus,
    pub checked_at: DateTime<Utc>,
    #[serde(rename = "latency_ms", serialize_with = "serialize_latency")]
    pub latency: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProviderHealth {
    pub fn ok(latency: Duration) -> Self {
        Self::new(HealthStatus::Ok, Some(latency), None)
    }

    pub fn new(status: HealthStatus, latency: Option<Duration>, detail: Option<String>) -> Self {
        Self {
            status,
            checked_at: Utc::now(),
            latency,
            detail,
        }
    }

    /// Classify a failed probe. A rate-limited or unparseable answer still
    /// proves the backend is reachable and accepted the credential.
    pub fn from_error(error: &ModelError, latency: Duration) -> Self {
        let status = match error.kind() {
            ErrorKind::ProviderAuthFailure => HealthStatus::AuthFailed,
            ErrorKind::ProviderRateLimited | ErrorKind::ProviderBadResponse => HealthStatus::Ok,
            _ => HealthStatus::Unreachable,
        };
        Self::new(status, Some(latency), Some(error.to_string()))
    }

    pub fn is_ok(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

fn serialize_latency<S: Serializer>(
    latency: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match latency {
        Some(latency) => serializer.serialize_u64(latency.as_millis() as u64),
        None => serializer.serialize_none(),
    }
}
