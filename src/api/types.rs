//! API 类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::geoip::{BatchFailure, BatchResult, GeolocationResponse};

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub description: String,
}

/// `POST /ip/batch` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchIpRequest {
    pub ip_addresses: Vec<String>,
}

/// A failed entry of a batch response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchIpError {
    pub ip: String,
    pub error: String,
    pub detail: Option<String>,
}

impl From<BatchFailure> for BatchIpError {
    fn from(failure: BatchFailure) -> Self {
        Self {
            ip: failure.address,
            error: failure.kind.label().to_string(),
            detail: Some(failure.detail),
        }
    }
}

/// `POST /ip/batch` response body
#[derive(Debug, Clone, Serialize)]
pub struct BatchIpResponse {
    pub results: Vec<GeolocationResponse>,
    pub errors: Vec<BatchIpError>,
}

impl From<BatchResult> for BatchIpResponse {
    fn from(result: BatchResult) -> Self {
        Self {
            results: result.successes,
            errors: result.failures.into_iter().map(BatchIpError::from).collect(),
        }
    }
}

/// One entry of the error envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    /// Location of the problem, e.g. `["path", "ip_address"]` or `["body", "ip_addresses"]`
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

impl ErrorDetail {
    pub fn new(loc: &[&str], msg: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            loc: loc.iter().map(|s| serde_json::Value::from(*s)).collect(),
            msg: msg.into(),
            error_type: error_type.into(),
        }
    }
}

/// Error envelope returned for every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub message: String,
    pub details: Vec<ErrorDetail>,
}
