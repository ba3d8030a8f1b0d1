//! API 帮助函数
//!
//! 统一的错误信封：`{message, details: [{loc, msg, type}]}`

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde::Serialize;
use tracing::{debug, error};

use super::types::{ErrorDetail, ErrorResponse};
use crate::errors::GeoError;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 构建错误信封响应
pub fn error_response(
    status: StatusCode,
    message: impl Into<String>,
    details: Vec<ErrorDetail>,
) -> HttpResponse {
    json_response(
        status,
        &ErrorResponse {
            message: message.into(),
            details,
        },
    )
}

/// 422 响应（请求体或批量大小校验失败）
pub fn validation_error(loc: &[&str], msg: impl Into<String>, error_type: &str) -> HttpResponse {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Validation error",
        vec![ErrorDetail::new(loc, msg, error_type)],
    )
}

impl GeoError {
    /// Envelope message for this error
    pub fn envelope_message(&self) -> &'static str {
        match self {
            GeoError::InvalidAddress(_) => "Invalid IP address",
            GeoError::AddressNotFound(_) => "IP address not found",
            GeoError::DatabaseUnavailable(_) | GeoError::DatabaseRead(_) => "Service unavailable",
            GeoError::RateLimited(_) => "Rate limit exceeded",
            GeoError::Internal(_) => "An unexpected error occurred",
        }
    }

    /// Envelope detail entry for this error
    pub fn envelope_detail(&self) -> ErrorDetail {
        match self {
            GeoError::InvalidAddress(msg) => {
                ErrorDetail::new(&["path", "ip_address"], msg, "invalid_ip_address_error")
            }
            GeoError::AddressNotFound(msg) => {
                ErrorDetail::new(&["path", "ip_address"], msg, "ip_address_not_found_error")
            }
            GeoError::DatabaseUnavailable(msg) => {
                ErrorDetail::new(&["server"], msg, "database_unavailable_error")
            }
            GeoError::DatabaseRead(msg) => ErrorDetail::new(&["server"], msg, "database_error"),
            GeoError::RateLimited(msg) => ErrorDetail::new(&["server"], msg, "rate_limit_error"),
            // 不向客户端暴露内部错误细节
            GeoError::Internal(_) => {
                ErrorDetail::new(&["server"], "Internal server error", "generic_error")
            }
        }
    }
}

impl ResponseError for GeoError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            GeoError::Internal(_) | GeoError::DatabaseRead(_) => {
                error!("{} {}: {}", self.code(), self.error_type(), self.message())
            }
            _ => debug!("{} {}: {}", self.code(), self.error_type(), self.message()),
        }
        error_response(
            self.http_status(),
            self.envelope_message(),
            vec![self.envelope_detail()],
        )
    }
}

/// JSON 请求体配置：解析失败返回 422 信封
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let (msg, error_type) = match &err {
        JsonPayloadError::ContentType => (
            "Expected an application/json request body".to_string(),
            "content_type_error",
        ),
        JsonPayloadError::Deserialize(e) => (e.to_string(), "json_invalid"),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            ("Request body is too large".to_string(), "payload_too_large")
        }
        other => (other.to_string(), "value_error"),
    };
    debug!("Rejected request body: {}", msg);
    let response = validation_error(&["body"], msg, error_type);
    InternalError::from_response(err, response).into()
}
