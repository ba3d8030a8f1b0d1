use actix_web::{HttpResponse, Responder, web};
use actix_web::http::StatusCode;
use tracing::trace;

use crate::api::helpers::json_response;
use crate::api::types::HealthResponse;

/// Health Service
///
/// 只报告进程存活，不访问数据库，始终返回 200。
pub struct HealthService;

impl HealthService {
    pub async fn health_check() -> impl Responder {
        trace!("Received health check request");

        json_response(
            StatusCode::OK,
            &HealthResponse {
                status: "healthy".to_string(),
                timestamp: chrono::Utc::now(),
            },
        )
    }

    pub async fn liveness_check() -> impl Responder {
        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
}
