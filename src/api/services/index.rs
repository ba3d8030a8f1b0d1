//! 根路径与未匹配路由

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use tracing::debug;

use crate::api::helpers::{error_response, json_response};
use crate::api::types::{ErrorDetail, RootResponse};
use crate::config::StaticConfig;

/// `GET /`: API 元信息
pub async fn root(config: web::Data<Arc<StaticConfig>>) -> HttpResponse {
    json_response(
        StatusCode::OK,
        &RootResponse {
            message: config.api.title.clone(),
            version: config.api.version.clone(),
            description: config.api.description.clone(),
        },
    )
}

/// 未匹配路由返回 404 信封
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    debug!("No route for {} {}", req.method(), req.path());
    error_response(
        StatusCode::NOT_FOUND,
        "Not found",
        vec![ErrorDetail::new(
            &["path"],
            format!("No route matches {}", req.path()),
            "not_found_error",
        )],
    )
}
