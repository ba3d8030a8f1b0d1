//! Geolocation API
//!
//! - `GET /ip`（或 `/ip/`）：查询调用方自身 IP
//! - `GET /ip/{address}`：查询指定 IP
//! - `POST /ip/batch`：批量查询（1-100 个）

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::constants::{MAX_BATCH_SIZE, MIN_BATCH_SIZE};
use crate::api::helpers::{json_response, validation_error};
use crate::api::types::{BatchIpRequest, BatchIpResponse};
use crate::errors::GeoError;
use crate::services::{Address, GeolocationService};
use crate::utils::extract_client_ip;

pub struct GeolocationApi;

impl GeolocationApi {
    /// 查询调用方自身 IP
    pub async fn lookup_requester(
        req: HttpRequest,
        service: web::Data<Arc<GeolocationService>>,
    ) -> Result<HttpResponse, GeoError> {
        let client_ip = extract_client_ip(&req);
        debug!("Resolving requester address {}", client_ip);
        Self::lookup_text(&client_ip, &service).await
    }

    /// 查询指定 IP
    pub async fn lookup_address(
        path: web::Path<String>,
        service: web::Data<Arc<GeolocationService>>,
    ) -> Result<HttpResponse, GeoError> {
        Self::lookup_text(&path.into_inner(), &service).await
    }

    async fn lookup_text(text: &str, service: &GeolocationService) -> Result<HttpResponse, GeoError> {
        let address = Address::parse(text)?;
        let response = service.lookup(address).await?;
        Ok(json_response(StatusCode::OK, &response))
    }

    /// 批量查询
    ///
    /// 数量越界返回 422，不会触发任何查询。单个地址的失败放入 `errors`。
    pub async fn lookup_batch(
        body: web::Json<BatchIpRequest>,
        service: web::Data<Arc<GeolocationService>>,
    ) -> HttpResponse {
        let count = body.ip_addresses.len();
        if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&count) {
            let (msg, error_type) = if count < MIN_BATCH_SIZE {
                (
                    format!("List should have at least {} item", MIN_BATCH_SIZE),
                    "too_short",
                )
            } else {
                (
                    format!(
                        "List should have at most {} items, got {}",
                        MAX_BATCH_SIZE, count
                    ),
                    "too_long",
                )
            };
            return validation_error(&["body", "ip_addresses"], msg, error_type);
        }

        info!("Geolocation API: batch request - {} addresses", count);

        let result = service.resolve_batch(&body.ip_addresses).await;
        json_response(StatusCode::OK, &BatchIpResponse::from(result))
    }
}

/// Geolocation 路由配置
pub fn geolocation_routes() -> actix_web::Scope {
    web::scope("/ip")
        .route("", web::get().to(GeolocationApi::lookup_requester))
        .route("/", web::get().to(GeolocationApi::lookup_requester))
        .route("/batch", web::post().to(GeolocationApi::lookup_batch))
        .route("/{address}", web::get().to(GeolocationApi::lookup_address))
}
