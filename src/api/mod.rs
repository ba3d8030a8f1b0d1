//! HTTP API
//!
//! 路由、处理函数、中间件与错误信封。

pub mod constants;
pub mod helpers;
pub mod middleware;
pub mod services;
pub mod types;

use actix_web::web;

use crate::runtime::lifetime::startup::AppContext;

/// Register shared state and every route on an app
///
/// Used by the server and by the integration tests so both see the same app.
pub fn configure(context: AppContext) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(context.config.clone()))
            .app_data(web::Data::new(context.service.clone()))
            .app_data(helpers::json_config())
            .route("/", web::get().to(services::root))
            .service(services::health_routes())
            .service(services::geolocation_routes())
            .default_service(web::to(services::not_found));
    }
}
