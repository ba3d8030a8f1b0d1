//! Server mode
//!
//! Configures and starts the HTTP server.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api;
use crate::api::middleware::RequestTracing;
use crate::config::StaticConfig;
use crate::runtime::lifetime;

/// CORS configuration loaded from `[api]`
#[derive(Clone, Debug)]
struct CorsSettings {
    allowed_origins: Vec<String>,
    max_age: usize,
}

impl CorsSettings {
    fn from_config(config: &StaticConfig) -> Self {
        Self {
            allowed_origins: config.api.cors_allowed_origins.clone(),
            max_age: 3600,
        }
    }

    fn is_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Build CORS middleware from configuration
///
/// Credentials are never enabled: the API is unauthenticated and any-origin
/// plus credentials would let every site send cookies.
fn build_cors_middleware(settings: &CorsSettings) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "HEAD", "OPTIONS"])
        .allow_any_header()
        .expose_headers(vec![api::constants::REQUEST_ID_HEADER])
        .max_age(settings.max_age);

    if settings.is_any_origin() {
        cors = cors.allow_any_origin();
    } else {
        // Empty origins = same-origin only
        for origin in &settings.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Run the HTTP server
///
/// 1. Builds the application context (service + databases)
/// 2. Configures and starts the HTTP server
/// 3. Waits for Ctrl+C, then closes the databases
///
/// **Note**: Logging must be initialized before calling this function
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let context = lifetime::startup::prepare_server_startup(config.clone())
        .await
        .inspect_err(|e| error!("Server startup failed: {}", e))?;

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    info!("Using {} worker threads", cpu_count);

    let cors_settings = CorsSettings::from_config(&config);
    if cors_settings.allowed_origins.is_empty() {
        warn!("CORS allowed origins is empty, cross-origin requests will be rejected");
    }

    let service_for_shutdown = context.service.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors_middleware(&cors_settings))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate"))
                    .add(("X-Content-Type-Options", "nosniff")),
            )
            .wrap(RequestTracing) // 最外层，记录 request id 与延迟
            .configure(api::configure(context.clone()))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    .disable_signals();

    let bind_address = config.server.bind_address();
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Starting {} at http://{}", config.api.title, bind_address);

    let server = server.run();
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(service_for_shutdown) => {
            handle.stop(true).await;
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}
