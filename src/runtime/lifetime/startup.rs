use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::StaticConfig;
use crate::services::GeolocationService;

/// Shared state handed to every request handler
///
/// Built once at startup. Handlers receive its parts through `web::Data`.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<StaticConfig>,
    pub service: Arc<GeolocationService>,
}

impl AppContext {
    pub fn new(config: Arc<StaticConfig>, service: Arc<GeolocationService>) -> Self {
        Self { config, service }
    }
}

/// 准备服务器启动的上下文
///
/// 构建查询服务并预先打开数据库。City 数据库缺失不会阻止启动：
/// 请求会返回 503，下一次查询时重试打开。
pub async fn prepare_server_startup(config: Arc<StaticConfig>) -> Result<AppContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let service = Arc::new(GeolocationService::from_config(&config.geoip));

    match service.initialize().await {
        Ok(()) => info!(
            "Geolocation databases ready (ASN enrichment: {})",
            if service.readers().has_asn() { "enabled" } else { "disabled" }
        ),
        Err(e) => warn!(
            "Geolocation database not available yet, lookups will return 503 until it is: {}",
            e.message()
        ),
    }

    debug!("Pre-startup processing completed in {:?}", start_time.elapsed());
    Ok(AppContext::new(config, service))
}
