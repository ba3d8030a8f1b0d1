use std::sync::{Arc, OnceLock};

use super::StaticConfig;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration. The configuration is loaded
/// once at startup and never changes afterwards.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .cloned()
        .unwrap_or_else(|| Arc::new(StaticConfig::default()))
}

/// Initialize the global configuration
///
/// Loads configuration from `path` (or "config.toml" in the current
/// directory) layered with `GEOLIUS__*` environment variables. Later calls
/// are no-ops and return the already loaded configuration.
///
/// # Examples
/// ```no_run
/// use geolius::config::init_config;
/// let config = init_config(None);
/// println!("{}", config.server.bind_address());
/// ```
pub fn init_config(path: Option<&str>) -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| Arc::new(StaticConfig::load(path)))
        .clone()
}
