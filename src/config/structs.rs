use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，分隔符为 `__`
pub const ENV_PREFIX: &str = "GEOLIUS";

/// 静态配置（从 TOML + 环境变量加载，启动后不可变）
///
/// - server: 监听地址、端口、worker 数量
/// - geoip: MaxMind 数据库路径与查询超时
/// - api: API 元信息与 CORS
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub geoip: GeoIpConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config file > 默认值
    /// 示例：GEOLIUS__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        match Self::try_load(path) {
            Ok(config) => {
                if Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] Failed to load config: {}", e);
                Self::default()
            }
        }
    }

    /// Like [`StaticConfig::load`] but reports failures instead of falling back
    pub fn try_load(path: &str) -> Result<Self, config::ConfigError> {
        use config::{Config, Environment, File};

        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<StaticConfig>()
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// MaxMind 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpConfig {
    #[serde(default = "default_city_db_path")]
    pub city_db_path: String,
    /// Optional; an empty string disables ASN enrichment.
    #[serde(default = "default_asn_db_path")]
    pub asn_db_path: Option<String>,
    /// Seconds allowed for a single database query
    #[serde(default = "default_db_timeout")]
    pub db_timeout: f64,
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

impl GeoIpConfig {
    pub fn city_db_path(&self) -> PathBuf {
        PathBuf::from(&self.city_db_path)
    }

    pub fn asn_db_path(&self) -> Option<PathBuf> {
        self.asn_db_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn query_timeout(&self) -> Duration {
        if self.db_timeout.is_finite() && self.db_timeout > 0.0 {
            Duration::from_secs_f64(self.db_timeout)
        } else {
            Duration::from_secs_f64(default_db_timeout())
        }
    }

    pub fn batch_concurrency(&self) -> usize {
        self.batch_concurrency.max(1)
    }
}

/// API 元信息与 CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_title")]
    pub title: String,
    #[serde(default = "default_api_version")]
    pub version: String,
    #[serde(default = "default_api_description")]
    pub description: String,
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_city_db_path() -> String {
    "data/GeoLite2-City.mmdb".to_string()
}

fn default_asn_db_path() -> Option<String> {
    Some("data/GeoLite2-ASN.mmdb".to_string())
}

fn default_db_timeout() -> f64 {
    5.0
}

fn default_batch_concurrency() -> usize {
    16
}

fn default_api_title() -> String {
    "IP Geolocation API".to_string()
}

fn default_api_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_api_description() -> String {
    "A RESTful API service for retrieving geolocation information based on IP addresses"
        .to_string()
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            city_db_path: default_city_db_path(),
            asn_db_path: default_asn_db_path(),
            db_timeout: default_db_timeout(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            title: default_api_title(),
            version: default_api_version(),
            description: default_api_description(),
            cors_allowed_origins: default_cors_allowed_origins(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
