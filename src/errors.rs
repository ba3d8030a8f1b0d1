use std::fmt;

use actix_web::http::StatusCode;

/// Error kinds surfaced per item in batch responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAddress,
    AddressNotFound,
    DatabaseUnavailable,
    Internal,
}

impl ErrorKind {
    /// 批量响应中 `error` 字段使用的标签
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::InvalidAddress => "Invalid IP address format",
            ErrorKind::AddressNotFound => "IP address not found",
            ErrorKind::DatabaseUnavailable => "Database error",
            ErrorKind::Internal => "Internal error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub enum GeoError {
    InvalidAddress(String),
    AddressNotFound(String),
    /// Database file missing, unparsable, closed or timed out. Retryable.
    DatabaseUnavailable(String),
    /// Any other read/decode failure while querying an open database.
    DatabaseRead(String),
    RateLimited(String),
    Internal(String),
}

impl GeoError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeoError::InvalidAddress(_) => "E001",
            GeoError::AddressNotFound(_) => "E002",
            GeoError::DatabaseUnavailable(_) => "E003",
            GeoError::DatabaseRead(_) => "E004",
            GeoError::RateLimited(_) => "E005",
            GeoError::Internal(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeoError::InvalidAddress(_) => "Invalid IP Address",
            GeoError::AddressNotFound(_) => "IP Address Not Found",
            GeoError::DatabaseUnavailable(_) => "Database Unavailable",
            GeoError::DatabaseRead(_) => "Database Read Error",
            GeoError::RateLimited(_) => "Rate Limit Exceeded",
            GeoError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeoError::InvalidAddress(msg)
            | GeoError::AddressNotFound(msg)
            | GeoError::DatabaseUnavailable(msg)
            | GeoError::DatabaseRead(msg)
            | GeoError::RateLimited(msg)
            | GeoError::Internal(msg) => msg,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GeoError::InvalidAddress(_) => ErrorKind::InvalidAddress,
            GeoError::AddressNotFound(_) => ErrorKind::AddressNotFound,
            GeoError::DatabaseUnavailable(_) | GeoError::DatabaseRead(_) => {
                ErrorKind::DatabaseUnavailable
            }
            GeoError::RateLimited(_) | GeoError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GeoError::DatabaseUnavailable(_) | GeoError::RateLimited(_)
        )
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            GeoError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            GeoError::AddressNotFound(_) => StatusCode::NOT_FOUND,
            GeoError::DatabaseUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GeoError::DatabaseRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GeoError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            GeoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Detail text reported for a failed batch item
    pub fn batch_detail(&self) -> String {
        match self {
            GeoError::Internal(msg) => format!("Unexpected error: {}", msg),
            other => other.message().to_string(),
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeoError {}

// 便捷的构造函数
impl GeoError {
    pub fn invalid_address<T: Into<String>>(msg: T) -> Self {
        GeoError::InvalidAddress(msg.into())
    }

    pub fn address_not_found<T: Into<String>>(msg: T) -> Self {
        GeoError::AddressNotFound(msg.into())
    }

    pub fn database_unavailable<T: Into<String>>(msg: T) -> Self {
        GeoError::DatabaseUnavailable(msg.into())
    }

    pub fn database_read<T: Into<String>>(msg: T) -> Self {
        GeoError::DatabaseRead(msg.into())
    }

    pub fn rate_limited<T: Into<String>>(msg: T) -> Self {
        GeoError::RateLimited(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        GeoError::Internal(msg.into())
    }
}

impl From<maxminddb::MaxMindDbError> for GeoError {
    fn from(err: maxminddb::MaxMindDbError) -> Self {
        GeoError::DatabaseRead(format!("Error querying geolocation database: {}", err))
    }
}

impl From<std::io::Error> for GeoError {
    fn from(err: std::io::Error) -> Self {
        GeoError::DatabaseUnavailable(err.to_string())
    }
}

impl From<tokio::task::JoinError> for GeoError {
    fn from(err: tokio::task::JoinError) -> Self {
        GeoError::Internal(format!("database task failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;
