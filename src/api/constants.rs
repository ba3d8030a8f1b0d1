//! API 模块常量定义

/// 批量查询最少地址数
pub const MIN_BATCH_SIZE: usize = 1;

/// 批量查询最多地址数
pub const MAX_BATCH_SIZE: usize = 100;

/// 请求 ID 响应头
pub const REQUEST_ID_HEADER: &str = "x-request-id";
