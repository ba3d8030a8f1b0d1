//! 客户端 IP 提取
//!
//! 用于 `GET /ip`：解析调用方自身的地址。

use std::net::SocketAddr;

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use tracing::debug;

/// Used when neither headers nor the transport reveal the caller
pub const FALLBACK_CLIENT_IP: &str = "127.0.0.1";

/// 从 HttpRequest 提取客户端 IP
///
/// 优先级：X-Forwarded-For 第一项 → X-Real-IP → 连接地址 → 127.0.0.1
/// 返回原始文本，由调用方校验。
pub fn extract_client_ip(req: &HttpRequest) -> String {
    resolve_client_ip(req.headers(), req.peer_addr())
}

pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = extract_forwarded_ip_from_headers(headers) {
        debug!("Client IP from forwarding headers: {}", forwarded);
        return forwarded;
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => {
            debug!("No peer address available, falling back to {}", FALLBACK_CLIENT_IP);
            FALLBACK_CLIENT_IP.to_string()
        }
    }
}

/// 从 HeaderMap 提取转发的 IP
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    // 优先 X-Forwarded-For（取第一个，即原始客户端 IP）
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}
