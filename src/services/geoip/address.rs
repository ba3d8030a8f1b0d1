//! IP 地址校验
//!
//! 将文本解析为经过校验的 IPv4 / IPv6 地址，不做 DNS 解析。

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::errors::{GeoError, Result};

/// A validated IPv4 or IPv6 address
///
/// Always printable in canonical textual form (`Display`), and that form
/// parses back to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(IpAddr);

impl Address {
    /// Parse a dotted-quad IPv4 or colon-form IPv6 literal
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(GeoError::invalid_address(
                "IP address must not be empty",
            ));
        }

        text.parse::<IpAddr>().map(Address).map_err(|_| {
            GeoError::invalid_address(format!(
                "The provided IP address '{}' is not a valid IPv4 or IPv6 address",
                text
            ))
        })
    }

    pub fn ip(&self) -> IpAddr {
        self.0
    }

    pub fn is_ipv6(&self) -> bool {
        self.0.is_ipv6()
    }

    /// 检查 IP 是否为私有地址或 localhost
    pub fn is_private_or_local(&self) -> bool {
        match self.0 {
            IpAddr::V4(v4) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
            IpAddr::V6(v6) => {
                // - fc00::/7 (ULA, RFC 4193)
                // - fe80::/10 (Link-local)
                // - ::1 (Loopback)
                v6.is_loopback()
                    || (v6.segments()[0] & 0xfe00) == 0xfc00
                    || (v6.segments()[0] & 0xffc0) == 0xfe80
            }
        }
    }
}

impl FromStr for Address {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        Address::parse(s)
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        Address(ip)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}
