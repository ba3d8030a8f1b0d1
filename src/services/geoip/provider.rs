//! Database provider abstraction
//!
//! 统一的数据库读取接口，生产环境使用 MaxMind 实现，测试使用内存 fixture。
//! All methods are blocking; callers run them on the blocking pool.

use std::net::IpAddr;
use std::sync::Arc;

use super::records::{AsnRecord, GeoRecord};
use crate::errors::Result;

/// City/region database
pub trait CityDatabase: Send + Sync {
    /// `Ok(None)` when no entry covers `ip`
    fn lookup_city(&self, ip: IpAddr) -> Result<Option<GeoRecord>>;

    /// Provider name (used in logs)
    fn name(&self) -> &'static str;
}

/// ASN / organization database
pub trait AsnDatabase: Send + Sync {
    /// `Ok(None)` when no entry covers `ip`
    fn lookup_asn(&self, ip: IpAddr) -> Result<Option<AsnRecord>>;

    fn name(&self) -> &'static str;
}

/// Opens the database handles for a [`DatabaseReaderPair`]
///
/// [`DatabaseReaderPair`]: super::readers::DatabaseReaderPair
pub trait DatabaseOpener: Send + Sync {
    /// Open the mandatory city database
    fn open_city(&self) -> Result<Arc<dyn CityDatabase>>;

    /// Open the optional ASN database; `None` when not configured or unusable
    fn open_asn(&self) -> Option<Arc<dyn AsnDatabase>>;
}
