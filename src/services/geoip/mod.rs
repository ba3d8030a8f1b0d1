//! GeoIP 服务模块
//!
//! 基于本地 MaxMind 数据库的 IP 地理位置查询：
//! - GeoLite2-City（必需）
//! - GeoLite2-ASN / GeoIP2-ISP（可选）

mod address;
mod batch;
mod lookup;
mod maxmind;
mod provider;
mod readers;
mod records;
mod response;

pub use address::Address;
pub use lookup::{GeolocationService, UNKNOWN_COUNTRY, merge_records};
pub use maxmind::{MaxMindAsnReader, MaxMindCityReader, MaxMindOpener};
pub use provider::{AsnDatabase, CityDatabase, DatabaseOpener};
pub use readers::DatabaseReaderPair;
pub use records::{AsnRecord, GeoRecord, Subdivision};
pub use response::{BatchFailure, BatchItemOutcome, BatchResult, GeolocationResponse};
