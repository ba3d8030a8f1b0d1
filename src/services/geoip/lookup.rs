//! Lookup engine
//!
//! 查询 City 数据库（必需）和 ASN 数据库（尽力而为），合并为单条响应记录。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use super::address::Address;
use super::maxmind::MaxMindOpener;
use super::provider::DatabaseOpener;
use super::readers::DatabaseReaderPair;
use super::records::{AsnRecord, GeoRecord};
use super::response::GeolocationResponse;
use crate::config::GeoIpConfig;
use crate::errors::{GeoError, Result};

/// Country name used when the database has none
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Geolocation service context
///
/// Constructed once at startup and shared by every request handler. Blocking
/// database reads run on tokio's blocking pool, each bounded by
/// `query_timeout`.
#[derive(Debug)]
pub struct GeolocationService {
    readers: Arc<DatabaseReaderPair>,
    query_timeout: Duration,
    pub(super) batch_concurrency: usize,
}

impl GeolocationService {
    pub fn new(readers: DatabaseReaderPair, query_timeout: Duration, batch_concurrency: usize) -> Self {
        Self {
            readers: Arc::new(readers),
            query_timeout,
            batch_concurrency: batch_concurrency.max(1),
        }
    }

    /// Build the service from configuration, using MaxMind readers
    pub fn from_config(config: &GeoIpConfig) -> Self {
        Self::with_opener(Arc::new(MaxMindOpener::from_config(config)), config)
    }

    pub fn with_opener(opener: Arc<dyn DatabaseOpener>, config: &GeoIpConfig) -> Self {
        Self::new(
            DatabaseReaderPair::new(opener),
            config.query_timeout(),
            config.batch_concurrency(),
        )
    }

    pub fn readers(&self) -> &DatabaseReaderPair {
        &self.readers
    }

    /// Open the databases on the blocking pool
    pub async fn initialize(&self) -> Result<()> {
        let readers = Arc::clone(&self.readers);
        tokio::task::spawn_blocking(move || readers.initialize()).await?
    }

    /// Release the database handles. Idempotent.
    pub fn close(&self) {
        self.readers.close();
    }

    /// Resolve one address
    ///
    /// `AddressNotFound` and database errors from the city query propagate
    /// unchanged. ASN enrichment never fails the lookup.
    pub async fn lookup(&self, address: Address) -> Result<GeolocationResponse> {
        let city = self.query_city(address).await?;
        let asn = self.query_asn(address).await;
        Ok(merge_records(address, city, asn, Utc::now()))
    }

    async fn query_city(&self, address: Address) -> Result<GeoRecord> {
        let readers = Arc::clone(&self.readers);
        let task = tokio::task::spawn_blocking(move || readers.query_city(address));

        match timeout(self.query_timeout, task).await {
            Ok(joined) => joined?,
            Err(_) => {
                warn!(
                    "GeoIP: City query for {} timed out after {:?}",
                    address, self.query_timeout
                );
                Err(GeoError::database_unavailable(format!(
                    "Geolocation database query timed out after {:.1}s",
                    self.query_timeout.as_secs_f64()
                )))
            }
        }
    }

    async fn query_asn(&self, address: Address) -> Option<AsnRecord> {
        let readers = Arc::clone(&self.readers);
        let task = tokio::task::spawn_blocking(move || readers.query_asn(address));

        match timeout(self.query_timeout, task).await {
            Ok(Ok(record)) => record,
            Ok(Err(e)) => {
                debug!("GeoIP: ASN task for {} failed: {}", address, e);
                None
            }
            Err(_) => {
                debug!("GeoIP: ASN query for {} timed out", address);
                None
            }
        }
    }
}

/// Merge the raw records into the public response shape
///
/// - country falls back to "Unknown", country code to ""
/// - region / region code come from the most specific subdivision
/// - asn is "AS" followed by the number, absent without a number
/// - coordinates outside [-90, 90] / [-180, 180] are dropped
pub fn merge_records(
    address: Address,
    city: GeoRecord,
    asn: Option<AsnRecord>,
    queried_at: DateTime<Utc>,
) -> GeolocationResponse {
    let (region, region_code) = city
        .most_specific_subdivision()
        .map(|s| (s.name.clone(), s.iso_code.clone()))
        .unwrap_or_default();

    let asn = asn.unwrap_or_default();

    let response = GeolocationResponse {
        ip: address,
        country: city
            .country_name
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
        country_code: city.country_code.unwrap_or_default(),
        region,
        region_code,
        city: city.city,
        postal_code: city.postal_code,
        latitude: in_range(address, "latitude", city.latitude, 90.0),
        longitude: in_range(address, "longitude", city.longitude, 180.0),
        timezone: city.timezone,
        asn: asn.formatted_number(),
        isp: asn.isp,
        org: asn.organization,
        query_timestamp: queried_at,
    };

    trace!(
        "Merged lookup for {}: country={}, region={:?}, asn={:?}",
        address, response.country, response.region, response.asn
    );

    response
}

fn in_range(address: Address, field: &str, value: Option<f64>, limit: f64) -> Option<f64> {
    match value {
        Some(v) if v.is_finite() && (-limit..=limit).contains(&v) => Some(v),
        Some(v) => {
            warn!("Dropping out-of-range {} {} for {}", field, v, address);
            None
        }
        None => None,
    }
}
