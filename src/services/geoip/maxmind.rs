//! MaxMind GeoLite2 数据库实现
//!
//! 使用本地 GeoLite2-City.mmdb / GeoLite2-ASN.mmdb（或 GeoIP2-ISP.mmdb）文件进行查询

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use maxminddb::{Reader, geoip2};
use tracing::{info, trace, warn};

use super::provider::{AsnDatabase, CityDatabase, DatabaseOpener};
use super::records::{AsnRecord, GeoRecord, Subdivision};
use crate::config::GeoIpConfig;
use crate::errors::{GeoError, Result};

fn open_reader(path: &Path, label: &str) -> Result<Reader<Vec<u8>>> {
    if !path.exists() {
        return Err(GeoError::database_unavailable(format!(
            "MaxMind {} database not found at {}. \
             Please download the database and place it in the data directory.",
            label,
            path.display()
        )));
    }

    let reader = Reader::open_readfile(path).map_err(|e| {
        GeoError::database_unavailable(format!(
            "Failed to open MaxMind {} database at {}: {}",
            label,
            path.display(),
            e
        ))
    })?;

    info!(
        "GeoIP: Opened {} database at {} (type: {}, build epoch: {}, ip version: {})",
        label,
        path.display(),
        reader.metadata.database_type,
        reader.metadata.build_epoch,
        reader.metadata.ip_version
    );

    Ok(reader)
}

fn owned(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(String::from)
}

/// MaxMind City reader
pub struct MaxMindCityReader {
    reader: Reader<Vec<u8>>,
}

impl MaxMindCityReader {
    /// 从文件路径打开 City 数据库
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            reader: open_reader(path, "City")?,
        })
    }
}

impl CityDatabase for MaxMindCityReader {
    fn lookup_city(&self, ip: IpAddr) -> Result<Option<GeoRecord>> {
        let result = self.reader.lookup(ip)?;
        let Some(city) = result.decode::<geoip2::City>()? else {
            trace!("MaxMind City: no entry for {}", ip);
            return Ok(None);
        };

        let subdivisions = city
            .subdivisions
            .iter()
            .map(|s| Subdivision {
                name: owned(s.names.english),
                iso_code: owned(s.iso_code),
            })
            .collect();

        let record = GeoRecord {
            country_name: owned(city.country.names.english),
            country_code: owned(city.country.iso_code),
            subdivisions,
            city: owned(city.city.names.english),
            postal_code: owned(city.postal.code),
            latitude: city.location.latitude,
            longitude: city.location.longitude,
            timezone: owned(city.location.time_zone),
        };

        trace!(
            "MaxMind City lookup for {}: country={:?}, city={:?}",
            ip, record.country_code, record.city
        );

        Ok(Some(record))
    }

    fn name(&self) -> &'static str {
        "MaxMind City"
    }
}

/// MaxMind ASN reader
///
/// Also accepts GeoIP2-ISP databases, which additionally carry the ISP name.
pub struct MaxMindAsnReader {
    reader: Reader<Vec<u8>>,
    is_isp_database: bool,
}

impl MaxMindAsnReader {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = open_reader(path, "ASN")?;
        let is_isp_database = reader.metadata.database_type.contains("ISP");
        Ok(Self {
            reader,
            is_isp_database,
        })
    }
}

impl AsnDatabase for MaxMindAsnReader {
    fn lookup_asn(&self, ip: IpAddr) -> Result<Option<AsnRecord>> {
        let result = self.reader.lookup(ip)?;

        if self.is_isp_database {
            return Ok(result.decode::<geoip2::Isp>()?.map(|isp| AsnRecord {
                number: isp.autonomous_system_number,
                organization: owned(isp.autonomous_system_organization)
                    .or_else(|| owned(isp.organization)),
                isp: owned(isp.isp),
            }));
        }

        Ok(result.decode::<geoip2::Asn>()?.map(|asn| AsnRecord {
            number: asn.autonomous_system_number,
            organization: owned(asn.autonomous_system_organization),
            isp: None,
        }))
    }

    fn name(&self) -> &'static str {
        if self.is_isp_database {
            "MaxMind ISP"
        } else {
            "MaxMind ASN"
        }
    }
}

/// Opens MaxMind readers from the configured file paths
#[derive(Debug, Clone)]
pub struct MaxMindOpener {
    city_path: PathBuf,
    asn_path: Option<PathBuf>,
}

impl MaxMindOpener {
    pub fn new(city_path: impl Into<PathBuf>, asn_path: Option<PathBuf>) -> Self {
        Self {
            city_path: city_path.into(),
            asn_path,
        }
    }

    pub fn from_config(config: &GeoIpConfig) -> Self {
        Self::new(config.city_db_path(), config.asn_db_path())
    }
}

impl DatabaseOpener for MaxMindOpener {
    fn open_city(&self) -> Result<Arc<dyn CityDatabase>> {
        Ok(Arc::new(MaxMindCityReader::open(&self.city_path)?))
    }

    fn open_asn(&self) -> Option<Arc<dyn AsnDatabase>> {
        let path = self.asn_path.as_ref()?;
        match MaxMindAsnReader::open(path) {
            Ok(reader) => Some(Arc::new(reader)),
            Err(e) => {
                // ASN 数据库是可选的，缺失时只跳过 ASN/ISP 数据
                warn!("GeoIP: ASN enrichment disabled: {}", e.message());
                None
            }
        }
    }
}
