//! Shared fixtures: an in-memory city/ASN database pair

#![allow(dead_code)]

pub mod mmdb;

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use geolius::config::{GeoIpConfig, StaticConfig};
use geolius::errors::{GeoError, Result};
use geolius::runtime::lifetime::startup::AppContext;
use geolius::services::GeolocationService;
use geolius::services::geoip::{
    AsnDatabase, AsnRecord, CityDatabase, DatabaseOpener, GeoRecord, Subdivision,
};

pub fn google_dns_city() -> GeoRecord {
    GeoRecord {
        country_name: Some("United States".to_string()),
        country_code: Some("US".to_string()),
        subdivisions: vec![Subdivision {
            name: Some("California".to_string()),
            iso_code: Some("CA".to_string()),
        }],
        city: Some("Mountain View".to_string()),
        postal_code: Some("94043".to_string()),
        latitude: Some(37.4056),
        longitude: Some(-122.0775),
        timezone: Some("America/Los_Angeles".to_string()),
    }
}

pub fn google_asn() -> AsnRecord {
    AsnRecord {
        number: Some(15169),
        organization: Some("Google LLC".to_string()),
        isp: None,
    }
}

pub fn cloudflare_city() -> GeoRecord {
    GeoRecord {
        country_name: Some("Australia".to_string()),
        country_code: Some("AU".to_string()),
        ..Default::default()
    }
}

fn ip(text: &str) -> IpAddr {
    text.parse().unwrap()
}

pub struct FixtureCity {
    records: HashMap<IpAddr, GeoRecord>,
    /// Addresses whose lookup fails with a read error
    corrupt: Vec<IpAddr>,
    delay: Duration,
}

impl CityDatabase for FixtureCity {
    fn lookup_city(&self, ip: IpAddr) -> Result<Option<GeoRecord>> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.corrupt.contains(&ip) {
            return Err(GeoError::database_read("invalid pointer in search tree"));
        }
        Ok(self.records.get(&ip).cloned())
    }

    fn name(&self) -> &'static str {
        "fixture city"
    }
}

pub struct FixtureAsn {
    records: HashMap<IpAddr, AsnRecord>,
}

impl AsnDatabase for FixtureAsn {
    fn lookup_asn(&self, ip: IpAddr) -> Result<Option<AsnRecord>> {
        Ok(self.records.get(&ip).cloned())
    }

    fn name(&self) -> &'static str {
        "fixture asn"
    }
}

/// Opener serving fixture databases
///
/// - 8.8.8.8: city + ASN (Google)
/// - 1.1.1.1: city only
/// - 9.9.9.9: read error
#[derive(Default)]
pub struct FixtureOpener {
    pub city_missing: bool,
    pub without_asn: bool,
    pub delay: Duration,
    pub city_opens: AtomicUsize,
}

impl FixtureOpener {
    pub fn opens(&self) -> usize {
        self.city_opens.load(Ordering::SeqCst)
    }
}

impl DatabaseOpener for FixtureOpener {
    fn open_city(&self) -> Result<Arc<dyn CityDatabase>> {
        self.city_opens.fetch_add(1, Ordering::SeqCst);
        if self.city_missing {
            return Err(GeoError::database_unavailable(
                "MaxMind City database not found at data/GeoLite2-City.mmdb",
            ));
        }

        let mut records = HashMap::new();
        records.insert(ip("8.8.8.8"), google_dns_city());
        records.insert(ip("1.1.1.1"), cloudflare_city());
        records.insert(ip("2001:4860:4860::8888"), google_dns_city());

        Ok(Arc::new(FixtureCity {
            records,
            corrupt: vec![ip("9.9.9.9")],
            delay: self.delay,
        }))
    }

    fn open_asn(&self) -> Option<Arc<dyn AsnDatabase>> {
        if self.without_asn {
            return None;
        }
        let mut records = HashMap::new();
        records.insert(ip("8.8.8.8"), google_asn());
        Some(Arc::new(FixtureAsn { records }))
    }
}

pub fn service_with(opener: Arc<FixtureOpener>) -> GeolocationService {
    GeolocationService::with_opener(opener, &GeoIpConfig::default())
}

pub fn fixture_service() -> GeolocationService {
    service_with(Arc::new(FixtureOpener::default()))
}

pub fn fixture_context(opener: FixtureOpener) -> AppContext {
    AppContext::new(
        Arc::new(StaticConfig::default()),
        Arc::new(service_with(Arc::new(opener))),
    )
}
