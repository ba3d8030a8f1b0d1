//! 查询路径基准测试

use std::hint::black_box;
use std::net::IpAddr;
use std::sync::Arc;

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use geolius::config::GeoIpConfig;
use geolius::errors::Result;
use geolius::services::GeolocationService;
use geolius::services::geoip::{
    Address, AsnDatabase, AsnRecord, CityDatabase, DatabaseOpener, GeoRecord, Subdivision,
    merge_records,
};

fn city_record() -> GeoRecord {
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

fn asn_record() -> AsnRecord {
    AsnRecord {
        number: Some(15169),
        organization: Some("Google LLC".to_string()),
        isp: None,
    }
}

struct StaticCity;

impl CityDatabase for StaticCity {
    fn lookup_city(&self, _ip: IpAddr) -> Result<Option<GeoRecord>> {
        Ok(Some(city_record()))
    }

    fn name(&self) -> &'static str {
        "static city"
    }
}

struct StaticAsn;

impl AsnDatabase for StaticAsn {
    fn lookup_asn(&self, _ip: IpAddr) -> Result<Option<AsnRecord>> {
        Ok(Some(asn_record()))
    }

    fn name(&self) -> &'static str {
        "static asn"
    }
}

struct StaticOpener;

impl DatabaseOpener for StaticOpener {
    fn open_city(&self) -> Result<Arc<dyn CityDatabase>> {
        Ok(Arc::new(StaticCity))
    }

    fn open_asn(&self) -> Option<Arc<dyn AsnDatabase>> {
        Some(Arc::new(StaticAsn))
    }
}

// ============== 地址校验 ==============

fn bench_address_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("address/parse");

    for (name, input) in [
        ("ipv4", "8.8.8.8"),
        ("ipv6_compressed", "2001:4860:4860::8888"),
        ("ipv6_full", "2001:0db8:0000:0000:0000:ff00:0042:8329"),
        ("invalid", "256.1.1.1"),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| Address::parse(black_box(input)).is_ok());
        });
    }

    group.finish();
}

// ============== 记录合并 ==============

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup/merge");
    let address = Address::parse("8.8.8.8").unwrap();
    let now = Utc::now();

    group.bench_function("city_and_asn", |b| {
        b.iter(|| merge_records(address, city_record(), Some(asn_record()), black_box(now)));
    });

    group.bench_function("city_only", |b| {
        b.iter(|| merge_records(address, city_record(), None, black_box(now)));
    });

    group.finish();
}

// ============== 批量查询 ==============

fn bench_batch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let service = GeolocationService::with_opener(Arc::new(StaticOpener), &GeoIpConfig::default());
    let mut group = c.benchmark_group("lookup/batch");

    for size in [1usize, 10, 100] {
        let inputs: Vec<String> = (0..size).map(|i| format!("8.8.{}.{}", i / 256, i % 256)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &inputs, |b, inputs| {
            b.to_async(&runtime)
                .iter(|| async { service.resolve_batch(inputs).await.len() });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_address_parse, bench_merge, bench_batch);
criterion_main!(benches);
