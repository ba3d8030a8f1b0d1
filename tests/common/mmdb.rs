//! Minimal MaxMind DB writer for building small `.mmdb` files in tests
//!
//! Always writes an IPv6 search tree with 24-bit records; IPv4 networks are
//! stored under `::/96` the way MaxMind's own databases lay them out.

use std::net::IpAddr;
use std::path::Path;

const METADATA_MARKER: &[u8] = b"\xAB\xCD\xEFMaxMind.com";
const DATA_SECTION_SEPARATOR: [u8; 16] = [0; 16];

const TYPE_STRING: u8 = 2;
const TYPE_DOUBLE: u8 = 3;
const TYPE_UINT16: u8 = 5;
const TYPE_UINT32: u8 = 6;
const TYPE_MAP: u8 = 7;
const TYPE_ARRAY: u8 = 11;

pub enum MmdbValue {
    String(String),
    Double(f64),
    Uint16(u16),
    Uint32(u32),
    Map(Vec<(String, MmdbValue)>),
    Array(Vec<MmdbValue>),
}

pub fn string(value: &str) -> MmdbValue {
    MmdbValue::String(value.to_string())
}

pub fn map(entries: Vec<(&str, MmdbValue)>) -> MmdbValue {
    MmdbValue::Map(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
    )
}

/// `{"en": name}` names map
pub fn names(english: &str) -> MmdbValue {
    map(vec![("en", string(english))])
}

fn write_control(out: &mut Vec<u8>, type_num: u8, size: usize) {
    let (size_bits, extra): (u8, Vec<u8>) = if size < 29 {
        (size as u8, Vec::new())
    } else if size < 285 {
        (29, vec![(size - 29) as u8])
    } else if size < 65_821 {
        let rest = size - 285;
        (30, vec![(rest >> 8) as u8, rest as u8])
    } else {
        let rest = size - 65_821;
        (31, vec![(rest >> 16) as u8, (rest >> 8) as u8, rest as u8])
    };

    if type_num <= TYPE_MAP {
        out.push((type_num << 5) | size_bits);
    } else {
        // extended type: type bits are zero, the next byte holds `type - 7`
        out.push(size_bits);
        out.push(type_num - TYPE_MAP);
    }
    out.extend_from_slice(&extra);
}

fn write_uint(out: &mut Vec<u8>, type_num: u8, value: u32) {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    write_control(out, type_num, bytes.len() - skip);
    out.extend_from_slice(&bytes[skip..]);
}

impl MmdbValue {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            MmdbValue::String(s) => {
                write_control(out, TYPE_STRING, s.len());
                out.extend_from_slice(s.as_bytes());
            }
            MmdbValue::Double(v) => {
                write_control(out, TYPE_DOUBLE, 8);
                out.extend_from_slice(&v.to_be_bytes());
            }
            MmdbValue::Uint16(v) => write_uint(out, TYPE_UINT16, u32::from(*v)),
            MmdbValue::Uint32(v) => write_uint(out, TYPE_UINT32, *v),
            MmdbValue::Map(entries) => {
                write_control(out, TYPE_MAP, entries.len());
                for (key, value) in entries {
                    write_control(out, TYPE_STRING, key.len());
                    out.extend_from_slice(key.as_bytes());
                    value.encode(out);
                }
            }
            MmdbValue::Array(items) => {
                write_control(out, TYPE_ARRAY, items.len());
                for item in items {
                    item.encode(out);
                }
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Record {
    Empty,
    Node(usize),
    Data(usize),
}

pub struct MmdbWriter {
    database_type: String,
    nodes: Vec<[Record; 2]>,
    data: Vec<u8>,
}

impl MmdbWriter {
    pub fn new(database_type: &str) -> Self {
        Self {
            database_type: database_type.to_string(),
            nodes: vec![[Record::Empty; 2]],
            data: Vec::new(),
        }
    }

    /// Add a record for `network` (CIDR notation). Networks must not overlap.
    pub fn insert(&mut self, network: &str, value: MmdbValue) -> &mut Self {
        let (addr, prefix) = network.split_once('/').expect("network in CIDR notation");
        let addr: IpAddr = addr.parse().expect("valid network address");
        let prefix: usize = prefix.parse().expect("valid prefix length");
        let (bits, prefix) = match addr {
            IpAddr::V4(v4) => (u128::from(u32::from(v4)), prefix + 96),
            IpAddr::V6(v6) => (u128::from(v6), prefix),
        };
        assert!((1..=128).contains(&prefix), "prefix out of range: {}", network);

        let offset = self.data.len();
        value.encode(&mut self.data);

        let mut node = 0;
        for depth in 0..prefix {
            let bit = ((bits >> (127 - depth)) & 1) as usize;
            if depth + 1 == prefix {
                assert!(
                    matches!(self.nodes[node][bit], Record::Empty),
                    "{} overlaps an existing network",
                    network
                );
                self.nodes[node][bit] = Record::Data(offset);
                break;
            }
            node = match self.nodes[node][bit] {
                Record::Node(next) => next,
                Record::Empty => {
                    self.nodes.push([Record::Empty; 2]);
                    let next = self.nodes.len() - 1;
                    self.nodes[node][bit] = Record::Node(next);
                    next
                }
                Record::Data(_) => panic!("{} overlaps an existing network", network),
            };
        }
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let node_count = self.nodes.len();
        let mut out = Vec::with_capacity(node_count * 6 + self.data.len() + 256);

        for node in &self.nodes {
            for record in node {
                let value = match *record {
                    Record::Empty => node_count,
                    Record::Node(next) => next,
                    Record::Data(offset) => node_count + DATA_SECTION_SEPARATOR.len() + offset,
                };
                out.extend_from_slice(&(value as u32).to_be_bytes()[1..]);
            }
        }

        out.extend_from_slice(&DATA_SECTION_SEPARATOR);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(METADATA_MARKER);

        let metadata = map(vec![
            ("binary_format_major_version", MmdbValue::Uint16(2)),
            ("binary_format_minor_version", MmdbValue::Uint16(0)),
            ("build_epoch", MmdbValue::Uint32(1_700_000_000)),
            ("database_type", string(&self.database_type)),
            ("description", names("geolius test database")),
            ("languages", MmdbValue::Array(vec![string("en")])),
            ("ip_version", MmdbValue::Uint16(6)),
            ("node_count", MmdbValue::Uint32(node_count as u32)),
            ("record_size", MmdbValue::Uint16(24)),
        ]);
        metadata.encode(&mut out);
        out
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.to_bytes()).expect("write test database");
    }
}
