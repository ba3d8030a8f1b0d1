//! Raw lookup results as read from the databases

/// One administrative subdivision (state, province, district...)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subdivision {
    pub name: Option<String>,
    pub iso_code: Option<String>,
}

/// City database result for one address
///
/// `subdivisions` is ordered from the least to the most specific level, as
/// reported by the database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoRecord {
    pub country_name: Option<String>,
    pub country_code: Option<String>,
    pub subdivisions: Vec<Subdivision>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
}

impl GeoRecord {
    /// The most granular subdivision, if any
    pub fn most_specific_subdivision(&self) -> Option<&Subdivision> {
        self.subdivisions.last()
    }
}

/// ASN (or ISP) database result for one address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsnRecord {
    pub number: Option<u32>,
    pub organization: Option<String>,
    /// Only present when the database is a GeoIP2-ISP database
    pub isp: Option<String>,
}

impl AsnRecord {
    /// `AS15169` style identifier
    pub fn formatted_number(&self) -> Option<String> {
        self.number.map(|n| format!("AS{}", n))
    }
}
