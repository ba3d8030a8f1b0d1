//! Public response shape of a lookup

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::address::Address;
use crate::errors::ErrorKind;

/// Merged, denormalized geolocation record
///
/// Absent optional fields serialize as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeolocationResponse {
    pub ip: Address,
    pub country: String,
    pub country_code: String,
    pub region: Option<String>,
    pub region_code: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    pub asn: Option<String>,
    pub query_timestamp: DateTime<Utc>,
}

/// A failed batch item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// The address as submitted
    pub address: String,
    pub kind: ErrorKind,
    pub detail: String,
}

/// Outcome of a single batch item
#[derive(Debug, Clone)]
pub enum BatchItemOutcome {
    Found(Box<GeolocationResponse>),
    Failed(BatchFailure),
}

/// Successes and failures of a batch, each in input order
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub successes: Vec<GeolocationResponse>,
    pub failures: Vec<BatchFailure>,
}

impl BatchResult {
    pub fn push(&mut self, outcome: BatchItemOutcome) {
        match outcome {
            BatchItemOutcome::Found(response) => self.successes.push(*response),
            BatchItemOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<BatchItemOutcome> for BatchResult {
    fn from_iter<I: IntoIterator<Item = BatchItemOutcome>>(iter: I) -> Self {
        let mut result = BatchResult::default();
        for outcome in iter {
            result.push(outcome);
        }
        result
    }
}
