//! Database reader pair
//!
//! 持有 City（必需）和 ASN（可选）两个只读句柄，首次使用时打开，服务生命周期内共享。

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, trace};

use super::address::Address;
use super::provider::{AsnDatabase, CityDatabase, DatabaseOpener};
use super::records::{AsnRecord, GeoRecord};
use crate::errors::{GeoError, Result};

#[derive(Clone)]
struct OpenReaders {
    city: Arc<dyn CityDatabase>,
    asn: Option<Arc<dyn AsnDatabase>>,
}

enum ReaderState {
    Unopened,
    Open(OpenReaders),
    Closed,
}

/// The two read-only database handles shared by every lookup
///
/// The first caller that finds the pair unopened performs the open while
/// holding the state lock; concurrent callers block on the lock and then see
/// the opened handles. Queries only hold the lock long enough to clone the
/// handles.
pub struct DatabaseReaderPair {
    opener: Arc<dyn DatabaseOpener>,
    state: Mutex<ReaderState>,
}

impl DatabaseReaderPair {
    pub fn new(opener: Arc<dyn DatabaseOpener>) -> Self {
        Self {
            opener,
            state: Mutex::new(ReaderState::Unopened),
        }
    }

    /// Open the databases now instead of on first query
    pub fn initialize(&self) -> Result<()> {
        self.handles().map(|_| ())
    }

    fn handles(&self) -> Result<OpenReaders> {
        let mut state = self.state.lock();
        match &*state {
            ReaderState::Open(readers) => return Ok(readers.clone()),
            ReaderState::Closed => {
                return Err(GeoError::database_unavailable(
                    "Geolocation database readers have been closed",
                ));
            }
            ReaderState::Unopened => {}
        }

        // City 打开失败时保持 Unopened，下次调用会重试
        let city = self.opener.open_city()?;
        let asn = self.opener.open_asn();

        info!(
            "GeoIP: Reader pair initialized with {} (ASN: {})",
            city.name(),
            asn.as_ref().map(|a| a.name()).unwrap_or("disabled")
        );

        let readers = OpenReaders { city, asn };
        *state = ReaderState::Open(readers.clone());
        Ok(readers)
    }

    /// Query the city database
    ///
    /// Blocking. Fails with `AddressNotFound` when no entry covers the
    /// address, and with a database error on any other failure.
    pub fn query_city(&self, address: Address) -> Result<GeoRecord> {
        let readers = self.handles()?;
        readers
            .city
            .lookup_city(address.ip())?
            .ok_or_else(|| not_found(address))
    }

    /// Query the ASN database
    ///
    /// Blocking. Never fails: a missing database, a missing entry and any
    /// read error all yield `None`.
    pub fn query_asn(&self, address: Address) -> Option<AsnRecord> {
        let asn = self.handles().ok()?.asn?;
        match asn.lookup_asn(address.ip()) {
            Ok(record) => {
                if record.is_none() {
                    trace!("{}: no entry for {}", asn.name(), address);
                }
                record
            }
            Err(e) => {
                debug!("{} lookup for {} failed: {}", asn.name(), address, e);
                None
            }
        }
    }

    /// Release both handles. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if let ReaderState::Open(readers) = &*state {
            info!(
                "GeoIP: Closing {}{}",
                readers.city.name(),
                if readers.asn.is_some() { " and ASN database" } else { "" }
            );
        }
        *state = ReaderState::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(&*self.state.lock(), ReaderState::Open(_))
    }

    /// Whether ASN enrichment is available (only meaningful once open)
    pub fn has_asn(&self) -> bool {
        match &*self.state.lock() {
            ReaderState::Open(readers) => readers.asn.is_some(),
            _ => false,
        }
    }
}

fn not_found(address: Address) -> GeoError {
    let message = if address.is_private_or_local() {
        format!(
            "No geolocation data available for private IP address: {}",
            address
        )
    } else {
        format!("No geolocation data available for IP address: {}", address)
    };
    GeoError::address_not_found(message)
}

impl std::fmt::Debug for DatabaseReaderPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseReaderPair")
            .field("open", &self.is_open())
            .field("asn", &self.has_asn())
            .finish()
    }
}
