//! Service layer
//!
//! Lookup logic shared by the HTTP API and the CLI.

pub mod geoip;

pub use geoip::{Address, GeolocationService};
