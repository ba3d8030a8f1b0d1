//! geolius - IP geolocation HTTP API
//!
//! Resolves IPv4 / IPv6 addresses to country, region, city, coordinates,
//! timezone and ASN data using local MaxMind databases, one at a time or in
//! batches.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface (offline lookups, config generation)
//!
//! # Architecture
//! - `services`: address validation, database readers, lookup and batch logic
//! - `api`: HTTP routes, middleware and the error envelope
//! - `config`: Configuration loading
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
