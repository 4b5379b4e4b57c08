//! Upstream GFS access.
//!
//! Downloads single-variable GRIB2 extracts from the NOMADS filter, runs them
//! through an external decoder and parses the result into grid fields.
//!
//! # Architecture
//!
//! - [`nomads`] builds filter URLs
//! - [`source::GribSource`] fetches raw bytes (HTTP in production)
//! - [`decoder::GridDecoder`] turns GRIB into decoder JSON (`grib_dump -j -`)
//! - [`message`] parses decoder JSON into a [`forecast_common::GridField`]
//! - [`client::UpstreamGribClient`] ties them together under a slot limit

pub mod client;
pub mod config;
pub mod decoder;
pub mod message;
pub mod nomads;
pub mod source;

// Re-exports
pub use client::UpstreamGribClient;
pub use config::UpstreamConfig;
pub use decoder::{GribDumpDecoder, GridDecoder};
pub use message::parse_grid_field;
pub use source::{GribSource, HttpGribSource};
