//! Error types for the IPGEO library.

use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when opening or querying a geolocation database.
#[derive(Error, Debug)]
pub enum GeoError {
    /// IO error when reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The database file does not exist.
    #[error("Geo database not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The file exists but is not a readable MaxMind database.
    #[error("Invalid geo database {path}: {reason}")]
    InvalidDatabase { path: PathBuf, reason: String },

    /// The database holds no record for the address.
    #[error("No geo record for address {ip}")]
    AddressNotFound { ip: IpAddr },

    /// The database failed while looking up or decoding a record.
    #[error("Geo lookup failed for {ip}: {reason}")]
    Lookup { ip: IpAddr, reason: String },
}

/// Result type alias using [`GeoError`].
pub type Result<T> = std::result::Result<T, GeoError>;
