//! IP lookup service.
//!
//! This module provides [`LookupService`], which validates raw client input,
//! queries a [`GeoDatabase`] and normalises the result into a
//! [`LookupOutcome`] that callers can map onto any transport.

use std::fmt;
use std::net::IpAddr;

use crate::database::GeoDatabase;
use crate::error::GeoError;
use crate::record::LocationRecord;

/// Result of resolving a raw IP string.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The database has a record for the address.
    Found(LocationRecord),
    /// The input is not an IPv4 or IPv6 address. The database was not queried.
    InvalidInput,
    /// The address is valid but the database has no record for it.
    NotFound,
    /// The database failed to answer.
    BackendError(String),
}

impl LookupOutcome {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            LookupOutcome::Found(_) => "found",
            LookupOutcome::InvalidInput => "invalid_input",
            LookupOutcome::NotFound => "not_found",
            LookupOutcome::BackendError(_) => "backend_error",
        }
    }
}

/// Resolves client-supplied IP strings to location records.
///
/// The service owns its database for its whole lifetime. It holds no other
/// state, so every call queries the database again and identical inputs give
/// identical outcomes.
///
/// # Example
///
/// ```ignore
/// use ipgeo::{LookupOutcome, LookupService, MaxMindDatabase};
///
/// let service = LookupService::new(MaxMindDatabase::open("/data/GeoLite2-City.mmdb")?);
///
/// match service.resolve("8.8.8.8") {
///     LookupOutcome::Found(record) => println!("zip: {}", record.zip()),
///     other => println!("no answer: {}", other.label()),
/// }
///
/// service.close();
/// ```
pub struct LookupService {
    database: Box<dyn GeoDatabase>,
}

impl LookupService {
    /// Create a service over the given database.
    pub fn new<D: GeoDatabase + 'static>(database: D) -> Self {
        Self {
            database: Box::new(database),
        }
    }

    /// Parse `raw_ip` and look it up.
    ///
    /// The input must be a bare IPv4 or IPv6 address. Surrounding whitespace,
    /// hostnames, ports and zone identifiers are rejected as
    /// [`LookupOutcome::InvalidInput`].
    pub fn resolve(&self, raw_ip: &str) -> LookupOutcome {
        match parse_ip(raw_ip) {
            Some(ip) => self.resolve_ip(ip),
            None => LookupOutcome::InvalidInput,
        }
    }

    /// Look up an already parsed address.
    pub fn resolve_ip(&self, ip: IpAddr) -> LookupOutcome {
        match self.database.query(ip) {
            Ok(record) => LookupOutcome::Found(record),
            Err(GeoError::AddressNotFound { .. }) => LookupOutcome::NotFound,
            Err(e) => LookupOutcome::BackendError(e.to_string()),
        }
    }

    /// Close the underlying database.
    pub fn close(self) {
        self.database.close();
    }
}

impl fmt::Debug for LookupService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupService").finish_non_exhaustive()
    }
}

/// Parse a bare IPv4 or IPv6 address.
pub fn parse_ip(raw: &str) -> Option<IpAddr> {
    raw.parse().ok()
}
