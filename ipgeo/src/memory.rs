//! In-memory geolocation database keyed by exact address.

use std::collections::HashMap;
use std::net::IpAddr;

use crate::database::GeoDatabase;
use crate::error::{GeoError, Result};
use crate::record::LocationRecord;

/// A [`GeoDatabase`] backed by a hash map of exact addresses.
///
/// Useful for embedding a handful of fixed answers and for exercising the
/// lookup path without a `.mmdb` file.
///
/// ```ignore
/// use ipgeo::{InMemoryDatabase, LocationRecord};
///
/// let db = InMemoryDatabase::new()
///     .with_record("8.8.8.8".parse()?, LocationRecord::new("94043", 37.4, -122.1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    records: HashMap<IpAddr, LocationRecord>,
}

impl InMemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, returning the database for chaining.
    pub fn with_record(mut self, ip: IpAddr, record: LocationRecord) -> Self {
        self.insert(ip, record);
        self
    }

    /// Add or replace the record for `ip`.
    pub fn insert(&mut self, ip: IpAddr, record: LocationRecord) {
        self.records.insert(ip, record);
    }

    /// Number of addresses with a record.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the database has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl GeoDatabase for InMemoryDatabase {
    fn query(&self, ip: IpAddr) -> Result<LocationRecord> {
        self.records
            .get(&ip)
            .cloned()
            .ok_or(GeoError::AddressNotFound { ip })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_present_and_absent() {
        let google: IpAddr = "8.8.8.8".parse().unwrap();
        let db = InMemoryDatabase::new()
            .with_record(google, LocationRecord::new("94043", 37.4, -122.1));

        assert_eq!(db.len(), 1);
        assert_eq!(db.query(google).unwrap().zip(), "94043");

        let other: IpAddr = "1.1.1.1".parse().unwrap();
        assert!(matches!(
            db.query(other),
            Err(GeoError::AddressNotFound { ip }) if ip == other
        ));
    }

    #[test]
    fn test_insert_replaces() {
        let ip: IpAddr = "::1".parse().unwrap();
        let mut db = InMemoryDatabase::new();
        assert!(db.is_empty());

        db.insert(ip, LocationRecord::new("10001", 40.7, -74.0));
        db.insert(ip, LocationRecord::new("94043", 37.4, -122.1));

        assert_eq!(db.len(), 1);
        assert_eq!(db.query(ip).unwrap().zip(), "94043");
    }
}
