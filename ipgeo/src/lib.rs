//! # IPGEO - IP Geolocation Library
//!
//! Resolve IP addresses to postal codes and coordinates using a local
//! MaxMind (`.mmdb`) City database.
//!
//! ## Features
//!
//! - **Offline**: Reads GeoIP2/GeoLite2 City files from disk, no network access
//! - **Strict Input**: Only bare IPv4/IPv6 addresses are looked up
//! - **Normalised Outcomes**: Found, invalid input, not found and backend
//!   failure are distinct, transport-independent results
//! - **Pluggable**: Any [`GeoDatabase`] can back the [`LookupService`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use ipgeo::{LookupOutcome, LookupService, MaxMindDatabase};
//!
//! let db = MaxMindDatabase::open("/data/GeoLite2-City.mmdb")?;
//! let service = LookupService::new(db);
//!
//! if let LookupOutcome::Found(record) = service.resolve("8.8.8.8") {
//!     println!("zip: {}", record.zip());
//! }
//! ```
//!
//! ## Data Sources
//!
//! GeoLite2 City databases are available (free, registration required) from
//! <https://dev.maxmind.com/geoip/geolite2-free-geolocation-data>.

pub mod database;
pub mod error;
pub mod lookup;
pub mod memory;
pub mod record;

// Re-export main types at crate root for convenience
pub use database::{DatabaseInfo, GeoDatabase, MaxMindDatabase};
pub use error::{GeoError, Result};
pub use lookup::{parse_ip, LookupOutcome, LookupService};
pub use memory::InMemoryDatabase;
pub use record::{GeoPoint, LocationRecord};
