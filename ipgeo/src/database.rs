//! Geolocation database access.
//!
//! [`GeoDatabase`] is the read-only query seam used by the lookup service.
//! [`MaxMindDatabase`] implements it over a MaxMind `.mmdb` file in the
//! GeoIP2/GeoLite2 City schema.

use std::io::ErrorKind;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use maxminddb::{geoip2, MaxMindDBError, Reader};

use crate::error::{GeoError, Result};
use crate::record::{GeoPoint, LocationRecord};

/// A read-only source of IP geolocation records.
///
/// Implementations must be safe to query concurrently from many requests.
pub trait GeoDatabase: Send + Sync {
    /// Look up the record for `ip`.
    ///
    /// # Errors
    ///
    /// - [`GeoError::AddressNotFound`] if the database has no entry for `ip`
    /// - any other variant if the database could not answer
    fn query(&self, ip: IpAddr) -> Result<LocationRecord>;

    /// Release the underlying resources.
    ///
    /// Consumes the database, so it can only happen once.
    fn close(self: Box<Self>) {}
}

/// Summary of a MaxMind database's metadata section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    /// Database type, e.g. `GeoLite2-City`.
    pub database_type: String,
    /// Build time as seconds since the Unix epoch.
    pub build_epoch: u64,
    /// 4 for IPv4-only databases, 6 for databases covering both families.
    pub ip_version: u16,
    /// Number of nodes in the search tree.
    pub node_count: u32,
}

/// A MaxMind City database loaded from disk.
///
/// # Example
///
/// ```ignore
/// use ipgeo::{GeoDatabase, MaxMindDatabase};
///
/// let db = MaxMindDatabase::open("/data/GeoLite2-City.mmdb")?;
/// let record = db.query("8.8.8.8".parse()?)?;
/// println!("zip: {}", record.zip());
/// ```
pub struct MaxMindDatabase {
    path: PathBuf,
    reader: Reader<Vec<u8>>,
}

impl MaxMindDatabase {
    /// Open a `.mmdb` file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The contents are not a valid MaxMind database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let buf = match std::fs::read(&path) {
            Ok(buf) => buf,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GeoError::FileNotFound { path })
            }
            Err(e) => return Err(GeoError::Io(e)),
        };

        let reader = Reader::from_source(buf).map_err(|e| GeoError::InvalidDatabase {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { path, reader })
    }

    /// Path the database was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metadata read from the database file.
    pub fn metadata(&self) -> DatabaseInfo {
        let metadata = &self.reader.metadata;
        DatabaseInfo {
            database_type: metadata.database_type.clone(),
            build_epoch: metadata.build_epoch,
            ip_version: metadata.ip_version,
            node_count: metadata.node_count,
        }
    }
}

impl GeoDatabase for MaxMindDatabase {
    fn query(&self, ip: IpAddr) -> Result<LocationRecord> {
        // An IPv4-only tree has no branch for native IPv6 addresses.
        if self.reader.metadata.ip_version == 4 && ip.is_ipv6() {
            return Err(GeoError::AddressNotFound { ip });
        }

        match self.reader.lookup::<geoip2::City>(ip) {
            Ok(city) => Ok(city_to_record(&city)),
            Err(MaxMindDBError::AddressNotFoundError(_)) => Err(GeoError::AddressNotFound { ip }),
            Err(e) => Err(GeoError::Lookup {
                ip,
                reason: e.to_string(),
            }),
        }
    }
}

/// Copy the fields we serve out of a borrowed City record.
fn city_to_record(city: &geoip2::City<'_>) -> LocationRecord {
    let postal_code = city
        .postal
        .as_ref()
        .and_then(|postal| postal.code)
        .map(str::to_string);

    let point = city
        .location
        .as_ref()
        .and_then(|location| match (location.latitude, location.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        });

    LocationRecord { postal_code, point }
}
