//! Location records returned by database queries.

/// A geographic point in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The point as a `[latitude, longitude]` pair.
    pub fn to_lat_lon(self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// Geographic attributes resolved for a single IP address.
///
/// Either field may be missing: many database entries carry coordinates
/// without a postal code, and some carry neither.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationRecord {
    /// Postal (zip) code, when the database has one for the network.
    pub postal_code: Option<String>,
    /// Approximate location of the network.
    pub point: Option<GeoPoint>,
}

impl LocationRecord {
    /// Create a record with both a postal code and a point.
    pub fn new(postal_code: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            postal_code: Some(postal_code.into()),
            point: Some(GeoPoint::new(latitude, longitude)),
        }
    }

    /// Postal code, or an empty string when the record has none.
    pub fn zip(&self) -> &str {
        self.postal_code.as_deref().unwrap_or("")
    }
}
