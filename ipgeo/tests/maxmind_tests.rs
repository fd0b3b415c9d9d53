//! Integration tests for the MaxMind reader against the fixture databases
//! in `tests/data` (regenerate with `tests/data/write_test_db.py`).

use std::net::IpAddr;
use std::path::PathBuf;

use ipgeo::{
    GeoDatabase, GeoError, GeoPoint, LocationRecord, LookupOutcome, LookupService,
    MaxMindDatabase,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn city_db() -> MaxMindDatabase {
    MaxMindDatabase::open(fixture("ipgeo-city-test.mmdb")).unwrap()
}

fn ipv4_db() -> MaxMindDatabase {
    MaxMindDatabase::open(fixture("ipgeo-city-test-ipv4.mmdb")).unwrap()
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[test]
fn test_metadata() {
    let info = city_db().metadata();
    assert_eq!(info.database_type, "GeoIP2-City");
    assert_eq!(info.ip_version, 6);
    assert_eq!(info.build_epoch, 1_700_000_000);
    assert!(info.node_count > 0);

    assert_eq!(ipv4_db().metadata().ip_version, 4);
}

#[test]
fn test_query_full_record() {
    let db = city_db();

    let record = db.query(ip("8.8.8.8")).unwrap();
    assert_eq!(record, LocationRecord::new("94043", 37.4, -122.1));

    // Any address inside the /24 resolves to the same record
    let record = db.query(ip("8.8.8.200")).unwrap();
    assert_eq!(record.zip(), "94043");
}

#[test]
fn test_query_ipv6_record() {
    let record = city_db().query(ip("2001:4860:4860::8888")).unwrap();
    assert_eq!(record.postal_code.as_deref(), Some("94043"));
    assert_eq!(record.point, Some(GeoPoint::new(37.4, -122.1)));
}

#[test]
fn test_query_record_without_postal_or_location() {
    let record = city_db().query(ip("81.2.69.142")).unwrap();
    assert_eq!(record, LocationRecord::default());
}

#[test]
fn test_query_address_not_found() {
    let db = city_db();

    for addr in ["192.0.2.1", "8.8.9.1", "2001:db8::1"] {
        let addr = ip(addr);
        match db.query(addr) {
            Err(GeoError::AddressNotFound { ip }) => assert_eq!(ip, addr),
            other => panic!("{addr}: expected not found, got {other:?}"),
        }
    }
}

#[test]
fn test_ipv4_only_database() {
    let db = ipv4_db();

    assert_eq!(db.query(ip("8.8.8.8")).unwrap().zip(), "94043");

    // No IPv6 branch exists in a 32-bit tree
    assert!(matches!(
        db.query(ip("2001:4860:4860::8888")),
        Err(GeoError::AddressNotFound { .. })
    ));
}

#[test]
fn test_lookup_service_over_maxmind() {
    let service = LookupService::new(city_db());

    assert_eq!(
        service.resolve("8.8.8.8"),
        LookupOutcome::Found(LocationRecord::new("94043", 37.4, -122.1))
    );
    assert_eq!(service.resolve("192.0.2.1"), LookupOutcome::NotFound);
    assert_eq!(service.resolve("999.999.999.999"), LookupOutcome::InvalidInput);

    // Repeated lookups return identical outcomes
    assert_eq!(service.resolve("8.8.8.8"), service.resolve("8.8.8.8"));

    service.close();
}
