use std::path::PathBuf;

use chrono::{DateTime, Utc};

use trainwatch::batch::{Batch, BatchError};
use trainwatch::config::{Config, GroupConfig};
use trainwatch::import::{ImportError, TleFileImporter, TleImporter};

fn fixture_importer() -> TleFileImporter {
    TleFileImporter::new(PathBuf::from("tests/data/iss.tle"))
}

fn fixture_config() -> Config {
    let mut config = Config::default();
    config.launches.insert("1-1".to_string(), "98067".to_string());
    config
        .groups
        .insert("1".to_string(), GroupConfig::default());
    config
}

fn fixture_time() -> DateTime<Utc> {
    "2008-09-20T12:25:40Z".parse().unwrap()
}

#[test]
fn classifies_a_batch_from_a_tle_file() {
    let batch = Batch::new(
        &fixture_importer(),
        "1-1",
        &fixture_config(),
        Some(fixture_time()),
    )
    .unwrap();

    assert_eq!(batch.group_number(), "1");
    assert_eq!(batch.planes().len(), 1);
    assert_eq!(batch.satellites().count(), 1);

    let satellite = &batch.planes()[0].satellites()[0];
    assert_eq!(satellite.name(), "ISS (ZARYA)");
    assert_eq!(satellite.phase(), 0.0);
    assert!(satellite.height_km() > 200.0 && satellite.height_km() < 500.0);
}

#[test]
fn unknown_designator_in_the_file_is_a_lookup_failure() {
    let mut config = fixture_config();
    config
        .launches
        .insert("2-1".to_string(), "24999".to_string());

    let err = Batch::new(&fixture_importer(), "2-1", &config, Some(fixture_time())).unwrap_err();
    assert!(matches!(
        err,
        BatchError::Import(ImportError::NoSuchDesignator(designator)) if designator == "24999"
    ));
}

#[test]
fn fetches_a_single_satellite_by_name() {
    let importer = fixture_importer();
    let tle = importer.fetch_satellite("ISS (ZARYA)").unwrap();
    assert_eq!(tle.designator_number(), "98067");

    let err = importer.fetch_satellite("NO SUCH SAT").unwrap_err();
    assert!(matches!(err, ImportError::NoSuchSatellite(_)));
}
