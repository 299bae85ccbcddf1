//! Settings file loading tests.

use karotz_client::{ClientError, Credentials, DEFAULT_SECTION};
use std::fs;
use tempfile::TempDir;

const DUMMY_VALUE: &str = "23426660-beef-beee-baad-food0000babe";

fn write_config(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write config file");
    path
}

#[test]
fn test_load_good_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "good_config.yaml",
        &format!(
            "{}:\n  apikey: {v}\n  secret: {v}\n  installid: {v}\n",
            DEFAULT_SECTION,
            v = DUMMY_VALUE
        ),
    );

    // Environment overrides are not set in the test environment.
    let credentials = Credentials::load(&path, DEFAULT_SECTION).unwrap();
    assert_eq!(credentials.apikey(), DUMMY_VALUE);
    assert_eq!(credentials.secret(), DUMMY_VALUE);
    assert_eq!(credentials.installid(), DUMMY_VALUE);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Credentials::load(dir.path().join("absent.yaml"), DEFAULT_SECTION).unwrap_err();
    assert!(matches!(err, ClientError::Io(_)));
}

#[test]
fn test_load_no_section() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bad_config_no_section.yaml", "other-app:\n  apikey: x\n");
    let err = Credentials::load(&path, DEFAULT_SECTION).unwrap_err();
    assert!(matches!(err, ClientError::MissingCredentials(_)));
}

#[test]
fn test_load_invalid_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "broken.yaml", "karotz-app-settings: {apikey: ");
    let err = Credentials::load(&path, DEFAULT_SECTION).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}
