//! Integration tests for the `validate` command.
use tco::cli::handle_validate_command;
use tco::log::is_logger_initialised;
use tco::settings::Settings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to an example scenario.
fn get_scenario_path() -> PathBuf {
    PathBuf::from("demos/bet_regional_loan/bet_regional_loan.toml")
}

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("TCO_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    handle_validate_command(&get_scenario_path(), Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());

    // Batteries must last at least a year
    let contents = fs::read_to_string(get_scenario_path())
        .unwrap()
        .replace("life_years = 4", "life_years = 0");
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("invalid.toml");
    fs::write(&file_path, contents).unwrap();
    let err = handle_validate_command(&file_path, Some(Settings::default())).unwrap_err();
    assert_eq!(err.to_string(), "Failed to validate scenario.");
    assert_eq!(
        err.root_cause().to_string(),
        "Invalid value for battery.life_years: battery life must be at least one year"
    );
}
