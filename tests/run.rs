//! Integration tests for the `run` command.
use tco::cli::{RunOpts, handle_run_command};
use tco::settings::Settings;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to an example scenario.
fn get_scenario_path() -> PathBuf {
    PathBuf::from("demos/diesel_linehaul/diesel_linehaul.toml")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("TCO_LOG_LEVEL", "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
    };
    handle_run_command(&get_scenario_path(), &opts, Some(Settings::default())).unwrap();

    for file_name in [
        "annual_costs.csv",
        "summary.csv",
        "npv_costs.csv",
        "metadata.toml",
        "tco_info.log",
        "tco_error.log",
    ] {
        assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
    }

    // Running again without --overwrite fails because the folder now has contents
    assert!(handle_run_command(&get_scenario_path(), &opts, Some(Settings::default())).is_err());

    let opts = RunOpts {
        overwrite: true,
        ..opts
    };
    handle_run_command(&get_scenario_path(), &opts, Some(Settings::default())).unwrap();
}
