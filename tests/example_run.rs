//! Integration tests for the `example run` and `example compare` commands.
use tco::cli::RunOpts;
use tco::cli::example::{handle_example_compare_command, handle_example_run_command};
use tco::settings::Settings;
use tempfile::tempdir;

/// An integration test for the `example run` command.
#[test]
fn test_handle_example_run_command() {
    unsafe { std::env::set_var("TCO_LOG_LEVEL", "off") };

    for name in ["diesel_linehaul", "bet_linehaul", "bet_regional_loan"] {
        let dir = tempdir().unwrap();
        let opts = RunOpts {
            output_dir: Some(dir.path().to_path_buf()),
            overwrite: false,
        };
        handle_example_run_command(name, &opts, Some(Settings::default())).unwrap();
        assert!(dir.path().join("annual_costs.csv").is_file());
    }
}

/// An integration test for the `example compare` command.
#[test]
fn test_handle_example_compare_command() {
    unsafe { std::env::set_var("TCO_LOG_LEVEL", "off") };

    let dir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(dir.path().to_path_buf()),
        overwrite: false,
    };
    handle_example_compare_command(
        "diesel_linehaul",
        "bet_linehaul",
        &opts,
        Some(Settings::default()),
    )
    .unwrap();

    let comparison = csv::Reader::from_path(dir.path().join("comparison.csv"))
        .unwrap()
        .records()
        .count();
    assert_eq!(comparison, 13);
    let summary = csv::Reader::from_path(dir.path().join("summary.csv"))
        .unwrap()
        .records()
        .count();
    assert_eq!(summary, 2);
}
