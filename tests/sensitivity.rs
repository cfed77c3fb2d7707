//! Integration tests for the `sensitivity` command.
use tco::cli::{RunOpts, SensitivityOpts, handle_sensitivity_command};
use tco::sensitivity::SensitivityParameter;
use tco::settings::Settings;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to an example scenario.
fn get_scenario_path() -> PathBuf {
    PathBuf::from("demos/bet_linehaul/bet_linehaul.toml")
}

fn run(sensitivity_opts: &SensitivityOpts) -> anyhow::Result<usize> {
    let dir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(dir.path().to_path_buf()),
        overwrite: false,
    };
    handle_sensitivity_command(
        &get_scenario_path(),
        sensitivity_opts,
        &opts,
        Some(Settings::default()),
    )?;

    let rows = csv::Reader::from_path(dir.path().join("sensitivity.csv"))
        .unwrap()
        .records()
        .count();
    Ok(rows)
}

/// An integration test for the `sensitivity` command.
#[test]
fn test_handle_sensitivity_command() {
    unsafe { std::env::set_var("TCO_LOG_LEVEL", "off") };

    // Range around the scenario's values
    let opts = SensitivityOpts {
        parameters: vec![
            SensitivityParameter::EnergyPrice,
            SensitivityParameter::DiscountRate,
        ],
        values: None,
        range: 0.3,
        steps: 4,
    };
    assert_eq!(run(&opts).unwrap(), 8);

    // Explicit values
    let opts = SensitivityOpts {
        parameters: vec![SensitivityParameter::AnnualDistanceKm],
        values: Some(vec![40_000.0, 60_000.0, 100_000.0]),
        range: 0.2,
        steps: 5,
    };
    assert_eq!(run(&opts).unwrap(), 3);

    // Whole years around the five year period
    let opts = SensitivityOpts {
        parameters: vec![SensitivityParameter::AnalysisPeriodYears],
        values: None,
        range: 0.2,
        steps: 5,
    };
    assert_eq!(run(&opts).unwrap(), 3);

    // Explicit values can't be shared between parameters
    let opts = SensitivityOpts {
        parameters: vec![
            SensitivityParameter::EnergyPrice,
            SensitivityParameter::CarbonPrice,
        ],
        values: Some(vec![0.1]),
        range: 0.2,
        steps: 5,
    };
    assert!(run(&opts).is_err());
}
