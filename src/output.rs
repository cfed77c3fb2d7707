//! The module responsible for writing output data to disk.
use crate::calculator::TcoOutput;
use crate::comparison::ComparisonResult;
use crate::costs::{AnnualCosts, ComponentKey};
use crate::scenario::VehicleType;
use crate::sensitivity::{SensitivityParameter, SensitivityResult};
use crate::units::{Distance, Money, MoneyPerDistance};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "tco_results";

/// The output file name for annual costs
pub const ANNUAL_COSTS_FILE_NAME: &str = "annual_costs.csv";

/// The output file name for the headline results of each vehicle
pub const SUMMARY_FILE_NAME: &str = "summary.csv";

/// The output file name for the present value of each cost component
pub const NPV_COSTS_FILE_NAME: &str = "npv_costs.csv";

/// The output file name for comparisons
pub const COMPARISON_FILE_NAME: &str = "comparison.csv";

/// The output file name for sensitivity analyses
pub const SENSITIVITY_FILE_NAME: &str = "sensitivity.csv";

/// Get the scenario name from a scenario file path
fn get_scenario_name(scenario_path: &Path) -> Result<&str> {
    scenario_path
        .file_stem()
        .context("Scenario path has no file name")?
        .to_str()
        .context("Invalid chars in scenario file name")
}

/// Get the default output directory for the scenario at the specified path
pub fn get_output_dir(scenario_path: &Path) -> Result<PathBuf> {
    let scenario_name = get_scenario_name(scenario_path)?;
    Ok([OUTPUT_DIRECTORY_ROOT, scenario_name].iter().collect())
}

/// Get the default output directory for a comparison of two scenarios
pub fn get_comparison_output_dir(scenario_path1: &Path, scenario_path2: &Path) -> Result<PathBuf> {
    let name = format!(
        "{}_vs_{}",
        get_scenario_name(scenario_path1)?,
        get_scenario_name(scenario_path2)?
    );
    Ok([OUTPUT_DIRECTORY_ROOT, &name].iter().collect())
}

/// Get the default output directory for a sensitivity analysis of a scenario
pub fn get_sensitivity_output_dir(scenario_path: &Path) -> Result<PathBuf> {
    let name = format!("{}_sensitivity", get_scenario_name(scenario_path)?);
    Ok([OUTPUT_DIRECTORY_ROOT, &name].iter().collect())
}

/// Create a new output directory, optionally replacing an existing one.
///
/// # Returns
///
/// `true` if an existing directory with contents was overwritten, `false` otherwise.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let mut overwrite = false;
    if output_dir.is_dir() {
        if output_dir.read_dir()?.next().is_none() {
            // Already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use the --overwrite option to \
            replace it."
        );
        fs::remove_dir_all(output_dir)?;
        overwrite = true;
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the annual costs CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct AnnualCostsRow {
    vehicle_name: String,
    year: u32,
    calendar_year: u32,
    distance_km: Distance,
    acquisition: Money,
    energy: Money,
    maintenance: Money,
    infrastructure: Money,
    battery_replacement: Money,
    insurance: Money,
    registration: Money,
    carbon_tax: Money,
    other_taxes: Money,
    residual_value: Money,
    total: Money,
}

impl AnnualCostsRow {
    /// Create a new [`AnnualCostsRow`]
    fn new(vehicle_name: &str, annual: &AnnualCosts) -> Self {
        let costs = &annual.costs;
        Self {
            vehicle_name: vehicle_name.to_string(),
            year: annual.year,
            calendar_year: annual.calendar_year,
            distance_km: annual.distance_km,
            acquisition: costs.acquisition,
            energy: costs.energy,
            maintenance: costs.maintenance,
            infrastructure: costs.infrastructure,
            battery_replacement: costs.battery_replacement,
            insurance: costs.insurance,
            registration: costs.registration,
            carbon_tax: costs.carbon_tax,
            other_taxes: costs.other_taxes,
            residual_value: costs.residual_value,
            total: annual.total(),
        }
    }
}

/// Represents a row in the summary CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SummaryRow {
    vehicle_name: String,
    vehicle_type: VehicleType,
    analysis_period_years: u32,
    lifetime_distance_km: Distance,
    total_tco: Money,
    lcod: MoneyPerDistance,
    nominal_total: Money,
}

impl SummaryRow {
    fn new(output: &TcoOutput) -> Self {
        Self {
            vehicle_name: output.vehicle_name.clone(),
            vehicle_type: output.vehicle_type,
            analysis_period_years: output.analysis_period_years,
            lifetime_distance_km: output.lifetime_distance_km,
            total_tco: output.total_tco,
            lcod: output.lcod,
            nominal_total: output.annual_costs.nominal_total(),
        }
    }
}

/// Represents a row in the NPV costs CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct NpvCostsRow {
    vehicle_name: String,
    component: String,
    npv: Money,
}

/// Represents a row in the comparison CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ComparisonRow {
    component: String,
    option1: Money,
    option2: Money,
    difference: Money,
}

/// Represents a row in the sensitivity CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SensitivityRow {
    parameter: SensitivityParameter,
    value: f64,
    tco: Money,
    lcod: MoneyPerDistance,
    baseline_tco: Money,
    baseline_lcod: MoneyPerDistance,
}

/// An object for writing TCO results to file
pub struct DataWriter {
    annual_costs_writer: csv::Writer<File>,
    summary_writer: csv::Writer<File>,
    npv_costs_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        Ok(Self {
            annual_costs_writer: new_writer(ANNUAL_COSTS_FILE_NAME)?,
            summary_writer: new_writer(SUMMARY_FILE_NAME)?,
            npv_costs_writer: new_writer(NPV_COSTS_FILE_NAME)?,
        })
    }

    /// Write the results for one vehicle
    pub fn write_output(&mut self, output: &TcoOutput) -> Result<()> {
        for annual in &output.annual_costs {
            let row = AnnualCostsRow::new(&output.vehicle_name, annual);
            self.annual_costs_writer.serialize(row)?;
        }

        self.summary_writer.serialize(SummaryRow::new(output))?;

        for key in ComponentKey::all() {
            let row = NpvCostsRow {
                vehicle_name: output.vehicle_name.clone(),
                component: key.to_string(),
                npv: key.value(&output.npv_costs.costs),
            };
            self.npv_costs_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.annual_costs_writer.flush()?;
        self.summary_writer.flush()?;
        self.npv_costs_writer.flush()?;

        Ok(())
    }
}

/// Write the component-by-component comparison of two results to a CSV file
pub fn write_comparison(output_path: &Path, comparison: &ComparisonResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path.join(COMPARISON_FILE_NAME))?;
    for key in ComponentKey::all() {
        let component = key.to_string();
        let row = ComparisonRow {
            option1: key.value(&comparison.option1.npv_costs.costs),
            option2: key.value(&comparison.option2.npv_costs.costs),
            difference: comparison.component_differences[&component],
            component,
        };
        writer.serialize(row)?;
    }
    writer.serialize(ComparisonRow {
        component: "total".to_string(),
        option1: comparison.option1.total_tco,
        option2: comparison.option2.total_tco,
        difference: comparison.tco_difference,
    })?;
    writer.flush()?;

    Ok(())
}

/// Write the results of sensitivity analyses to a CSV file
pub fn write_sensitivity<'a, I>(output_path: &Path, results: I) -> Result<()>
where
    I: IntoIterator<Item = &'a SensitivityResult>,
{
    let mut writer = csv::Writer::from_path(output_path.join(SENSITIVITY_FILE_NAME))?;
    for result in results {
        for ((value, tco), lcod) in result.values.iter().zip(&result.tco).zip(&result.lcod) {
            let row = SensitivityRow {
                parameter: result.parameter,
                value: *value,
                tco: *tco,
                lcod: *lcod,
                baseline_tco: result.baseline_tco,
                baseline_lcod: result.baseline_lcod,
            };
            writer.serialize(row)?;
        }
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::TcoCalculator;
    use crate::comparison::compare;
    use crate::fixture::{diesel_scenario, electric_scenario};
    use crate::registry::StrategyRegistry;
    use crate::scenario::ScenarioInput;
    use crate::sensitivity::analyse;
    use itertools::{Itertools, assert_equal};
    use rstest::rstest;
    use serde::de::DeserializeOwned;
    use tempfile::tempdir;

    fn calculate(scenario: ScenarioInput) -> TcoOutput {
        let registry = StrategyRegistry::with_defaults();
        TcoCalculator::new(&registry).calculate(scenario).unwrap()
    }

    fn read_rows<T: DeserializeOwned>(file_path: &Path) -> Vec<T> {
        csv::Reader::from_path(file_path)
            .unwrap()
            .into_deserialize()
            .try_collect()
            .unwrap()
    }

    #[test]
    fn test_get_output_dir() {
        assert_eq!(
            get_output_dir(Path::new("some/dir/bet_linehaul.toml")).unwrap(),
            PathBuf::from_iter(["tco_results", "bet_linehaul"])
        );
        assert_eq!(
            get_comparison_output_dir(Path::new("a.toml"), Path::new("b.toml")).unwrap(),
            PathBuf::from_iter(["tco_results", "a_vs_b"])
        );
        assert_eq!(
            get_sensitivity_output_dir(Path::new("a.toml")).unwrap(),
            PathBuf::from_iter(["tco_results", "a_sensitivity"])
        );
    }

    #[test]
    fn test_create_output_directory() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("results");

        // New directory
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());

        // Existing empty directory
        assert!(!create_output_directory(&output_dir, false).unwrap());

        // Existing directory with contents
        fs::write(output_dir.join("file.txt"), "contents").unwrap();
        assert!(create_output_directory(&output_dir, false).is_err());
        assert!(create_output_directory(&output_dir, true).unwrap());
        assert!(!output_dir.join("file.txt").exists());
    }

    #[rstest]
    fn test_write_output(diesel_scenario: ScenarioInput) {
        let output = calculate(diesel_scenario);
        let dir = tempdir().unwrap();

        {
            let mut writer = DataWriter::create(dir.path()).unwrap();
            writer.write_output(&output).unwrap();
            writer.flush().unwrap();
        }

        let rows: Vec<AnnualCostsRow> = read_rows(&dir.path().join(ANNUAL_COSTS_FILE_NAME));
        assert_equal(
            rows,
            output
                .annual_costs
                .iter()
                .map(|annual| AnnualCostsRow::new("Diesel truck", annual)),
        );

        let rows: Vec<SummaryRow> = read_rows(&dir.path().join(SUMMARY_FILE_NAME));
        assert_equal(rows, [SummaryRow::new(&output)]);

        let rows: Vec<NpvCostsRow> = read_rows(&dir.path().join(NPV_COSTS_FILE_NAME));
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].component, "acquisition");
        assert_eq!(rows[0].npv, output.npv_costs.costs.acquisition);
    }

    #[rstest]
    fn test_write_comparison(diesel_scenario: ScenarioInput, electric_scenario: ScenarioInput) {
        let comparison = compare(calculate(diesel_scenario), calculate(electric_scenario));
        let dir = tempdir().unwrap();
        write_comparison(dir.path(), &comparison).unwrap();

        let rows: Vec<ComparisonRow> = read_rows(&dir.path().join(COMPARISON_FILE_NAME));
        assert_eq!(rows.len(), 13);
        let total = rows.last().unwrap();
        assert_eq!(total.component, "total");
        assert_eq!(total.difference, comparison.tco_difference);
    }

    #[rstest]
    fn test_write_sensitivity(electric_scenario: ScenarioInput) {
        let registry = StrategyRegistry::with_defaults();
        let calculator = TcoCalculator::new(&registry);
        let result = analyse(
            &calculator,
            &electric_scenario,
            SensitivityParameter::EnergyPrice,
            &[0.2, 0.3],
        )
        .unwrap();
        let dir = tempdir().unwrap();
        write_sensitivity(dir.path(), [&result]).unwrap();

        let rows: Vec<SensitivityRow> = read_rows(&dir.path().join(SENSITIVITY_FILE_NAME));
        assert_equal(
            rows.iter().map(|row| (row.parameter, row.value, row.tco)),
            [
                (SensitivityParameter::EnergyPrice, 0.2, result.tco[0]),
                (SensitivityParameter::EnergyPrice, 0.3, result.tco[1]),
            ],
        );
    }
}
