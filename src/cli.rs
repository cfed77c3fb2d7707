//! The command line interface for the TCO calculator.
use crate::calculator::{TcoCalculator, TcoOutput};
use crate::comparison::{ComparisonOption, compare};
use crate::input::load_scenario;
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{
    DataWriter, create_output_directory, get_comparison_output_dir, get_output_dir,
    get_sensitivity_output_dir, write_comparison, write_sensitivity,
};
use crate::registry::StrategyRegistry;
use crate::sensitivity::{SensitivityParameter, analyse_many};
use crate::settings::Settings;
use ::log::{debug, info, warn};
use anyhow::{Context, Result, ensure};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the TCO calculator.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for commands which write output files
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// Options for the sensitivity command
#[derive(Args)]
pub struct SensitivityOpts {
    /// Parameter(s) to vary, e.g. energy_price
    #[arg(short, long = "parameter", required = true)]
    pub parameters: Vec<SensitivityParameter>,
    /// Comma-separated values to use (only with a single parameter)
    #[arg(long, value_delimiter = ',', conflicts_with = "range")]
    pub values: Option<Vec<f64>>,
    /// Vary each parameter by up to this fraction either side of its value in the scenario
    #[arg(long, default_value_t = 0.2)]
    pub range: f64,
    /// Number of values to use with --range (whole-number parameters may get fewer)
    #[arg(long, default_value_t = 5)]
    pub steps: usize,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Calculate the TCO of a vehicle.
    Run {
        /// Path to the scenario file.
        scenario_path: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Compare the TCO of two vehicles.
    Compare {
        /// Path to the scenario file for the baseline vehicle.
        scenario_path1: PathBuf,
        /// Path to the scenario file for the alternative vehicle.
        scenario_path2: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Vary scenario parameters and report how the TCO changes.
    Sensitivity {
        /// Path to the scenario file.
        scenario_path: PathBuf,
        /// Which parameters to vary and how
        #[command(flatten)]
        sensitivity_opts: SensitivityOpts,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Validate a scenario file.
    Validate {
        /// Path to the scenario file.
        scenario_path: PathBuf,
    },
    /// Manage example scenarios.
    Example {
        /// The available subcommands for managing example scenarios.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Manage program settings.
    Settings {
        /// The subcommands for managing settings.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run {
                scenario_path,
                opts,
            } => handle_run_command(&scenario_path, &opts, None),
            Self::Compare {
                scenario_path1,
                scenario_path2,
                opts,
            } => handle_compare_command(&scenario_path1, &scenario_path2, &opts, None),
            Self::Sensitivity {
                scenario_path,
                sensitivity_opts,
                opts,
            } => handle_sensitivity_command(&scenario_path, &sensitivity_opts, &opts, None),
            Self::Validate { scenario_path } => handle_validate_command(&scenario_path, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ tco --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Create the output directory and start logging to it.
///
/// # Returns
///
/// The path to the output directory.
fn prepare_output(
    opts: &RunOpts,
    default_output_dir: impl FnOnce() -> Result<PathBuf>,
    settings: &Settings,
) -> Result<PathBuf> {
    let output_path = match &opts.output_dir {
        Some(path) => path.clone(),
        None => default_output_dir()?,
    };

    let overwrite =
        create_output_directory(&output_path, opts.overwrite || settings.overwrite).with_context(
            || {
                format!(
                    "Failed to create output directory: {}",
                    output_path.display()
                )
            },
        )?;

    // Initialise program logger
    log::init(Some(&settings.log_level), Some(&output_path))
        .context("Failed to initialise logging.")?;
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    Ok(output_path)
}

/// Load a scenario from file and calculate its TCO
fn calculate_scenario(registry: &StrategyRegistry, scenario_path: &Path) -> Result<TcoOutput> {
    let scenario = load_scenario(scenario_path).context("Failed to load scenario.")?;
    info!(
        "Loaded scenario '{}' from {}",
        scenario.name,
        scenario_path.display()
    );
    debug!(
        "Strategies for {}: {:?}",
        scenario.name,
        registry.resolve_for_scenario(&scenario)?
    );

    let output = TcoCalculator::new(registry)
        .calculate(scenario)
        .with_context(|| format!("Failed to calculate TCO for {}", scenario_path.display()))?;
    info!(
        "{} ({}): total TCO {:.2}, LCOD {:.4} per km over {} years",
        output.vehicle_name,
        output.vehicle_type,
        output.total_tco.value(),
        output.lcod.value(),
        output.analysis_period_years
    );

    Ok(output)
}

/// Handle the `run` command.
pub fn handle_run_command(
    scenario_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let output_path = prepare_output(opts, || get_output_dir(scenario_path), &settings)?;

    let registry = StrategyRegistry::with_defaults();
    let output = calculate_scenario(&registry, scenario_path)?;

    let mut writer = DataWriter::create(&output_path)?;
    writer.write_output(&output)?;
    writer.flush()?;
    write_metadata(&output_path, "run", &[scenario_path])?;
    info!("Calculation complete!");

    Ok(())
}

/// Handle the `compare` command.
pub fn handle_compare_command(
    scenario_path1: &Path,
    scenario_path2: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let output_path = prepare_output(
        opts,
        || get_comparison_output_dir(scenario_path1, scenario_path2),
        &settings,
    )?;

    let registry = StrategyRegistry::with_defaults();
    let output1 = calculate_scenario(&registry, scenario_path1)?;
    let output2 = calculate_scenario(&registry, scenario_path2)?;

    let mut writer = DataWriter::create(&output_path)?;
    writer.write_output(&output1)?;
    writer.write_output(&output2)?;
    writer.flush()?;

    let comparison = compare(output1, output2);
    write_comparison(&output_path, &comparison)?;
    write_metadata(&output_path, "compare", &[scenario_path1, scenario_path2])?;

    let (cheaper, dearer) = match comparison.cheaper_option {
        ComparisonOption::First => (&comparison.option1, &comparison.option2),
        ComparisonOption::Second => (&comparison.option2, &comparison.option1),
    };
    info!(
        "{} is cheaper than {} by {:.2} ({:.1}% of the baseline TCO)",
        cheaper.vehicle_name,
        dearer.vehicle_name,
        comparison.savings().value(),
        comparison.tco_percentage.abs()
    );
    match comparison.payback_year {
        Some(year) => info!(
            "Cumulative costs of {} fall below those of {} in year {year}",
            comparison.option1.vehicle_name, comparison.option2.vehicle_name
        ),
        None => info!("Cumulative costs do not cross within the analysis period"),
    }

    Ok(())
}

/// Handle the `sensitivity` command.
pub fn handle_sensitivity_command(
    scenario_path: &Path,
    sensitivity_opts: &SensitivityOpts,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    ensure!(
        sensitivity_opts.values.is_none() || sensitivity_opts.parameters.len() == 1,
        "--values can only be used when varying a single parameter"
    );

    let settings = load_settings(settings)?;
    let output_path =
        prepare_output(opts, || get_sensitivity_output_dir(scenario_path), &settings)?;

    let scenario = load_scenario(scenario_path).context("Failed to load scenario.")?;
    info!(
        "Loaded scenario '{}' from {}",
        scenario.name,
        scenario_path.display()
    );

    let sweeps = sensitivity_opts
        .parameters
        .iter()
        .map(|parameter| {
            let values = match &sensitivity_opts.values {
                Some(values) => values.clone(),
                None => parameter.variation_values(
                    parameter.baseline_value(&scenario)?,
                    sensitivity_opts.range,
                    sensitivity_opts.steps,
                ),
            };
            Ok((*parameter, values))
        })
        .collect::<Result<Vec<_>>>()?;

    let registry = StrategyRegistry::with_defaults();
    let calculator = TcoCalculator::new(&registry);
    let results = analyse_many(&calculator, &scenario, &sweeps)
        .context("Sensitivity analysis failed.")?;
    for result in results.values() {
        info!(
            "Varied {} over {} values: TCO from {:.2} to {:.2}",
            result.parameter,
            result.values.len(),
            result.tco.first().map_or(0.0, |tco| tco.value()),
            result.tco.last().map_or(0.0, |tco| tco.value())
        );
    }

    write_sensitivity(&output_path, results.values())?;
    write_metadata(&output_path, "sensitivity", &[scenario_path])?;
    info!("Sensitivity analysis complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(scenario_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(&settings.log_level), None).context("Failed to initialise logging.")?;

    // Load/validate the scenario and check that a strategy exists for every cost domain
    let scenario = load_scenario(scenario_path).context("Failed to validate scenario.")?;
    StrategyRegistry::with_defaults()
        .resolve_for_scenario(&scenario)
        .context("Failed to validate scenario.")?;
    info!("Scenario validation successful!");

    Ok(())
}
