//! Program logging, built on `fern`.
//!
//! Log records go to the terminal (informational records to stdout, warnings and errors to
//! stderr) and, for commands which write output, to a pair of log files in the output directory.
use anyhow::{Context, Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::Arguments;
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Log level used when neither the environment nor the settings file names one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable which takes precedence over the log level in `settings.toml`
pub const LOG_LEVEL_ENV_VAR: &str = "TCO_LOG_LEVEL";

/// Log file for records below warning level
pub const LOG_INFO_FILE_NAME: &str = "tco_info.log";

/// Log file for warnings and errors
pub const LOG_ERROR_FILE_NAME: &str = "tco_error.log";

/// Whether [`init`] has already set up the logger in this process
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Set up the program logger.
///
/// The level is taken from [`LOG_LEVEL_ENV_VAR`] if set, then from `log_level_from_settings`,
/// then [`DEFAULT_LOG_LEVEL`]. If `log_file_dir` is given, [`LOG_INFO_FILE_NAME`] and
/// [`LOG_ERROR_FILE_NAME`] are (re)created there.
///
/// Only the first call in a process has any effect.
pub fn init(log_level_from_settings: Option<&str>, log_file_dir: Option<&Path>) -> Result<()> {
    if is_logger_initialised() {
        return Ok(());
    }

    let from_env = env::var(LOG_LEVEL_ENV_VAR).ok();
    let level = resolve_log_level(from_env.as_deref(), log_level_from_settings)?;
    let mut dispatch = Dispatch::new().chain(console_dispatch(level));
    if let Some(dir) = log_file_dir {
        dispatch = dispatch.chain(file_dispatch(level, dir)?);
    }
    dispatch.apply().context("Logger already initialised")?;
    let _ = LOGGER_INIT.set(());

    Ok(())
}

/// Pick the log level from the environment variable's value or the settings
fn resolve_log_level(from_env: Option<&str>, from_settings: Option<&str>) -> Result<LevelFilter> {
    parse_log_level(from_env.or(from_settings).unwrap_or(DEFAULT_LOG_LEVEL))
}

/// Convert a log level name (case insensitive) to a [`LevelFilter`]
pub fn parse_log_level(level: &str) -> Result<LevelFilter> {
    let level = match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

/// Colours for each level, or `None` if `is_terminal` is false
fn terminal_colours(is_terminal: bool) -> Option<ColoredLevelConfig> {
    is_terminal.then(|| {
        ColoredLevelConfig::new()
            .error(Color::Red)
            .warn(Color::Yellow)
            .info(Color::Green)
            .debug(Color::Blue)
            .trace(Color::Magenta)
    })
}

fn is_below_warning(metadata: &log::Metadata) -> bool {
    metadata.level() > LevelFilter::Warn
}

/// Informational records to stdout, warnings and errors to stderr
fn console_dispatch(level: LevelFilter) -> Dispatch {
    let stdout_colours = terminal_colours(std::io::stdout().is_terminal());
    let stderr_colours = terminal_colours(std::io::stderr().is_terminal());

    Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(is_below_warning)
                .level(level)
                .format(move |out, message, record| {
                    format_record(out, message, record, stdout_colours.as_ref());
                })
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .level(level.min(LevelFilter::Warn))
                .format(move |out, message, record| {
                    format_record(out, message, record, stderr_colours.as_ref());
                })
                .chain(std::io::stderr()),
        )
}

/// Log files in `dir`.
///
/// The files record at least info level and warnings respectively, whatever the terminal level.
fn file_dispatch(level: LevelFilter, dir: &Path) -> Result<Dispatch> {
    let create = |file_name: &str| {
        let path = dir.join(file_name);
        File::create(&path).with_context(|| format!("Could not create {}", path.display()))
    };
    let plain = |out: FormatCallback, message: &Arguments, record: &Record| {
        format_record(out, message, record, None);
    };

    Ok(Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(is_below_warning)
                .level(level.max(LevelFilter::Info))
                .format(plain)
                .chain(create(LOG_INFO_FILE_NAME)?),
        )
        .chain(
            Dispatch::new()
                .level(LevelFilter::Warn)
                .format(plain)
                .chain(create(LOG_ERROR_FILE_NAME)?),
        ))
}

/// Write a record as `[HH:MM:SS LEVEL target] message`
fn format_record(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    colours: Option<&ColoredLevelConfig>,
) {
    let timestamp = Local::now().format("%H:%M:%S");
    let target = record.target();
    match colours {
        Some(colours) => {
            let level = colours.color(record.level());
            out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
        }
        None => {
            let level = record.level();
            out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("off", LevelFilter::Off)]
    #[case("error", LevelFilter::Error)]
    #[case("WARN", LevelFilter::Warn)]
    #[case("Info", LevelFilter::Info)]
    #[case("debug", LevelFilter::Debug)]
    #[case("trace", LevelFilter::Trace)]
    fn test_parse_log_level(#[case] level: &str, #[case] expected: LevelFilter) {
        assert_eq!(parse_log_level(level).unwrap(), expected);
    }

    #[test]
    fn test_parse_log_level_unknown() {
        assert_eq!(
            parse_log_level("loud").unwrap_err().to_string(),
            "Unknown log level: loud"
        );
    }

    #[rstest]
    #[case(Some("debug"), Some("warn"), LevelFilter::Debug)]
    #[case(None, Some("warn"), LevelFilter::Warn)]
    #[case(None, None, LevelFilter::Info)]
    fn test_resolve_log_level(
        #[case] from_env: Option<&str>,
        #[case] from_settings: Option<&str>,
        #[case] expected: LevelFilter,
    ) {
        assert_eq!(
            resolve_log_level(from_env, from_settings).unwrap(),
            expected
        );
    }

    #[test]
    fn test_resolve_log_level_bad_env() {
        // The environment variable is not ignored when invalid
        assert!(resolve_log_level(Some("loud"), Some("warn")).is_err());
    }

    #[test]
    fn test_terminal_colours() {
        assert!(terminal_colours(false).is_none());
        assert!(terminal_colours(true).is_some());
    }
}
