//! Calculates and compares the total cost of ownership (TCO) of battery-electric and diesel heavy
//! vehicles.
//!
//! A [`scenario::ScenarioInput`] is costed year by year using one [`strategy::CostStrategy`] per
//! cost domain, looked up in a [`registry::StrategyRegistry`]. The annual costs are discounted to a
//! total TCO and levelised cost of driving by [`calculator::TcoCalculator`]. Results can then be
//! compared with [`comparison::compare`] or swept over parameter values with
//! [`sensitivity::analyse`].
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod calculator;
pub mod cli;
pub mod comparison;
pub mod costs;
pub mod error;
pub mod finance;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod registry;
pub mod scenario;
pub mod sensitivity;
pub mod settings;
pub mod strategy;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config folder for the program.
///
/// This will be something like: `~/.config/tco`
pub fn get_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tco");
    path
}
