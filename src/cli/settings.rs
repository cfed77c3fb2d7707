//! The CLI commands for managing the program settings file.
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;

/// Subcommands for settings
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Open the program settings file in a text editor, creating it if needed
    Edit,
    /// Print the path to the settings file
    Path,
    /// Print a commented-out `settings.toml` with the default values
    DumpDefault,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        let file_path = get_settings_file_path();
        match self {
            Self::Edit => {
                create_settings_file_if_missing(&file_path)?;
                println!("Opening settings file for editing: {}", file_path.display());
                edit::edit_file(&file_path).context("Failed to open text editor")?;
            }
            Self::Path => {
                let note = if file_path.is_file() {
                    ""
                } else {
                    " (not yet created)"
                };
                println!("{}{note}", file_path.display());
            }
            Self::DumpDefault => print!("{}", Settings::default_file_contents()?),
        }

        Ok(())
    }
}

/// Write a placeholder settings file at `file_path` unless one is already there.
///
/// # Returns
///
/// Whether a new file was written.
fn create_settings_file_if_missing(file_path: &Path) -> Result<bool> {
    if file_path.is_file() {
        return Ok(false);
    }

    if let Some(dir_path) = file_path.parent() {
        fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {}", dir_path.display()))?;
    }
    fs::write(file_path, Settings::default_file_contents()?)
        .with_context(|| format!("Failed to write {}", file_path.display()))?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_settings_file_if_missing() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config").join("settings.toml");

        assert!(create_settings_file_if_missing(&file_path).unwrap());
        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings::default()
        );

        // Existing files are left alone
        fs::write(&file_path, "overwrite = true").unwrap();
        assert!(!create_settings_file_if_missing(&file_path).unwrap());
        assert!(Settings::load_from_path(&file_path).unwrap().overwrite);
    }
}
