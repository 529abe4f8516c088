//! Configuration management for jobscope
//!
//! This crate provides functionality for managing the jobscope configuration,
//! including loading, saving, updating, and deleting configuration settings.

/// Error types for the configuration module
pub mod error;

use crate::error::Error;
use clap::Parser;
use jobscope_common::utils::io::file::{delete_path, read_file, write_file};
use serde::{Deserialize, Serialize};
#[allow(deprecated)]
use std::env::home_dir;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "JOBSCOPE_CONFIG";

/// Command line arguments for the configuration command
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Display and edit the current configuration",
    override_usage = "jobscope config [OPTIONS]"
)]
pub struct ConfigArgs {
    /// The target key to update.
    #[clap(required = false, default_value = "")]
    key: String,

    /// The value to set the key to.
    #[clap(required = false, default_value = "")]
    value: String,
}

/// The [`Configuration`] struct represents the configuration of the CLI. Commands fall back to
/// these values when an option is not given on the command line.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// The number of verifiers assigned to each job, which sizes the verification arrays
    pub verifiers_per_auction: usize,

    /// The default output: 'print', 'json', or a file path
    pub output: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration { verifiers_per_auction: 1, output: "print".to_string() }
    }
}

/// Returns the configuration file path, `$HOME/.jobscope/config.toml` unless overridden by
/// [`CONFIG_PATH_ENV`].
#[allow(deprecated)]
pub fn config_path() -> Result<PathBuf, Error> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let mut home = home_dir().ok_or_else(|| {
        Error::Generic(
            "failed to get home directory. does your os support `std::env::home_dir()`?"
                .to_string(),
        )
    })?;
    home.push(".jobscope");
    home.push("config.toml");
    Ok(home)
}

impl Configuration {
    /// Returns the current configuration.
    pub fn load() -> Result<Self, Error> {
        Self::load_from(config_path()?)
    }

    /// Loads the configuration at `path`, creating it with defaults if it doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();

        // if the config file doesn't exist, create it
        if !path.exists() {
            debug!("creating default configuration at '{}'", path.display());
            Configuration::default().save_to(path)?;
        }

        // read the config file
        let contents = read_file(path)
            .map_err(|e| Error::Generic(format!("failed to read config file: {e}")))?;

        // parse the config file
        toml::from_str(&contents)
            .map_err(|e| Error::ParseError(format!("failed to parse config file: {e}")))
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> Result<(), Error> {
        self.save_to(config_path()?)
    }

    /// Saves the configuration to `path`.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        write_file(
            path,
            &toml::to_string(&self)
                .map_err(|e| Error::ParseError(format!("failed to serialize config: {e}")))?,
        )
        .map_err(|e| Error::Generic(format!("failed to write config file: {e}")))
    }

    /// Deletes the configuration file.
    pub fn delete() -> Result<(), Error> {
        Self::delete_at(config_path()?)
    }

    /// Deletes the configuration file at `path`.
    pub fn delete_at<P: AsRef<Path>>(path: P) -> Result<(), Error> {
        delete_path(path).map_err(|e| Error::Generic(format!("failed to delete config file: {e}")))
    }

    /// Update a single key/value pair in the configuration, without saving it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        // update the key in the struct and ensure it's the correct type
        match key {
            "verifiers_per_auction" => {
                let verifiers = value.parse::<usize>().map_err(|_| {
                    Error::ParseError(format!("'{value}' is not a valid verifier count"))
                })?;
                if verifiers == 0 {
                    return Err(Error::ParseError(
                        "verifiers_per_auction must be at least 1".to_string(),
                    ));
                }
                self.verifiers_per_auction = verifiers;
            }
            "output" => {
                if value.is_empty() {
                    return Err(Error::ParseError("output must not be empty".to_string()));
                }
                self.output = value.to_string();
            }
            _ => {
                return Err(Error::Generic(format!(
                    "invalid key: \'{key}\' is not a valid configuration key."
                )))
            }
        }

        Ok(())
    }

    /// Update a single key/value pair in the configuration and write it to disk.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.set(key, value)?;
        self.save()
    }
}

/// The `config` command is used to display and edit the current configuration.
pub fn config(args: ConfigArgs) -> Result<(), Error> {
    if !args.key.is_empty() {
        if !args.value.is_empty() {
            // read the config file and update the key/value pair
            let mut config = Configuration::load()?;
            config.update(&args.key, &args.value)?;
            info!("updated configuration! Set \'{}\' = \'{}\' .", &args.key, &args.value);
        } else {
            // key is set, but no value is set
            error!("found key but no value to set. Please specify a value to set, use `jobscope config --help` for more information.");
        }
    } else {
        // no key is set, print the config file
        println!("{:#?}", Configuration::load()?);
        info!("use `jobscope config <KEY> <VALUE>` to set a key/value pair.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn scratch() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join(".jobscope").join("config.toml");
        (dir, path)
    }

    // Test default configuration
    #[test]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.verifiers_per_auction, 1);
        assert_eq!(config.output, "print");
    }

    // Test loading creates a default file
    #[test]
    fn test_load_configuration() {
        let (_dir, path) = scratch();
        let config = Configuration::load_from(&path).expect("failed to load config file");

        assert!(path.exists());
        assert_eq!(config, Configuration::default());
    }

    // Test saving configuration to a file
    #[test]
    fn test_save_configuration() {
        let (_dir, path) = scratch();
        let mut config = Configuration::default();

        config.set("verifiers_per_auction", "3").expect("failed to set verifiers");
        config.set("output", "json").expect("failed to set output");
        config.save_to(&path).expect("failed to save config file");

        let loaded_config = Configuration::load_from(&path).expect("failed to load config file");
        assert_eq!(loaded_config.verifiers_per_auction, 3);
        assert_eq!(loaded_config.output, "json");
    }

    // Test deleting configuration file
    #[test]
    fn test_delete_configuration() {
        let (_dir, path) = scratch();
        let mut config = Configuration::load_from(&path).expect("failed to load config file");
        config.set("output", "/tmp/out.json").expect("failed to set output");
        config.save_to(&path).expect("failed to save config file");

        Configuration::delete_at(&path).expect("failed to delete config file");
        let config = Configuration::load_from(&path).expect("failed to load config file");
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Configuration::default();

        assert!(matches!(config.set("verifiers_per_auction", "0"), Err(Error::ParseError(_))));
        assert!(matches!(config.set("verifiers_per_auction", "two"), Err(Error::ParseError(_))));
        assert!(matches!(config.set("rpc_url", "http://localhost"), Err(Error::Generic(_))));
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_malformed_file() {
        let (_dir, path) = scratch();
        write_file(&path, "verifiers_per_auction = \"many\"").expect("failed to write file");

        assert!(matches!(Configuration::load_from(&path), Err(Error::ParseError(_))));
    }

    // Test the environment override used by `load` and `save`
    #[test]
    #[serial]
    fn test_env_override() {
        let (_dir, path) = scratch();
        std::env::set_var(CONFIG_PATH_ENV, &path);

        let mut config = Configuration::load().expect("failed to load config file");
        config.update("verifiers_per_auction", "2").expect("failed to update verifiers");
        let reloaded = Configuration::load().expect("failed to load config file");

        std::env::remove_var(CONFIG_PATH_ENV);
        assert_ne!(config_path().ok(), Some(path.clone()));
        assert_eq!(reloaded.verifiers_per_auction, 2);
    }
}
