//! Configuration types and functions for the SleepNumber Stream Deck menu.

use serde::{Deserialize, Serialize};

use crate::{
    button::{ButtonDescription, ENTITY_DESCRIPTIONS, NAME_PREFIX},
    error::ConfigError,
};

/// Main configuration for the SleepNumber menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct SleepNumberConfig {
    /// Display name for the menu
    #[serde(default = "default_name")]
    pub name: String,
    /// Keys of the buttons to show, all of them if unset
    #[serde(default)]
    pub buttons: Option<Vec<String>>,
    /// Label keys with the button name only instead of the full entity name
    #[serde(default = "default_short_labels")]
    pub short_labels: bool,
}

fn default_name() -> String {
    NAME_PREFIX.to_string()
}

fn default_short_labels() -> bool {
    true
}

impl Default for SleepNumberConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            buttons: None,
            short_labels: default_short_labels(),
        }
    }
}

impl SleepNumberConfig {
    /// Resolves the configured button keys against the known descriptions.
    ///
    /// # Returns
    ///
    /// The descriptions to show in configuration order, or
    /// `ConfigError::UnknownButton` for the first key that is not known.
    pub fn descriptions(&self) -> Result<Vec<&'static ButtonDescription>, ConfigError> {
        match &self.buttons {
            None => Ok(ENTITY_DESCRIPTIONS.iter().collect()),
            Some(keys) => keys
                .iter()
                .map(|key| {
                    ButtonDescription::by_key(key)
                        .ok_or_else(|| ConfigError::UnknownButton(key.clone()))
                })
                .collect(),
        }
    }
}

/// Parses a configuration from YAML and checks the button keys.
pub fn parse_config(yaml: &str) -> Result<SleepNumberConfig, ConfigError> {
    let config: SleepNumberConfig = serde_yaml::from_str(yaml)?;
    config.descriptions()?;
    Ok(config)
}

/// Loads a configuration from a YAML file.
///
/// # Arguments
///
/// * `arg` - Path to the YAML configuration file
///
/// # Example
///
/// ```no_run
/// use sleepnumber_buttons::config;
///
/// let config = config::load_config("sleepnumber.yaml").expect("Failed to load config");
/// println!("Menu: {}", config.name);
/// ```
pub fn load_config<S: Into<String>>(arg: S) -> Result<SleepNumberConfig, ConfigError> {
    let file = std::fs::File::open(arg.into())?;
    let reader = std::io::BufReader::new(file);
    let config: SleepNumberConfig = serde_yaml::from_reader(reader)?;
    config.descriptions()?;
    Ok(config)
}
