// FILE: src/cli/config.rs

use crate::config::Config;
use crate::error::{LazyError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "lazy-config.json";

/// Project configuration file. Keys other than the file paths become
/// generation configuration (variables and `custom_classes`).
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl ConfigFile {
    /// Content written when `--config` is used and no file exists.
    pub fn scaffold() -> Self {
        let mut values = Map::new();
        values.insert(
            "custom_classes".to_string(),
            json!({
                "my-button": "background-color: blue;\n    color: white;\n    padding: 10px 20px;\n    border-radius: 5px;",
                "my-container": "max-width: 960px;\n    margin: 0 auto;\n    padding: 20px;"
            }),
        );
        Self {
            input_file: Some(super::DEFAULT_INPUT_FILE.to_string()),
            output_file: Some(super::DEFAULT_OUTPUT_FILE.to_string()),
            values,
        }
    }

    pub fn to_config(&self) -> Config {
        let mut config = Config::new();
        config.merge_object(self.values.clone());
        // The paths stay visible to `{input_file}`-style references.
        if let Some(input) = &self.input_file {
            config.set_text("input_file", input.clone());
        }
        if let Some(output) = &self.output_file {
            config.set_text("output_file", output.clone());
        }
        config
    }
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| LazyError::FileNotFound {
        path: format!("Config file {}: {}", config_path, e),
    })?;

    let config = if config_path.ends_with(".json") {
        serde_json::from_str(&config_content).map_err(|e| LazyError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })?
    } else if config_path.ends_with(".toml") {
        toml::from_str(&config_content).map_err(|e| LazyError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })?
    } else {
        return Err(LazyError::InvalidFormat {
            message: "Config file must be .json or .toml format".to_string(),
        });
    };

    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

pub fn create_default(config_path: &str) -> Result<()> {
    let content = serde_json::to_string_pretty(&ConfigFile::scaffold())
        .map_err(|e| LazyError::config(format!("Failed to serialize default config: {}", e)))?;
    fs::write(config_path, content)?;
    println!("📝 Created default config file: {}", config_path);
    Ok(())
}

pub fn load_or_create(config_path: &str) -> Result<ConfigFile> {
    if !Path::new(config_path).exists() {
        create_default(config_path)?;
    }
    load(config_path)
}
