use crate::config::NetworkConfig;
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use log::{debug, info};
use std::fs::File;
use std::path::Path;

/// Supported configuration document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Load and parse a network configuration from a YAML or JSON file
pub fn load_config(config_path: &Path) -> Result<NetworkConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let format = match ConfigFormat::from_path(config_path) {
        Some(format) => format,
        None => bail!(
            "Unsupported config format for '{}' (expected .yaml, .yml or .json)",
            config_path.display()
        ),
    };

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file '{}'", config_path.display()))?;

    let config: NetworkConfig = match format {
        ConfigFormat::Yaml => serde_yaml::from_reader(file)
            .wrap_err_with(|| format!("Failed to parse YAML config '{}'", config_path.display()))?,
        ConfigFormat::Json => serde_json::from_reader(file)
            .wrap_err_with(|| format!("Failed to parse JSON config '{}'", config_path.display()))?,
    };

    debug!(
        "Parsed {} nodes, {} edges, {} declared resources",
        config.nodes.len(),
        config.edges.len(),
        config.resources.len()
    );

    config.validate()?;

    Ok(config)
}

/// CLI arguments that can override configuration file settings
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub min_degree: Option<usize>,
}

/// Apply CLI overrides to a loaded configuration
pub fn apply_overrides(config: &mut NetworkConfig, overrides: &ConfigOverrides) -> Result<()> {
    if let Some(min_degree) = overrides.min_degree {
        info!(
            "Overriding min_degree: {} -> {}",
            config.min_degree(),
            min_degree
        );
        config.min_degree = Some(min_degree);
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

/// Write a configuration to disk, format chosen by extension
pub fn save_config(config: &NetworkConfig, output_path: &Path) -> Result<()> {
    let content = match ConfigFormat::from_path(output_path) {
        Some(ConfigFormat::Json) => serde_json::to_string_pretty(config)
            .wrap_err("Failed to serialize config to JSON")?,
        Some(ConfigFormat::Yaml) => {
            serde_yaml::to_string(config).wrap_err("Failed to serialize config to YAML")?
        }
        None => bail!(
            "Unsupported config format for '{}' (expected .yaml, .yml or .json)",
            output_path.display()
        ),
    };

    std::fs::write(output_path, content)
        .wrap_err_with(|| format!("Failed to write config to '{}'", output_path.display()))?;
    info!("Configuration written to {}", output_path.display());
    Ok(())
}
