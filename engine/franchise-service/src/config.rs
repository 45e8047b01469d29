//! Service configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use cap_engine::LeagueCapTable;
use contract_lifecycle::LifecycleConfig;
use market_valuation::ValuationConfig;

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// League cap table for the simulated year
    pub league: LeagueCapTable,

    /// Market valuation configuration
    pub valuation: ValuationConfig,

    /// Contract lifecycle configuration
    pub lifecycle: LifecycleConfig,

    /// Service-level configuration
    pub service: ServiceSettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Seed document with players and contracts
    pub seed_file: Option<PathBuf>,

    /// Write the ledger back to the seed file after a mutating command
    pub write_back: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,

    /// Log file path (if None, logs to stderr)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string(), file: None }
    }
}

/// Load configuration from files and environment variables
///
/// Precedence, lowest first: component defaults with their own environment
/// overrides, the TOML file (explicit path or `CAPSIM_CONFIG_FILE`), then
/// `CAPSIM_*` variables. A `.env` file is read before anything else.
pub fn load_config(config_file: Option<&Path>) -> Result<ServiceConfig> {
    dotenv::dotenv().ok();

    let config_file = config_file
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("CAPSIM_CONFIG_FILE").ok().map(PathBuf::from));

    let mut config = match config_file {
        Some(path) if path.exists() => {
            tracing::debug!("Loading configuration from file: {:?}", path);
            load_from_file(&path)?
        }
        Some(path) => {
            return Err(anyhow::anyhow!("Configuration file not found: {:?}", path));
        }
        None => from_component_env()?,
    };

    // Override with environment variables
    load_from_env(&mut config)?;

    // Validate configuration
    validate_config(&config)?;

    Ok(config)
}

/// Component configurations loaded from their own environment variables
fn from_component_env() -> Result<ServiceConfig> {
    Ok(ServiceConfig {
        league: LeagueCapTable::from_env().context("Failed to load league cap table")?,
        valuation: ValuationConfig::from_env().context("Failed to load valuation config")?,
        lifecycle: LifecycleConfig::from_env().context("Failed to load lifecycle config")?,
        ..Default::default()
    })
}

/// Load configuration from a TOML file
pub fn load_from_file(path: &Path) -> Result<ServiceConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .build()
        .with_context(|| format!("Failed to read configuration file: {:?}", path))?;

    settings
        .try_deserialize::<ServiceConfig>()
        .with_context(|| format!("Invalid configuration file: {:?}", path))
}

/// Load configuration from environment variables
fn load_from_env(config: &mut ServiceConfig) -> Result<()> {
    if let Ok(level) = std::env::var("CAPSIM_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Ok(format) = std::env::var("CAPSIM_LOG_FORMAT") {
        config.logging.format = format;
    }

    if let Ok(file) = std::env::var("CAPSIM_LOG_FILE") {
        config.logging.file = Some(PathBuf::from(file));
    }

    if let Ok(seed_file) = std::env::var("CAPSIM_SEED_FILE") {
        config.service.seed_file = Some(PathBuf::from(seed_file));
    }

    if let Ok(write_back) = std::env::var("CAPSIM_WRITE_BACK") {
        config.service.write_back = write_back.parse().unwrap_or(false);
    }

    if let Ok(year) = std::env::var("CAPSIM_CAP_YEAR") {
        config.league.year = year.parse().context("Invalid CAPSIM_CAP_YEAR")?;
    }

    if let Ok(base_cap) = std::env::var("CAPSIM_BASE_CAP") {
        config.league.base_cap = base_cap.parse().context("Invalid CAPSIM_BASE_CAP")?;
    }

    if let Ok(seed) = std::env::var("CAPSIM_NEGOTIATION_SEED") {
        config.lifecycle.negotiation_seed =
            Some(seed.parse().context("Invalid CAPSIM_NEGOTIATION_SEED")?);
    }

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &ServiceConfig) -> Result<()> {
    // Validate log level
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level)),
    }

    // Validate log format
    match config.logging.format.as_str() {
        "json" | "pretty" | "compact" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format)),
    }

    config.league.validate().context("Invalid league cap table")?;
    config.valuation.validate().context("Invalid valuation config")?;
    config.lifecycle.validate().context("Invalid lifecycle config")?;

    Ok(())
}

/// Save configuration to a TOML file
pub fn save_config(config: &ServiceConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write configuration file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.league.base_cap, 255_400_000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_validate_rejects_bad_logging() {
        let mut config = ServiceConfig::default();
        config.logging.level = "loud".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = ServiceConfig::default();
        config.logging.format = "xml".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[league]\nbase_cap = 250000000\n\n[lifecycle]\nnegotiation_seed = 7\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = load_from_file(file.path()).unwrap();
        assert_eq!(config.league.base_cap, 250_000_000);
        assert_eq!(config.league.year, 2024);
        assert_eq!(config.league.rookie_scale.len(), 7);
        assert_eq!(config.lifecycle.negotiation_seed, Some(7));
        assert_eq!(config.lifecycle.base_tag_amount, 20_000_000);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cap-sim.toml");

        let mut config = ServiceConfig::default();
        config.league.year = 2026;
        config.lifecycle.negotiation_seed = Some(11);
        config.service.seed_file = Some(PathBuf::from("league.json"));
        config.service.write_back = true;
        config.logging.level = "debug".to_string();
        save_config(&config, &path).unwrap();

        let loaded = load_from_file(&path).unwrap();
        assert!(validate_config(&loaded).is_ok());
        assert_eq!(loaded.league.year, 2026);
        assert_eq!(loaded.league.rookie_scale, config.league.rookie_scale);
        assert_eq!(loaded.valuation.position_multiplier("QB"), config.valuation.position_multiplier("QB"));
        assert_eq!(loaded.valuation.age, config.valuation.age);
        assert_eq!(loaded.lifecycle.tag_multiplier("LT"), config.lifecycle.tag_multiplier("LT"));
        assert_eq!(loaded.lifecycle.negotiation_seed, Some(11));
        assert_eq!(loaded.service.seed_file, Some(PathBuf::from("league.json")));
        assert!(loaded.service.write_back);
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.logging.file, None);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(load_config(Some(&missing)).is_err());
    }
}
