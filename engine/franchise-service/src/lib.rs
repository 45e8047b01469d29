//! Franchise Cap Simulator Service Library
//!
//! Configuration loading, logging setup, seed data and the service state shared by
//! the `cap-sim` command line.

use anyhow::{Context, Result};
use std::path::Path;

pub mod config;
pub mod logging;
pub mod seed;
pub mod service;

pub use config::ServiceConfig;
pub use logging::initialize_logging_with_config;
pub use seed::{SeedData, SeedError};
pub use service::ServiceState;

/// Load configuration from an optional file, `.env` and environment variables
pub fn load_configuration(config_file: Option<&Path>) -> Result<ServiceConfig> {
    config::load_config(config_file).context("Failed to load service configuration")
}
