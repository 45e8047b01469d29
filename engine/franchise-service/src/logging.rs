//! Logging and tracing setup
//!
//! Logs go to stderr (or a file) so command output on stdout stays machine-readable.

use anyhow::{Context, Result};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, prelude::*, util::SubscriberInitExt, EnvFilter};

/// Initialize logging with custom configuration
pub fn initialize_logging_with_config(
    level: &str,
    format: &str,
    file: Option<&std::path::Path>,
) -> Result<()> {
    let env_filter = EnvFilter::new(level);

    let fmt_layer = match file {
        Some(path) => {
            let log_file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {:?}", path))?;
            let writer = Mutex::new(log_file);
            match format {
                "json" => fmt::layer().json().with_writer(writer).with_target(true).boxed(),
                _ => fmt::layer().with_writer(writer).with_target(false).with_ansi(false).boxed(),
            }
        }
        None => match format {
            "json" => fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .boxed(),
            "pretty" => fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(true)
                .boxed(),
            _ => fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(true)
                .boxed(),
        },
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init()?;

    Ok(())
}
