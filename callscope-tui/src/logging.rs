//! Structured logging to a file.
//!
//! The terminal belongs to the UI, so events go to `log_path` as JSON
//! lines instead of stderr.

use crate::config::TuiConfig;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid log filter: {0}")]
    Filter(String),
    #[error("Failed to init subscriber: {0}")]
    Init(String),
}

/// `RUST_LOG` when set, else the configured directives.
pub fn build_filter(configured: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(configured).map_err(|e| LoggingError::Filter(e.to_string())),
    }
}

pub fn init(config: &TuiConfig) -> Result<(), LoggingError> {
    if let Some(parent) = config.log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| LoggingError::Open {
            path: config.log_path.clone(),
            source,
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .map_err(|source| LoggingError::Open {
            path: config.log_path.clone(),
            source,
        })?;

    tracing_subscriber::registry()
        .with(build_filter(&config.log_filter)?)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::info!(
        api_base_url = %config.api_base_url,
        poll_interval_ms = config.poll_interval_ms,
        "Logging initialized"
    );
    Ok(())
}
