//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use winbench_config::ConfigError;

use crate::exchange::ExchangeError;
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to install signal handlers: {0}")]
    InstallSignalHandler(io::Error),
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
    #[error("failed to write benchmark report: {0}")]
    Report(io::Error),
}
