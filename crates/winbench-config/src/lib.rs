//! Shared configuration for the window-server IPC benchmark.
//!
//! Values are layered by `ortho_config`: built-in defaults, then an optional
//! TOML file (`--config-path` or `WINBENCH_CONFIG_PATH`), then `WINBENCH_*`
//! environment variables, then command-line flags. The resulting [`Config`]
//! is passed explicitly into the benchmark driver.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_ITERATIONS, DEFAULT_LOG_FILTER, DEFAULT_SLEEP_MS, DEFAULT_SOCKET_PATH,
    DEFAULT_STARTUP_PATH, DEFAULT_TIMEOUT_MS, default_iterations, default_log_filter_string,
    default_log_format, default_sleep_ms, default_socket_path, default_startup_path,
    default_timeout_ms,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Benchmark settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "WINBENCH")]
pub struct Config {
    /// Filesystem path of the window server's Unix socket.
    #[serde(default = "default_socket_path")]
    #[ortho_config(default = default_socket_path())]
    pub socket_path: Utf8PathBuf,
    /// Number of iterations to run.
    #[serde(default = "default_iterations")]
    #[ortho_config(default = DEFAULT_ITERATIONS)]
    pub iterations: u32,
    /// Pause between iterations, in milliseconds.
    #[serde(default = "default_sleep_ms")]
    #[ortho_config(default = DEFAULT_SLEEP_MS)]
    pub sleep_ms: u64,
    /// Deadline for a single exchange, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    #[ortho_config(default = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,
    /// Path passed to the editor when creating a window.
    #[serde(default = "default_startup_path")]
    #[ortho_config(default = default_startup_path())]
    pub startup_path: String,
    /// Skips the `CreateWindow` call.
    #[serde(default)]
    #[ortho_config(default = false)]
    pub skip_create: bool,
    /// Skips the `ActivateWindow` call.
    #[serde(default)]
    #[ortho_config(default = false)]
    pub skip_activate: bool,
    /// Tracing filter expression.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Diagnostic log output format.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            iterations: DEFAULT_ITERATIONS,
            sleep_ms: DEFAULT_SLEEP_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            startup_path: default_startup_path(),
            skip_create: false,
            skip_activate: false,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Socket path of the window server.
    #[must_use]
    pub fn socket_path(&self) -> &Utf8Path {
        &self.socket_path
    }

    /// Number of iterations to run.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Pause between iterations.
    #[must_use]
    pub const fn sleep(&self) -> Duration {
        Duration::from_millis(self.sleep_ms)
    }

    /// Deadline for a single exchange.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Path passed to the editor when creating a window.
    #[must_use]
    pub fn startup_path(&self) -> &str {
        &self.startup_path
    }

    /// Whether each iteration issues `CreateWindow`.
    #[must_use]
    pub const fn create_enabled(&self) -> bool {
        !self.skip_create
    }

    /// Whether each iteration issues `ActivateWindow`.
    #[must_use]
    pub const fn activate_enabled(&self) -> bool {
        !self.skip_activate
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Diagnostic log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Rejects settings the transport cannot honour.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] when `timeout_ms` is zero, since
    /// sockets reject a zero read or write timeout.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Errors raised by [`Config::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The exchange deadline was zero.
    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,
}
