use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Socket the window server listens on by default.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/neovide.sock";

/// Number of benchmark iterations.
pub const DEFAULT_ITERATIONS: u32 = 10;

/// Pause between iterations, in milliseconds.
pub const DEFAULT_SLEEP_MS: u64 = 300;

/// Upper bound on a single exchange, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 2_000;

/// Path handed to the editor when creating a window.
pub const DEFAULT_STARTUP_PATH: &str = ".";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default socket path as an owned value.
pub fn default_socket_path() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_SOCKET_PATH)
}

/// Default iteration count for serde and `ortho_config`.
pub fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

/// Default pause between iterations, in milliseconds.
pub fn default_sleep_ms() -> u64 {
    DEFAULT_SLEEP_MS
}

/// Default per-exchange deadline, in milliseconds.
pub fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Default startup path as an owned value.
pub fn default_startup_path() -> String {
    DEFAULT_STARTUP_PATH.to_owned()
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
