//! Entry point for the `winbench` window-server latency probe.
//!
//! The binary delegates to [`winbench_cli::run`], which loads configuration,
//! installs telemetry and signal handling, and drives the benchmark against
//! the configured socket.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    winbench_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
