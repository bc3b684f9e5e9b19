//! Command-line runtime for the window-server latency probe.
//!
//! The module owns configuration bootstrapping, telemetry, signal handling,
//! and the benchmark loop. The interface is designed to be exercised both
//! from the binary entrypoint and from tests where configuration loading,
//! interruption and IO streams can be substituted.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use winbench_config::Config;

mod config;
mod driver;
mod errors;
mod exchange;
mod interrupt;
mod telemetry;
mod transport;

pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
use driver::{BenchDriver, RunOutcome};
pub(crate) use errors::AppError;
use exchange::SocketExchange;
use interrupt::InterruptFlag;

/// Exit status reported when a signal stopped the benchmark.
pub const INTERRUPTED_EXIT_STATUS: u8 = 130;

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    interrupt: Option<InterruptFlag>,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L) -> Self {
        Self {
            io,
            loader,
            interrupt: None,
        }
    }

    #[cfg(test)]
    fn with_interrupt(mut self, interrupt: InterruptFlag) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let result = self
            .loader
            .load(&args)
            .and_then(|config| {
                config.validate()?;
                Ok(config)
            })
            .and_then(|config| {
                telemetry::initialise(&config)?;
                self.benchmark(&config)
            });

        match result {
            Ok(outcome) => exit_code_from_outcome(outcome),
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }

    fn benchmark(&mut self, config: &Config) -> Result<RunOutcome, AppError> {
        let interrupt = match self.interrupt.take() {
            Some(interrupt) => interrupt,
            None => InterruptFlag::install().map_err(AppError::InstallSignalHandler)?,
        };
        let exchange =
            SocketExchange::new(config.socket_path(), config.timeout(), interrupt.clone());
        let outcome =
            BenchDriver::new(config, exchange, &mut *self.io.stdout, &interrupt).run();
        self.io.stdout.flush().map_err(AppError::Report)?;
        outcome
    }
}

/// Runs the benchmark using the provided arguments and IO handles.
///
/// Returns success when every iteration completed, [`INTERRUPTED_EXIT_STATUS`]
/// when a signal stopped the run, and failure for any error.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

#[cfg(test)]
pub(crate) fn run_with_interrupt<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    interrupt: InterruptFlag,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader)
        .with_interrupt(interrupt)
        .run(args)
}

fn exit_code_from_outcome(outcome: RunOutcome) -> ExitCode {
    match outcome {
        RunOutcome::Completed => ExitCode::SUCCESS,
        RunOutcome::Interrupted => ExitCode::from(INTERRUPTED_EXIT_STATUS),
    }
}
