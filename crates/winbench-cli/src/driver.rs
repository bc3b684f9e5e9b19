//! Benchmark loop: List, then Create, then Activate, timed one by one.

use std::fmt;
use std::io::Write;
use std::ops::ControlFlow;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};
use winbench_config::Config;
use winbench_types::{Method, Request, Response, WindowId, extract_window_id};

use crate::AppError;
use crate::exchange::Exchange;
use crate::interrupt::InterruptFlag;

pub(crate) const DRIVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::driver");

/// Longest uninterrupted nap while pausing between iterations.
const PAUSE_SLICE: Duration = Duration::from_millis(50);

/// How a benchmark run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunOutcome {
    Completed,
    Interrupted,
}

/// Latency of one timed call. Printed immediately, never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Measurement {
    method: Method,
    elapsed: Duration,
}

impl Measurement {
    pub(crate) const fn new(method: Method, elapsed: Duration) -> Self {
        Self { method, elapsed }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.elapsed.as_secs_f64() * 1_000.0;
        write!(formatter, "{}: {millis:.2}ms", self.method)
    }
}

pub(crate) struct BenchDriver<'a, X, W> {
    config: &'a Config,
    exchange: X,
    out: &'a mut W,
    interrupt: &'a InterruptFlag,
}

impl<'a, X, W> BenchDriver<'a, X, W>
where
    X: Exchange,
    W: Write,
{
    pub(crate) fn new(
        config: &'a Config,
        exchange: X,
        out: &'a mut W,
        interrupt: &'a InterruptFlag,
    ) -> Self {
        Self {
            config,
            exchange,
            out,
            interrupt,
        }
    }

    /// Runs every configured iteration unless interrupted.
    ///
    /// A connection failure aborts the run; every other anomaly degrades to a
    /// missing identifier.
    pub(crate) fn run(&mut self) -> Result<RunOutcome, AppError> {
        self.write_header()?;
        let iterations = self.config.iterations();
        info!(
            target: DRIVER_TARGET,
            endpoint = %self.config.socket_path(),
            iterations,
            "benchmark started"
        );
        for iteration in 1..=iterations {
            if self.interrupt.is_raised() {
                return Ok(self.interrupted(iteration));
            }
            self.report(format_args!("--- Iteration {iteration} ---"))?;
            // A signal may land during the iteration's last call.
            if self.run_iteration()?.is_break() || self.interrupt.is_raised() {
                return Ok(self.interrupted(iteration));
            }
            if iteration < iterations && self.pause().is_break() {
                return Ok(self.interrupted(iteration));
            }
        }
        info!(target: DRIVER_TARGET, iterations, "benchmark completed");
        Ok(RunOutcome::Completed)
    }

    fn run_iteration(&mut self) -> Result<ControlFlow<()>, AppError> {
        let listed = extract_window_id(&self.timed_call(&Request::list_windows())?);

        let mut created = None;
        if self.config.create_enabled() {
            if self.interrupt.is_raised() {
                return Ok(ControlFlow::Break(()));
            }
            let request = Request::create_window(vec![self.config.startup_path().to_owned()]);
            created = extract_window_id(&self.timed_call(&request)?);
        }

        if self.config.activate_enabled() {
            if self.interrupt.is_raised() {
                return Ok(ControlFlow::Break(()));
            }
            // Prefer a window that existed before this iteration over the one
            // just created.
            match activation_target(listed, created) {
                Some(target) => {
                    self.timed_call(&Request::activate_window(target))?;
                }
                None => {
                    warn!(target: DRIVER_TARGET, "no window id available; skipping activation");
                    self.report(format_args!(
                        "{}: skipped (no window_id)",
                        Method::ActivateWindow
                    ))?;
                }
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn timed_call(&mut self, request: &Request) -> Result<Response, AppError> {
        let started = Instant::now();
        let response = self.exchange.exchange(request)?;
        let measurement = Measurement::new(request.method(), started.elapsed());
        self.report(format_args!("{measurement}"))?;
        Ok(response)
    }

    /// Sleeps for the configured interval, waking early on interruption.
    fn pause(&self) -> ControlFlow<()> {
        let started = Instant::now();
        let interval = self.config.sleep();
        loop {
            if self.interrupt.is_raised() {
                return ControlFlow::Break(());
            }
            let remaining = interval.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return ControlFlow::Continue(());
            }
            thread::sleep(remaining.min(PAUSE_SLICE));
        }
    }

    fn write_header(&mut self) -> Result<(), AppError> {
        let config = self.config;
        self.report(format_args!("Socket: {}", config.socket_path()))?;
        self.report(format_args!(
            "Iterations: {} | Sleep: {}ms | Create: {} | Activate: {}",
            config.iterations(),
            config.sleep().as_millis(),
            on_off(config.create_enabled()),
            on_off(config.activate_enabled()),
        ))
    }

    fn report(&mut self, line: fmt::Arguments<'_>) -> Result<(), AppError> {
        writeln!(self.out, "{line}").map_err(AppError::Report)
    }

    fn interrupted(&self, iteration: u32) -> RunOutcome {
        info!(target: DRIVER_TARGET, iteration, "benchmark interrupted");
        RunOutcome::Interrupted
    }
}

fn activation_target(listed: Option<WindowId>, created: Option<WindowId>) -> Option<WindowId> {
    listed.or(created)
}

const fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
