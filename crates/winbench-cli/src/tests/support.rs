//! Test support utilities for CLI coverage.
//!
//! Supplies a static configuration loader, the stub window server, fixture
//! loading, and the world shared by behavioural steps.

mod stub_server;

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use winbench_config::Config;

use crate::interrupt::InterruptFlag;
use crate::{AppError, ConfigLoader, IoStreams, run_with_interrupt};

pub(super) use stub_server::{Reply, StubServer};

/// A config loader that returns a fixed configuration for tests.
pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Fast settings aimed at `socket`: one iteration, no pause, short deadline.
pub(super) fn quick_config(socket: &Utf8Path) -> Config {
    Config {
        socket_path: socket.to_path_buf(),
        iterations: 1,
        sleep_ms: 0,
        timeout_ms: 500,
        ..Config::default()
    }
}

/// Reads a golden fixture from `tests/golden`.
pub(super) fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("golden");
    path.push(name.trim_matches('"'));
    fs::read_to_string(&path)
        .unwrap_or_else(|error| panic!("read fixture at {}: {error}", path.display()))
}

/// Runs the CLI against `config` with an injected interrupt flag.
pub(super) fn run_cli(
    config: Config,
    interrupt: InterruptFlag,
) -> (ExitCode, String, String) {
    let mut stdout: Vec<u8> = Vec::new();
    let mut stderr: Vec<u8> = Vec::new();
    let loader = StaticConfigLoader::new(config);
    let exit = {
        let mut io = IoStreams::new(&mut stdout, &mut stderr);
        run_with_interrupt([OsString::from("winbench")], &mut io, &loader, interrupt)
    };
    (
        exit,
        String::from_utf8(stdout).expect("stdout utf8"),
        String::from_utf8(stderr).expect("stderr utf8"),
    )
}

/// Test world holding CLI state, the stub server, and captured output.
#[derive(Default)]
pub(super) struct TestWorld {
    pub config: Config,
    pub server: Option<StubServer>,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<ExitCode>,
    scratch: Option<TempDir>,
}

impl TestWorld {
    pub fn start_server(&mut self, reply: Reply) -> Result<()> {
        let server = StubServer::spawn(reply)?;
        self.aim_at(server.path());
        self.server = Some(server);
        Ok(())
    }

    pub fn point_at_missing_socket(&mut self) -> Result<()> {
        let scratch = TempDir::new().context("create scratch directory")?;
        let path = Utf8PathBuf::from_path_buf(scratch.path().join("absent.sock"))
            .map_err(|path| anyhow!("socket path is not UTF-8: {}", path.display()))?;
        self.aim_at(&path);
        self.scratch = Some(scratch);
        Ok(())
    }

    fn aim_at(&mut self, socket: &Utf8Path) {
        let quick = quick_config(socket);
        self.config.socket_path = quick.socket_path;
        self.config.sleep_ms = quick.sleep_ms;
        self.config.timeout_ms = quick.timeout_ms;
    }

    pub fn run(&mut self) {
        let (exit, stdout, stderr) = run_cli(self.config.clone(), InterruptFlag::default());
        self.exit_code = Some(exit);
        self.stdout = stdout;
        self.stderr = stderr;
    }

    pub fn server(&self) -> &StubServer {
        self.server.as_ref().expect("stub server should be running")
    }

    pub fn assert_exit_code(&self, expected: ExitCode) {
        let exit = self.exit_code.expect("exit code recorded");
        assert_eq!(exit, expected);
    }
}
