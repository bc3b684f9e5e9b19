//! Configuration loading seam for the CLI runtime.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use winbench_config::Config;

use crate::AppError;

pub(crate) trait ConfigLoader {
    /// Loads configuration for the benchmark from the full argument list.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

/// Loads layered configuration through `ortho_config`.
pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}
