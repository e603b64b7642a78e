//! Layered configuration: defaults, then an optional TOML file, then flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use clbench_opencl::{BenchmarkConfig, KERNEL_FILE};

use crate::output::OutputFormat;

/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "clbench.toml";

/// Log record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: LogFormat::Compact }
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub kernel_path: PathBuf,
    pub platform: usize,
    pub device: usize,
    pub verify: bool,
    pub output_format: OutputFormat,
    pub benchmark: BenchmarkConfig,
    pub logging: LoggingConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            kernel_path: PathBuf::from(KERNEL_FILE),
            platform: 0,
            device: 0,
            verify: true,
            output_format: OutputFormat::Text,
            benchmark: BenchmarkConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }
}

/// Builder that applies overrides on top of a base configuration.
///
/// `None` leaves the base value untouched.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: CliConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config = toml::from_str(text).context("invalid configuration")?;
        Ok(Self { config })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn kernel_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.config.kernel_path = path;
        }
        self
    }

    pub fn platform(mut self, index: Option<usize>) -> Self {
        if let Some(index) = index {
            self.config.platform = index;
        }
        self
    }

    pub fn device(mut self, index: Option<usize>) -> Self {
        if let Some(index) = index {
            self.config.device = index;
        }
        self
    }

    pub fn iterations(mut self, n: Option<usize>) -> Self {
        if let Some(n) = n {
            self.config.benchmark.run_times = n;
        }
        self
    }

    pub fn list_size(mut self, n: Option<usize>) -> Self {
        if let Some(n) = n {
            self.config.benchmark.list_size = n;
        }
        self
    }

    pub fn local_work_size(mut self, n: Option<usize>) -> Self {
        if let Some(n) = n {
            self.config.benchmark.local_work_size = n;
        }
        self
    }

    /// Flags can only switch recompilation off, never back on.
    pub fn compile_once(mut self, once: bool) -> Self {
        if once {
            self.config.benchmark.recompile_each_iteration = false;
        }
        self
    }

    pub fn skip_verify(mut self, skip: bool) -> Self {
        if skip {
            self.config.verify = false;
        }
        self
    }

    pub fn output_format(mut self, format: Option<OutputFormat>) -> Self {
        if let Some(format) = format {
            self.config.output_format = format;
        }
        self
    }

    pub fn log_level(mut self, level: Option<String>) -> Self {
        if let Some(level) = level {
            self.config.logging.level = level;
        }
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<CliConfig> {
        self.config.benchmark.validate().context("invalid benchmark settings")?;
        Ok(self.config)
    }
}
