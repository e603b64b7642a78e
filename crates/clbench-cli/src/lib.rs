//! clbench CLI library
//!
//! Argument parsing, configuration, output and the run procedure, exposed
//! for the binary and for testing.

pub mod args;
pub mod config;
pub mod exit;
pub mod logging;
pub mod output;
pub mod run;

pub use args::{build_cli, Cli};
pub use config::{CliConfig, ConfigBuilder};
pub use run::{run, RunError, RunOptions};
