//! clbench: enumerate OpenCL devices and benchmark repeated vector addition.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};

use clbench_cli::config::{CliConfig, ConfigBuilder};
use clbench_cli::exit::{exit_code_for, is_kernel_missing, EXIT_GENERIC_FAIL};
use clbench_cli::logging::setup_logging;
use clbench_cli::{run, Cli, RunOptions};

fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(EXIT_GENERIC_FAIL);
        }
    };

    if let Err(e) = setup_logging(&config.logging) {
        eprintln!("error: {e:#}");
        std::process::exit(EXIT_GENERIC_FAIL);
    }

    debug!("resolved configuration: {:?}", config);

    let options = RunOptions { list_only: cli.list_devices, verbose: cli.verbose };
    if let Err(e) = run(&config, options) {
        if is_kernel_missing(&e) {
            eprintln!("Failed to load kernel.");
        }

        error!("Command failed: {}", e);
        for cause in e.chain().skip(1) {
            error!("  Caused by: {}", cause);
        }

        std::process::exit(exit_code_for(&e));
    }
}

/// Load configuration from file and merge with CLI arguments.
///
/// An explicit `--config` must exist; the default `clbench.toml` is only
/// used when present.
fn load_configuration(cli: &Cli) -> Result<CliConfig> {
    let builder = match &cli.config {
        Some(path) => ConfigBuilder::from_file(path)?,
        None => {
            let path = CliConfig::default_config_path();
            if path.is_file() {
                ConfigBuilder::from_file(&path)?
            } else {
                ConfigBuilder::new()
            }
        }
    };

    builder
        .kernel_path(cli.kernel.clone())
        .platform(cli.platform)
        .device(cli.device)
        .iterations(cli.iterations)
        .list_size(cli.size)
        .local_work_size(cli.local_size)
        .compile_once(cli.compile_once)
        .skip_verify(cli.no_verify)
        .output_format(cli.format)
        .log_level(cli.log_level.clone())
        .build()
}
