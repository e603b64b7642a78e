//! Command-line arguments.

use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::output::OutputFormat;

/// clbench - OpenCL vector-add benchmark
#[derive(Debug, Parser)]
#[command(name = "clbench")]
#[command(about = "Enumerate OpenCL devices and benchmark repeated vector addition")]
#[command(long_about = r#"
Lists every OpenCL platform and device, then adds two 1,048,576-element int
vectors on the selected device 1024 times, rebuilding the kernel from source
on every iteration. The result is read back once and checked on the host.

Examples:
  # Benchmark the first device of the first platform
  clbench

  # Use the second device and print every sum
  clbench -d 1 -v

  # Only list devices
  clbench --list-devices

  # Short run with machine-readable output
  clbench --iterations 16 --format json
"#)]
#[command(version)]
pub struct Cli {
    /// Device index within the selected platform
    #[arg(short = 'd', long = "device", value_name = "ID")]
    pub device: Option<usize>,

    /// Print every `A + B = C` line after the run
    #[arg(short, long)]
    pub verbose: bool,

    /// Platform index
    #[arg(long, value_name = "ID")]
    pub platform: Option<usize>,

    /// Kernel source file
    #[arg(short, long, value_name = "PATH")]
    pub kernel: Option<PathBuf>,

    /// Number of benchmark iterations
    #[arg(short = 'n', long, value_name = "N")]
    pub iterations: Option<usize>,

    /// Elements per vector
    #[arg(long, value_name = "N")]
    pub size: Option<usize>,

    /// Work-group size of the dispatch
    #[arg(long, value_name = "N")]
    pub local_size: Option<usize>,

    /// Build the program once instead of on every iteration
    #[arg(long)]
    pub compile_once: bool,

    /// Skip checking the result against the CPU reference
    #[arg(long)]
    pub no_verify: bool,

    /// List platforms and devices, then exit
    #[arg(short, long)]
    pub list_devices: bool,

    /// Output format (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Configuration file path
    #[arg(short, long, value_name = "PATH", env = "CLBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", env = "CLBENCH_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Build the clap command, e.g. for help rendering in tests.
pub fn build_cli() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    #[test]
    fn command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_args_uses_defaults() {
        let cli = parse(&["clbench"]).unwrap();
        assert_eq!(cli.device, None);
        assert!(!cli.verbose);
        assert!(!cli.compile_once);
        assert!(!cli.list_devices);
    }

    #[test]
    fn short_device_and_verbose() {
        let cli = parse(&["clbench", "-d", "2", "-v"]).unwrap();
        assert_eq!(cli.device, Some(2));
        assert!(cli.verbose);
    }

    #[test]
    fn device_requires_numeric_id() {
        assert!(parse(&["clbench", "-d", "gpu"]).is_err());
    }

    #[test]
    fn format_parses_json() {
        let cli = parse(&["clbench", "--format", "json"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(parse(&["clbench", "--format", "xml"]).is_err());
    }
}
