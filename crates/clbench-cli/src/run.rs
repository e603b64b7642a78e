//! The two phases of an invocation: enumerate devices, then benchmark.

use std::io::{self, Write};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{info, warn};

use clbench_opencl::{device_count, format_enumeration, verify, KernelSource, PlatformReport};

use crate::config::CliConfig;
use crate::output::{self, OutputFormat, RunSummary};

/// Failures that originate in the CLI rather than the OpenCL layer.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(
        "result verification failed: {mismatches} of {checked} elements differ (first at index {first_index})"
    )]
    VerificationFailed { mismatches: usize, checked: usize, first_index: usize },

    #[error("clbench was built without the `opencl-runtime` feature")]
    RuntimeUnavailable,
}

/// Flags that only affect a single invocation and are not part of the
/// persisted configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub list_only: bool,
    pub verbose: bool,
}

/// Enumerate, then (unless `list_only`) load the kernel and benchmark.
pub fn run(config: &CliConfig, options: RunOptions) -> Result<()> {
    let platforms = enumerate();
    let text = config.output_format == OutputFormat::Text;

    if text {
        print!("{}", format_enumeration(&platforms));
    }
    if options.list_only {
        if !text {
            output::write_json(&mut io::stdout().lock(), &RunSummary::new(&platforms, None))?;
        }
        return Ok(());
    }

    let source = KernelSource::load(&config.kernel_path).context("failed to load kernel source")?;
    info!("kernel source: {}", source.path().display());

    let (inputs, mut report) = runtime::execute(config, &source)?;

    if config.verify {
        let verification = verify(&inputs.a, &inputs.b, &report.output);
        info!("verified {} elements, {} mismatches", verification.checked, verification.mismatches);
        report.verification = Some(verification);
    }

    match config.output_format {
        OutputFormat::Text => {
            let mut stdout = io::stdout().lock();
            if options.verbose {
                output::write_sums(&mut stdout, &inputs, &report.output)?;
            }
            writeln!(stdout, "{}", output::processed_line(&report))?;
            output::write_timings(&mut stdout, &report)?;
        }
        OutputFormat::Json => {
            if options.verbose {
                warn!("--verbose sums are not included in JSON output");
            }
            output::write_json(&mut io::stdout().lock(), &RunSummary::new(&platforms, Some(&report)))?;
        }
    }

    if let Some(v) = report.verification.as_ref().filter(|v| !v.passed()) {
        return Err(RunError::VerificationFailed {
            mismatches: v.mismatches,
            checked: v.checked,
            first_index: v.first_mismatch.map_or(v.checked, |m| m.index),
        }
        .into());
    }
    Ok(())
}

/// Device listing; failures leave it empty rather than aborting the run.
fn enumerate() -> Vec<PlatformReport> {
    match runtime::enumerate() {
        Ok(platforms) => {
            info!("found {} device(s) on {} platform(s)", device_count(&platforms), platforms.len());
            platforms
        }
        Err(e) => {
            warn!("device enumeration failed: {e:#}");
            Vec::new()
        }
    }
}

#[cfg(feature = "opencl-runtime")]
mod runtime {
    use anyhow::{Context, Result};
    use indicatif::{ProgressBar, ProgressStyle};
    use tracing::debug;

    use clbench_opencl::{
        enumerate_platforms, select_device, BenchmarkReport, KernelSource, PlatformReport,
        VectorAddBenchmark, VectorPair,
    };

    use crate::config::CliConfig;
    use crate::output::OutputFormat;

    pub(super) fn enumerate() -> Result<Vec<PlatformReport>> {
        Ok(enumerate_platforms()?)
    }

    fn progress_bar(config: &CliConfig) -> ProgressBar {
        if config.output_format == OutputFormat::Json {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(config.benchmark.run_times as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }

    pub(super) fn execute(
        config: &CliConfig,
        source: &KernelSource,
    ) -> Result<(VectorPair, BenchmarkReport)> {
        let device = select_device(config.platform, config.device)
            .with_context(|| format!("failed to select device {}", config.device))?;

        if config.output_format == OutputFormat::Text {
            println!("Using Device: Device: {}", device.name);
        }
        debug!("device attributes: {:?}", device.report());

        let inputs = VectorPair::sequential(config.benchmark.list_size);
        let mut bench = VectorAddBenchmark::new(&device, config.benchmark.clone())
            .context("failed to set up benchmark")?;

        let pb = progress_bar(config);
        pb.set_message("vector_add");
        let report = bench.run(&inputs, source, |_| pb.inc(1));
        pb.finish_and_clear();

        Ok((inputs, report.context("benchmark failed")?))
    }
}

#[cfg(not(feature = "opencl-runtime"))]
mod runtime {
    use anyhow::Result;

    use clbench_opencl::{BenchmarkReport, KernelSource, PlatformReport, VectorPair};

    use super::RunError;
    use crate::config::CliConfig;

    pub(super) fn enumerate() -> Result<Vec<PlatformReport>> {
        Err(RunError::RuntimeUnavailable.into())
    }

    pub(super) fn execute(
        _config: &CliConfig,
        _source: &KernelSource,
    ) -> Result<(VectorPair, BenchmarkReport)> {
        Err(RunError::RuntimeUnavailable.into())
    }
}
