//! Rendering of enumeration, benchmark results and JSON summaries.

use std::io::{self, BufWriter, Write};

use console::style;
use serde::{Deserialize, Serialize};

use clbench_opencl::{BenchmarkReport, PlatformReport, VectorPair};

/// Output format for results written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'. Expected one of: text, json")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Host details recorded alongside JSON results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu_cores: usize,
    pub version: String,
}

impl SystemInfo {
    pub fn collect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpu_cores: num_cpus::get(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Everything emitted by `--format json`.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub timestamp: String,
    pub system: SystemInfo,
    pub platforms: &'a [PlatformReport],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<&'a BenchmarkReport>,
}

impl<'a> RunSummary<'a> {
    pub fn new(platforms: &'a [PlatformReport], benchmark: Option<&'a BenchmarkReport>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            system: SystemInfo::collect(),
            platforms,
            benchmark,
        }
    }
}

pub fn write_json(out: &mut impl Write, summary: &RunSummary<'_>) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out)?;
    Ok(())
}

/// The `Processed: ...` line printed after every run.
pub fn processed_line(report: &BenchmarkReport) -> String {
    format!(
        "Processed: {} times, with {} items.",
        report.config.run_times, report.config.list_size
    )
}

/// Write one `a + b = c` line per element.
pub fn write_sums(out: &mut impl Write, inputs: &VectorPair, output: &[i32]) -> io::Result<()> {
    let mut out = BufWriter::new(out);
    for ((a, b), c) in inputs.a.iter().zip(&inputs.b).zip(output) {
        writeln!(out, "{a} + {b} = {c}")?;
    }
    out.flush()
}

/// Human-readable timing breakdown.
pub fn write_timings(out: &mut impl Write, report: &BenchmarkReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style("Timing:").bold())?;
    if let Some(ms) = report.initial_compile_ms {
        writeln!(out, "  Program build (once): {ms:.3} ms")?;
    }
    if let Some(s) = &report.statistics {
        writeln!(out, "  Iterations:      {}", s.iterations)?;
        writeln!(out, "  Mean:            {:.3} ms (std {:.3} ms)", s.mean_ms, s.std_ms)?;
        writeln!(out, "  Min / Max:       {:.3} / {:.3} ms", s.min_ms, s.max_ms)?;
        writeln!(
            out,
            "  P50 / P95 / P99: {:.3} / {:.3} / {:.3} ms",
            s.p50_ms, s.p95_ms, s.p99_ms
        )?;
        writeln!(out, "  Throughput:      {:.2} M elements/s", s.elements_per_second / 1e6)?;
    }

    let n = report.iterations.len().max(1) as f64;
    let (upload, compile, dispatch) = report.iterations.iter().fold((0.0, 0.0, 0.0), |acc, it| {
        (acc.0 + it.upload_ms, acc.1 + it.compile_ms, acc.2 + it.dispatch_ms)
    });
    writeln!(
        out,
        "  Per iteration:   upload {:.3} ms, build {:.3} ms, enqueue {:.3} ms",
        upload / n,
        compile / n,
        dispatch / n
    )?;
    writeln!(out, "  Readback:        {:.3} ms", report.readback_ms)?;
    writeln!(out, "  Total:           {:.1} ms", report.total_duration_ms)?;

    if let Some(v) = &report.verification {
        let status = if v.passed() {
            style(format!("passed ({} elements)", v.checked)).green()
        } else {
            style(format!("FAILED ({} of {} elements differ)", v.mismatches, v.checked)).red()
        };
        writeln!(out, "  Verification:    {status}")?;
    }
    Ok(())
}
