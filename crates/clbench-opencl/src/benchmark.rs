//! Benchmark configuration and results.
//!
//! The OpenCL-backed runner lives in [`crate::runner`]; everything here is
//! plain data so it can be configured, validated and serialized without a
//! runtime.

use serde::{Deserialize, Serialize};

use crate::buffers;
use crate::error::{OpenClError, Result};
use crate::reference::{Verification, LIST_SIZE};
use crate::stats::Statistics;

/// Number of timed iterations.
pub const RUN_TIMES: usize = 1024;

/// Work-group size of the 1-D dispatch.
pub const LOCAL_WORK_SIZE: usize = 64;

/// Parameters of one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchmarkConfig {
    /// Elements per vector.
    pub list_size: usize,
    /// Iterations of upload, compile and dispatch.
    pub run_times: usize,
    /// Work-items per work-group.
    pub local_work_size: usize,
    /// Build the program from source on every iteration instead of once.
    pub recompile_each_iteration: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            list_size: LIST_SIZE,
            run_times: RUN_TIMES,
            local_work_size: LOCAL_WORK_SIZE,
            recompile_each_iteration: true,
        }
    }
}

impl BenchmarkConfig {
    /// Reject configurations the kernel cannot run correctly.
    ///
    /// The kernel has no bounds check, so the vector length must be an exact
    /// multiple of the work-group size.
    pub fn validate(&self) -> Result<()> {
        if self.list_size == 0 {
            return Err(OpenClError::InvalidConfig("list size must be greater than 0".into()));
        }
        if self.list_size > i32::MAX as usize {
            return Err(OpenClError::InvalidConfig(format!(
                "list size {} exceeds the range of a 32-bit int",
                self.list_size
            )));
        }
        if self.run_times == 0 {
            return Err(OpenClError::InvalidConfig("iterations must be greater than 0".into()));
        }

        let global = buffers::global_work_size(self.list_size, self.local_work_size)?;
        if global != self.list_size {
            return Err(OpenClError::InvalidConfig(format!(
                "list size {} is not a multiple of the local work size {}",
                self.list_size, self.local_work_size
            )));
        }

        buffers::int_buffer_bytes(self.list_size)?;
        Ok(())
    }

    /// Bytes per device buffer.
    pub fn buffer_bytes(&self) -> Result<usize> {
        buffers::int_buffer_bytes(self.list_size)
    }
}

/// Host-side wall-clock breakdown of one iteration, in milliseconds.
///
/// The dispatch is not waited on; with an in-order queue the next
/// iteration's blocking upload absorbs the kernel's execution time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationTiming {
    pub iteration: usize,
    pub upload_ms: f64,
    pub compile_ms: f64,
    pub dispatch_ms: f64,
    pub total_ms: f64,
}

/// Everything produced by a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub platform_name: String,
    pub device_name: String,
    pub config: BenchmarkConfig,
    /// Program build time when compiling once before the loop.
    pub initial_compile_ms: Option<f64>,
    pub iterations: Vec<IterationTiming>,
    pub statistics: Option<Statistics>,
    pub readback_ms: f64,
    pub total_duration_ms: f64,
    pub verification: Option<Verification>,
    /// Contents of the output buffer after the final iteration.
    #[serde(skip)]
    pub output: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_constants() {
        let cfg = BenchmarkConfig::default();
        assert_eq!(cfg.list_size, 1_048_576);
        assert_eq!(cfg.run_times, 1024);
        assert_eq!(cfg.local_work_size, 64);
        assert!(cfg.recompile_each_iteration);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn default_buffer_bytes() {
        assert_eq!(BenchmarkConfig::default().buffer_bytes().unwrap(), 4 * 1024 * 1024);
    }

    #[test]
    fn zero_list_size_rejected() {
        let cfg = BenchmarkConfig { list_size: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_iterations_rejected() {
        let cfg = BenchmarkConfig { run_times: 0, ..Default::default() };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("iterations"));
    }

    #[test]
    fn zero_local_size_rejected() {
        let cfg = BenchmarkConfig { local_work_size: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_multiple_of_local_size_rejected() {
        let cfg = BenchmarkConfig { list_size: 1000, ..Default::default() };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("not a multiple"));
    }

    #[test]
    fn oversized_list_rejected() {
        let cfg = BenchmarkConfig { list_size: 1 << 31, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let cfg: BenchmarkConfig = serde_json::from_str(r#"{"run_times": 8}"#).unwrap();
        assert_eq!(cfg.run_times, 8);
        assert_eq!(cfg.list_size, LIST_SIZE);
    }

    #[test]
    fn report_json_omits_output_buffer() {
        let report = BenchmarkReport {
            platform_name: "p".into(),
            device_name: "d".into(),
            config: BenchmarkConfig::default(),
            initial_compile_ms: None,
            iterations: Vec::new(),
            statistics: None,
            readback_ms: 0.0,
            total_duration_ms: 0.0,
            verification: None,
            output: vec![1, 2, 3],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("output").is_none());
        assert_eq!(json["device_name"], "d");
    }

    #[test]
    fn config_rejects_unknown_keys() {
        let err = serde_json::from_str::<BenchmarkConfig>(r#"{"iterations": 8}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
        let partial: BenchmarkConfig = serde_json::from_str(r#"{"run_times": 8}"#).unwrap();
        assert_eq!(partial.run_times, 8);
        assert_eq!(partial.list_size, BenchmarkConfig::default().list_size);
    }
}
