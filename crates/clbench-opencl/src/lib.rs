//! OpenCL device enumeration and a repeated vector-add benchmark.
//!
//! This crate provides:
//! - [`report`]: plain-data platform/device descriptions and the listing format
//! - [`kernel`]: kernel source loading and program compilation
//! - [`benchmark`]: run configuration and results
//! - [`reference`]: deterministic inputs and the CPU reference used for verification
//! - [`stats`]: per-iteration latency statistics
//!
//! With the default `opencl-runtime` feature, `device` and `runner`
//! talk to the OpenCL ICD loader through `opencl3`.

pub mod benchmark;
pub mod buffers;
pub mod error;
pub mod kernel;
pub mod reference;
pub mod report;
pub mod stats;

#[cfg(feature = "opencl-runtime")]
pub mod device;
#[cfg(feature = "opencl-runtime")]
pub mod runner;

pub use benchmark::{BenchmarkConfig, BenchmarkReport, IterationTiming, LOCAL_WORK_SIZE, RUN_TIMES};
pub use error::{OpenClError, Result};
pub use kernel::{KernelSource, KERNEL_FILE, KERNEL_NAME, MAX_SOURCE_SIZE, VECTOR_ADD_SOURCE};
pub use reference::{cpu_vector_add, verify, Mismatch, Verification, VectorPair, LIST_SIZE};
pub use report::{device_count, format_enumeration, DeviceKind, DeviceReport, PlatformReport};
pub use stats::Statistics;

#[cfg(feature = "opencl-runtime")]
pub use device::{enumerate_platforms, select_device, OpenClDevice};
#[cfg(feature = "opencl-runtime")]
pub use runner::VectorAddBenchmark;
