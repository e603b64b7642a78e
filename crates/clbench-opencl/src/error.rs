//! Error types for device discovery, kernel loading and benchmark execution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the OpenCL benchmark library.
#[derive(Debug, Error)]
pub enum OpenClError {
    /// The ICD loader reported no platforms (or could not be queried).
    #[error("no OpenCL platforms found: {reason}")]
    NoPlatforms { reason: String },

    /// The requested platform index does not exist.
    #[error("platform index {index} out of range ({available} platform(s) available)")]
    PlatformIndexOutOfRange { index: usize, available: usize },

    /// The requested device index does not exist on the chosen platform.
    #[error(
        "device index {index} out of range on platform {platform} ({available} device(s) available)"
    )]
    DeviceIndexOutOfRange { platform: usize, index: usize, available: usize },

    /// The kernel source file could not be opened.
    #[error("kernel source not found: {}", path.display())]
    KernelSourceNotFound { path: PathBuf, source: std::io::Error },

    /// The kernel source file was opened but could not be read.
    #[error("failed to read kernel source {}: {source}", path.display())]
    KernelSourceRead { path: PathBuf, source: std::io::Error },

    /// The kernel source is not valid UTF-8 text.
    #[error("kernel source {} is not valid UTF-8", path.display())]
    KernelSourceEncoding { path: PathBuf },

    /// `clBuildProgram` or `clCreateKernel` failed.
    #[error("kernel '{kernel_name}' compile failed: {log}")]
    KernelCompileFailed { kernel_name: String, log: String },

    /// Context or command queue creation failed.
    #[error("context creation failed: {0}")]
    ContextCreationFailed(String),

    /// Device buffer allocation failed.
    #[error("buffer allocation ({size_bytes} bytes) failed: {reason}")]
    BufferAllocationFailed { size_bytes: usize, reason: String },

    /// A host/device transfer failed.
    #[error("data transfer failed: {0}")]
    DataTransferFailed(String),

    /// Setting kernel arguments or enqueueing the ND-range failed.
    #[error("kernel '{kernel_name}' execution failed: {reason}")]
    KernelExecutionFailed { kernel_name: String, reason: String },

    /// The benchmark configuration is unusable.
    #[error("invalid benchmark configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OpenClError>;
