//! Process exit codes and their mapping from errors.

use clbench_opencl::OpenClError;

use crate::run::RunError;

/// Generic failure, also used for a missing kernel source file.
pub const EXIT_GENERIC_FAIL: i32 = 1;
pub const EXIT_KERNEL_MISSING: i32 = 1;
pub const EXIT_NO_DEVICE: i32 = 3;
pub const EXIT_VERIFY_FAIL: i32 = 4;

/// Pick the exit code for the first recognised error in the chain.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<OpenClError>() {
            return match e {
                OpenClError::KernelSourceNotFound { .. } => EXIT_KERNEL_MISSING,
                OpenClError::NoPlatforms { .. }
                | OpenClError::PlatformIndexOutOfRange { .. }
                | OpenClError::DeviceIndexOutOfRange { .. } => EXIT_NO_DEVICE,
                _ => EXIT_GENERIC_FAIL,
            };
        }
        if let Some(RunError::VerificationFailed { .. }) = cause.downcast_ref::<RunError>() {
            return EXIT_VERIFY_FAIL;
        }
    }
    EXIT_GENERIC_FAIL
}

/// Whether the error chain contains a missing kernel source file.
pub fn is_kernel_missing(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(cause.downcast_ref::<OpenClError>(), Some(OpenClError::KernelSourceNotFound { .. }))
    })
}
