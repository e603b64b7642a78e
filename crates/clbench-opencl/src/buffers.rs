//! Buffer size and work-size calculations for the vector-add dispatch.
//!
//! Each function computes the number of bytes or work-items the host needs
//! so that OpenCL buffers and ND-ranges are sized exactly.

use crate::error::{OpenClError, Result};

/// Bytes required for an `int` (`cl_int`) buffer of `count` elements.
///
/// # Errors
///
/// Returns an error if `count * 4` would overflow `usize`.
pub fn int_buffer_bytes(count: usize) -> Result<usize> {
    count.checked_mul(std::mem::size_of::<i32>()).ok_or_else(|| {
        OpenClError::InvalidConfig(format!("int buffer overflow: count={count} * 4"))
    })
}

/// Global work size for `elements` work-items, rounded up to a multiple of
/// `local`.
///
/// The kernel has no bounds check, so callers use this only to validate
/// that `elements` is already a multiple of `local`.
pub fn global_work_size(elements: usize, local: usize) -> Result<usize> {
    if local == 0 {
        return Err(OpenClError::InvalidConfig("local work size must be positive".into()));
    }
    elements
        .div_ceil(local)
        .checked_mul(local)
        .ok_or_else(|| OpenClError::InvalidConfig(format!("global work size overflow: {elements}")))
}
