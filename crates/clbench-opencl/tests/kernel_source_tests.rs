//! The kernel file shipped at the workspace root must stay in sync with the
//! built-in copy.

use std::path::PathBuf;

use clbench_opencl::{KernelSource, KERNEL_FILE, KERNEL_NAME, VECTOR_ADD_SOURCE};

fn shipped_kernel() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").join(KERNEL_FILE)
}

#[test]
fn shipped_kernel_matches_builtin() {
    let src = KernelSource::load(shipped_kernel()).expect("kernel file at workspace root");
    assert_eq!(src.text(), VECTOR_ADD_SOURCE);
    assert!(!src.is_truncated());
}

#[test]
fn shipped_kernel_declares_entry_point() {
    let src = KernelSource::load(shipped_kernel()).unwrap();
    assert!(src.declares_kernel(KERNEL_NAME));
}

#[test]
fn builtin_source_uses_int_buffers() {
    // The host uploads 32-bit ints; a float kernel would silently misread them.
    assert_eq!(VECTOR_ADD_SOURCE.matches("__global const int *").count(), 2);
    assert!(VECTOR_ADD_SOURCE.contains("__global int *C"));
}
