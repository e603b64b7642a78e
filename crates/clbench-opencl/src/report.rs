//! Plain-data descriptions of OpenCL platforms and devices.
//!
//! These types carry no runtime handles, so they can be built, formatted
//! and serialized without an OpenCL ICD loader present.

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// OpenCL device type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Gpu,
    Cpu,
    Accelerator,
    Custom,
    Unknown,
}

impl DeviceKind {
    /// Classify a raw `cl_device_type` bitfield.
    pub fn from_bits(bits: u64) -> Self {
        // CL_DEVICE_TYPE_{CPU,GPU,ACCELERATOR,CUSTOM}
        const CPU: u64 = 1 << 1;
        const GPU: u64 = 1 << 2;
        const ACCELERATOR: u64 = 1 << 3;
        const CUSTOM: u64 = 1 << 4;

        if bits & GPU != 0 {
            Self::Gpu
        } else if bits & CPU != 0 {
            Self::Cpu
        } else if bits & ACCELERATOR != 0 {
            Self::Accelerator
        } else if bits & CUSTOM != 0 {
            Self::Custom
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu => write!(f, "GPU"),
            Self::Cpu => write!(f, "CPU"),
            Self::Accelerator => write!(f, "Accelerator"),
            Self::Custom => write!(f, "Custom"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Attributes reported for one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceReport {
    /// 0-based index within the owning platform.
    pub index: usize,
    pub name: String,
    /// `CL_DEVICE_VERSION`
    pub hardware_version: String,
    /// `CL_DRIVER_VERSION`
    pub driver_version: String,
    /// `CL_DEVICE_OPENCL_C_VERSION`
    pub opencl_c_version: String,
    /// `CL_DEVICE_MAX_COMPUTE_UNITS`
    pub compute_units: u32,
    pub kind: DeviceKind,
}

/// One platform and the devices it exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformReport {
    /// 0-based platform index as returned by the ICD loader.
    pub index: usize,
    pub name: String,
    pub vendor: String,
    pub version: String,
    pub devices: Vec<DeviceReport>,
}

/// Total number of devices across all platforms.
pub fn device_count(platforms: &[PlatformReport]) -> usize {
    platforms.iter().map(|p| p.devices.len()).sum()
}

/// Render the device listing printed before the benchmark runs.
///
/// Device numbering is 1-based and restarts for every platform. The block
/// ends with three newlines so the benchmark output is visually separated.
pub fn format_enumeration(platforms: &[PlatformReport]) -> String {
    let mut out = String::from("Available Devices:\n\n");

    for platform in platforms {
        for device in &platform.devices {
            let n = device.index + 1;
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{n}. Device: {}", device.name);
            let _ = writeln!(out, " {n}.1 Hardware version: {}", device.hardware_version);
            let _ = writeln!(out, " {n}.2 Software version: {}", device.driver_version);
            let _ = writeln!(out, " {n}.3 OpenCL C version: {}", device.opencl_c_version);
            let _ = writeln!(out, " {n}.4 Parallel compute units: {}", device.compute_units);
        }
    }

    out.push_str("\n\n\n");
    out
}
