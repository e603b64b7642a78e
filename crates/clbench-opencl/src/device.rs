//! Platform and device enumeration and selection.

use opencl3::device::{Device, CL_DEVICE_TYPE_ALL};
use opencl3::platform::{get_platforms, Platform};
use opencl3::types::cl_device_id;
use tracing::{debug, info, warn};

use crate::error::{OpenClError, Result};
use crate::report::{DeviceKind, DeviceReport, PlatformReport};

/// A device chosen to run the benchmark.
#[derive(Debug)]
pub struct OpenClDevice {
    pub(crate) device: Device,
    pub platform_index: usize,
    pub device_index: usize,
    pub name: String,
    pub platform_name: String,
}

impl OpenClDevice {
    /// Full attribute report for this device.
    pub fn report(&self) -> DeviceReport {
        describe(self.device_index, &self.device)
    }
}

fn platforms() -> Result<Vec<Platform>> {
    let platforms =
        get_platforms().map_err(|e| OpenClError::NoPlatforms { reason: e.to_string() })?;
    if platforms.is_empty() {
        return Err(OpenClError::NoPlatforms { reason: "ICD loader returned none".into() });
    }
    Ok(platforms)
}

fn device_ids(platform: &Platform) -> Vec<cl_device_id> {
    match platform.get_devices(CL_DEVICE_TYPE_ALL) {
        Ok(ids) => ids,
        Err(e) => {
            // CL_DEVICE_NOT_FOUND is reported as an error by some drivers.
            debug!("no devices on platform {}: {}", platform.name().unwrap_or_default(), e);
            Vec::new()
        }
    }
}

/// Query the attributes printed for each device.
///
/// Individual query failures degrade to empty strings or zero so that one
/// misbehaving driver does not hide the rest of the listing.
fn describe(index: usize, device: &Device) -> DeviceReport {
    DeviceReport {
        index,
        name: device.name().unwrap_or_default(),
        hardware_version: device.version().unwrap_or_default(),
        driver_version: device.driver_version().unwrap_or_default(),
        opencl_c_version: device.opencl_c_version().unwrap_or_default(),
        compute_units: device.max_compute_units().unwrap_or_default(),
        kind: device.dev_type().map(DeviceKind::from_bits).unwrap_or(DeviceKind::Unknown),
    }
}

/// Enumerate every device of every type on every platform.
pub fn enumerate_platforms() -> Result<Vec<PlatformReport>> {
    let mut reports = Vec::new();

    for (index, platform) in platforms()?.iter().enumerate() {
        let name = platform.name().unwrap_or_default();
        debug!("scanning OpenCL platform {}: {}", index, name);

        let devices: Vec<DeviceReport> = device_ids(platform)
            .into_iter()
            .enumerate()
            .map(|(i, id)| describe(i, &Device::new(id)))
            .collect();
        for d in &devices {
            debug!("found {} device: {} ({} compute units)", d.kind, d.name, d.compute_units);
        }

        reports.push(PlatformReport {
            index,
            name,
            vendor: platform.vendor().unwrap_or_default(),
            version: platform.version().unwrap_or_default(),
            devices,
        });
    }

    Ok(reports)
}

/// Select device `device_index` on platform `platform_index`.
///
/// # Errors
///
/// Fails when no platform exists or either index is out of range.
pub fn select_device(platform_index: usize, device_index: usize) -> Result<OpenClDevice> {
    let platforms = platforms()?;
    let available = platforms.len();
    let platform = platforms
        .get(platform_index)
        .ok_or(OpenClError::PlatformIndexOutOfRange { index: platform_index, available })?;

    let ids = device_ids(platform);
    let Some(&id) = ids.get(device_index) else {
        warn!(
            "requested device {} but platform {} exposes {}",
            device_index,
            platform_index,
            ids.len()
        );
        return Err(OpenClError::DeviceIndexOutOfRange {
            platform: platform_index,
            index: device_index,
            available: ids.len(),
        });
    };

    let device = Device::new(id);
    let name = device.name().unwrap_or_default();
    let platform_name = platform.name().unwrap_or_default();
    info!("selected device {}: {} on {}", device_index, name, platform_name);

    Ok(OpenClDevice { device, platform_index, device_index, name, platform_name })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerate_does_not_panic() {
        let _ = enumerate_platforms();
    }

    #[test]
    fn select_out_of_range_device_is_error() {
        match select_device(0, usize::MAX) {
            Err(OpenClError::DeviceIndexOutOfRange { index, .. }) => assert_eq!(index, usize::MAX),
            Err(OpenClError::NoPlatforms { .. }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn select_out_of_range_platform_is_error() {
        match select_device(usize::MAX, 0) {
            Err(OpenClError::PlatformIndexOutOfRange { index, .. }) => {
                assert_eq!(index, usize::MAX)
            }
            Err(OpenClError::NoPlatforms { .. }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
