//! Per-index joystick driver surface.

use hid_vjoy_protocol::{ApiVersion, HidUsage};
use serde::{Deserialize, Serialize};

/// Ownership status the driver reports for one device slot.
///
/// Values match the native status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum VjdStatus {
    /// Owned by this process.
    Own = 0,
    /// Not owned by any process; available for acquisition.
    Free = 1,
    /// Owned by another process.
    Busy = 2,
    /// The device does not exist or the driver is down.
    Miss = 3,
    Unknown = 4,
}

/// Native joystick driver entry points.
///
/// Calls report failure as a boolean success code, matching the native
/// contract; interpretation into typed errors happens in the device layer.
/// Range queries return `None` when the driver acknowledges the axis but
/// cannot answer for its range.
pub trait JoystickDriver: Send + Sync {
    /// Whether the driver service is installed and running.
    fn is_enabled(&self) -> bool;

    /// Whether the loaded library and the installed driver agree on version.
    fn driver_version_matches(&self) -> bool;

    /// The structure layout negotiated from the installed driver version.
    fn api_version(&self) -> ApiVersion;

    fn max_device_count(&self) -> u32;

    fn existing_device_count(&self) -> u32;

    fn acquire(&self, index: u32) -> bool;

    fn release(&self, index: u32) -> bool;

    fn status(&self, index: u32) -> VjdStatus;

    fn reset(&self, index: u32) -> bool;

    fn reset_buttons(&self, index: u32) -> bool;

    fn reset_povs(&self, index: u32) -> bool;

    fn reset_all(&self) -> bool;

    fn button_count(&self, index: u32) -> u32;

    fn discrete_pov_count(&self, index: u32) -> u32;

    fn continuous_pov_count(&self, index: u32) -> u32;

    fn axis_exists(&self, index: u32, axis: HidUsage) -> bool;

    fn axis_min(&self, index: u32, axis: HidUsage) -> Option<i32>;

    fn axis_max(&self, index: u32, axis: HidUsage) -> Option<i32>;

    fn set_button(&self, index: u32, button: u8, pressed: bool) -> bool;

    fn set_axis(&self, index: u32, axis: HidUsage, value: i32) -> bool;

    fn set_discrete_pov(&self, index: u32, pov: u8, value: i32) -> bool;

    fn set_continuous_pov(&self, index: u32, pov: u8, value: i32) -> bool;

    /// Push a whole serialized position report to the device.
    fn push_report(&self, index: u32, report: &[u8]) -> bool;

    /// Read the device's position back into `buf`. Only drivers negotiated
    /// at [`ApiVersion::V3`] support read-back.
    fn read_position(&self, index: u32, buf: &mut Vec<u8>) -> bool;
}
