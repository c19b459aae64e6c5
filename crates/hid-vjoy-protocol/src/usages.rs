//! HID usage identifiers for vJoy axes.

use serde::{Deserialize, Serialize};

/// HID usage ids the driver understands for axis queries and writes.
///
/// Values match the native `HID_USAGE_*` constants. `Pov` is listed because
/// the driver enumerates it alongside the axes, but it has no field in the
/// axis block of the position report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u32)]
pub enum HidUsage {
    X = 0x30,
    Y = 0x31,
    Z = 0x32,
    Rx = 0x33,
    Ry = 0x34,
    Rz = 0x35,
    Slider = 0x36,
    Dial = 0x37,
    Wheel = 0x38,
    Pov = 0x39,
    Aileron = 0xB0,
    Rudder = 0xBA,
    Throttle = 0xBB,
    Accelerator = 0xC4,
    Brake = 0xC5,
    Steering = 0xC6,
}

impl HidUsage {
    /// Every usage the driver can report, ordered low-to-high by identifier.
    /// Axis discovery walks this list.
    pub const ALL: [HidUsage; 16] = [
        HidUsage::X,
        HidUsage::Y,
        HidUsage::Z,
        HidUsage::Rx,
        HidUsage::Ry,
        HidUsage::Rz,
        HidUsage::Slider,
        HidUsage::Dial,
        HidUsage::Wheel,
        HidUsage::Pov,
        HidUsage::Aileron,
        HidUsage::Rudder,
        HidUsage::Throttle,
        HidUsage::Accelerator,
        HidUsage::Brake,
        HidUsage::Steering,
    ];

    /// Axes whose report field is seeded to the range midpoint at device
    /// initialization, so a fresh device reports a neutral position.
    pub const NEUTRAL_SEED_AXES: [HidUsage; 6] = [
        HidUsage::X,
        HidUsage::Y,
        HidUsage::Z,
        HidUsage::Rx,
        HidUsage::Ry,
        HidUsage::Rz,
    ];

    /// The raw usage id passed to the driver.
    pub fn id(self) -> u32 {
        self as u32
    }
}
