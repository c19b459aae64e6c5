//! Per-device axis range discovery.

use crate::AxisLimits;
use hid_vjoy_protocol::HidUsage;
use std::collections::BTreeMap;
use tracing::debug;
use virtpad_driver::JoystickDriver;

/// Query the driver for every configurable axis of `index` and collect the
/// logical range of each one that exists.
///
/// The walk follows the fixed usage enumeration, low-to-high. An axis whose
/// existence query answers no is skipped silently. An axis that exists but
/// refuses its range queries is also skipped: some driver builds report
/// existence without supporting range queries, and a missing range is not
/// worth failing the whole device over.
pub fn discover(driver: &dyn JoystickDriver, index: u32) -> BTreeMap<HidUsage, AxisLimits> {
    let mut limits = BTreeMap::new();
    for axis in HidUsage::ALL {
        if !driver.axis_exists(index, axis) {
            continue;
        }
        let (Some(min), Some(max)) = (driver.axis_min(index, axis), driver.axis_max(index, axis))
        else {
            debug!(device = index, ?axis, "axis exists but range query failed; skipping");
            continue;
        };
        limits.insert(axis, AxisLimits::new(min, max));
    }
    limits
}

#[cfg(test)]
mod tests {
    use super::*;
    use virtpad_driver::mock::MockJoystickDriver;

    #[test]
    fn test_discovers_configured_axes_in_usage_order() {
        let driver = MockJoystickDriver::new();
        driver.clear_axes();
        driver.insert_axis(HidUsage::Rx, -100, 100);
        driver.insert_axis(HidUsage::X, 0, 32767);

        let limits = discover(&driver, 1);
        let axes: Vec<HidUsage> = limits.keys().copied().collect();
        assert_eq!(axes, vec![HidUsage::X, HidUsage::Rx]);
        assert_eq!(limits.get(&HidUsage::X), Some(&AxisLimits::new(0, 32767)));
        assert_eq!(limits.get(&HidUsage::Rx), Some(&AxisLimits::new(-100, 100)));
    }

    #[test]
    fn test_missing_axes_are_skipped() {
        let driver = MockJoystickDriver::new();
        driver.clear_axes();
        assert!(discover(&driver, 1).is_empty());
    }

    #[test]
    fn test_unqueryable_range_skips_axis_not_device() {
        let driver = MockJoystickDriver::new();
        driver.clear_axes();
        driver.insert_axis(HidUsage::Y, 0, 255);
        driver.insert_unqueryable_axis(HidUsage::Slider);

        let limits = discover(&driver, 1);
        assert_eq!(limits.len(), 1);
        assert!(limits.contains_key(&HidUsage::Y));
        assert!(!limits.contains_key(&HidUsage::Slider));
    }
}
