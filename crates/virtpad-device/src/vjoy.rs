//! Generic joystick device facade.

use crate::{LifecycleState, VjoyError};
use hid_vjoy_protocol::{ApiVersion, HidUsage, JoystickReport, PositionV3};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use virtpad_calibration::{AxisLimits, discover};
use virtpad_driver::{JoystickDriver, VjdStatus};

/// One acquired slot of the generic joystick driver.
///
/// Construction validates the index, acquires the slot, resets it, runs
/// axis discovery, seeds the classic axes to their midpoints, and pushes
/// the seeded report once, so the emulated stick comes up centered rather
/// than pinned to a corner. Per-control setters mirror into the in-memory
/// report and forward to the driver; [`VjoyDevice::update`] pushes the
/// whole report in one call instead.
pub struct VjoyDevice {
    driver: Arc<dyn JoystickDriver>,
    index: u32,
    report: JoystickReport,
    axes: BTreeMap<HidUsage, AxisLimits>,
    button_count: u32,
    discrete_pov_count: u32,
    continuous_pov_count: u32,
    state: LifecycleState,
}

impl VjoyDevice {
    /// Acquire device `index` (1-based) and bring it to a neutral state.
    ///
    /// # Errors
    ///
    /// Out-of-range indices are rejected with [`VjoyError::InvalidHandle`]
    /// before any control call reaches the driver. A slot that is not free
    /// surfaces as [`VjoyError::AcquisitionFailed`] naming the observed
    /// status.
    pub fn acquire(driver: Arc<dyn JoystickDriver>, index: u32) -> Result<Self, VjoyError> {
        let max = driver.max_device_count();
        if index < 1 || index > max {
            return Err(VjoyError::InvalidHandle { index, max });
        }
        if !driver.is_enabled() {
            return Err(VjoyError::DriverUnavailable);
        }
        if !driver.driver_version_matches() {
            return Err(VjoyError::DriverVersionMismatch);
        }

        let version = driver.api_version();
        if !driver.acquire(index) {
            let status = driver.status(index);
            return Err(if status != VjdStatus::Free {
                VjoyError::AcquisitionFailed { index, status }
            } else {
                VjoyError::NativeCallFailed {
                    operation: "acquire",
                }
            });
        }

        // The slot is ours from here on: the device owns teardown even if
        // initialization fails partway (drop releases it).
        let mut device = Self {
            driver,
            index,
            report: JoystickReport::new(version, index as u8),
            axes: BTreeMap::new(),
            button_count: 0,
            discrete_pov_count: 0,
            continuous_pov_count: 0,
            state: LifecycleState::Attaching,
        };
        device.initialize()?;
        device.state = LifecycleState::Attached;
        info!(index, ?version, "joystick device acquired");
        Ok(device)
    }

    fn initialize(&mut self) -> Result<(), VjoyError> {
        if !self.driver.reset(self.index) {
            return Err(VjoyError::NativeCallFailed { operation: "reset" });
        }

        self.axes = discover(&*self.driver, self.index);
        for axis in HidUsage::NEUTRAL_SEED_AXES {
            if let Some(limits) = self.axes.get(&axis) {
                self.report.set_axis(axis, limits.mid)?;
            }
        }
        self.push()?;

        self.button_count = self.driver.button_count(self.index);
        self.discrete_pov_count = self.driver.discrete_pov_count(self.index);
        self.continuous_pov_count = self.driver.continuous_pov_count(self.index);
        Ok(())
    }

    fn ensure_attached(&self) -> Result<(), VjoyError> {
        if self.state.is_attached() {
            Ok(())
        } else {
            Err(VjoyError::Detached(self.index))
        }
    }

    fn push(&self) -> Result<(), VjoyError> {
        if !self.driver.push_report(self.index, &self.report.to_bytes()) {
            return Err(VjoyError::NativeCallFailed {
                operation: "push_report",
            });
        }
        Ok(())
    }

    /// Set or clear one button (1-based), mirroring the report and
    /// forwarding to the driver.
    pub fn set_button(&mut self, button: u8, pressed: bool) -> Result<(), VjoyError> {
        self.ensure_attached()?;
        self.report.set_button(button, pressed)?;
        if !self.driver.set_button(self.index, button, pressed) {
            return Err(VjoyError::NativeCallFailed {
                operation: "set_button",
            });
        }
        Ok(())
    }

    /// Write one axis without range checking (the driver clamps on its own
    /// terms).
    pub fn set_axis(&mut self, axis: HidUsage, value: i32) -> Result<(), VjoyError> {
        self.ensure_attached()?;
        self.report.set_axis(axis, value)?;
        if !self.driver.set_axis(self.index, axis, value) {
            return Err(VjoyError::NativeCallFailed {
                operation: "set_axis",
            });
        }
        Ok(())
    }

    /// Write one axis after checking it exists on this device and `value`
    /// lies inside its discovered logical range.
    pub fn set_axis_validated(&mut self, axis: HidUsage, value: i32) -> Result<(), VjoyError> {
        self.ensure_attached()?;
        let limits = self
            .axes
            .get(&axis)
            .copied()
            .ok_or(VjoyError::InvalidAxis { axis })?;
        if !limits.contains(value) {
            return Err(VjoyError::InvalidAxisValue {
                axis,
                value,
                min: limits.min,
                max: limits.max,
            });
        }
        self.set_axis(axis, value)
    }

    /// Write a discrete POV hat (1-based id, value in {-1, 0..=3}).
    pub fn set_discrete_pov(&mut self, pov: u8, value: i32) -> Result<(), VjoyError> {
        self.ensure_attached()?;
        self.report.set_discrete_pov(pov, value)?;
        if !self.driver.set_discrete_pov(self.index, pov, value) {
            return Err(VjoyError::NativeCallFailed {
                operation: "set_discrete_pov",
            });
        }
        Ok(())
    }

    /// Write a continuous POV hat (1-based id, value in {-1} ∪ [0, 35999]
    /// hundredths of a degree).
    pub fn set_continuous_pov(&mut self, pov: u8, value: i32) -> Result<(), VjoyError> {
        self.ensure_attached()?;
        self.report.set_continuous_pov(pov, value)?;
        if !self.driver.set_continuous_pov(self.index, pov, value) {
            return Err(VjoyError::NativeCallFailed {
                operation: "set_continuous_pov",
            });
        }
        Ok(())
    }

    /// Push the whole in-memory report in one driver call.
    pub fn update(&mut self) -> Result<(), VjoyError> {
        self.ensure_attached()?;
        self.push()
    }

    /// Driver-side reset of every control to its defaults.
    pub fn reset(&mut self) -> Result<(), VjoyError> {
        self.ensure_attached()?;
        if !self.driver.reset(self.index) {
            return Err(VjoyError::NativeCallFailed { operation: "reset" });
        }
        Ok(())
    }

    /// Driver-side reset of all buttons.
    pub fn reset_buttons(&mut self) -> Result<(), VjoyError> {
        self.ensure_attached()?;
        if !self.driver.reset_buttons(self.index) {
            return Err(VjoyError::NativeCallFailed {
                operation: "reset_buttons",
            });
        }
        Ok(())
    }

    /// Driver-side reset of all POV hats.
    pub fn reset_povs(&mut self) -> Result<(), VjoyError> {
        self.ensure_attached()?;
        if !self.driver.reset_povs(self.index) {
            return Err(VjoyError::NativeCallFailed {
                operation: "reset_povs",
            });
        }
        Ok(())
    }

    /// Driver-side reset of every device the driver owns.
    pub fn reset_all(&mut self) -> Result<(), VjoyError> {
        self.ensure_attached()?;
        if !self.driver.reset_all() {
            return Err(VjoyError::NativeCallFailed {
                operation: "reset_all",
            });
        }
        Ok(())
    }

    /// Replace the in-memory report with a fresh neutral one. No driver
    /// traffic; midpoint seeds are not reapplied.
    pub fn reset_report(&mut self) {
        self.report = JoystickReport::new(self.report.version(), self.index as u8);
    }

    /// Read the device position back from the driver into the in-memory
    /// report. Read-back exists only in the V3 layout.
    pub fn read_position(&mut self) -> Result<(), VjoyError> {
        self.ensure_attached()?;
        let version = self.report.version();
        if self.report.as_v3().is_none() {
            return Err(VjoyError::UnsupportedApiVersion {
                operation: "read_position",
                needed: ApiVersion::V3,
                actual: version,
            });
        }
        let mut buf = Vec::new();
        if !self.driver.read_position(self.index, &mut buf) {
            return Err(VjoyError::NativeCallFailed {
                operation: "read_position",
            });
        }
        let decoded = PositionV3::from_bytes(&buf)?;
        if let Some(slot) = self.report.as_v3_mut() {
            *slot = decoded;
        }
        Ok(())
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn api_version(&self) -> ApiVersion {
        self.report.version()
    }

    /// Axes discovered at acquisition, in usage order.
    pub fn available_axes(&self) -> impl Iterator<Item = HidUsage> + '_ {
        self.axes.keys().copied()
    }

    pub fn axis_limits(&self, axis: HidUsage) -> Option<&AxisLimits> {
        self.axes.get(&axis)
    }

    pub fn button_count(&self) -> u32 {
        self.button_count
    }

    pub fn discrete_pov_count(&self) -> u32 {
        self.discrete_pov_count
    }

    pub fn continuous_pov_count(&self) -> u32 {
        self.continuous_pov_count
    }

    pub fn report(&self) -> &JoystickReport {
        &self.report
    }

    pub fn report_mut(&mut self) -> &mut JoystickReport {
        &mut self.report
    }

    /// Relinquish the slot. Idempotent: the second and later calls do
    /// nothing. Also runs on drop.
    pub fn release(&mut self) -> Result<(), VjoyError> {
        if !self.state.needs_teardown() {
            return Ok(());
        }
        self.state = LifecycleState::Detached;
        if !self.driver.release(self.index) {
            return Err(VjoyError::NativeCallFailed {
                operation: "release",
            });
        }
        info!(index = self.index, "joystick device released");
        Ok(())
    }
}

impl Drop for VjoyDevice {
    fn drop(&mut self) {
        if let Err(error) = self.release() {
            warn!(index = self.index, %error, "joystick release failed during drop");
        }
    }
}

impl std::fmt::Debug for VjoyDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VjoyDevice")
            .field("index", &self.index)
            .field("version", &self.report.version())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
