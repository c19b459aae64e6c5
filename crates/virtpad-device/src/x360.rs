//! Xbox360 virtual gamepad facade.

use crate::notification::FeedbackCallback;
use crate::target::TargetLifecycle;
use crate::{BusContext, BusError, LifecycleState, VirtualGamepad};
use hid_vigem_protocol::{XusbButton, XusbReport};
use virtpad_calibration::{trigger_to_raw, xusb_stick_to_raw};
use virtpad_driver::TargetKind;

/// A virtual wired Xbox360 controller on the shared bus.
///
/// Mutators edit the in-memory report only; [`Xbox360Device::update`]
/// pushes the whole snapshot to the emulated hardware. One neutral report
/// is pushed at attach time so the device comes up in a defined state.
pub struct Xbox360Device {
    lifecycle: TargetLifecycle,
    report: XusbReport,
}

impl Xbox360Device {
    pub fn attach(context: &BusContext) -> Result<Self, BusError> {
        let lifecycle = TargetLifecycle::attach(context, TargetKind::Xbox360Wired)?;
        let mut device = Self {
            lifecycle,
            report: XusbReport::default(),
        };
        device.update()?;
        Ok(device)
    }

    pub fn press_button(&mut self, button: XusbButton) {
        self.report.press(button);
    }

    pub fn release_button(&mut self, button: XusbButton) {
        self.report.release(button);
    }

    /// Left trigger, 0 = released, 255 = fully pulled.
    pub fn left_trigger(&mut self, value: u8) {
        self.report.left_trigger = value;
    }

    pub fn right_trigger(&mut self, value: u8) {
        self.report.right_trigger = value;
    }

    /// Left trigger from a normalized `[0.0, 1.0]` position.
    pub fn left_trigger_float(&mut self, value: f32) {
        self.left_trigger(trigger_to_raw(value));
    }

    pub fn right_trigger_float(&mut self, value: f32) {
        self.right_trigger(trigger_to_raw(value));
    }

    /// Left stick in raw signed coordinates, 0 = centered.
    pub fn left_joystick(&mut self, x: i16, y: i16) {
        self.report.thumb_lx = x;
        self.report.thumb_ly = y;
    }

    pub fn right_joystick(&mut self, x: i16, y: i16) {
        self.report.thumb_rx = x;
        self.report.thumb_ry = y;
    }

    /// Left stick from normalized `[-1.0, 1.0]` deflections.
    pub fn left_joystick_float(&mut self, x: f32, y: f32) {
        self.left_joystick(xusb_stick_to_raw(x), xusb_stick_to_raw(y));
    }

    pub fn right_joystick_float(&mut self, x: f32, y: f32) {
        self.right_joystick(xusb_stick_to_raw(x), xusb_stick_to_raw(y));
    }

    pub fn report(&self) -> &XusbReport {
        &self.report
    }

    pub fn report_mut(&mut self) -> &mut XusbReport {
        &mut self.report
    }

    /// Push the current report to the emulated hardware.
    pub fn update(&mut self) -> Result<(), BusError> {
        self.lifecycle.update(&self.report.to_bytes())
    }

    /// Reset the in-memory report to the neutral state. Does not push.
    pub fn reset(&mut self) {
        self.report = XusbReport::default();
    }

    pub fn vendor_id(&self) -> u16 {
        self.lifecycle.vendor_id()
    }

    pub fn product_id(&self) -> u16 {
        self.lifecycle.product_id()
    }

    pub fn set_vendor_id(&mut self, vid: u16) -> Result<(), BusError> {
        self.lifecycle.set_vendor_id(vid)
    }

    pub fn set_product_id(&mut self, pid: u16) -> Result<(), BusError> {
        self.lifecycle.set_product_id(pid)
    }

    pub fn slot_index(&self) -> u32 {
        self.lifecycle.slot_index()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn register_notification(&mut self, callback: FeedbackCallback) -> Result<(), BusError> {
        self.lifecycle.register_notification(callback)
    }

    pub fn unregister_notification(&mut self) {
        self.lifecycle.unregister_notification();
    }

    /// Remove the device from the bus. Idempotent; also runs on drop.
    pub fn detach(&mut self) -> Result<(), BusError> {
        self.lifecycle.detach()
    }
}

impl std::fmt::Debug for Xbox360Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Xbox360Device")
            .field("lifecycle", &self.lifecycle)
            .field("report", &self.report)
            .finish()
    }
}

impl VirtualGamepad for Xbox360Device {
    fn kind(&self) -> TargetKind {
        TargetKind::Xbox360Wired
    }

    fn vendor_id(&self) -> u16 {
        self.lifecycle.vendor_id()
    }

    fn product_id(&self) -> u16 {
        self.lifecycle.product_id()
    }

    fn slot_index(&self) -> u32 {
        self.lifecycle.slot_index()
    }

    fn update(&mut self) -> Result<(), BusError> {
        Xbox360Device::update(self)
    }

    fn reset(&mut self) {
        Xbox360Device::reset(self);
    }

    fn register_notification(&mut self, callback: FeedbackCallback) -> Result<(), BusError> {
        self.lifecycle.register_notification(callback)
    }

    fn unregister_notification(&mut self) {
        self.lifecycle.unregister_notification();
    }

    fn detach(&mut self) -> Result<(), BusError> {
        self.lifecycle.detach()
    }
}
