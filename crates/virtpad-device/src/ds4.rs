//! DualShock 4 virtual gamepad facade.

use crate::notification::FeedbackCallback;
use crate::target::TargetLifecycle;
use crate::{BusContext, BusError, LifecycleState, VirtualGamepad};
use hid_vigem_protocol::{Ds4Button, Ds4Dpad, Ds4Report, Ds4SpecialButton};
use virtpad_calibration::{ds4_stick_to_raw, trigger_to_raw};
use virtpad_driver::TargetKind;

/// A virtual wired DualShock 4 controller on the shared bus.
///
/// Same update discipline as the Xbox360 facade: mutators edit the
/// in-memory report, [`Ds4Device::update`] pushes it whole. Stick axes are
/// unsigned bytes resting at 0x80; the d-pad is a 9-direction code packed
/// into the button word's low nibble.
pub struct Ds4Device {
    lifecycle: TargetLifecycle,
    report: Ds4Report,
}

impl Ds4Device {
    pub fn attach(context: &BusContext) -> Result<Self, BusError> {
        let lifecycle = TargetLifecycle::attach(context, TargetKind::DualShock4Wired)?;
        let mut device = Self {
            lifecycle,
            report: Ds4Report::default(),
        };
        device.update()?;
        Ok(device)
    }

    pub fn press_button(&mut self, button: Ds4Button) {
        self.report.press(button);
    }

    pub fn release_button(&mut self, button: Ds4Button) {
        self.report.release(button);
    }

    pub fn press_special_button(&mut self, button: Ds4SpecialButton) {
        self.report.press_special(button);
    }

    pub fn release_special_button(&mut self, button: Ds4SpecialButton) {
        self.report.release_special(button);
    }

    /// Point the d-pad; button bits are preserved.
    pub fn directional_pad(&mut self, direction: Ds4Dpad) {
        self.report.set_dpad(direction);
    }

    /// Left trigger, 0 = released, 255 = fully pulled.
    pub fn left_trigger(&mut self, value: u8) {
        self.report.trigger_l = value;
    }

    pub fn right_trigger(&mut self, value: u8) {
        self.report.trigger_r = value;
    }

    /// Left trigger from a normalized `[0.0, 1.0]` position.
    pub fn left_trigger_float(&mut self, value: f32) {
        self.left_trigger(trigger_to_raw(value));
    }

    pub fn right_trigger_float(&mut self, value: f32) {
        self.right_trigger(trigger_to_raw(value));
    }

    /// Left stick in raw byte coordinates, 0x80 = centered.
    pub fn left_joystick(&mut self, x: u8, y: u8) {
        self.report.thumb_lx = x;
        self.report.thumb_ly = y;
    }

    pub fn right_joystick(&mut self, x: u8, y: u8) {
        self.report.thumb_rx = x;
        self.report.thumb_ry = y;
    }

    /// Left stick from normalized `[-1.0, 1.0]` deflections (128 ± 127).
    pub fn left_joystick_float(&mut self, x: f32, y: f32) {
        self.left_joystick(ds4_stick_to_raw(x), ds4_stick_to_raw(y));
    }

    pub fn right_joystick_float(&mut self, x: f32, y: f32) {
        self.right_joystick(ds4_stick_to_raw(x), ds4_stick_to_raw(y));
    }

    pub fn report(&self) -> &Ds4Report {
        &self.report
    }

    pub fn report_mut(&mut self) -> &mut Ds4Report {
        &mut self.report
    }

    /// Push the current report to the emulated hardware.
    pub fn update(&mut self) -> Result<(), BusError> {
        self.lifecycle.update(&self.report.to_bytes())
    }

    /// Reset the in-memory report to the neutral state. Does not push.
    pub fn reset(&mut self) {
        self.report = Ds4Report::default();
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

impl std::fmt::Debug for Ds4Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ds4Device")
            .field("lifecycle", &self.lifecycle)
            .field("report", &self.report)
            .finish()
    }
}

impl VirtualGamepad for Ds4Device {
    fn kind(&self) -> TargetKind {
        TargetKind::DualShock4Wired
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
        Ds4Device::update(self)
    }

    fn reset(&mut self) {
        Ds4Device::reset(self);
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
