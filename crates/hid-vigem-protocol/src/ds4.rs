//! DualShock 4 wired target report.
//!
//! The directional pad is not a button bit: it lives in the low 4 bits of
//! the button word as a 9-direction code. D-pad writes recompute only that
//! nibble and leave the button bits alone.

use serde::{Deserialize, Serialize};

/// USB vendor ID the bus reports for DualShock 4 targets.
pub const DS4_VENDOR_ID: u16 = 0x054C;
/// USB product ID the bus reports for DualShock 4 targets.
pub const DS4_PRODUCT_ID: u16 = 0x05C4;

/// Serialized DS4 report size in bytes (one trailing alignment pad byte).
pub const DS4_REPORT_SIZE: usize = 10;

/// Centered stick value; both axes of both sticks rest here.
pub const DS4_STICK_CENTER: u8 = 0x80;

/// Mask of the d-pad nibble inside the button word.
pub const DS4_DPAD_MASK: u16 = 0x000F;

/// Button bits of the DS4 report's 16-bit button word (bits 4-15; the low
/// nibble belongs to the d-pad).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u16)]
pub enum Ds4Button {
    Square = 0x0010,
    Cross = 0x0020,
    Circle = 0x0040,
    Triangle = 0x0080,
    ShoulderLeft = 0x0100,
    ShoulderRight = 0x0200,
    TriggerLeft = 0x0400,
    TriggerRight = 0x0800,
    Share = 0x1000,
    Options = 0x2000,
    ThumbLeft = 0x4000,
    ThumbRight = 0x8000,
}

impl Ds4Button {
    pub fn bits(self) -> u16 {
        self as u16
    }
}

/// Bits of the separate special-button byte.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Ds4SpecialButton {
    Ps = 0x01,
    Touchpad = 0x02,
}

impl Ds4SpecialButton {
    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// Nine-direction d-pad code stored in the button word's low nibble.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u16)]
pub enum Ds4Dpad {
    North = 0x0,
    Northeast = 0x1,
    East = 0x2,
    Southeast = 0x3,
    South = 0x4,
    Southwest = 0x5,
    West = 0x6,
    Northwest = 0x7,
    #[default]
    Neutral = 0x8,
}

impl Ds4Dpad {
    pub fn bits(self) -> u16 {
        self as u16
    }
}

/// Full state snapshot for one DualShock 4 target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ds4Report {
    pub thumb_lx: u8,
    pub thumb_ly: u8,
    pub thumb_rx: u8,
    pub thumb_ry: u8,
    /// Button bits plus the d-pad nibble in the low 4 bits.
    pub buttons: u16,
    pub special: u8,
    pub trigger_l: u8,
    pub trigger_r: u8,
}

impl Default for Ds4Report {
    /// The neutral report: sticks centered at 0x80, d-pad neutral, nothing
    /// pressed.
    fn default() -> Self {
        Self {
            thumb_lx: DS4_STICK_CENTER,
            thumb_ly: DS4_STICK_CENTER,
            thumb_rx: DS4_STICK_CENTER,
            thumb_ry: DS4_STICK_CENTER,
            buttons: Ds4Dpad::Neutral.bits(),
            special: 0,
            trigger_l: 0,
            trigger_r: 0,
        }
    }
}

impl Ds4Report {
    /// Set a button bit, leaving the d-pad nibble and other bits untouched.
    pub fn press(&mut self, button: Ds4Button) {
        self.buttons |= button.bits();
    }

    /// Clear a button bit, leaving the d-pad nibble and other bits untouched.
    pub fn release(&mut self, button: Ds4Button) {
        self.buttons &= !button.bits();
    }

    pub fn is_pressed(&self, button: Ds4Button) -> bool {
        self.buttons & button.bits() != 0
    }

    /// Set a special-button bit (PS / touchpad class).
    pub fn press_special(&mut self, button: Ds4SpecialButton) {
        self.special |= button.bits();
    }

    /// Clear a special-button bit.
    pub fn release_special(&mut self, button: Ds4SpecialButton) {
        self.special &= !button.bits();
    }

    pub fn is_special_pressed(&self, button: Ds4SpecialButton) -> bool {
        self.special & button.bits() != 0
    }

    /// Point the d-pad. Recomputes only the low nibble of the button word;
    /// every button bit is preserved.
    pub fn set_dpad(&mut self, direction: Ds4Dpad) {
        self.buttons = (self.buttons & !DS4_DPAD_MASK) | direction.bits();
    }

    pub fn dpad(&self) -> u16 {
        self.buttons & DS4_DPAD_MASK
    }

    /// Serialize to the native little-endian layout, including the trailing
    /// alignment pad byte.
    pub fn to_bytes(&self) -> [u8; DS4_REPORT_SIZE] {
        let [buttons_lo, buttons_hi] = self.buttons.to_le_bytes();
        [
            self.thumb_lx,
            self.thumb_ly,
            self.thumb_rx,
            self.thumb_ry,
            buttons_lo,
            buttons_hi,
            self.special,
            self.trigger_l,
            self.trigger_r,
            0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_report_is_neutral() {
        let report = Ds4Report::default();
        assert_eq!(report.thumb_lx, 0x80);
        assert_eq!(report.thumb_ry, 0x80);
        assert_eq!(report.buttons, 0x0008);
        assert_eq!(
            report.to_bytes(),
            [0x80, 0x80, 0x80, 0x80, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_press_release_leaves_dpad_alone() {
        let mut report = Ds4Report::default();
        report.press(Ds4Button::Triangle);
        assert_eq!(report.buttons, 0x0088);
        report.release(Ds4Button::Triangle);
        assert_eq!(report.buttons, 0x0008);
    }

    #[test]
    fn test_dpad_write_preserves_buttons() {
        let mut report = Ds4Report::default();
        report.press(Ds4Button::Cross);
        report.press(Ds4Button::ThumbRight);
        report.set_dpad(Ds4Dpad::Northwest);
        assert_eq!(report.buttons, 0x8020 | 0x0007);
        assert!(report.is_pressed(Ds4Button::Cross));
        assert!(report.is_pressed(Ds4Button::ThumbRight));

        report.set_dpad(Ds4Dpad::Neutral);
        assert_eq!(report.dpad(), 0x8);
        assert!(report.is_pressed(Ds4Button::ThumbRight));
    }

    #[test]
    fn test_special_buttons() {
        let mut report = Ds4Report::default();
        report.press_special(Ds4SpecialButton::Touchpad);
        assert_eq!(report.special, 0x02);
        report.press_special(Ds4SpecialButton::Ps);
        assert_eq!(report.special, 0x03);
        report.release_special(Ds4SpecialButton::Touchpad);
        assert_eq!(report.special, 0x01);
    }

    proptest! {
        #[test]
        fn prop_dpad_only_touches_low_nibble(buttons in any::<u16>(), dir in 0u16..=8) {
            let direction = match dir {
                0 => Ds4Dpad::North,
                1 => Ds4Dpad::Northeast,
                2 => Ds4Dpad::East,
                3 => Ds4Dpad::Southeast,
                4 => Ds4Dpad::South,
                5 => Ds4Dpad::Southwest,
                6 => Ds4Dpad::West,
                7 => Ds4Dpad::Northwest,
                _ => Ds4Dpad::Neutral,
            };
            let mut report = Ds4Report { buttons, ..Ds4Report::default() };
            report.set_dpad(direction);
            prop_assert_eq!(report.buttons & !DS4_DPAD_MASK, buttons & !DS4_DPAD_MASK);
            prop_assert_eq!(report.dpad(), direction.bits());
        }
    }
}
