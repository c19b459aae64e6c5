//! Normalized float → raw report value mapping.
//!
//! All three maps are linear, round half away from zero (`f32::round`), and
//! clamp their input to the documented domain first so out-of-range floats
//! saturate instead of wrapping.

/// Trigger position `[0.0, 1.0]` → `0..=255`.
///
/// `0.0` is released (0), `1.0` is fully pulled (255).
pub fn trigger_to_raw(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Xbox360 stick deflection `[-1.0, 1.0]` → `-32767..=32767`.
///
/// Symmetric around 0; the extra negative step of the signed 16-bit range
/// (-32768) is never produced.
pub fn xusb_stick_to_raw(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

/// DualShock 4 stick deflection `[-1.0, 1.0]` → `1..=255`, centered at 128.
///
/// The span is ±127 around the 128 rest position, so full negative
/// deflection is 1, not 0.
pub fn ds4_stick_to_raw(value: f32) -> u8 {
    (128.0 + (value.clamp(-1.0, 1.0) * 127.0).round()) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_trigger_boundaries() {
        assert_eq!(trigger_to_raw(0.0), 0);
        assert_eq!(trigger_to_raw(1.0), 255);
        assert_eq!(trigger_to_raw(0.5), 128);
    }

    #[test]
    fn test_trigger_clamps() {
        assert_eq!(trigger_to_raw(-0.5), 0);
        assert_eq!(trigger_to_raw(2.0), 255);
    }

    #[test]
    fn test_xusb_stick_boundaries() {
        assert_eq!(xusb_stick_to_raw(0.0), 0);
        assert_eq!(xusb_stick_to_raw(1.0), 32767);
        assert_eq!(xusb_stick_to_raw(-1.0), -32767);
    }

    #[test]
    fn test_ds4_stick_boundaries() {
        assert_eq!(ds4_stick_to_raw(0.0), 128);
        assert_eq!(ds4_stick_to_raw(1.0), 255);
        assert_eq!(ds4_stick_to_raw(-1.0), 1);
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        // 0.5 * 127 = 63.5 → 64, so 128 + 64 = 192.
        assert_eq!(ds4_stick_to_raw(0.5), 192);
        assert_eq!(ds4_stick_to_raw(-0.5), 64);
    }

    proptest! {
        #[test]
        fn prop_trigger_stays_in_range(value in -10.0f32..10.0) {
            let _ = trigger_to_raw(value);
        }

        #[test]
        fn prop_xusb_stick_is_symmetric(value in 0.0f32..=1.0) {
            prop_assert_eq!(xusb_stick_to_raw(-value), -xusb_stick_to_raw(value));
        }

        #[test]
        fn prop_ds4_stick_never_hits_zero(value in -1.0f32..=1.0) {
            prop_assert!(ds4_stick_to_raw(value) >= 1);
        }

        #[test]
        fn prop_maps_are_monotonic(a in -1.0f32..=1.0, b in -1.0f32..=1.0) {
            if a <= b {
                prop_assert!(xusb_stick_to_raw(a) <= xusb_stick_to_raw(b));
                prop_assert!(ds4_stick_to_raw(a) <= ds4_stick_to_raw(b));
            }
        }
    }
}
