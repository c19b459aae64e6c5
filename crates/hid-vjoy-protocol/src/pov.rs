//! POV hat value validation and word encoding.
//!
//! A hat slot is one 32-bit word in the position report. Depending on how
//! the device was configured, the driver interprets the word either as a
//! discrete position (north/east/south/west) or as a continuous angle in
//! hundredths of a degree. Neutral is -1 in both modes and is stored as the
//! all-ones word.

use crate::{POV_HAT_COUNT, VjoyProtocolError, VjoyProtocolResult};

/// Neutral (centered) hat value in both modes.
pub const POV_NEUTRAL: i32 = -1;
/// Highest discrete hat position (north = 0, east = 1, south = 2, west = 3).
pub const DISCRETE_POV_MAX: i32 = 3;
/// Highest continuous hat angle, in hundredths of a degree.
pub const CONTINUOUS_POV_MAX: i32 = 35999;

/// Validate a 1-based hat id against the fixed four-slot layout.
pub fn validate_pov_id(pov: u8) -> VjoyProtocolResult<()> {
    if pov < 1 || pov > POV_HAT_COUNT {
        return Err(VjoyProtocolError::InvalidPovId(pov));
    }
    Ok(())
}

/// Validate a discrete-mode hat value: {-1, 0, 1, 2, 3}.
pub fn validate_discrete_pov(value: i32) -> VjoyProtocolResult<()> {
    if value < POV_NEUTRAL || value > DISCRETE_POV_MAX {
        return Err(VjoyProtocolError::InvalidPovValue(value));
    }
    Ok(())
}

/// Validate a continuous-mode hat value: {-1} ∪ [0, 35999].
pub fn validate_continuous_pov(value: i32) -> VjoyProtocolResult<()> {
    if value < POV_NEUTRAL || value > CONTINUOUS_POV_MAX {
        return Err(VjoyProtocolError::InvalidPovValue(value));
    }
    Ok(())
}

/// Encode a validated hat value into its report word (-1 ⇒ all-ones).
pub fn encode_pov_word(value: i32) -> u32 {
    value as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discrete_accepts_documented_range() {
        for value in [-1, 0, 1, 2, 3] {
            assert!(validate_discrete_pov(value).is_ok());
        }
    }

    #[test]
    fn test_discrete_rejects_out_of_range() {
        assert_eq!(
            validate_discrete_pov(4),
            Err(VjoyProtocolError::InvalidPovValue(4))
        );
        assert_eq!(
            validate_discrete_pov(-2),
            Err(VjoyProtocolError::InvalidPovValue(-2))
        );
    }

    #[test]
    fn test_continuous_accepts_documented_range() {
        for value in [-1, 0, 17999, 35999] {
            assert!(validate_continuous_pov(value).is_ok());
        }
    }

    #[test]
    fn test_continuous_rejects_out_of_range() {
        assert_eq!(
            validate_continuous_pov(36000),
            Err(VjoyProtocolError::InvalidPovValue(36000))
        );
        assert_eq!(
            validate_continuous_pov(-2),
            Err(VjoyProtocolError::InvalidPovValue(-2))
        );
    }

    #[test]
    fn test_pov_id_bounds() {
        assert!(validate_pov_id(1).is_ok());
        assert!(validate_pov_id(4).is_ok());
        assert!(validate_pov_id(0).is_err());
        assert!(validate_pov_id(5).is_err());
    }

    #[test]
    fn test_neutral_encodes_all_ones() {
        assert_eq!(encode_pov_word(POV_NEUTRAL), 0xFFFF_FFFF);
        assert_eq!(encode_pov_word(0), 0);
        assert_eq!(encode_pov_word(35999), 35999);
    }
}
