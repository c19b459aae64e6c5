//! Position report layouts for vJoy virtual joystick devices.
//!
//! The vJoy driver accepts a whole-device state snapshot (`JOYSTICK_POSITION`)
//! through its batched update entry point. The structure layout changed twice
//! over the driver's lifetime, and the three shapes are mutually incompatible:
//!
//! | Layout | Size | Buttons | Notes |
//! |--------|------|---------|-------|
//! | V1 | 96 bytes | 32 | baseline axis set |
//! | V2 | 108 bytes | 128 | V1 plus three extended button words |
//! | V3 | 124 bytes | 128 | racing axes inserted, virtual-rotation slots moved to the tail |
//!
//! The layout is negotiated once per process from the installed driver
//! version and fixed thereafter; [`JoystickReport`] carries the chosen
//! variant so calling code never branches on version after construction.
//!
//! All multi-byte fields are little-endian 32-bit words. The leading device
//! index byte is followed by three alignment padding bytes, matching the
//! native structure layout.
//!
//! This crate is I/O-free: it owns field packing and validation only.

pub mod position;
pub mod pov;
pub mod types;
pub mod usages;

pub use position::*;
pub use pov::*;
pub use types::*;
pub use usages::*;

use thiserror::Error;

/// Errors returned by vJoy report operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VjoyProtocolError {
    #[error("invalid report size: expected {expected}, got {actual}")]
    InvalidReportSize { expected: usize, actual: usize },

    #[error("axis {usage:?} is not part of the {version:?} report layout")]
    InvalidAxis { usage: HidUsage, version: ApiVersion },

    #[error("button {0} is out of range for this report layout")]
    InvalidButton(u8),

    #[error("POV hat id {0} is out of range (valid: 1-4)")]
    InvalidPovId(u8),

    #[error("POV value {0} is out of range")]
    InvalidPovValue(i32),
}

/// Convenience result alias for vJoy report operations.
pub type VjoyProtocolResult<T> = Result<T, VjoyProtocolError>;

/// Serialized report size for the V1 layout.
pub const REPORT_SIZE_V1: usize = 96;
/// Serialized report size for the V2 layout.
pub const REPORT_SIZE_V2: usize = 108;
/// Serialized report size for the V3 layout.
pub const REPORT_SIZE_V3: usize = 124;

/// Buttons addressable through the baseline button word.
pub const BASELINE_BUTTONS: u8 = 32;
/// Buttons addressable once the extended button words are present (V2/V3).
pub const MAX_BUTTONS: u8 = 128;
/// Number of POV hat slots in every layout.
pub const POV_HAT_COUNT: u8 = 4;
