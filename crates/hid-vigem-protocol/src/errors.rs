//! Enumerated bus error codes.
//!
//! Every bus entry point answers with a 32-bit status. Success is the single
//! value [`VIGEM_ERROR_NONE`]; everything else maps to a named variant so
//! failures surface by name rather than as a bare number.

use thiserror::Error;

/// The success status code.
pub const VIGEM_ERROR_NONE: u32 = 0x2000_0000;

/// Named failure codes returned by the bus driver.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VigemError {
    #[error("VIGEM_ERROR_BUS_NOT_FOUND")]
    BusNotFound,
    #[error("VIGEM_ERROR_NO_FREE_SLOT")]
    NoFreeSlot,
    #[error("VIGEM_ERROR_INVALID_TARGET")]
    InvalidTarget,
    #[error("VIGEM_ERROR_REMOVAL_FAILED")]
    RemovalFailed,
    #[error("VIGEM_ERROR_ALREADY_CONNECTED")]
    AlreadyConnected,
    #[error("VIGEM_ERROR_TARGET_UNINITIALIZED")]
    TargetUninitialized,
    #[error("VIGEM_ERROR_TARGET_NOT_PLUGGED_IN")]
    TargetNotPluggedIn,
    #[error("VIGEM_ERROR_BUS_VERSION_MISMATCH")]
    BusVersionMismatch,
    #[error("VIGEM_ERROR_BUS_ACCESS_FAILED")]
    BusAccessFailed,
    #[error("VIGEM_ERROR_CALLBACK_ALREADY_REGISTERED")]
    CallbackAlreadyRegistered,
    #[error("VIGEM_ERROR_CALLBACK_NOT_FOUND")]
    CallbackNotFound,
    #[error("VIGEM_ERROR_BUS_ALREADY_CONNECTED")]
    BusAlreadyConnected,
    #[error("VIGEM_ERROR_BUS_INVALID_HANDLE")]
    BusInvalidHandle,
    #[error("VIGEM_ERROR_XUSB_USERINDEX_OUT_OF_RANGE")]
    XusbUserIndexOutOfRange,
    #[error("VIGEM_ERROR_INVALID_PARAMETER")]
    InvalidParameter,
    #[error("VIGEM_ERROR_NOT_SUPPORTED")]
    NotSupported,
    #[error("unrecognized bus error {0:#010X}")]
    Unknown(u32),
}

impl VigemError {
    /// The native status code for this error.
    pub fn code(self) -> u32 {
        match self {
            VigemError::BusNotFound => 0xE000_0001,
            VigemError::NoFreeSlot => 0xE000_0002,
            VigemError::InvalidTarget => 0xE000_0003,
            VigemError::RemovalFailed => 0xE000_0004,
            VigemError::AlreadyConnected => 0xE000_0005,
            VigemError::TargetUninitialized => 0xE000_0006,
            VigemError::TargetNotPluggedIn => 0xE000_0007,
            VigemError::BusVersionMismatch => 0xE000_0008,
            VigemError::BusAccessFailed => 0xE000_0009,
            VigemError::CallbackAlreadyRegistered => 0xE000_0010,
            VigemError::CallbackNotFound => 0xE000_0011,
            VigemError::BusAlreadyConnected => 0xE000_0012,
            VigemError::BusInvalidHandle => 0xE000_0013,
            VigemError::XusbUserIndexOutOfRange => 0xE000_0014,
            VigemError::InvalidParameter => 0xE000_0015,
            VigemError::NotSupported => 0xE000_0016,
            VigemError::Unknown(code) => code,
        }
    }

    /// Map a native failure status to its named variant.
    pub fn from_code(code: u32) -> Self {
        match code {
            0xE000_0001 => VigemError::BusNotFound,
            0xE000_0002 => VigemError::NoFreeSlot,
            0xE000_0003 => VigemError::InvalidTarget,
            0xE000_0004 => VigemError::RemovalFailed,
            0xE000_0005 => VigemError::AlreadyConnected,
            0xE000_0006 => VigemError::TargetUninitialized,
            0xE000_0007 => VigemError::TargetNotPluggedIn,
            0xE000_0008 => VigemError::BusVersionMismatch,
            0xE000_0009 => VigemError::BusAccessFailed,
            0xE000_0010 => VigemError::CallbackAlreadyRegistered,
            0xE000_0011 => VigemError::CallbackNotFound,
            0xE000_0012 => VigemError::BusAlreadyConnected,
            0xE000_0013 => VigemError::BusInvalidHandle,
            0xE000_0014 => VigemError::XusbUserIndexOutOfRange,
            0xE000_0015 => VigemError::InvalidParameter,
            0xE000_0016 => VigemError::NotSupported,
            other => VigemError::Unknown(other),
        }
    }

    /// Turn a raw native status into a result, keeping the failure name.
    pub fn check(code: u32) -> Result<(), VigemError> {
        if code == VIGEM_ERROR_NONE {
            Ok(())
        } else {
            Err(VigemError::from_code(code))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for code in 0xE000_0001..=0xE000_0016u32 {
            let error = VigemError::from_code(code);
            assert_eq!(error.code(), code);
        }
    }

    #[test]
    fn test_failures_surface_by_name() {
        assert_eq!(
            VigemError::NoFreeSlot.to_string(),
            "VIGEM_ERROR_NO_FREE_SLOT"
        );
        assert_eq!(
            VigemError::TargetNotPluggedIn.to_string(),
            "VIGEM_ERROR_TARGET_NOT_PLUGGED_IN"
        );
    }

    #[test]
    fn test_check_passes_success_code() {
        assert_eq!(VigemError::check(VIGEM_ERROR_NONE), Ok(()));
        assert_eq!(
            VigemError::check(0xE000_0002),
            Err(VigemError::NoFreeSlot)
        );
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let error = VigemError::from_code(0xDEAD_BEEF);
        assert_eq!(error, VigemError::Unknown(0xDEAD_BEEF));
        assert_eq!(error.code(), 0xDEAD_BEEF);
    }
}
