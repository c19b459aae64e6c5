//! Device-layer error types.

use hid_vigem_protocol::VigemError;
use hid_vjoy_protocol::{ApiVersion, HidUsage, VjoyProtocolError};
use virtpad_driver::VjdStatus;

/// Errors raised by the generic joystick backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VjoyError {
    /// Requested index lies outside the driver's device pool.
    #[error("invalid device handle: index {index} out of range 1-{max}")]
    InvalidHandle { index: u32, max: u32 },

    /// Operation on a handle that was already released.
    #[error("invalid device handle: device {0} already detached")]
    Detached(u32),

    /// The driver service is not installed or not running.
    #[error("joystick driver is not enabled")]
    DriverUnavailable,

    /// The loaded library and the installed driver disagree on version.
    #[error("joystick driver and library versions do not match")]
    DriverVersionMismatch,

    /// Acquisition refused because the slot is not free.
    #[error("cannot acquire device {index}: status is {status:?}, not Free")]
    AcquisitionFailed { index: u32, status: VjdStatus },

    /// A native call reported failure with no more specific diagnosis.
    #[error("native call {operation} failed")]
    NativeCallFailed { operation: &'static str },

    /// Report-level validation failure (button/axis/POV range).
    #[error(transparent)]
    Protocol(#[from] VjoyProtocolError),

    /// Validated axis write outside the driver-reported logical range.
    #[error("axis {axis:?} value {value} outside logical range {min}..={max}")]
    InvalidAxisValue {
        axis: HidUsage,
        value: i32,
        min: i32,
        max: i32,
    },

    /// Validated axis write to an axis the device was not configured with.
    #[error("axis {axis:?} is not configured on this device")]
    InvalidAxis { axis: HidUsage },

    /// V3-only operation attempted on an older negotiated layout.
    #[error("{operation} requires driver API {needed:?}, negotiated {actual:?}")]
    UnsupportedApiVersion {
        operation: &'static str,
        needed: ApiVersion,
        actual: ApiVersion,
    },
}

/// Errors raised by the bus-backed backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// Target registration went through but the device never reported
    /// attached to the bus.
    #[error("the virtual device could not connect to the bus")]
    ConnectionFailed,

    /// A second bus connection was explicitly constructed while one
    /// already exists. This is a caller logic bug, not a runtime condition.
    #[error("a bus connection already exists for this context")]
    SingletonViolation,

    /// Callback does not match the fixed feedback signature.
    #[error("callback signature mismatch: expected {expected} parameters, got {actual}")]
    CallbackSignatureMismatch { expected: usize, actual: usize },

    /// Operation on a target that was already detached.
    #[error("virtual gamepad is no longer attached")]
    Detached,

    /// Named native bus failure.
    #[error(transparent)]
    Native(#[from] VigemError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_errors_surface_by_name() {
        let error = BusError::from(VigemError::NoFreeSlot);
        assert_eq!(error.to_string(), "VIGEM_ERROR_NO_FREE_SLOT");
    }

    #[test]
    fn test_acquisition_failure_names_observed_status() {
        let error = VjoyError::AcquisitionFailed {
            index: 2,
            status: VjdStatus::Busy,
        };
        assert!(error.to_string().contains("Busy"));
    }

    #[test]
    fn test_protocol_errors_wrap_transparently() {
        let error = VjoyError::from(VjoyProtocolError::InvalidPovValue(36000));
        assert_eq!(error.to_string(), "POV value 36000 is out of range");
    }
}
