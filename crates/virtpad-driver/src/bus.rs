//! USB-bus emulation driver surface.

use hid_vigem_protocol::{
    DS4_PRODUCT_ID, DS4_VENDOR_ID, VigemError, XUSB_PRODUCT_ID, XUSB_VENDOR_ID,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Opaque handle to a native bus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BusHandle(pub u64);

/// Opaque handle to a native target descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetHandle(pub u64);

/// The controller family a target emulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Xbox360Wired,
    DualShock4Wired,
}

impl TargetKind {
    /// The vendor ID a freshly allocated target of this kind carries.
    pub fn default_vendor_id(self) -> u16 {
        match self {
            TargetKind::Xbox360Wired => XUSB_VENDOR_ID,
            TargetKind::DualShock4Wired => DS4_VENDOR_ID,
        }
    }

    /// The product ID a freshly allocated target of this kind carries.
    pub fn default_product_id(self) -> u16 {
        match self {
            TargetKind::Xbox360Wired => XUSB_PRODUCT_ID,
            TargetKind::DualShock4Wired => DS4_PRODUCT_ID,
        }
    }
}

/// One hardware-originated feedback delivery: force-feedback motor levels
/// and the LED slot index. The native callback's trailing user-data pointer
/// is not surfaced here; adapter state travels inside the registered
/// closure instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackEvent {
    pub bus: BusHandle,
    pub target: TargetHandle,
    pub large_motor: u8,
    pub small_motor: u8,
    pub led_number: u8,
}

/// The adapted callback the bus layer invokes. Deliveries arrive on a
/// thread the bus controls, so the thunk must be callable from anywhere.
pub type FeedbackThunk = dyn Fn(FeedbackEvent) + Send + Sync;

/// Declared shape of a notification callback.
///
/// The native contract passes six arguments (bus, target, large motor,
/// small motor, LED index, user data). Callbacks adapted from foreign or
/// embedding descriptors carry their declared parameter count; registration
/// refuses anything that does not match [`FEEDBACK_SIGNATURE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackSignature {
    pub param_count: usize,
}

/// The one signature the bus layer ever invokes.
pub const FEEDBACK_SIGNATURE: CallbackSignature = CallbackSignature { param_count: 6 };

/// Native bus emulation entry points.
///
/// Fallible calls answer with the enumerated native status code, surfaced
/// as a named [`VigemError`]. `register_notification` keeps only a
/// non-owning reference to the thunk; the caller must hold the `Arc` alive
/// for as long as the registration stands.
pub trait BusDriver: Send + Sync {
    fn bus_alloc(&self) -> Result<BusHandle, VigemError>;

    fn bus_connect(&self, bus: BusHandle) -> Result<(), VigemError>;

    fn bus_disconnect(&self, bus: BusHandle);

    fn bus_free(&self, bus: BusHandle);

    fn target_alloc(&self, kind: TargetKind) -> Result<TargetHandle, VigemError>;

    fn target_add(&self, bus: BusHandle, target: TargetHandle) -> Result<(), VigemError>;

    fn target_remove(&self, bus: BusHandle, target: TargetHandle) -> Result<(), VigemError>;

    fn target_free(&self, target: TargetHandle);

    fn target_is_attached(&self, target: TargetHandle) -> bool;

    fn target_vid(&self, target: TargetHandle) -> u16;

    fn target_pid(&self, target: TargetHandle) -> u16;

    fn target_set_vid(&self, target: TargetHandle, vid: u16);

    fn target_set_pid(&self, target: TargetHandle, pid: u16);

    /// The bus-assigned slot index of an attached target.
    fn target_index(&self, target: TargetHandle) -> u32;

    fn target_kind(&self, target: TargetHandle) -> Option<TargetKind>;

    fn target_update(
        &self,
        bus: BusHandle,
        target: TargetHandle,
        report: &[u8],
    ) -> Result<(), VigemError>;

    fn register_notification(
        &self,
        bus: BusHandle,
        target: TargetHandle,
        callback: &Arc<FeedbackThunk>,
    ) -> Result<(), VigemError>;

    fn unregister_notification(&self, target: TargetHandle);
}
