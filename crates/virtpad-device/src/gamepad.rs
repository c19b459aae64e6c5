//! Uniform surface over the bus-backed gamepad kinds.

use crate::BusError;
use crate::notification::FeedbackCallback;
use virtpad_driver::TargetKind;

/// The operations every bus-backed virtual gamepad supports, independent of
/// its report shape. Lets embedders hold a mixed collection of controllers
/// behind one interface.
pub trait VirtualGamepad {
    fn kind(&self) -> TargetKind;

    fn vendor_id(&self) -> u16;

    fn product_id(&self) -> u16;

    /// The bus-assigned slot index.
    fn slot_index(&self) -> u32;

    /// Push the current report to the emulated hardware.
    fn update(&mut self) -> Result<(), BusError>;

    /// Reset the in-memory report to the neutral state.
    fn reset(&mut self);

    fn register_notification(&mut self, callback: FeedbackCallback) -> Result<(), BusError>;

    fn unregister_notification(&mut self);

    fn detach(&mut self) -> Result<(), BusError>;
}
