//! Report layouts and bus error codes for ViGEmBus virtual gamepads.
//!
//! The bus driver emulates two controller families. Each has one input
//! report shape, pushed whole through the per-target update entry point:
//!
//! | Target | Report | Size |
//! |--------|--------|------|
//! | Xbox360 wired | [`XusbReport`] | 12 bytes |
//! | DualShock 4 wired | [`Ds4Report`] | 10 bytes (one trailing pad byte) |
//!
//! Bus entry points answer with an enumerated status code; anything other
//! than the success value is surfaced as a named [`VigemError`].
//!
//! This crate is I/O-free: it owns field packing and constants only.

pub mod ds4;
pub mod errors;
pub mod xusb;

pub use ds4::*;
pub use errors::*;
pub use xusb::*;
