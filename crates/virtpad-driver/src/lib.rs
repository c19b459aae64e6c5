//! Driver API boundary for virtual controller backends.
//!
//! The native entry points of both vendor drivers are modeled as traits so
//! the rest of the workspace never touches a loaded library directly:
//!
//! - [`JoystickDriver`] mirrors the per-index joystick driver surface
//!   (acquire/relinquish, per-control writes, batched report update).
//! - [`BusDriver`] mirrors the USB-bus emulation surface (bus session,
//!   target descriptors, per-target update, feedback notifications).
//!
//! Library discovery (registry lookups, DLL path resolution, symbol
//! binding) happens outside this workspace; an implementation of these
//! traits is what crosses the boundary. The [`mock`] module provides
//! in-memory implementations that count native calls, so tests can assert
//! not only outcomes but also that validation happens *before* any native
//! call is made.

pub mod bus;
pub mod joystick;
pub mod mock;

pub use bus::*;
pub use joystick::*;
