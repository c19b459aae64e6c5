//! Virtual controller device facades.
//!
//! This crate ties the report models, the driver boundary, and axis
//! calibration together into the objects applications actually hold:
//!
//! - [`VjoyDevice`]: one acquired slot of the generic joystick driver,
//!   with per-control writes, batched report updates, and V3 read-back.
//! - [`Xbox360Device`] / [`Ds4Device`]: targets registered on the shared
//!   USB-bus emulation session, with force-feedback/LED notifications
//!   delivered through the [`notification`] bridge.
//! - [`BusContext`]: owner of the process's single bus session, injected
//!   into every bus-backed device constructor.
//!
//! Lifecycles are explicit: devices are acquired/attached on construction,
//! released/detached by one explicit call, and guarded against double
//! teardown; drop runs the same teardown path with failures logged rather
//! than raised.

pub mod bus;
pub mod ds4;
pub mod error;
pub mod gamepad;
pub mod lifecycle;
pub mod notification;
pub mod target;
pub mod vjoy;
pub mod x360;

pub use bus::{BusConnection, BusContext};
pub use ds4::Ds4Device;
pub use error::{BusError, VjoyError};
pub use gamepad::VirtualGamepad;
pub use lifecycle::LifecycleState;
pub use notification::{FeedbackCallback, NotificationSlot};
pub use target::TargetLifecycle;
pub use vjoy::VjoyDevice;
pub use x360::Xbox360Device;
