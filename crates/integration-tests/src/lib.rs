//! End-to-end test fixtures for VirtPad.
//!
//! The scenarios in `tests/` drive the full stack (facades, lifecycle,
//! calibration, notification bridge) against the in-memory mock drivers.

use std::sync::{Arc, Once};
use virtpad_device::BusContext;
use virtpad_driver::mock::{MockBusDriver, MockJoystickDriver};
use virtpad_driver::{BusDriver, JoystickDriver};

/// Install a test tracing subscriber once per process.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// A fresh joystick mock, both as its concrete type (for configuration and
/// assertions) and as the trait object devices consume.
pub fn joystick_driver() -> (Arc<MockJoystickDriver>, Arc<dyn JoystickDriver>) {
    let mock = Arc::new(MockJoystickDriver::new());
    let driver = Arc::clone(&mock) as Arc<dyn JoystickDriver>;
    (mock, driver)
}

/// A fresh bus mock plus a context owning its (not yet established)
/// connection.
pub fn bus_fixture() -> (Arc<MockBusDriver>, BusContext) {
    let mock = Arc::new(MockBusDriver::new());
    let context = BusContext::new(Arc::clone(&mock) as Arc<dyn BusDriver>);
    (mock, context)
}
