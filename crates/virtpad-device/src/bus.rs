//! Process-wide bus session ownership.
//!
//! The native bus layer supports exactly one session per process, shared by
//! every bus-backed device. Instead of a mutable global, a [`BusContext`]
//! value owns the sole [`BusConnection`] and is handed to every device
//! constructor; the lazy connect path is serialized so concurrent first
//! callers cannot double-connect.

use crate::BusError;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};
use virtpad_driver::{BusDriver, BusHandle};

/// A live native bus session.
///
/// Dropping the last `Arc` of a connection disconnects and frees the
/// session, in that order.
pub struct BusConnection {
    driver: Arc<dyn BusDriver>,
    handle: BusHandle,
}

impl BusConnection {
    fn establish(driver: Arc<dyn BusDriver>) -> Result<Self, BusError> {
        let handle = driver.bus_alloc()?;
        if let Err(error) = driver.bus_connect(handle) {
            driver.bus_free(handle);
            return Err(error.into());
        }
        info!(?handle, "bus session connected");
        Ok(Self { driver, handle })
    }

    pub fn handle(&self) -> BusHandle {
        self.handle
    }
}

impl Drop for BusConnection {
    fn drop(&mut self) {
        debug!(handle = ?self.handle, "bus session closing");
        self.driver.bus_disconnect(self.handle);
        self.driver.bus_free(self.handle);
    }
}

impl std::fmt::Debug for BusConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusConnection")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// Owner of the process's single bus connection.
///
/// Every bus-backed device is constructed with a reference to one context;
/// the context connects lazily on first use and keeps handing out the same
/// connection afterwards. A context dropped without ever connecting tears
/// nothing down.
pub struct BusContext {
    driver: Arc<dyn BusDriver>,
    connection: Mutex<Option<Arc<BusConnection>>>,
}

impl BusContext {
    pub fn new(driver: Arc<dyn BusDriver>) -> Self {
        Self {
            driver,
            connection: Mutex::new(None),
        }
    }

    pub fn driver(&self) -> Arc<dyn BusDriver> {
        Arc::clone(&self.driver)
    }

    /// The shared connection, established on first call.
    ///
    /// The check-then-connect sequence holds the slot lock for its whole
    /// duration, so exactly one caller ever performs the native connect.
    pub fn connection(&self) -> Result<Arc<BusConnection>, BusError> {
        let mut slot = self.connection.lock();
        if let Some(connection) = slot.as_ref() {
            return Ok(Arc::clone(connection));
        }
        let connection = Arc::new(BusConnection::establish(Arc::clone(&self.driver))?);
        *slot = Some(Arc::clone(&connection));
        Ok(connection)
    }

    /// Explicitly construct the connection.
    ///
    /// # Errors
    ///
    /// Fails with [`BusError::SingletonViolation`] if a connection already
    /// exists in this context; wanting a second live session is a logic
    /// bug, not a recoverable condition.
    pub fn connect(&self) -> Result<Arc<BusConnection>, BusError> {
        let mut slot = self.connection.lock();
        if slot.is_some() {
            warn!("second bus connection construction attempted");
            return Err(BusError::SingletonViolation);
        }
        let connection = Arc::new(BusConnection::establish(Arc::clone(&self.driver))?);
        *slot = Some(Arc::clone(&connection));
        Ok(connection)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.lock().is_some()
    }
}
