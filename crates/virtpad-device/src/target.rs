//! Shared attach/detach machinery for bus-backed targets.

use crate::notification::{FeedbackCallback, NotificationSlot};
use crate::{BusConnection, BusContext, BusError, LifecycleState};
use std::sync::Arc;
use tracing::{info, warn};
use virtpad_driver::{BusDriver, TargetHandle, TargetKind};

/// One target descriptor's life on the shared bus.
///
/// Attach order: allocate the descriptor, register it on the connection,
/// verify the bus reports it attached, cache its identifiers. Detach order:
/// drop any notification registration, remove the target from the bus, then
/// free the descriptor. Remove-before-free is required by the native
/// contract. Teardown steps keep running past individual failures.
pub struct TargetLifecycle {
    driver: Arc<dyn BusDriver>,
    connection: Arc<BusConnection>,
    target: TargetHandle,
    kind: TargetKind,
    vid: u16,
    pid: u16,
    state: LifecycleState,
    notification: NotificationSlot,
}

impl TargetLifecycle {
    /// Allocate and register a target of `kind` on the context's shared
    /// connection.
    ///
    /// # Errors
    ///
    /// Allocation and registration failures surface as the named native
    /// error. A target that registers but never reports attached surfaces
    /// as [`BusError::ConnectionFailed`], and the half-registered
    /// descriptor is unwound (removed, then freed) before returning.
    pub fn attach(context: &BusContext, kind: TargetKind) -> Result<Self, BusError> {
        let connection = context.connection()?;
        let driver = context.driver();

        let target = driver.target_alloc(kind)?;
        if let Err(error) = driver.target_add(connection.handle(), target) {
            driver.target_free(target);
            return Err(error.into());
        }
        if !driver.target_is_attached(target) {
            if let Err(error) = driver.target_remove(connection.handle(), target) {
                warn!(?target, %error, "unwind of unattached target failed to remove");
            }
            driver.target_free(target);
            return Err(BusError::ConnectionFailed);
        }

        let vid = driver.target_vid(target);
        let pid = driver.target_pid(target);
        info!(?kind, ?target, vid, pid, "virtual gamepad attached");
        Ok(Self {
            driver,
            connection,
            target,
            kind,
            vid,
            pid,
            state: LifecycleState::Attached,
            notification: NotificationSlot::default(),
        })
    }

    fn ensure_attached(&self) -> Result<(), BusError> {
        if self.state.is_attached() {
            Ok(())
        } else {
            Err(BusError::Detached)
        }
    }

    /// Push a serialized report to the target.
    pub fn update(&self, report: &[u8]) -> Result<(), BusError> {
        self.ensure_attached()?;
        self.driver
            .target_update(self.connection.handle(), self.target, report)
            .map_err(Into::into)
    }

    pub fn register_notification(&mut self, callback: FeedbackCallback) -> Result<(), BusError> {
        self.ensure_attached()?;
        self.notification.register(
            &*self.driver,
            self.connection.handle(),
            self.target,
            callback,
        )
    }

    pub fn unregister_notification(&mut self) {
        self.notification.unregister(&*self.driver, self.target);
    }

    pub fn has_notification(&self) -> bool {
        self.notification.is_registered()
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn vendor_id(&self) -> u16 {
        self.vid
    }

    pub fn product_id(&self) -> u16 {
        self.pid
    }

    /// Override the target's vendor ID.
    pub fn set_vendor_id(&mut self, vid: u16) -> Result<(), BusError> {
        self.ensure_attached()?;
        self.driver.target_set_vid(self.target, vid);
        self.vid = vid;
        Ok(())
    }

    /// Override the target's product ID.
    pub fn set_product_id(&mut self, pid: u16) -> Result<(), BusError> {
        self.ensure_attached()?;
        self.driver.target_set_pid(self.target, pid);
        self.pid = pid;
        Ok(())
    }

    /// The bus-assigned slot index.
    pub fn slot_index(&self) -> u32 {
        self.driver.target_index(self.target)
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Remove the target from the bus and free its descriptor.
    ///
    /// Idempotent: the second and later calls do nothing. All teardown
    /// steps run even when earlier ones fail; the first failure is
    /// returned after the descriptor is freed.
    pub fn detach(&mut self) -> Result<(), BusError> {
        if !self.state.needs_teardown() {
            return Ok(());
        }
        self.state = LifecycleState::Detached;

        // The adapter must stay alive until the native side forgets it.
        self.notification.unregister(&*self.driver, self.target);

        let mut first_failure = None;
        if let Err(error) = self
            .driver
            .target_remove(self.connection.handle(), self.target)
        {
            warn!(target = ?self.target, %error, "target removal failed during detach");
            first_failure = Some(error);
        }
        self.driver.target_free(self.target);
        info!(target = ?self.target, "virtual gamepad detached");

        match first_failure {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

impl Drop for TargetLifecycle {
    fn drop(&mut self) {
        if let Err(error) = self.detach() {
            warn!(%error, "gamepad teardown reported failure during drop");
        }
    }
}

impl std::fmt::Debug for TargetLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetLifecycle")
            .field("target", &self.target)
            .field("kind", &self.kind)
            .field("vid", &self.vid)
            .field("pid", &self.pid)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hid_vigem_protocol::VigemError;
    use virtpad_driver::mock::{BusOp, MockBusDriver};

    fn context(driver: &Arc<MockBusDriver>) -> BusContext {
        BusContext::new(Arc::clone(driver) as Arc<dyn BusDriver>)
    }

    #[test]
    fn test_attach_caches_kind_ids() {
        let driver = Arc::new(MockBusDriver::new());
        let ctx = context(&driver);
        let target = TargetLifecycle::attach(&ctx, TargetKind::DualShock4Wired).expect("attach");
        assert_eq!(target.kind(), TargetKind::DualShock4Wired);
        assert_eq!(target.vendor_id(), 0x054C);
        assert_eq!(target.product_id(), 0x05C4);
        assert_eq!(target.state(), LifecycleState::Attached);
    }

    #[test]
    fn test_alloc_failure_is_distinct_from_connection_failure() {
        let driver = Arc::new(MockBusDriver::new());
        driver.set_alloc_failure(Some(VigemError::NoFreeSlot));
        let ctx = context(&driver);
        let error = TargetLifecycle::attach(&ctx, TargetKind::Xbox360Wired).unwrap_err();
        assert_eq!(error, BusError::Native(VigemError::NoFreeSlot));
    }

    #[test]
    fn test_unverified_attach_is_a_connection_failure_and_unwinds() {
        let driver = Arc::new(MockBusDriver::new());
        driver.set_attach_verification(false);
        let ctx = context(&driver);
        let error = TargetLifecycle::attach(&ctx, TargetKind::Xbox360Wired).unwrap_err();
        assert_eq!(error, BusError::ConnectionFailed);

        // The half-registered descriptor was removed and freed.
        let ops = driver.ops();
        assert!(ops.iter().any(|op| matches!(op, BusOp::TargetRemove(_))));
        assert!(ops.iter().any(|op| matches!(op, BusOp::TargetFree(_))));
    }

    #[test]
    fn test_detach_removes_then_frees() {
        let driver = Arc::new(MockBusDriver::new());
        let ctx = context(&driver);
        let mut target = TargetLifecycle::attach(&ctx, TargetKind::Xbox360Wired).expect("attach");
        target.detach().expect("detach");

        let ops = driver.ops();
        let remove = ops
            .iter()
            .position(|op| matches!(op, BusOp::TargetRemove(_)))
            .expect("remove ran");
        let free = ops
            .iter()
            .position(|op| matches!(op, BusOp::TargetFree(_)))
            .expect("free ran");
        assert!(remove < free);
    }

    #[test]
    fn test_double_detach_is_a_guarded_noop() {
        let driver = Arc::new(MockBusDriver::new());
        let ctx = context(&driver);
        let mut target = TargetLifecycle::attach(&ctx, TargetKind::Xbox360Wired).expect("attach");
        target.detach().expect("first detach");
        let ops_after_first = driver.ops().len();

        target.detach().expect("second detach is a no-op");
        assert_eq!(driver.ops().len(), ops_after_first);
    }

    #[test]
    fn test_removal_failure_still_frees_descriptor() {
        let driver = Arc::new(MockBusDriver::new());
        let ctx = context(&driver);
        let mut target = TargetLifecycle::attach(&ctx, TargetKind::Xbox360Wired).expect("attach");

        driver.set_remove_failure(Some(VigemError::RemovalFailed));
        let error = target.detach().unwrap_err();
        assert_eq!(error, BusError::Native(VigemError::RemovalFailed));
        assert!(
            driver
                .ops()
                .iter()
                .any(|op| matches!(op, BusOp::TargetFree(_)))
        );
        assert_eq!(target.state(), LifecycleState::Detached);
    }

    #[test]
    fn test_drop_detaches_and_keeps_adapter_alive_throughout() {
        let driver = Arc::new(MockBusDriver::new());
        let ctx = context(&driver);
        {
            let mut target =
                TargetLifecycle::attach(&ctx, TargetKind::Xbox360Wired).expect("attach");
            target
                .register_notification(FeedbackCallback::new(|_| {}))
                .expect("register");
        }
        // Dropped while registered: the native side must have been told to
        // unregister before the adapter went away, so nothing dangled.
        assert_eq!(driver.dangling_invocation_count(), 0);
        assert!(
            driver
                .ops()
                .iter()
                .any(|op| matches!(op, BusOp::UnregisterNotification(_)))
        );
    }

    #[test]
    fn test_update_after_detach_is_rejected() {
        let driver = Arc::new(MockBusDriver::new());
        let ctx = context(&driver);
        let mut target = TargetLifecycle::attach(&ctx, TargetKind::Xbox360Wired).expect("attach");
        target.detach().expect("detach");
        assert_eq!(target.update(&[0u8; 12]), Err(BusError::Detached));
    }
}
