//! Feedback notification bridge.
//!
//! The bus layer can call back into the host with force-feedback motor
//! levels and LED state. The native side holds only a non-owning function
//! pointer, so the host must keep the adapted callback alive for the whole
//! registration window, including the brief interval during detach. The
//! [`NotificationSlot`] owns that pin: the adapter `Arc` is stored after a
//! successful native registration and dropped only after the native
//! unregistration returns.

use crate::BusError;
use std::sync::Arc;
use virtpad_driver::{
    BusDriver, BusHandle, CallbackSignature, FEEDBACK_SIGNATURE, FeedbackEvent, FeedbackThunk,
    TargetHandle,
};

/// A host callback prepared for registration.
///
/// Callbacks built with [`FeedbackCallback::new`] always carry the correct
/// signature. Adapters generated from embedding or foreign-ABI descriptors
/// declare their own parameter count through
/// [`FeedbackCallback::from_raw_parts`] and are checked at registration.
#[derive(Clone)]
pub struct FeedbackCallback {
    signature: CallbackSignature,
    thunk: Arc<FeedbackThunk>,
}

impl FeedbackCallback {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(FeedbackEvent) + Send + Sync + 'static,
    {
        Self {
            signature: FEEDBACK_SIGNATURE,
            thunk: Arc::new(handler),
        }
    }

    /// Wrap an already-adapted thunk whose declared signature came from an
    /// external descriptor.
    pub fn from_raw_parts(signature: CallbackSignature, thunk: Arc<FeedbackThunk>) -> Self {
        Self { signature, thunk }
    }

    pub fn signature(&self) -> CallbackSignature {
        self.signature
    }
}

impl std::fmt::Debug for FeedbackCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackCallback")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Per-device registration slot pinning the live adapter.
#[derive(Default)]
pub struct NotificationSlot {
    adapter: Option<Arc<FeedbackThunk>>,
}

impl NotificationSlot {
    /// Validate and register `callback` with the bus.
    ///
    /// The signature check runs before any native call; a mismatch leaves
    /// the bus untouched. On success the adapter is pinned in this slot so
    /// the native layer's non-owning pointer stays valid.
    pub fn register(
        &mut self,
        driver: &dyn BusDriver,
        bus: BusHandle,
        target: TargetHandle,
        callback: FeedbackCallback,
    ) -> Result<(), BusError> {
        if callback.signature != FEEDBACK_SIGNATURE {
            return Err(BusError::CallbackSignatureMismatch {
                expected: FEEDBACK_SIGNATURE.param_count,
                actual: callback.signature.param_count,
            });
        }
        driver.register_notification(bus, target, &callback.thunk)?;
        self.adapter = Some(callback.thunk);
        Ok(())
    }

    /// Unregister from the bus, then release the adapter. Idempotent and
    /// safe on a slot that never registered.
    pub fn unregister(&mut self, driver: &dyn BusDriver, target: TargetHandle) {
        if self.adapter.is_none() {
            return;
        }
        driver.unregister_notification(target);
        // Only now is it safe to let the adapter go.
        self.adapter = None;
    }

    pub fn is_registered(&self) -> bool {
        self.adapter.is_some()
    }
}
