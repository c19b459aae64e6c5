//! Device lifecycle states.

use serde::{Deserialize, Serialize};

/// Where a device handle is in its life.
///
/// `Detached` is terminal: a handle is released/removed exactly once, and
/// every later teardown request is a guarded no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    Unattached,
    Attaching,
    Attached,
    Detached,
}

impl LifecycleState {
    pub fn is_attached(self) -> bool {
        self == LifecycleState::Attached
    }

    /// Whether teardown still has native resources to give back.
    pub fn needs_teardown(self) -> bool {
        matches!(self, LifecycleState::Attaching | LifecycleState::Attached)
    }
}
