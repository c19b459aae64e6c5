//! In-memory driver implementations for tests and hardware-free embedding.
//!
//! Both mocks keep their whole state behind a mutex so a single instance
//! can be shared (`Arc`) between a device under test and the test body.
//!
//! [`MockJoystickDriver`] counts calls in two buckets: *query* calls
//! (capability and status reads) and *control* calls (anything that would
//! mutate emulated hardware). Validation-ordering tests assert that a
//! rejected operation performed zero control calls.
//!
//! [`MockBusDriver`] keeps an ordered operation log so lifecycle tests can
//! assert sequencing (remove before free), and holds registered callbacks
//! as weak references the way the native layer holds raw pointers: firing
//! feedback at a dropped adapter is recorded as a dangling invocation
//! instead of undefined behavior.

use crate::{BusDriver, BusHandle, FeedbackEvent, FeedbackThunk, JoystickDriver, TargetHandle};
use crate::{TargetKind, VjdStatus};
use hid_vigem_protocol::VigemError;
use hid_vjoy_protocol::{ApiVersion, HidUsage};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Weak};

/// Configured logical range for one mock axis.
#[derive(Debug, Clone, Copy)]
pub struct MockAxis {
    pub min: i32,
    pub max: i32,
    /// When false, existence queries succeed but range queries answer
    /// nothing, exercising the skip-on-failure discovery policy.
    pub range_queryable: bool,
}

/// One recorded per-control write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlWrite {
    Button { index: u32, button: u8, pressed: bool },
    Axis { index: u32, axis: HidUsage, value: i32 },
    DiscretePov { index: u32, pov: u8, value: i32 },
    ContinuousPov { index: u32, pov: u8, value: i32 },
    Reset { index: u32 },
    ResetButtons { index: u32 },
    ResetPovs { index: u32 },
    ResetAll,
}

#[derive(Debug)]
struct JoystickMockState {
    enabled: bool,
    version_match: bool,
    api_version: ApiVersion,
    max_devices: u32,
    existing_devices: u32,
    button_count: u32,
    discrete_povs: u32,
    continuous_povs: u32,
    axes: BTreeMap<HidUsage, MockAxis>,
    statuses: HashMap<u32, VjdStatus>,
    failing_ops: HashSet<&'static str>,
    query_calls: usize,
    control_calls: usize,
    control_writes: Vec<ControlWrite>,
    pushed_reports: Vec<(u32, Vec<u8>)>,
    last_report: HashMap<u32, Vec<u8>>,
}

/// Mock of the per-index joystick driver.
///
/// Fresh instances come up enabled, version-matched, negotiated at V3, with
/// 16 device slots and the six classic axes configured over the driver's
/// default logical range (0-32767).
pub struct MockJoystickDriver {
    state: Mutex<JoystickMockState>,
}

impl MockJoystickDriver {
    pub fn new() -> Self {
        let mut axes = BTreeMap::new();
        for axis in HidUsage::NEUTRAL_SEED_AXES {
            axes.insert(
                axis,
                MockAxis {
                    min: 0,
                    max: 32767,
                    range_queryable: true,
                },
            );
        }
        Self {
            state: Mutex::new(JoystickMockState {
                enabled: true,
                version_match: true,
                api_version: ApiVersion::V3,
                max_devices: 16,
                existing_devices: 4,
                button_count: 32,
                discrete_povs: 1,
                continuous_povs: 0,
                axes,
                statuses: HashMap::new(),
                failing_ops: HashSet::new(),
                query_calls: 0,
                control_calls: 0,
                control_writes: Vec::new(),
                pushed_reports: Vec::new(),
                last_report: HashMap::new(),
            }),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
    }

    pub fn set_version_match(&self, matches: bool) {
        self.state.lock().version_match = matches;
    }

    pub fn set_api_version(&self, version: ApiVersion) {
        self.state.lock().api_version = version;
    }

    pub fn set_max_devices(&self, count: u32) {
        self.state.lock().max_devices = count;
    }

    pub fn set_existing_devices(&self, count: u32) {
        self.state.lock().existing_devices = count;
    }

    pub fn set_button_count(&self, count: u32) {
        self.state.lock().button_count = count;
    }

    pub fn set_pov_counts(&self, discrete: u32, continuous: u32) {
        let mut state = self.state.lock();
        state.discrete_povs = discrete;
        state.continuous_povs = continuous;
    }

    pub fn insert_axis(&self, axis: HidUsage, min: i32, max: i32) {
        self.state.lock().axes.insert(
            axis,
            MockAxis {
                min,
                max,
                range_queryable: true,
            },
        );
    }

    /// Configure an axis that exists but refuses range queries.
    pub fn insert_unqueryable_axis(&self, axis: HidUsage) {
        self.state.lock().axes.insert(
            axis,
            MockAxis {
                min: 0,
                max: 0,
                range_queryable: false,
            },
        );
    }

    pub fn clear_axes(&self) {
        self.state.lock().axes.clear();
    }

    pub fn set_status(&self, index: u32, status: VjdStatus) {
        self.state.lock().statuses.insert(index, status);
    }

    /// Make the named trait operation report failure.
    pub fn fail_operation(&self, operation: &'static str) {
        self.state.lock().failing_ops.insert(operation);
    }

    /// Status without going through (and counting) the trait call.
    pub fn peek_status(&self, index: u32) -> VjdStatus {
        let state = self.state.lock();
        state.statuses.get(&index).copied().unwrap_or(VjdStatus::Free)
    }

    /// Capability/status reads performed so far.
    pub fn query_call_count(&self) -> usize {
        self.state.lock().query_calls
    }

    /// Hardware-mutating calls performed so far.
    pub fn control_call_count(&self) -> usize {
        self.state.lock().control_calls
    }

    pub fn control_writes(&self) -> Vec<ControlWrite> {
        self.state.lock().control_writes.clone()
    }

    pub fn pushed_reports(&self) -> Vec<(u32, Vec<u8>)> {
        self.state.lock().pushed_reports.clone()
    }
}

impl Default for MockJoystickDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl JoystickDriver for MockJoystickDriver {
    fn is_enabled(&self) -> bool {
        let mut state = self.state.lock();
        state.query_calls += 1;
        state.enabled
    }

    fn driver_version_matches(&self) -> bool {
        let mut state = self.state.lock();
        state.query_calls += 1;
        state.version_match
    }

    fn api_version(&self) -> ApiVersion {
        let mut state = self.state.lock();
        state.query_calls += 1;
        state.api_version
    }

    fn max_device_count(&self) -> u32 {
        let mut state = self.state.lock();
        state.query_calls += 1;
        state.max_devices
    }

    fn existing_device_count(&self) -> u32 {
        let mut state = self.state.lock();
        state.query_calls += 1;
        state.existing_devices
    }

    fn acquire(&self, index: u32) -> bool {
        let mut state = self.state.lock();
        state.control_calls += 1;
        if state.failing_ops.contains("acquire") {
            return false;
        }
        match state.statuses.get(&index).copied().unwrap_or(VjdStatus::Free) {
            VjdStatus::Free => {
                state.statuses.insert(index, VjdStatus::Own);
                true
            }
            _ => false,
        }
    }

    fn release(&self, index: u32) -> bool {
        let mut state = self.state.lock();
        state.control_calls += 1;
        if state.failing_ops.contains("release") {
            return false;
        }
        match state.statuses.get(&index).copied().unwrap_or(VjdStatus::Free) {
            VjdStatus::Own => {
                state.statuses.insert(index, VjdStatus::Free);
                true
            }
            _ => false,
        }
    }

    fn status(&self, index: u32) -> VjdStatus {
        let mut state = self.state.lock();
        state.query_calls += 1;
        state.statuses.get(&index).copied().unwrap_or(VjdStatus::Free)
    }

    fn reset(&self, index: u32) -> bool {
        let mut state = self.state.lock();
        state.control_calls += 1;
        if state.failing_ops.contains("reset") {
            return false;
        }
        state.control_writes.push(ControlWrite::Reset { index });
        true
    }

    fn reset_buttons(&self, index: u32) -> bool {
        let mut state = self.state.lock();
        state.control_calls += 1;
        if state.failing_ops.contains("reset_buttons") {
            return false;
        }
        state.control_writes.push(ControlWrite::ResetButtons { index });
        true
    }

    fn reset_povs(&self, index: u32) -> bool {
        let mut state = self.state.lock();
        state.control_calls += 1;
        if state.failing_ops.contains("reset_povs") {
            return false;
        }
        state.control_writes.push(ControlWrite::ResetPovs { index });
        true
    }

    fn reset_all(&self) -> bool {
        let mut state = self.state.lock();
        state.control_calls += 1;
        if state.failing_ops.contains("reset_all") {
            return false;
        }
        state.control_writes.push(ControlWrite::ResetAll);
        true
    }

    fn button_count(&self, _index: u32) -> u32 {
        let mut state = self.state.lock();
        state.query_calls += 1;
        state.button_count
    }

    fn discrete_pov_count(&self, _index: u32) -> u32 {
        let mut state = self.state.lock();
        state.query_calls += 1;
        state.discrete_povs
    }

    fn continuous_pov_count(&self, _index: u32) -> u32 {
        let mut state = self.state.lock();
        state.query_calls += 1;
        state.continuous_povs
    }

    fn axis_exists(&self, _index: u32, axis: HidUsage) -> bool {
        let mut state = self.state.lock();
        state.query_calls += 1;
        state.axes.contains_key(&axis)
    }

    fn axis_min(&self, _index: u32, axis: HidUsage) -> Option<i32> {
        let mut state = self.state.lock();
        state.query_calls += 1;
        state
            .axes
            .get(&axis)
            .filter(|a| a.range_queryable)
            .map(|a| a.min)
    }

    fn axis_max(&self, _index: u32, axis: HidUsage) -> Option<i32> {
        let mut state = self.state.lock();
        state.query_calls += 1;
        state
            .axes
            .get(&axis)
            .filter(|a| a.range_queryable)
            .map(|a| a.max)
    }

    fn set_button(&self, index: u32, button: u8, pressed: bool) -> bool {
        let mut state = self.state.lock();
        state.control_calls += 1;
        if state.failing_ops.contains("set_button") {
            return false;
        }
        state.control_writes.push(ControlWrite::Button {
            index,
            button,
            pressed,
        });
        true
    }

    fn set_axis(&self, index: u32, axis: HidUsage, value: i32) -> bool {
        let mut state = self.state.lock();
        state.control_calls += 1;
        if state.failing_ops.contains("set_axis") {
            return false;
        }
        state.control_writes.push(ControlWrite::Axis { index, axis, value });
        true
    }

    fn set_discrete_pov(&self, index: u32, pov: u8, value: i32) -> bool {
        let mut state = self.state.lock();
        state.control_calls += 1;
        if state.failing_ops.contains("set_discrete_pov") {
            return false;
        }
        state
            .control_writes
            .push(ControlWrite::DiscretePov { index, pov, value });
        true
    }

    fn set_continuous_pov(&self, index: u32, pov: u8, value: i32) -> bool {
        let mut state = self.state.lock();
        state.control_calls += 1;
        if state.failing_ops.contains("set_continuous_pov") {
            return false;
        }
        state
            .control_writes
            .push(ControlWrite::ContinuousPov { index, pov, value });
        true
    }

    fn push_report(&self, index: u32, report: &[u8]) -> bool {
        let mut state = self.state.lock();
        state.control_calls += 1;
        if state.failing_ops.contains("push_report") {
            return false;
        }
        state.pushed_reports.push((index, report.to_vec()));
        state.last_report.insert(index, report.to_vec());
        true
    }

    fn read_position(&self, index: u32, buf: &mut Vec<u8>) -> bool {
        let mut state = self.state.lock();
        state.query_calls += 1;
        if state.api_version != ApiVersion::V3 || state.failing_ops.contains("read_position") {
            return false;
        }
        match state.last_report.get(&index) {
            Some(report) => {
                buf.clear();
                buf.extend_from_slice(report);
                true
            }
            None => false,
        }
    }
}

/// One entry in the bus mock's ordered operation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusOp {
    BusAlloc(BusHandle),
    BusConnect(BusHandle),
    BusDisconnect(BusHandle),
    BusFree(BusHandle),
    TargetAlloc(TargetHandle),
    TargetAdd(TargetHandle),
    TargetRemove(TargetHandle),
    TargetFree(TargetHandle),
    TargetUpdate(TargetHandle),
    RegisterNotification(TargetHandle),
    UnregisterNotification(TargetHandle),
}

#[derive(Debug, Clone)]
struct MockTarget {
    kind: TargetKind,
    vid: u16,
    pid: u16,
    index: u32,
    bus: Option<BusHandle>,
    attached: bool,
    freed: bool,
}

struct BusMockState {
    next_handle: u64,
    connected: HashSet<BusHandle>,
    freed_buses: HashSet<BusHandle>,
    targets: HashMap<TargetHandle, MockTarget>,
    added_count: u32,
    connect_failure: Option<VigemError>,
    alloc_failure: Option<VigemError>,
    add_failure: Option<VigemError>,
    remove_failure: Option<VigemError>,
    update_failure: Option<VigemError>,
    attach_verification: bool,
    callbacks: HashMap<TargetHandle, (BusHandle, Weak<FeedbackThunk>)>,
    updates: Vec<(TargetHandle, Vec<u8>)>,
    dangling_invocations: usize,
    ops: Vec<BusOp>,
}

/// Mock of the USB-bus emulation driver.
pub struct MockBusDriver {
    state: Mutex<BusMockState>,
}

impl MockBusDriver {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BusMockState {
                next_handle: 1,
                connected: HashSet::new(),
                freed_buses: HashSet::new(),
                targets: HashMap::new(),
                added_count: 0,
                connect_failure: None,
                alloc_failure: None,
                add_failure: None,
                remove_failure: None,
                update_failure: None,
                attach_verification: true,
                callbacks: HashMap::new(),
                updates: Vec::new(),
                dangling_invocations: 0,
                ops: Vec::new(),
            }),
        }
    }

    pub fn set_connect_failure(&self, error: Option<VigemError>) {
        self.state.lock().connect_failure = error;
    }

    pub fn set_alloc_failure(&self, error: Option<VigemError>) {
        self.state.lock().alloc_failure = error;
    }

    pub fn set_add_failure(&self, error: Option<VigemError>) {
        self.state.lock().add_failure = error;
    }

    pub fn set_remove_failure(&self, error: Option<VigemError>) {
        self.state.lock().remove_failure = error;
    }

    pub fn set_update_failure(&self, error: Option<VigemError>) {
        self.state.lock().update_failure = error;
    }

    /// When disabled, `target_add` succeeds but the target never reports
    /// attached, exercising the attach-verification failure path.
    pub fn set_attach_verification(&self, verified: bool) {
        self.state.lock().attach_verification = verified;
    }

    pub fn ops(&self) -> Vec<BusOp> {
        self.state.lock().ops.clone()
    }

    pub fn updates(&self) -> Vec<(TargetHandle, Vec<u8>)> {
        self.state.lock().updates.clone()
    }

    pub fn dangling_invocation_count(&self) -> usize {
        self.state.lock().dangling_invocations
    }

    pub fn has_callback(&self, target: TargetHandle) -> bool {
        self.state.lock().callbacks.contains_key(&target)
    }

    pub fn is_freed(&self, target: TargetHandle) -> bool {
        self.state
            .lock()
            .targets
            .get(&target)
            .is_some_and(|t| t.freed)
    }

    pub fn is_added(&self, target: TargetHandle) -> bool {
        self.state
            .lock()
            .targets
            .get(&target)
            .is_some_and(|t| t.bus.is_some())
    }

    /// Deliver a feedback event the way the native bus would: through the
    /// weak registration only. Returns whether a live adapter ran; a fire
    /// at a dropped adapter is recorded as a dangling invocation.
    pub fn fire_feedback(
        &self,
        target: TargetHandle,
        large_motor: u8,
        small_motor: u8,
        led_number: u8,
    ) -> bool {
        let upgraded = {
            let mut state = self.state.lock();
            let registration = state
                .callbacks
                .get(&target)
                .map(|(bus, weak)| (*bus, weak.clone()));
            match registration {
                Some((bus, weak)) => match weak.upgrade() {
                    Some(thunk) => Some((bus, thunk)),
                    None => {
                        state.dangling_invocations += 1;
                        None
                    }
                },
                None => None,
            }
        };
        // Invoke outside the lock: the adapter may call back into the bus.
        match upgraded {
            Some((bus, thunk)) => {
                thunk(FeedbackEvent {
                    bus,
                    target,
                    large_motor,
                    small_motor,
                    led_number,
                });
                true
            }
            None => false,
        }
    }
}

impl Default for MockBusDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl BusDriver for MockBusDriver {
    fn bus_alloc(&self) -> Result<BusHandle, VigemError> {
        let mut state = self.state.lock();
        let handle = BusHandle(state.next_handle);
        state.next_handle += 1;
        state.ops.push(BusOp::BusAlloc(handle));
        Ok(handle)
    }

    fn bus_connect(&self, bus: BusHandle) -> Result<(), VigemError> {
        let mut state = self.state.lock();
        state.ops.push(BusOp::BusConnect(bus));
        if let Some(error) = state.connect_failure {
            return Err(error);
        }
        if !state.connected.insert(bus) {
            return Err(VigemError::BusAlreadyConnected);
        }
        Ok(())
    }

    fn bus_disconnect(&self, bus: BusHandle) {
        let mut state = self.state.lock();
        state.ops.push(BusOp::BusDisconnect(bus));
        state.connected.remove(&bus);
    }

    fn bus_free(&self, bus: BusHandle) {
        let mut state = self.state.lock();
        state.ops.push(BusOp::BusFree(bus));
        state.freed_buses.insert(bus);
    }

    fn target_alloc(&self, kind: TargetKind) -> Result<TargetHandle, VigemError> {
        let mut state = self.state.lock();
        if let Some(error) = state.alloc_failure {
            return Err(error);
        }
        let handle = TargetHandle(state.next_handle);
        state.next_handle += 1;
        state.targets.insert(
            handle,
            MockTarget {
                kind,
                vid: kind.default_vendor_id(),
                pid: kind.default_product_id(),
                index: 0,
                bus: None,
                attached: false,
                freed: false,
            },
        );
        state.ops.push(BusOp::TargetAlloc(handle));
        Ok(handle)
    }

    fn target_add(&self, bus: BusHandle, target: TargetHandle) -> Result<(), VigemError> {
        let mut state = self.state.lock();
        state.ops.push(BusOp::TargetAdd(target));
        if let Some(error) = state.add_failure {
            return Err(error);
        }
        if !state.connected.contains(&bus) {
            return Err(VigemError::BusNotFound);
        }
        let attach = state.attach_verification;
        let index = state.added_count;
        let Some(entry) = state.targets.get_mut(&target) else {
            return Err(VigemError::InvalidTarget);
        };
        if entry.freed || entry.bus.is_some() {
            return Err(VigemError::InvalidTarget);
        }
        entry.bus = Some(bus);
        entry.attached = attach;
        entry.index = index;
        state.added_count += 1;
        Ok(())
    }

    fn target_remove(&self, bus: BusHandle, target: TargetHandle) -> Result<(), VigemError> {
        let mut state = self.state.lock();
        state.ops.push(BusOp::TargetRemove(target));
        if let Some(error) = state.remove_failure {
            return Err(error);
        }
        let Some(entry) = state.targets.get_mut(&target) else {
            return Err(VigemError::InvalidTarget);
        };
        if entry.bus != Some(bus) {
            return Err(VigemError::TargetNotPluggedIn);
        }
        entry.bus = None;
        entry.attached = false;
        Ok(())
    }

    fn target_free(&self, target: TargetHandle) {
        let mut state = self.state.lock();
        state.ops.push(BusOp::TargetFree(target));
        if let Some(entry) = state.targets.get_mut(&target) {
            entry.freed = true;
        }
    }

    fn target_is_attached(&self, target: TargetHandle) -> bool {
        self.state
            .lock()
            .targets
            .get(&target)
            .is_some_and(|t| t.attached)
    }

    fn target_vid(&self, target: TargetHandle) -> u16 {
        self.state.lock().targets.get(&target).map_or(0, |t| t.vid)
    }

    fn target_pid(&self, target: TargetHandle) -> u16 {
        self.state.lock().targets.get(&target).map_or(0, |t| t.pid)
    }

    fn target_set_vid(&self, target: TargetHandle, vid: u16) {
        if let Some(entry) = self.state.lock().targets.get_mut(&target) {
            entry.vid = vid;
        }
    }

    fn target_set_pid(&self, target: TargetHandle, pid: u16) {
        if let Some(entry) = self.state.lock().targets.get_mut(&target) {
            entry.pid = pid;
        }
    }

    fn target_index(&self, target: TargetHandle) -> u32 {
        self.state.lock().targets.get(&target).map_or(0, |t| t.index)
    }

    fn target_kind(&self, target: TargetHandle) -> Option<TargetKind> {
        self.state.lock().targets.get(&target).map(|t| t.kind)
    }

    fn target_update(
        &self,
        bus: BusHandle,
        target: TargetHandle,
        report: &[u8],
    ) -> Result<(), VigemError> {
        let mut state = self.state.lock();
        state.ops.push(BusOp::TargetUpdate(target));
        if let Some(error) = state.update_failure {
            return Err(error);
        }
        let Some(entry) = state.targets.get(&target) else {
            return Err(VigemError::InvalidTarget);
        };
        if entry.bus != Some(bus) || !entry.attached {
            return Err(VigemError::TargetNotPluggedIn);
        }
        state.updates.push((target, report.to_vec()));
        Ok(())
    }

    fn register_notification(
        &self,
        bus: BusHandle,
        target: TargetHandle,
        callback: &Arc<FeedbackThunk>,
    ) -> Result<(), VigemError> {
        let mut state = self.state.lock();
        state.ops.push(BusOp::RegisterNotification(target));
        if state.callbacks.contains_key(&target) {
            return Err(VigemError::CallbackAlreadyRegistered);
        }
        state
            .callbacks
            .insert(target, (bus, Arc::downgrade(callback)));
        Ok(())
    }

    fn unregister_notification(&self, target: TargetHandle) {
        let mut state = self.state.lock();
        state.ops.push(BusOp::UnregisterNotification(target));
        state.callbacks.remove(&target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release_round_trip() {
        let driver = MockJoystickDriver::new();
        assert_eq!(driver.peek_status(1), VjdStatus::Free);
        assert!(driver.acquire(1));
        assert_eq!(driver.peek_status(1), VjdStatus::Own);
        assert!(driver.release(1));
        assert_eq!(driver.peek_status(1), VjdStatus::Free);
    }

    #[test]
    fn test_acquire_busy_slot_fails() {
        let driver = MockJoystickDriver::new();
        driver.set_status(2, VjdStatus::Busy);
        assert!(!driver.acquire(2));
        assert_eq!(driver.peek_status(2), VjdStatus::Busy);
    }

    #[test]
    fn test_call_buckets() {
        let driver = MockJoystickDriver::new();
        let _ = driver.max_device_count();
        let _ = driver.status(1);
        assert_eq!(driver.query_call_count(), 2);
        assert_eq!(driver.control_call_count(), 0);

        let _ = driver.acquire(1);
        let _ = driver.set_button(1, 3, true);
        assert_eq!(driver.control_call_count(), 2);
    }

    #[test]
    fn test_unqueryable_axis() {
        let driver = MockJoystickDriver::new();
        driver.insert_unqueryable_axis(HidUsage::Slider);
        assert!(driver.axis_exists(1, HidUsage::Slider));
        assert_eq!(driver.axis_min(1, HidUsage::Slider), None);
        assert_eq!(driver.axis_max(1, HidUsage::Slider), None);
    }

    #[test]
    fn test_read_position_returns_last_push() {
        let driver = MockJoystickDriver::new();
        assert!(driver.push_report(1, &[1, 2, 3]));
        let mut buf = Vec::new();
        assert!(driver.read_position(1, &mut buf));
        assert_eq!(buf, vec![1, 2, 3]);
    }

    #[test]
    fn test_read_position_requires_v3() {
        let driver = MockJoystickDriver::new();
        driver.set_api_version(ApiVersion::V2);
        assert!(driver.push_report(1, &[1]));
        let mut buf = Vec::new();
        assert!(!driver.read_position(1, &mut buf));
    }

    #[test]
    fn test_bus_target_lifecycle_order_is_logged() {
        let driver = MockBusDriver::new();
        let bus = driver.bus_alloc().expect("alloc");
        driver.bus_connect(bus).expect("connect");
        let target = driver
            .target_alloc(TargetKind::Xbox360Wired)
            .expect("target alloc");
        driver.target_add(bus, target).expect("add");
        assert!(driver.target_is_attached(target));

        driver.target_remove(bus, target).expect("remove");
        driver.target_free(target);

        let ops = driver.ops();
        let remove_at = ops
            .iter()
            .position(|op| *op == BusOp::TargetRemove(target))
            .expect("remove logged");
        let free_at = ops
            .iter()
            .position(|op| *op == BusOp::TargetFree(target))
            .expect("free logged");
        assert!(remove_at < free_at);
    }

    #[test]
    fn test_update_requires_attached_target() {
        let driver = MockBusDriver::new();
        let bus = driver.bus_alloc().expect("alloc");
        driver.bus_connect(bus).expect("connect");
        let target = driver
            .target_alloc(TargetKind::DualShock4Wired)
            .expect("target alloc");
        assert_eq!(
            driver.target_update(bus, target, &[0u8; 10]),
            Err(VigemError::TargetNotPluggedIn)
        );
    }

    #[test]
    fn test_fire_feedback_through_weak_registration() {
        let driver = MockBusDriver::new();
        let bus = driver.bus_alloc().expect("alloc");
        driver.bus_connect(bus).expect("connect");
        let target = driver
            .target_alloc(TargetKind::Xbox360Wired)
            .expect("target alloc");
        driver.target_add(bus, target).expect("add");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let thunk: Arc<FeedbackThunk> = Arc::new(move |event: FeedbackEvent| {
            sink.lock().push(event);
        });
        driver
            .register_notification(bus, target, &thunk)
            .expect("register");

        assert!(driver.fire_feedback(target, 200, 50, 1));
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(driver.dangling_invocation_count(), 0);

        // Dropping the only strong reference while still registered is the
        // exact fault the adapter pinning exists to prevent.
        drop(thunk);
        assert!(!driver.fire_feedback(target, 0, 0, 0));
        assert_eq!(driver.dangling_invocation_count(), 1);
    }

    #[test]
    fn test_double_registration_is_rejected() {
        let driver = MockBusDriver::new();
        let bus = driver.bus_alloc().expect("alloc");
        driver.bus_connect(bus).expect("connect");
        let target = driver
            .target_alloc(TargetKind::Xbox360Wired)
            .expect("target alloc");
        driver.target_add(bus, target).expect("add");

        let thunk: Arc<FeedbackThunk> = Arc::new(|_| {});
        driver
            .register_notification(bus, target, &thunk)
            .expect("register");
        assert_eq!(
            driver.register_notification(bus, target, &thunk),
            Err(VigemError::CallbackAlreadyRegistered)
        );

        driver.unregister_notification(target);
        driver.unregister_notification(target); // idempotent
        assert!(!driver.has_callback(target));
    }
}
