//! Feedback notification bridge scenarios.

use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use virtpad_device::{BusError, Ds4Device, FeedbackCallback, Xbox360Device};
use virtpad_driver::mock::BusOp;
use virtpad_driver::{CallbackSignature, FeedbackEvent, FeedbackThunk};
use virtpad_integration_tests::{bus_fixture, init_tracing};

#[test]
fn feedback_arrives_from_a_bus_controlled_thread() {
    init_tracing();
    let (mock, context) = bus_fixture();
    let mut pad = Xbox360Device::attach(&context).expect("attach");

    let received: Arc<Mutex<Vec<(FeedbackEvent, thread::ThreadId)>>> =
        Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    pad.register_notification(FeedbackCallback::new(move |event| {
        sink.lock().push((event, thread::current().id()));
    }))
    .expect("register");

    let target = mock
        .updates()
        .first()
        .map(|(target, _)| *target)
        .expect("target known from attach push");

    // The native bus dispatches from its own thread, not the registering
    // one.
    let bus_thread = {
        let mock = Arc::clone(&mock);
        thread::spawn(move || {
            assert!(mock.fire_feedback(target, 180, 20, 1));
            thread::current().id()
        })
    };
    let bus_thread_id = bus_thread.join().expect("bus thread");

    let events = received.lock();
    assert_eq!(events.len(), 1);
    let (event, seen_on) = events[0];
    assert_eq!(event.large_motor, 180);
    assert_eq!(event.small_motor, 20);
    assert_eq!(event.led_number, 1);
    assert_eq!(seen_on, bus_thread_id);
    assert_ne!(seen_on, thread::current().id());
}

#[test]
fn adapter_outlives_the_whole_registration_window() {
    init_tracing();
    let (mock, context) = bus_fixture();

    let target = {
        let mut pad = Ds4Device::attach(&context).expect("attach");
        pad.register_notification(FeedbackCallback::new(|_| {})).expect("register");

        let target = mock
            .updates()
            .first()
            .map(|(target, _)| *target)
            .expect("target known");
        assert!(mock.fire_feedback(target, 1, 2, 3));

        // Device dropped here while the callback is still registered.
        target
    };

    // Detach unregistered natively before the adapter dropped: firing now
    // finds no registration at all, and nothing ever dangled.
    assert!(!mock.fire_feedback(target, 0, 0, 0));
    assert_eq!(mock.dangling_invocation_count(), 0);
}

#[test]
fn mismatched_signature_never_reaches_the_bus() {
    init_tracing();
    let (mock, context) = bus_fixture();
    let mut pad = Xbox360Device::attach(&context).expect("attach");

    for param_count in [0usize, 5, 7] {
        let thunk: Arc<FeedbackThunk> = Arc::new(|_| {});
        let callback =
            FeedbackCallback::from_raw_parts(CallbackSignature { param_count }, thunk);
        let error = pad.register_notification(callback).unwrap_err();
        assert_eq!(
            error,
            BusError::CallbackSignatureMismatch {
                expected: 6,
                actual: param_count,
            }
        );
    }
    assert!(
        !mock
            .ops()
            .iter()
            .any(|op| matches!(op, BusOp::RegisterNotification(_)))
    );
}

#[test]
fn unregister_is_idempotent_and_reregistration_works() {
    init_tracing();
    let (mock, context) = bus_fixture();
    let mut pad = Xbox360Device::attach(&context).expect("attach");

    pad.unregister_notification(); // never registered: no-op

    pad.register_notification(FeedbackCallback::new(|_| {}))
        .expect("register");
    pad.unregister_notification();
    pad.unregister_notification();

    pad.register_notification(FeedbackCallback::new(|_| {}))
        .expect("re-register");

    let registers = mock
        .ops()
        .iter()
        .filter(|op| matches!(op, BusOp::RegisterNotification(_)))
        .count();
    let unregisters = mock
        .ops()
        .iter()
        .filter(|op| matches!(op, BusOp::UnregisterNotification(_)))
        .count();
    assert_eq!(registers, 2);
    assert_eq!(unregisters, 1);
}
