//! End-to-end report flow for the bus-backed gamepads.

use hid_vigem_protocol::{Ds4Button, Ds4Dpad, XusbButton};
use virtpad_device::{Ds4Device, VirtualGamepad, Xbox360Device};
use virtpad_integration_tests::{bus_fixture, init_tracing};

#[test]
fn x360_control_sweep_round_trips_through_the_bus() {
    init_tracing();
    let (mock, context) = bus_fixture();
    let mut pad = Xbox360Device::attach(&context).expect("attach");

    pad.press_button(XusbButton::A);
    pad.press_button(XusbButton::LeftShoulder);
    pad.left_trigger_float(0.5);
    pad.right_trigger(200);
    pad.left_joystick_float(1.0, -1.0);
    pad.right_joystick(1000, -1000);
    pad.update().expect("update");

    let updates = mock.updates();
    let bytes = &updates.last().expect("pushed").1;
    assert_eq!(u16::from_le_bytes([bytes[0], bytes[1]]), 0x1100);
    assert_eq!(bytes[2], virtpad_calibration::trigger_to_raw(0.5));
    assert_eq!(bytes[2], 128);
    assert_eq!(bytes[3], 200);
    assert_eq!(i16::from_le_bytes([bytes[4], bytes[5]]), 32767);
    assert_eq!(i16::from_le_bytes([bytes[6], bytes[7]]), -32767);
    assert_eq!(i16::from_le_bytes([bytes[8], bytes[9]]), 1000);
    assert_eq!(i16::from_le_bytes([bytes[10], bytes[11]]), -1000);
}

#[test]
fn ds4_control_sweep_round_trips_through_the_bus() {
    init_tracing();
    let (mock, context) = bus_fixture();
    let mut pad = Ds4Device::attach(&context).expect("attach");

    pad.press_button(Ds4Button::Cross);
    pad.directional_pad(Ds4Dpad::East);
    pad.left_joystick_float(-1.0, 0.0);
    pad.right_trigger_float(1.0);
    pad.update().expect("update");

    let updates = mock.updates();
    let bytes = &updates.last().expect("pushed").1;
    assert_eq!(bytes[0], 1); // left stick x, full negative deflection
    assert_eq!(bytes[1], 128); // left stick y centered
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 0x0020 | 0x2);
    assert_eq!(bytes[8], 255); // right trigger
}

#[test]
fn mixed_fleet_behind_the_gamepad_trait() {
    init_tracing();
    let (mock, context) = bus_fixture();

    let x360 = Xbox360Device::attach(&context).expect("x360");
    let ds4 = Ds4Device::attach(&context).expect("ds4");
    let mut fleet: Vec<Box<dyn VirtualGamepad>> = vec![Box::new(x360), Box::new(ds4)];

    for pad in &mut fleet {
        pad.reset();
        pad.update().expect("update");
    }

    // Two attach-time pushes plus two fleet pushes.
    assert_eq!(mock.updates().len(), 4);
    assert_eq!(fleet[0].vendor_id(), 0x045E);
    assert_eq!(fleet[1].vendor_id(), 0x054C);
    assert_ne!(fleet[0].slot_index(), fleet[1].slot_index());

    for pad in &mut fleet {
        pad.detach().expect("detach");
    }
}
