//! Versioned position report structures and the uniform accessor wrapper.

use crate::pov::{encode_pov_word, validate_continuous_pov, validate_discrete_pov, validate_pov_id};
use crate::{ApiVersion, HidUsage, VjoyProtocolError, VjoyProtocolResult};
use crate::{REPORT_SIZE_V3, VjoyProtocolError as E};

fn put_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Little-endian cursor over a received report. Bounds are checked against
/// the expected report size up front, so reads report the whole-buffer size
/// mismatch rather than a partial position.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    expected: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8], expected: usize) -> VjoyProtocolResult<Self> {
        if data.len() != expected {
            return Err(E::InvalidReportSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            pos: 0,
            expected,
        })
    }

    fn size_err(&self) -> VjoyProtocolError {
        E::InvalidReportSize {
            expected: self.expected,
            actual: self.data.len(),
        }
    }

    fn take(&mut self, len: usize) -> VjoyProtocolResult<&'a [u8]> {
        let end = self.pos + len;
        let data: &'a [u8] = self.data;
        match data.get(self.pos..end) {
            Some(slice) => {
                self.pos = end;
                Ok(slice)
            }
            None => Err(self.size_err()),
        }
    }

    fn u8(&mut self) -> VjoyProtocolResult<u8> {
        match self.take(1)? {
            &[byte] => Ok(byte),
            _ => Err(self.size_err()),
        }
    }

    fn skip(&mut self, len: usize) -> VjoyProtocolResult<()> {
        self.take(len).map(|_| ())
    }

    fn u32_le(&mut self) -> VjoyProtocolResult<u32> {
        let bytes: [u8; 4] = self.take(4)?.try_into().map_err(|_| self.size_err())?;
        Ok(u32::from_le_bytes(bytes))
    }

    fn i32_le(&mut self) -> VjoyProtocolResult<i32> {
        Ok(self.u32_le()? as i32)
    }
}

/// Baseline position report (96 bytes, 32 buttons).
///
/// Field order mirrors the native structure; the rotational-velocity slot
/// names follow the native header, misspellings included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionV1 {
    /// 1-based device index.
    pub device: u8,
    pub throttle: i32,
    pub rudder: i32,
    pub aileron: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub rx: i32,
    pub ry: i32,
    pub rz: i32,
    pub slider: i32,
    pub dial: i32,
    pub wheel: i32,
    pub vx: i32,
    pub vy: i32,
    pub vz: i32,
    pub vbrx: i32,
    pub vrby: i32,
    pub vrbz: i32,
    /// Bit 0 = button 1 … bit 31 = button 32.
    pub buttons: u32,
    /// One word per hat slot; neutral is the all-ones word.
    pub hats: [u32; 4],
}

impl PositionV1 {
    /// Zero state for `device`, with the primary hat centered.
    pub fn new(device: u8) -> Self {
        Self {
            device,
            throttle: 0,
            rudder: 0,
            aileron: 0,
            x: 0,
            y: 0,
            z: 0,
            rx: 0,
            ry: 0,
            rz: 0,
            slider: 0,
            dial: 0,
            wheel: 0,
            vx: 0,
            vy: 0,
            vz: 0,
            vbrx: 0,
            vrby: 0,
            vrbz: 0,
            buttons: 0,
            hats: [0xFFFF_FFFF, 0, 0, 0],
        }
    }

    fn axis_slot(&mut self, usage: HidUsage) -> Option<&mut i32> {
        match usage {
            HidUsage::X => Some(&mut self.x),
            HidUsage::Y => Some(&mut self.y),
            HidUsage::Z => Some(&mut self.z),
            HidUsage::Rx => Some(&mut self.rx),
            HidUsage::Ry => Some(&mut self.ry),
            HidUsage::Rz => Some(&mut self.rz),
            HidUsage::Slider => Some(&mut self.slider),
            HidUsage::Dial => Some(&mut self.dial),
            HidUsage::Wheel => Some(&mut self.wheel),
            HidUsage::Throttle => Some(&mut self.throttle),
            HidUsage::Rudder => Some(&mut self.rudder),
            HidUsage::Aileron => Some(&mut self.aileron),
            _ => None,
        }
    }

    fn axis_value(&self, usage: HidUsage) -> Option<i32> {
        match usage {
            HidUsage::X => Some(self.x),
            HidUsage::Y => Some(self.y),
            HidUsage::Z => Some(self.z),
            HidUsage::Rx => Some(self.rx),
            HidUsage::Ry => Some(self.ry),
            HidUsage::Rz => Some(self.rz),
            HidUsage::Slider => Some(self.slider),
            HidUsage::Dial => Some(self.dial),
            HidUsage::Wheel => Some(self.wheel),
            HidUsage::Throttle => Some(self.throttle),
            HidUsage::Rudder => Some(self.rudder),
            HidUsage::Aileron => Some(self.aileron),
            _ => None,
        }
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.push(self.device);
        buf.extend_from_slice(&[0, 0, 0]);
        for value in [
            self.throttle,
            self.rudder,
            self.aileron,
            self.x,
            self.y,
            self.z,
            self.rx,
            self.ry,
            self.rz,
            self.slider,
            self.dial,
            self.wheel,
            self.vx,
            self.vy,
            self.vz,
            self.vbrx,
            self.vrby,
            self.vrbz,
        ] {
            put_i32(buf, value);
        }
        put_u32(buf, self.buttons);
        for hat in self.hats {
            put_u32(buf, hat);
        }
    }

    /// Serialize to the native 96-byte layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(crate::REPORT_SIZE_V1);
        self.encode_into(&mut buf);
        buf
    }
}

/// V2 layout: the baseline report plus three extended button words
/// (108 bytes, 128 buttons).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionV2 {
    pub base: PositionV1,
    /// Buttons 33-64, 65-96, 97-128.
    pub buttons_ex: [u32; 3],
}

impl PositionV2 {
    pub fn new(device: u8) -> Self {
        Self {
            base: PositionV1::new(device),
            buttons_ex: [0; 3],
        }
    }

    /// Serialize to the native 108-byte layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(crate::REPORT_SIZE_V2);
        self.base.encode_into(&mut buf);
        for word in self.buttons_ex {
            put_u32(&mut buf, word);
        }
        buf
    }
}

/// V3 layout: racing axes inserted after the wheel slot, extended button
/// words after the hats, and the remaining rotational-velocity slots moved
/// to the tail (124 bytes, 128 buttons).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionV3 {
    /// 1-based device index.
    pub device: u8,
    pub throttle: i32,
    pub rudder: i32,
    pub aileron: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub rx: i32,
    pub ry: i32,
    pub rz: i32,
    pub slider: i32,
    pub dial: i32,
    pub wheel: i32,
    pub accelerator: i32,
    pub brake: i32,
    /// Present in the layout; the driver exposes no usage id for it.
    pub clutch: i32,
    pub steering: i32,
    pub vx: i32,
    pub vy: i32,
    /// Bit 0 = button 1 … bit 31 = button 32.
    pub buttons: u32,
    /// One word per hat slot; neutral is the all-ones word.
    pub hats: [u32; 4],
    /// Buttons 33-64, 65-96, 97-128.
    pub buttons_ex: [u32; 3],
    pub vz: i32,
    pub vbrx: i32,
    pub vrby: i32,
    pub vrbz: i32,
}

impl PositionV3 {
    /// Zero state for `device`, with the primary hat centered.
    pub fn new(device: u8) -> Self {
        Self {
            device,
            throttle: 0,
            rudder: 0,
            aileron: 0,
            x: 0,
            y: 0,
            z: 0,
            rx: 0,
            ry: 0,
            rz: 0,
            slider: 0,
            dial: 0,
            wheel: 0,
            accelerator: 0,
            brake: 0,
            clutch: 0,
            steering: 0,
            vx: 0,
            vy: 0,
            buttons: 0,
            hats: [0xFFFF_FFFF, 0, 0, 0],
            buttons_ex: [0; 3],
            vz: 0,
            vbrx: 0,
            vrby: 0,
            vrbz: 0,
        }
    }

    fn axis_slot(&mut self, usage: HidUsage) -> Option<&mut i32> {
        match usage {
            HidUsage::X => Some(&mut self.x),
            HidUsage::Y => Some(&mut self.y),
            HidUsage::Z => Some(&mut self.z),
            HidUsage::Rx => Some(&mut self.rx),
            HidUsage::Ry => Some(&mut self.ry),
            HidUsage::Rz => Some(&mut self.rz),
            HidUsage::Slider => Some(&mut self.slider),
            HidUsage::Dial => Some(&mut self.dial),
            HidUsage::Wheel => Some(&mut self.wheel),
            HidUsage::Throttle => Some(&mut self.throttle),
            HidUsage::Rudder => Some(&mut self.rudder),
            HidUsage::Aileron => Some(&mut self.aileron),
            HidUsage::Accelerator => Some(&mut self.accelerator),
            HidUsage::Brake => Some(&mut self.brake),
            HidUsage::Steering => Some(&mut self.steering),
            _ => None,
        }
    }

    fn axis_value(&self, usage: HidUsage) -> Option<i32> {
        match usage {
            HidUsage::X => Some(self.x),
            HidUsage::Y => Some(self.y),
            HidUsage::Z => Some(self.z),
            HidUsage::Rx => Some(self.rx),
            HidUsage::Ry => Some(self.ry),
            HidUsage::Rz => Some(self.rz),
            HidUsage::Slider => Some(self.slider),
            HidUsage::Dial => Some(self.dial),
            HidUsage::Wheel => Some(self.wheel),
            HidUsage::Throttle => Some(self.throttle),
            HidUsage::Rudder => Some(self.rudder),
            HidUsage::Aileron => Some(self.aileron),
            HidUsage::Accelerator => Some(self.accelerator),
            HidUsage::Brake => Some(self.brake),
            HidUsage::Steering => Some(self.steering),
            _ => None,
        }
    }

    /// Serialize to the native 124-byte layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(REPORT_SIZE_V3);
        buf.push(self.device);
        buf.extend_from_slice(&[0, 0, 0]);
        for value in [
            self.throttle,
            self.rudder,
            self.aileron,
            self.x,
            self.y,
            self.z,
            self.rx,
            self.ry,
            self.rz,
            self.slider,
            self.dial,
            self.wheel,
            self.accelerator,
            self.brake,
            self.clutch,
            self.steering,
            self.vx,
            self.vy,
        ] {
            put_i32(&mut buf, value);
        }
        put_u32(&mut buf, self.buttons);
        for hat in self.hats {
            put_u32(&mut buf, hat);
        }
        for word in self.buttons_ex {
            put_u32(&mut buf, word);
        }
        for value in [self.vz, self.vbrx, self.vrby, self.vrbz] {
            put_i32(&mut buf, value);
        }
        buf
    }

    /// Parse a position read back from the driver. Only the V3 layout
    /// supports read-back.
    pub fn from_bytes(data: &[u8]) -> VjoyProtocolResult<Self> {
        let mut r = Reader::new(data, REPORT_SIZE_V3)?;
        let device = r.u8()?;
        r.skip(3)?;
        let throttle = r.i32_le()?;
        let rudder = r.i32_le()?;
        let aileron = r.i32_le()?;
        let x = r.i32_le()?;
        let y = r.i32_le()?;
        let z = r.i32_le()?;
        let rx = r.i32_le()?;
        let ry = r.i32_le()?;
        let rz = r.i32_le()?;
        let slider = r.i32_le()?;
        let dial = r.i32_le()?;
        let wheel = r.i32_le()?;
        let accelerator = r.i32_le()?;
        let brake = r.i32_le()?;
        let clutch = r.i32_le()?;
        let steering = r.i32_le()?;
        let vx = r.i32_le()?;
        let vy = r.i32_le()?;
        let buttons = r.u32_le()?;
        let hats = [r.u32_le()?, r.u32_le()?, r.u32_le()?, r.u32_le()?];
        let buttons_ex = [r.u32_le()?, r.u32_le()?, r.u32_le()?];
        let vz = r.i32_le()?;
        let vbrx = r.i32_le()?;
        let vrby = r.i32_le()?;
        let vrbz = r.i32_le()?;
        Ok(Self {
            device,
            throttle,
            rudder,
            aileron,
            x,
            y,
            z,
            rx,
            ry,
            rz,
            slider,
            dial,
            wheel,
            accelerator,
            brake,
            clutch,
            steering,
            vx,
            vy,
            buttons,
            hats,
            buttons_ex,
            vz,
            vbrx,
            vrby,
            vrbz,
        })
    }
}

/// A whole-device state snapshot in the layout negotiated at startup.
///
/// The variant is chosen once from [`ApiVersion`]; every accessor works the
/// same way on all three layouts, so calling code never inspects the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoystickReport {
    V1(PositionV1),
    V2(PositionV2),
    V3(PositionV3),
}

impl JoystickReport {
    /// Allocate the neutral report for `device` in the given layout.
    pub fn new(version: ApiVersion, device: u8) -> Self {
        match version {
            ApiVersion::V1 => JoystickReport::V1(PositionV1::new(device)),
            ApiVersion::V2 => JoystickReport::V2(PositionV2::new(device)),
            ApiVersion::V3 => JoystickReport::V3(PositionV3::new(device)),
        }
    }

    pub fn version(&self) -> ApiVersion {
        match self {
            JoystickReport::V1(_) => ApiVersion::V1,
            JoystickReport::V2(_) => ApiVersion::V2,
            JoystickReport::V3(_) => ApiVersion::V3,
        }
    }

    pub fn device(&self) -> u8 {
        match self {
            JoystickReport::V1(p) => p.device,
            JoystickReport::V2(p) => p.base.device,
            JoystickReport::V3(p) => p.device,
        }
    }

    fn axis_slot(&mut self, usage: HidUsage) -> Option<&mut i32> {
        match self {
            JoystickReport::V1(p) => p.axis_slot(usage),
            JoystickReport::V2(p) => p.base.axis_slot(usage),
            JoystickReport::V3(p) => p.axis_slot(usage),
        }
    }

    /// Write one axis slot. Rejects usages that have no field in this
    /// layout (the racing axes on V1/V2, and the hat pseudo-usage).
    pub fn set_axis(&mut self, usage: HidUsage, value: i32) -> VjoyProtocolResult<()> {
        let version = self.version();
        let slot = self.axis_slot(usage).ok_or(E::InvalidAxis { usage, version })?;
        *slot = value;
        Ok(())
    }

    /// Read one axis slot, if the layout carries it.
    pub fn axis(&self, usage: HidUsage) -> Option<i32> {
        match self {
            JoystickReport::V1(p) => p.axis_value(usage),
            JoystickReport::V2(p) => p.base.axis_value(usage),
            JoystickReport::V3(p) => p.axis_value(usage),
        }
    }

    fn button_words_mut(&mut self) -> (&mut u32, Option<&mut [u32; 3]>) {
        match self {
            JoystickReport::V1(p) => (&mut p.buttons, None),
            JoystickReport::V2(p) => (&mut p.base.buttons, Some(&mut p.buttons_ex)),
            JoystickReport::V3(p) => (&mut p.buttons, Some(&mut p.buttons_ex)),
        }
    }

    fn button_word_mut(&mut self, word: usize) -> Option<&mut u32> {
        let (baseline, extended) = self.button_words_mut();
        match word {
            0 => Some(baseline),
            1..=3 => extended.and_then(|ex| ex.get_mut(word - 1)),
            _ => None,
        }
    }

    /// Set or clear one button (1-based). Masked OR / AND-NOT on the word
    /// that holds the button; every other bit is untouched.
    pub fn set_button(&mut self, button: u8, pressed: bool) -> VjoyProtocolResult<()> {
        if button < 1 || button > self.version().max_button() {
            return Err(E::InvalidButton(button));
        }
        let index = usize::from(button - 1);
        let word = self
            .button_word_mut(index / 32)
            .ok_or(E::InvalidButton(button))?;
        let mask = 1u32 << (index % 32);
        if pressed {
            *word |= mask;
        } else {
            *word &= !mask;
        }
        Ok(())
    }

    fn button_word(&self, word: usize) -> Option<u32> {
        let (baseline, extended) = match self {
            JoystickReport::V1(p) => (p.buttons, None),
            JoystickReport::V2(p) => (p.base.buttons, Some(&p.buttons_ex)),
            JoystickReport::V3(p) => (p.buttons, Some(&p.buttons_ex)),
        };
        match word {
            0 => Some(baseline),
            1..=3 => extended.and_then(|ex| ex.get(word - 1).copied()),
            _ => None,
        }
    }

    /// Read one button state (1-based).
    pub fn button(&self, button: u8) -> VjoyProtocolResult<bool> {
        if button < 1 || button > self.version().max_button() {
            return Err(E::InvalidButton(button));
        }
        let index = usize::from(button - 1);
        let word = self
            .button_word(index / 32)
            .ok_or(E::InvalidButton(button))?;
        Ok(word & (1u32 << (index % 32)) != 0)
    }

    fn hat_word_mut(&mut self, pov: u8) -> VjoyProtocolResult<&mut u32> {
        validate_pov_id(pov)?;
        let hats = match self {
            JoystickReport::V1(p) => &mut p.hats,
            JoystickReport::V2(p) => &mut p.base.hats,
            JoystickReport::V3(p) => &mut p.hats,
        };
        hats.get_mut(usize::from(pov - 1))
            .ok_or(E::InvalidPovId(pov))
    }

    /// Write a discrete-mode hat (1-based id). The value is validated
    /// before the report is touched.
    pub fn set_discrete_pov(&mut self, pov: u8, value: i32) -> VjoyProtocolResult<()> {
        validate_pov_id(pov)?;
        validate_discrete_pov(value)?;
        let word = self.hat_word_mut(pov)?;
        *word = encode_pov_word(value);
        Ok(())
    }

    /// Write a continuous-mode hat (1-based id). The value is validated
    /// before the report is touched.
    pub fn set_continuous_pov(&mut self, pov: u8, value: i32) -> VjoyProtocolResult<()> {
        validate_pov_id(pov)?;
        validate_continuous_pov(value)?;
        let word = self.hat_word_mut(pov)?;
        *word = encode_pov_word(value);
        Ok(())
    }

    /// Read a hat word back as a signed value (-1 when neutral).
    pub fn pov(&self, pov: u8) -> VjoyProtocolResult<i32> {
        validate_pov_id(pov)?;
        let hats = match self {
            JoystickReport::V1(p) => &p.hats,
            JoystickReport::V2(p) => &p.base.hats,
            JoystickReport::V3(p) => &p.hats,
        };
        hats.get(usize::from(pov - 1))
            .map(|word| *word as i32)
            .ok_or(E::InvalidPovId(pov))
    }

    /// Serialize to the native byte layout for the batched update call.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            JoystickReport::V1(p) => p.to_bytes(),
            JoystickReport::V2(p) => p.to_bytes(),
            JoystickReport::V3(p) => p.to_bytes(),
        }
    }

    /// The V3 payload, when this report uses the V3 layout. Read-back is a
    /// V3-only capability.
    pub fn as_v3(&self) -> Option<&PositionV3> {
        match self {
            JoystickReport::V3(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_v3_mut(&mut self) -> Option<&mut PositionV3> {
        match self {
            JoystickReport::V3(p) => Some(p),
            _ => None,
        }
    }
}
