//! Calibration data types.

use serde::{Deserialize, Serialize};

/// Driver-reported logical range of one axis, with the derived midpoint
/// used as the axis's neutral value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLimits {
    pub min: i32,
    pub max: i32,
    /// `⌊(min + max) / 2⌋`, floored (not truncated) so asymmetric signed
    /// ranges still land on the lower-middle value.
    pub mid: i32,
}

impl AxisLimits {
    pub fn new(min: i32, max: i32) -> Self {
        let mid = (i64::from(min) + i64::from(max)).div_euclid(2) as i32;
        Self { min, max, mid }
    }

    /// Whether `value` lies inside the reported logical range.
    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }
}
