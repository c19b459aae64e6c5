//! Shared protocol types.

use serde::{Deserialize, Serialize};

/// Negotiated driver structure layout.
///
/// Resolved once from the installed driver version before any device is
/// constructed; every report allocated afterwards uses the same layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ApiVersion {
    V1,
    V2,
    V3,
}

impl ApiVersion {
    /// Serialized size in bytes of this layout's position report.
    pub fn report_size(self) -> usize {
        match self {
            ApiVersion::V1 => crate::REPORT_SIZE_V1,
            ApiVersion::V2 => crate::REPORT_SIZE_V2,
            ApiVersion::V3 => crate::REPORT_SIZE_V3,
        }
    }

    /// Highest button number addressable in this layout.
    pub fn max_button(self) -> u8 {
        match self {
            ApiVersion::V1 => crate::BASELINE_BUTTONS,
            ApiVersion::V2 | ApiVersion::V3 => crate::MAX_BUTTONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_size_per_version() {
        assert_eq!(ApiVersion::V1.report_size(), 96);
        assert_eq!(ApiVersion::V2.report_size(), 108);
        assert_eq!(ApiVersion::V3.report_size(), 124);
    }

    #[test]
    fn test_max_button_per_version() {
        assert_eq!(ApiVersion::V1.max_button(), 32);
        assert_eq!(ApiVersion::V2.max_button(), 128);
        assert_eq!(ApiVersion::V3.max_button(), 128);
    }
}
