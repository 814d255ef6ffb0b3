//! Defines the `Grade` enum, the ordinal air-quality scale every graded
//! pollutant reading is mapped onto.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal air-quality grade, in ascending order of severity.
///
/// The derived ordering follows declaration order, so `Unknown` compares lower
/// than every real grade and `Poor` is the maximum. Aggregation takes the
/// maximum over the non-`Unknown` grades it is given.
///
/// The discriminants match the values of the HomeKit `AirQuality`
/// characteristic, see [`Grade::code`].
///
/// # Examples
///
/// ```rust
/// use airkorea::Grade;
///
/// assert!(Grade::Poor > Grade::Fair);
/// assert!(Grade::Unknown < Grade::Excellent);
/// assert_eq!(Grade::default(), Grade::Unknown);
/// assert_eq!(Grade::from_code(3), Some(Grade::Fair));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    /// Code 0: no usable reading.
    #[default]
    Unknown = 0,
    /// Code 1.
    Excellent = 1,
    /// Code 2.
    Good = 2,
    /// Code 3.
    Fair = 3,
    /// Code 4.
    Inferior = 4,
    /// Code 5.
    Poor = 5,
}

impl Grade {
    /// All grades, least severe first.
    pub const ALL: [Grade; 6] = [
        Grade::Unknown,
        Grade::Excellent,
        Grade::Good,
        Grade::Fair,
        Grade::Inferior,
        Grade::Poor,
    ];

    /// The numeric value a HomeKit `AirQuality` characteristic expects.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Converts a HomeKit `AirQuality` value back into a `Grade`.
    ///
    /// Returns `None` for values outside `0..=5`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn is_known(self) -> bool {
        self != Grade::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Unknown => "unknown",
            Grade::Excellent => "excellent",
            Grade::Good => "good",
            Grade::Fair => "fair",
            Grade::Inferior => "inferior",
            Grade::Poor => "poor",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
