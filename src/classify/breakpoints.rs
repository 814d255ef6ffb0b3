//! Breakpoint tables that map a single pollutant reading onto a [`Grade`].
//!
//! Each table is a list of bands ordered from the most to the least severe.
//! A reading takes the grade of the first band that matches it; a reading that
//! matches no band (negative, NaN, or in a gap) is `Unknown`.

use crate::types::grade::Grade;

/// Lower edge of a band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Band {
    /// Matches readings `>=` the bound.
    AtLeast(f64),
    /// Matches only readings equal to the value.
    Exactly(f64),
}

impl Band {
    fn matches(self, value: f64) -> bool {
        match self {
            Band::AtLeast(lower) => value >= lower,
            Band::Exactly(exact) => value == exact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub band: Band,
    pub grade: Grade,
}

const fn at_least(lower: f64, grade: Grade) -> Breakpoint {
    Breakpoint {
        band: Band::AtLeast(lower),
        grade,
    }
}

const fn exactly(value: f64, grade: Grade) -> Breakpoint {
    Breakpoint {
        band: Band::Exactly(value),
        grade,
    }
}

/// An ordered breakpoint table, most severe band first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakpointTable(&'static [Breakpoint]);

impl BreakpointTable {
    pub fn breakpoints(&self) -> &'static [Breakpoint] {
        self.0
    }

    /// Grades a reading. `None` is `Unknown`.
    pub fn grade(&self, value: Option<f64>) -> Grade {
        let Some(value) = value else {
            return Grade::Unknown;
        };
        self.0
            .iter()
            .find(|breakpoint| breakpoint.band.matches(value))
            .map_or(Grade::Unknown, |breakpoint| breakpoint.grade)
    }
}

/// Korean combined air quality index. Every value from 0 up is graded.
pub const KHAI: BreakpointTable = BreakpointTable(&[
    at_least(201.0, Grade::Poor),
    at_least(151.0, Grade::Inferior),
    at_least(101.0, Grade::Fair),
    at_least(51.0, Grade::Good),
    at_least(0.0, Grade::Excellent),
]);

/// PM10 in µg/m³. Only an exact zero is excellent; (0, 1) is ungraded.
pub const PM10: BreakpointTable = BreakpointTable(&[
    at_least(151.0, Grade::Poor),
    at_least(81.0, Grade::Inferior),
    at_least(31.0, Grade::Fair),
    at_least(1.0, Grade::Good),
    exactly(0.0, Grade::Excellent),
]);

/// PM2.5 in µg/m³. Only an exact zero is excellent; (0, 1) is ungraded.
pub const PM25: BreakpointTable = BreakpointTable(&[
    at_least(76.0, Grade::Poor),
    at_least(36.0, Grade::Inferior),
    at_least(16.0, Grade::Fair),
    at_least(1.0, Grade::Good),
    exactly(0.0, Grade::Excellent),
]);

pub fn khai_grade(value: Option<f64>) -> Grade {
    KHAI.grade(value)
}

pub fn pm10_grade(value: Option<f64>) -> Grade {
    PM10.grade(value)
}

pub fn pm25_grade(value: Option<f64>) -> Grade {
    PM25.grade(value)
}

/// Published ppm densities of O3, NO2 and SO2 are exposed in ppb.
pub const PPM_TO_PPB: f64 = 1000.0;

pub fn ppm_to_ppb(value: Option<f64>) -> Option<f64> {
    value.map(|ppm| ppm * PPM_TO_PPB)
}
