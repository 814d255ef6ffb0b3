//! Selection of the pollutants whose grades make up the overall grade.

use crate::types::pollutant::Pollutant;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The set of graded pollutants that participate in aggregation.
///
/// Parsed from free text by substring match: any string containing `khai`,
/// `pm10` or `pm25` activates the corresponding pollutant, so `"khai,pm10"`,
/// `"pm10 pm25"` and `"khaipm25"` are all valid. Matching is case-sensitive.
/// A string matching none of the keys yields an empty set, under which the
/// overall grade is always `Unknown`.
///
/// # Examples
///
/// ```rust
/// use airkorea::{Criteria, Pollutant};
///
/// let criteria: Criteria = "khai,pm25".parse().unwrap();
/// assert!(criteria.includes(Pollutant::Khai));
/// assert!(!criteria.includes(Pollutant::Pm10));
/// assert!(criteria.includes(Pollutant::Pm25));
///
/// assert_eq!(Criteria::default(), Criteria::khai_only());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Criteria {
    khai: bool,
    pm10: bool,
    pm25: bool,
}

impl Criteria {
    pub const fn new(khai: bool, pm10: bool, pm25: bool) -> Self {
        Self { khai, pm10, pm25 }
    }

    pub const fn khai_only() -> Self {
        Self::new(true, false, false)
    }

    pub const fn all() -> Self {
        Self::new(true, true, true)
    }

    pub const fn none() -> Self {
        Self::new(false, false, false)
    }

    /// Builds the set from a configuration string by substring match.
    pub fn parse(text: &str) -> Self {
        Self {
            khai: text.contains("khai"),
            pm10: text.contains("pm10"),
            pm25: text.contains("pm25"),
        }
    }

    /// Whether `pollutant` is selected. Ungraded pollutants never are.
    pub fn includes(&self, pollutant: Pollutant) -> bool {
        match pollutant {
            Pollutant::Khai => self.khai,
            Pollutant::Pm10 => self.pm10,
            Pollutant::Pm25 => self.pm25,
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.khai || self.pm10 || self.pm25)
    }

    pub fn selected(&self) -> impl Iterator<Item = Pollutant> + '_ {
        Pollutant::GRADED
            .into_iter()
            .filter(move |pollutant| self.includes(*pollutant))
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self::khai_only()
    }
}

impl FromStr for Criteria {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self
            .selected()
            .filter_map(Pollutant::criteria_key)
            .collect();
        f.write_str(&keys.join(","))
    }
}

impl Serialize for Criteria {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Criteria {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}
