//! Static accessory metadata and the supported sensor kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MANUFACTURER: &str = "AirKorea";
pub const FIRMWARE_REVISION: &str = env!("CARGO_PKG_VERSION");

/// The kind of sensor the accessory presents. Only one exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    #[default]
    AirQuality,
}

impl SensorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SensorKind::AirQuality => "air_quality",
        }
    }

    /// Model string reported in the accessory information.
    pub fn model(self) -> &'static str {
        match self {
            SensorKind::AirQuality => "Air Quality Sensor",
        }
    }
}

impl FromStr for SensorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "air_quality" => Ok(SensorKind::AirQuality),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive metadata a host shows for the accessory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInfo {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    /// The monitoring station identifier.
    pub serial_number: String,
    pub firmware_revision: String,
}

impl AccessoryInfo {
    pub fn new(name: &str, station: &str, sensor: SensorKind) -> Self {
        Self {
            name: name.to_string(),
            manufacturer: MANUFACTURER.to_string(),
            model: sensor.model().to_string(),
            serial_number: station.to_string(),
            firmware_revision: FIRMWARE_REVISION.to_string(),
        }
    }
}
