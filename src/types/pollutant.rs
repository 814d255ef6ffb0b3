//! The quantities an AirKorea station reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One measured quantity of an AirKorea record.
///
/// Only [`Pollutant::Khai`], [`Pollutant::Pm10`] and [`Pollutant::Pm25`] are
/// graded; the gases are exposed as densities only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pollutant {
    /// Korean combined air quality index (KHAI). Unitless.
    Khai,
    /// Particulate matter up to 10 µm, in µg/m³.
    Pm10,
    /// Particulate matter up to 2.5 µm, in µg/m³.
    Pm25,
    /// Ozone, in ppb after conversion.
    Ozone,
    /// Nitrogen dioxide, in ppb after conversion.
    NitrogenDioxide,
    /// Sulphur dioxide, in ppb after conversion.
    SulphurDioxide,
    /// Carbon monoxide, in ppm as published.
    CarbonMonoxide,
}

impl Pollutant {
    /// Pollutants that have a grading table and can take part in aggregation.
    pub const GRADED: [Pollutant; 3] = [Pollutant::Khai, Pollutant::Pm10, Pollutant::Pm25];

    /// Pollutants published to the host as density characteristics.
    pub const DENSITIES: [Pollutant; 6] = [
        Pollutant::Pm10,
        Pollutant::Pm25,
        Pollutant::Ozone,
        Pollutant::NitrogenDioxide,
        Pollutant::SulphurDioxide,
        Pollutant::CarbonMonoxide,
    ];

    /// The key used in criteria strings. Only graded pollutants have one.
    pub fn criteria_key(self) -> Option<&'static str> {
        match self {
            Pollutant::Khai => Some("khai"),
            Pollutant::Pm10 => Some("pm10"),
            Pollutant::Pm25 => Some("pm25"),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Khai => "KHAI",
            Pollutant::Pm10 => "PM10",
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Ozone => "O3",
            Pollutant::NitrogenDioxide => "NO2",
            Pollutant::SulphurDioxide => "SO2",
            Pollutant::CarbonMonoxide => "CO",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
