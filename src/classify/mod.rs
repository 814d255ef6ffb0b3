//! Turns a [`RawMeasurement`] into per-pollutant grades, an overall grade and
//! the densities published to the host.

pub mod aggregate;
pub mod breakpoints;

use crate::types::criteria::Criteria;
use crate::types::grade::Grade;
use crate::types::measurement::RawMeasurement;
use crate::types::pollutant::Pollutant;
use aggregate::combine;
use breakpoints::{khai_grade, pm10_grade, pm25_grade, ppm_to_ppb};

/// Result of classifying one record.
///
/// Density fields are in published units (gases converted to ppb) and are
/// `None` wherever the record had no value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub khai_grade: Grade,
    pub pm10_grade: Grade,
    pub pm25_grade: Grade,
    pub overall: Grade,
    pub khai: Option<f64>,
    pub pm10: Option<f64>,
    pub pm25: Option<f64>,
    pub ozone: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
    pub sulphur_dioxide: Option<f64>,
    pub carbon_monoxide: Option<f64>,
}

impl Classification {
    /// The grade computed for a graded pollutant; `Unknown` for the gases.
    pub fn grade_of(&self, pollutant: Pollutant) -> Grade {
        match pollutant {
            Pollutant::Khai => self.khai_grade,
            Pollutant::Pm10 => self.pm10_grade,
            Pollutant::Pm25 => self.pm25_grade,
            _ => Grade::Unknown,
        }
    }

    pub fn density_of(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Khai => self.khai,
            Pollutant::Pm10 => self.pm10,
            Pollutant::Pm25 => self.pm25,
            Pollutant::Ozone => self.ozone,
            Pollutant::NitrogenDioxide => self.nitrogen_dioxide,
            Pollutant::SulphurDioxide => self.sulphur_dioxide,
            Pollutant::CarbonMonoxide => self.carbon_monoxide,
        }
    }

    /// Densities present in this record that a host publishes, in
    /// [`Pollutant::DENSITIES`] order.
    pub fn densities(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        Pollutant::DENSITIES
            .into_iter()
            .filter_map(move |pollutant| self.density_of(pollutant).map(|v| (pollutant, v)))
    }
}

/// Classifies one record under `criteria`. Pure: the same input always yields
/// the same output.
pub fn classify(raw: &RawMeasurement, criteria: &Criteria) -> Classification {
    let khai_grade = khai_grade(raw.khai_value);
    let pm10_grade = pm10_grade(raw.pm10_value);
    let pm25_grade = pm25_grade(raw.pm25_value);

    Classification {
        khai_grade,
        pm10_grade,
        pm25_grade,
        overall: combine(criteria, khai_grade, pm10_grade, pm25_grade),
        khai: raw.khai_value,
        pm10: raw.pm10_value,
        pm25: raw.pm25_value,
        ozone: ppm_to_ppb(raw.o3_value),
        nitrogen_dioxide: ppm_to_ppb(raw.no2_value),
        sulphur_dioxide: ppm_to_ppb(raw.so2_value),
        carbon_monoxide: raw.co_value,
    }
}
