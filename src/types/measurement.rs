//! The transient record produced by one fetch.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Format of the `dataTime` label AirKorea attaches to each record.
pub const DATA_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One AirKorea record, with "no data" sentinels already decoded to `None`.
///
/// `None` means the station published no value for that field; it is never a
/// stand-in for zero. Densities are as published: the gases are still in ppm.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMeasurement {
    pub data_time: Option<String>,
    pub station_name: Option<String>,
    pub khai_value: Option<f64>,
    pub pm10_value: Option<f64>,
    pub pm25_value: Option<f64>,
    pub o3_value: Option<f64>,
    pub no2_value: Option<f64>,
    pub so2_value: Option<f64>,
    pub co_value: Option<f64>,
}

impl RawMeasurement {
    /// The record time as a local (KST) timestamp, if the label parses.
    pub fn measured_at(&self) -> Option<NaiveDateTime> {
        self.data_time.as_deref().and_then(parse_data_time)
    }
}

/// Parses an AirKorea `dataTime` label such as `"2024-03-01 13:00"`.
///
/// The service reports the last hour of a day as `24:00`, which is read as
/// midnight of the following day.
pub fn parse_data_time(label: &str) -> Option<NaiveDateTime> {
    let label = label.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(label, DATA_TIME_FORMAT) {
        return Some(parsed);
    }

    let (date, time) = label.split_once(' ')?;
    if time.trim() != "24:00" {
        return None;
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(TimeDelta::days(1))
}
