//! Wire format of the AirKorea real-time measurement endpoint.
//!
//! Readings arrive as strings with `"-"` meaning "no data". Some gateways
//! return bare numbers instead, so both are accepted.

use crate::types::measurement::RawMeasurement;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Marker AirKorea puts in a reading field when the station has no value.
pub const NO_DATA: &str = "-";

#[derive(Debug, Deserialize)]
pub struct MeasurementResponse {
    #[serde(default)]
    pub list: Vec<MeasurementRecord>,
    pub parm: Option<RequestEcho>,
}

/// Request parameters echoed back by the service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEcho {
    pub station_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    pub data_time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_reading")]
    pub khai_value: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_reading")]
    pub pm10_value: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_reading")]
    pub pm25_value: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_reading")]
    pub o3_value: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_reading")]
    pub no2_value: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_reading")]
    pub so2_value: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_reading")]
    pub co_value: Option<f64>,
}

/// Reads a measurement that may be a string, a number, `"-"` or null.
///
/// Anything that does not yield a finite number is treated as "no data"
/// rather than failing the whole record.
fn deserialize_reading<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(reading_from_value))
}

fn reading_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_reading(text),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Parses a textual reading; `"-"`, blanks, non-numbers and non-finite values
/// such as `NaN` or `inf` are `None`.
pub fn parse_reading(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || text == NO_DATA {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

impl MeasurementResponse {
    /// The most recent record, combined with the echoed station name.
    pub fn into_latest(self) -> Option<RawMeasurement> {
        let station_name = self.parm.and_then(|parm| parm.station_name);
        let record = self.list.into_iter().next()?;
        Some(RawMeasurement {
            data_time: record.data_time,
            station_name,
            khai_value: record.khai_value,
            pm10_value: record.pm10_value,
            pm25_value: record.pm25_value,
            o3_value: record.o3_value,
            no2_value: record.no2_value,
            so2_value: record.so2_value,
            co_value: record.co_value,
        })
    }
}
