//! Accessory configuration as written by the user, and its validated form.

use crate::config::error::{ConfigError, ConfigWarning};
use crate::types::accessory::{AccessoryInfo, SensorKind};
use crate::types::criteria::Criteria;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_INTERVAL_MINUTES: u64 = 60;
pub const DEFAULT_NAME: &str = "AirKorea";
pub const DEFAULT_CRITERIA: &str = "khai";
/// One year. Longer intervals are rejected as unsupported.
pub const MAX_INTERVAL_MINUTES: u64 = 366 * 24 * 60;

/// The accessory block of a host configuration file, as written.
///
/// Every field is optional at this level so that bad values can be reported
/// precisely by [`AccessoryConfig::validate`] instead of failing to parse.
///
/// ```json
/// {
///     "accessory": "AirKorea",
///     "name": "Air quality",
///     "api_key": "<data.go.kr service key>",
///     "station": "종로구",
///     "polling": true,
///     "interval": 30,
///     "criteria": "khai,pm10,pm25"
/// }
/// ```
///
/// The older spelling `creteria` is accepted for `criteria`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessoryConfig {
    pub name: Option<String>,
    pub api_key: Option<String>,
    pub station: Option<String>,
    pub sensor: Option<String>,
    pub polling: Option<Value>,
    pub interval: Option<Value>,
    #[serde(alias = "creteria")]
    pub criteria: Option<String>,
}

/// How the monitor keeps its conditions fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollingMode {
    /// A background task refreshes every `interval`.
    Push { interval: Duration },
    /// Conditions are refreshed only when a caller asks for them.
    Pull,
}

/// Validated configuration the monitor runs on.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub name: String,
    pub api_key: String,
    pub station: String,
    pub sensor: SensorKind,
    pub polling: bool,
    pub interval: Duration,
    pub criteria: Criteria,
}

impl Settings {
    /// Settings with every optional value at its default: pull mode, a
    /// 60 minute interval and `khai` criteria.
    pub fn new(api_key: impl Into<String>, station: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            api_key: api_key.into(),
            station: station.into(),
            sensor: SensorKind::default(),
            polling: false,
            interval: Duration::from_secs(DEFAULT_INTERVAL_MINUTES * 60),
            criteria: Criteria::default(),
        }
    }

    pub fn mode(&self) -> PollingMode {
        if self.polling {
            PollingMode::Push {
                interval: self.interval,
            }
        } else {
            PollingMode::Pull
        }
    }

    pub fn accessory_info(&self) -> AccessoryInfo {
        AccessoryInfo::new(&self.name, &self.station, self.sensor)
    }
}

impl AccessoryConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_json_str(&text)
    }

    /// Validates the configuration, logging every recoverable problem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] or [`ConfigError::MissingStation`]
    /// when a required value is missing or empty.
    pub fn validate(&self) -> Result<Settings, ConfigError> {
        let (settings, warnings) = self.validate_with_warnings()?;
        for warning in &warnings {
            warn!("{}", warning);
        }
        debug!(
            "Polling is {}",
            if settings.polling { "enabled" } else { "disabled" }
        );
        Ok(settings)
    }

    /// Like [`AccessoryConfig::validate`], but hands the warnings back instead
    /// of logging them.
    pub fn validate_with_warnings(&self) -> Result<(Settings, Vec<ConfigWarning>), ConfigError> {
        let api_key = non_empty(&self.api_key).ok_or(ConfigError::MissingApiKey)?;
        let station = non_empty(&self.station).ok_or(ConfigError::MissingStation)?;

        let mut warnings = Vec::new();
        let mut settings = Settings::new(api_key, station);

        if let Some(name) = non_empty(&self.name) {
            settings.name = name.to_string();
        }

        if let Some(sensor) = non_empty(&self.sensor) {
            match sensor.parse::<SensorKind>() {
                Ok(kind) => settings.sensor = kind,
                Err(other) => warnings.push(ConfigWarning::UnsupportedSensor(other)),
            }
        }

        match &self.polling {
            None | Some(Value::Null) => {}
            Some(Value::Bool(enabled)) => settings.polling = *enabled,
            Some(other) => warnings.push(ConfigWarning::UnsupportedPolling(other.to_string())),
        }

        match interval_minutes(self.interval.as_ref()) {
            Ok(interval) => settings.interval = interval,
            Err(warning) => warnings.push(warning),
        }

        let criteria = non_empty(&self.criteria).unwrap_or(DEFAULT_CRITERIA);
        settings.criteria = Criteria::parse(criteria);

        Ok((settings, warnings))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

/// Reads the polling interval in whole minutes. Numbers and numeric strings are
/// accepted; missing, zero, negative, fractional or non-numeric values are not.
fn interval_minutes(value: Option<&Value>) -> Result<Duration, ConfigWarning> {
    let unsupported = |value: &Value| ConfigWarning::UnsupportedInterval {
        value: value.to_string(),
        default: DEFAULT_INTERVAL_MINUTES,
    };

    let minutes = match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(value @ Value::String(text)) => {
            Some(text.trim().parse::<f64>().map_err(|_| unsupported(value))?)
        }
        Some(other) => return Err(unsupported(other)),
    };

    match minutes {
        None => Err(ConfigWarning::MissingInterval(DEFAULT_INTERVAL_MINUTES)),
        Some(m) if m == 0.0 => Err(ConfigWarning::MissingInterval(DEFAULT_INTERVAL_MINUTES)),
        Some(m) if m < 1.0 || m.fract() != 0.0 || m > MAX_INTERVAL_MINUTES as f64 => {
            Err(ConfigWarning::UnsupportedInterval {
                value: m.to_string(),
                default: DEFAULT_INTERVAL_MINUTES,
            })
        }
        Some(m) => Ok(Duration::from_secs(m as u64 * 60)),
    }
}
