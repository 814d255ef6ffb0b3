//! The notification side of the host integration.

use crate::types::grade::Grade;
use crate::types::pollutant::Pollutant;
use log::info;
use std::sync::Arc;

/// Receives updates from an [`crate::AirQualityMonitor`].
///
/// Calls are made synchronously from inside a refresh cycle, so
/// implementations must return quickly; hand slow work off to a channel or a
/// task. Every method defaults to doing nothing.
pub trait ConditionsObserver: Send + Sync + 'static {
    /// New overall grade at the end of a background polling cycle.
    fn on_grade(&self, _grade: Grade) {}

    /// Whether the last cycle reached the service and got usable data.
    fn set_status_active(&self, _active: bool) {}

    /// One density present in the latest successful record, in published units.
    fn on_density(&self, _pollutant: Pollutant, _value: f64) {}

    /// The upstream `dataTime` label of the latest successful record.
    fn on_data_time(&self, _label: &str) {}
}

/// Ignores every notification. Useful for pure pull consumers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ConditionsObserver for NoopObserver {}

/// Writes every notification to the log at info level.
#[derive(Debug, Clone, Default)]
pub struct LoggingObserver {
    station: String,
}

impl LoggingObserver {
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
        }
    }
}

impl ConditionsObserver for LoggingObserver {
    fn on_grade(&self, grade: Grade) {
        info!("[{}] air quality is {}", self.station, grade);
    }

    fn set_status_active(&self, active: bool) {
        info!("[{}] status active: {}", self.station, active);
    }

    fn on_density(&self, pollutant: Pollutant, value: f64) {
        info!("[{}] {} density: {}", self.station, pollutant, value);
    }

    fn on_data_time(&self, label: &str) {
        info!("[{}] measured at {}", self.station, label);
    }
}

impl<T: ConditionsObserver> ConditionsObserver for Arc<T> {
    fn on_grade(&self, grade: Grade) {
        (**self).on_grade(grade)
    }

    fn set_status_active(&self, active: bool) {
        (**self).set_status_active(active)
    }

    fn on_density(&self, pollutant: Pollutant, value: f64) {
        (**self).on_density(pollutant, value)
    }

    fn on_data_time(&self, label: &str) {
        (**self).on_data_time(label)
    }
}
