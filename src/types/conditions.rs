//! The cached snapshot of the latest successful cycle.

use crate::classify::Classification;
use crate::types::grade::Grade;
use crate::types::measurement::parse_data_time;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest known conditions at the monitored station.
///
/// Starts out empty with an `Unknown` grade. A successful cycle overwrites the
/// grade and every field its record carried a value for; fields the record left
/// empty keep whatever value an earlier cycle stored. Failed cycles leave the
/// snapshot untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Last combined index value.
    pub khai: Option<f64>,
    pub pm10: Option<f64>,
    pub pm25: Option<f64>,
    /// Ozone in ppb.
    pub ozone: Option<f64>,
    /// Nitrogen dioxide in ppb.
    pub nitrogen_dioxide: Option<f64>,
    /// Sulphur dioxide in ppb.
    pub sulphur_dioxide: Option<f64>,
    /// Carbon monoxide in ppm.
    pub carbon_monoxide: Option<f64>,
    pub air_quality: Grade,
    /// Upstream `dataTime` label of the last record.
    pub data_time: Option<String>,
    /// When the last successful cycle completed.
    pub updated_at: Option<DateTime<Utc>>,
}

impl CurrentConditions {
    /// Merges one cycle's classification into the snapshot.
    pub fn apply(
        &mut self,
        classification: &Classification,
        data_time: Option<&str>,
        updated_at: DateTime<Utc>,
    ) {
        fn keep_or_replace(slot: &mut Option<f64>, fresh: Option<f64>) {
            if fresh.is_some() {
                *slot = fresh;
            }
        }

        keep_or_replace(&mut self.khai, classification.khai);
        keep_or_replace(&mut self.pm10, classification.pm10);
        keep_or_replace(&mut self.pm25, classification.pm25);
        keep_or_replace(&mut self.ozone, classification.ozone);
        keep_or_replace(&mut self.nitrogen_dioxide, classification.nitrogen_dioxide);
        keep_or_replace(&mut self.sulphur_dioxide, classification.sulphur_dioxide);
        keep_or_replace(&mut self.carbon_monoxide, classification.carbon_monoxide);

        self.air_quality = classification.overall;
        if let Some(label) = data_time {
            self.data_time = Some(label.to_string());
        }
        self.updated_at = Some(updated_at);
    }

    pub fn measured_at(&self) -> Option<NaiveDateTime> {
        self.data_time.as_deref().and_then(parse_data_time)
    }
}
