pub mod client;
pub mod error;
pub mod response;

use crate::types::measurement::RawMeasurement;
use error::FetchError;
use std::future::Future;

/// Source of the latest measurement record for a station.
///
/// [`client::AirKoreaClient`] is the production implementation; anything that
/// can produce a [`RawMeasurement`] (a replay file, a test double) can drive
/// the monitor instead.
pub trait MeasurementFetcher: Send + Sync + 'static {
    /// Performs one round trip for `station` and returns its most recent record.
    fn fetch_latest(
        &self,
        station: &str,
    ) -> impl Future<Output = Result<RawMeasurement, FetchError>> + Send;
}
