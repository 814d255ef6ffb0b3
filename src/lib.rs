mod classify;
mod config;
mod error;
mod fetch;
mod monitor;
mod observer;
mod types;

pub use error::AirKoreaError;
pub use monitor::*;
pub use observer::*;

pub use classify::aggregate::combine;
pub use classify::breakpoints::*;
pub use classify::{classify, Classification};

pub use config::error::{ConfigError, ConfigWarning};
pub use config::settings::*;

pub use fetch::client::*;
pub use fetch::error::FetchError;
pub use fetch::response::{parse_reading, MeasurementRecord, MeasurementResponse, RequestEcho};
pub use fetch::MeasurementFetcher;

pub use types::accessory::*;
pub use types::conditions::CurrentConditions;
pub use types::criteria::Criteria;
pub use types::grade::Grade;
pub use types::measurement::*;
pub use types::pollutant::Pollutant;
