//! HTTP client for the AirKorea real-time measurement service on
//! `apis.data.go.kr`.

use crate::config::settings::Settings;
use crate::fetch::error::FetchError;
use crate::fetch::response::MeasurementResponse;
use crate::fetch::MeasurementFetcher;
use crate::types::measurement::RawMeasurement;
use bon::bon;
use log::{debug, warn};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// Real-time measurements by station ("측정소별 실시간 측정정보 조회").
pub const DEFAULT_BASE_URL: &str =
    "http://apis.data.go.kr/B552584/ArpltnInforInqireSvc/getMsrstnAcctoRltmMesureDnsty";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the most recent record for a station from the AirKorea open API.
///
/// Create one with [`AirKoreaClient::builder()`]. The service key is sent
/// exactly as given: data.go.kr issues keys in an already URL-encoded form, and
/// encoding them a second time makes the service reject them.
///
/// # Examples
///
/// ```no_run
/// # use airkorea::{AirKoreaClient, MeasurementFetcher, AirKoreaError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), AirKoreaError> {
/// let client = AirKoreaClient::builder()
///     .api_key("my-service-key")
///     .build()?;
///
/// let record = client.fetch_latest("종로구").await?;
/// println!("PM10 at {:?}: {:?}", record.data_time, record.pm10_value);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AirKoreaClient {
    http: Client,
    api_key: String,
    base_url: String,
}

#[bon]
impl AirKoreaClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `.api_key(String)`: **Required.** The data.go.kr service key.
    /// * `.base_url(String)`: Optional. Endpoint to query. Defaults to [`DEFAULT_BASE_URL`].
    /// * `.timeout(Duration)`: Optional. Per-request timeout. Defaults to [`DEFAULT_TIMEOUT`].
    ///   Ignored when `.http_client()` is given.
    /// * `.http_client(reqwest::Client)`: Optional. A preconfigured client to share.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the underlying HTTP client cannot be created.
    #[builder]
    pub fn new(
        #[builder(into)] api_key: String,
        #[builder(into)] base_url: Option<String>,
        timeout: Option<Duration>,
        http_client: Option<Client>,
    ) -> Result<Self, FetchError> {
        let http = match http_client {
            Some(client) => client,
            None => Client::builder()
                .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
                .gzip(true)
                .build()
                .map_err(FetchError::ClientBuild)?,
        };
        Ok(Self {
            http,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    /// A client with default options, using the service key from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the underlying HTTP client cannot be created.
    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::builder().api_key(settings.api_key.clone()).build()
    }

    /// The request URL for `station`, without the service key.
    ///
    /// Asks for the single most recent record of the last month in JSON.
    pub fn endpoint(&self, station: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| FetchError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("stationName", station)
            .append_pair("dataTerm", "month")
            .append_pair("pageNo", "1")
            .append_pair("numOfRows", "1")
            .append_pair("_returnType", "json");
        Ok(url)
    }

    fn authorized(&self, endpoint: &Url) -> String {
        format!("{}&ServiceKey={}", endpoint, self.api_key)
    }

    /// Performs one request for `station`.
    ///
    /// Only a `200 OK` answer is accepted; every other status is reported as
    /// [`FetchError::HttpStatus`].
    pub async fn fetch(&self, station: &str) -> Result<RawMeasurement, FetchError> {
        let endpoint = self.endpoint(station)?;
        debug!("Requesting latest measurement from {}", endpoint);

        let response = self
            .http
            .get(self.authorized(&endpoint))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest {
                station: station.to_string(),
                source: e,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("HTTP status {} for station {}", status, station);
            return Err(FetchError::HttpStatus {
                station: station.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::NetworkRequest {
                station: station.to_string(),
                source: e,
            })?;
        let parsed: MeasurementResponse =
            serde_json::from_slice(&body).map_err(|e| FetchError::JsonParse {
                station: station.to_string(),
                source: e,
            })?;

        parsed.into_latest().ok_or_else(|| FetchError::EmptyResponse {
            station: station.to_string(),
        })
    }
}

impl MeasurementFetcher for AirKoreaClient {
    async fn fetch_latest(&self, station: &str) -> Result<RawMeasurement, FetchError> {
        self.fetch(station).await
    }
}
