//! This module provides the main entry point of the crate: a monitor that keeps
//! the air-quality grade of one AirKorea station up to date, either by polling
//! in the background (push) or by refreshing on request (pull).

use crate::classify::classify;
use crate::config::error::ConfigError;
use crate::config::settings::{PollingMode, Settings};
use crate::error::AirKoreaError;
use crate::fetch::error::FetchError;
use crate::fetch::MeasurementFetcher;
use crate::observer::ConditionsObserver;
use crate::types::accessory::AccessoryInfo;
use crate::types::conditions::CurrentConditions;
use crate::types::grade::Grade;
use crate::types::measurement::RawMeasurement;
use bon::bon;
use chrono::Utc;
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// State shared between the monitor handle and its polling task.
struct Shared<F, O> {
    settings: Settings,
    fetcher: F,
    observer: O,
    conditions: watch::Sender<CurrentConditions>,
    status_active: AtomicBool,
    // Held for the whole of a refresh cycle so cycles never overlap.
    cycle: Mutex<()>,
}

impl<F: MeasurementFetcher, O: ConditionsObserver> Shared<F, O> {
    /// One fetch-classify cycle. Never fails: on any fetch problem the previous
    /// conditions are kept and returned.
    async fn refresh(&self) -> CurrentConditions {
        let _cycle = self.cycle.lock().await;

        let fetched = self.fetcher.fetch_latest(&self.settings.station).await;
        match fetched {
            Ok(raw) => self.accept(raw),
            Err(e) => {
                self.reject(&e);
                self.snapshot()
            }
        }
    }

    fn snapshot(&self) -> CurrentConditions {
        self.conditions.borrow().clone()
    }

    fn accept(&self, raw: RawMeasurement) -> CurrentConditions {
        debug!("Time is: {}", raw.data_time.as_deref().unwrap_or("-"));
        debug!("Station is: {}", raw.station_name.as_deref().unwrap_or("-"));

        let classification = classify(&raw, &self.settings.criteria);
        debug!(
            "Current grades: khai {}, pm10 {}, pm25 {} => {} ({})",
            classification.khai_grade,
            classification.pm10_grade,
            classification.pm25_grade,
            classification.overall,
            self.settings.criteria
        );

        let mut next = self.snapshot();
        next.apply(&classification, raw.data_time.as_deref(), Utc::now());
        self.conditions.send_replace(next.clone());

        self.set_status_active(true);
        for (pollutant, value) in classification.densities() {
            debug!("Current {} density is: {}", pollutant, value);
            self.observer.on_density(pollutant, value);
        }
        if let Some(label) = raw.data_time.as_deref() {
            self.observer.on_data_time(label);
        }
        next
    }

    fn reject(&self, err: &FetchError) {
        let detail = std::error::Error::source(err)
            .map(|source| format!(": {}", source))
            .unwrap_or_default();
        match err {
            FetchError::HttpStatus { status, .. } => error!("Response: {}", status),
            _ if err.is_transport() => error!("Unknown error: {}{}", err, detail),
            _ => error!("{}{}", err, detail),
        }
        self.set_status_active(false);
    }

    fn set_status_active(&self, active: bool) {
        self.status_active.store(active, Ordering::SeqCst);
        self.observer.set_status_active(active);
    }
}

async fn poll_loop<F, O>(shared: Arc<Shared<F, O>>, interval: Duration, cancel: CancellationToken)
where
    F: MeasurementFetcher,
    O: ConditionsObserver,
{
    debug!(
        "Polling station {} every {:?}",
        shared.settings.station, interval
    );
    loop {
        // The wait restarts after each cycle, so a slow fetch pushes the next
        // cycle back by its own duration.
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
        debug!("Polling");
        let conditions = shared.refresh().await;
        shared.observer.on_grade(conditions.air_quality);
    }
    debug!("Polling stopped for station {}", shared.settings.station);
}

/// Keeps the air-quality grade of one station current.
///
/// The monitor owns the [`CurrentConditions`] snapshot. Each refresh cycle
/// fetches the latest record, classifies it, merges it into the snapshot and
/// notifies the [`ConditionsObserver`]. Cycles never overlap: a pull request
/// that arrives while the background task is mid-cycle waits for it.
///
/// When the settings enable polling, construction spawns a background task on
/// the current tokio runtime that runs its first cycle after one interval and
/// then one cycle per interval, reporting each resulting grade through
/// [`ConditionsObserver::on_grade`]. The task stops on [`stop`](Self::stop),
/// [`shutdown`](Self::shutdown), or when the monitor is dropped.
///
/// # Examples
///
/// ```no_run
/// # use airkorea::{AirKoreaClient, AirKoreaError, AirQualityMonitor, LoggingObserver, Settings};
/// # #[tokio::main]
/// # async fn main() -> Result<(), AirKoreaError> {
/// let settings = Settings::new("my-service-key", "종로구");
/// let client = AirKoreaClient::from_settings(&settings)?;
///
/// let monitor = AirQualityMonitor::builder()
///     .observer(LoggingObserver::new(settings.station.clone()))
///     .settings(settings)
///     .fetcher(client)
///     .build()?;
///
/// // Pull mode: every call performs one fetch.
/// let grade = monitor.current_grade().await;
/// println!("Air quality is {}", grade);
/// # Ok(())
/// # }
/// ```
pub struct AirQualityMonitor<F: MeasurementFetcher, O: ConditionsObserver> {
    shared: Arc<Shared<F, O>>,
    cancel: CancellationToken,
    poll_task: Option<JoinHandle<()>>,
}

#[bon]
impl<F: MeasurementFetcher, O: ConditionsObserver> AirQualityMonitor<F, O> {
    /// Creates a monitor and, in push mode, starts its polling task.
    ///
    /// # Arguments
    ///
    /// * `.settings(Settings)`: **Required.** Validated configuration.
    /// * `.fetcher(F)`: **Required.** Source of measurement records.
    /// * `.observer(O)`: **Required.** Receiver of notifications.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] or [`ConfigError::MissingStation`]
    /// when either is empty, and [`AirKoreaError::RuntimeUnavailable`] if
    /// polling is enabled and no tokio runtime is running. Pull-mode monitors
    /// can be created anywhere.
    #[builder]
    pub fn new(settings: Settings, fetcher: F, observer: O) -> Result<Self, AirKoreaError> {
        if settings.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }
        if settings.station.trim().is_empty() {
            return Err(ConfigError::MissingStation.into());
        }
        let mode = settings.mode();
        let (conditions, _) = watch::channel(CurrentConditions::default());
        let shared = Arc::new(Shared {
            settings,
            fetcher,
            observer,
            conditions,
            status_active: AtomicBool::new(false),
            cycle: Mutex::new(()),
        });

        let cancel = CancellationToken::new();
        let poll_task = match mode {
            PollingMode::Push { interval } => {
                let runtime = Handle::try_current()?;
                Some(runtime.spawn(poll_loop(Arc::clone(&shared), interval, cancel.clone())))
            }
            PollingMode::Pull => None,
        };
        debug!(
            "Polling is {}",
            if poll_task.is_some() { "enabled" } else { "disabled" }
        );

        Ok(Self {
            shared,
            cancel,
            poll_task,
        })
    }

    /// Performs one refresh cycle and returns the resulting overall grade.
    ///
    /// On any fetch failure the previously stored grade is returned, which is
    /// `Unknown` if no cycle has ever succeeded.
    pub async fn current_grade(&self) -> Grade {
        self.refresh().await.air_quality
    }

    /// Performs one refresh cycle and returns the resulting snapshot.
    pub async fn refresh(&self) -> CurrentConditions {
        self.shared.refresh().await
    }

    /// The cached snapshot, without contacting the service.
    pub fn conditions(&self) -> CurrentConditions {
        self.shared.snapshot()
    }

    /// A receiver that sees every snapshot stored from now on.
    pub fn subscribe(&self) -> watch::Receiver<CurrentConditions> {
        self.shared.conditions.subscribe()
    }

    /// Whether the last cycle succeeded. `false` before the first cycle.
    pub fn is_status_active(&self) -> bool {
        self.shared.status_active.load(Ordering::SeqCst)
    }

    pub fn settings(&self) -> &Settings {
        &self.shared.settings
    }

    pub fn mode(&self) -> PollingMode {
        self.shared.settings.mode()
    }

    pub fn accessory_info(&self) -> AccessoryInfo {
        self.shared.settings.accessory_info()
    }

    /// Answers a host "identify" request.
    pub fn identify(&self) {
        info!("Identified: {}", self.shared.settings.name);
    }

    /// Whether the background polling task is still running.
    pub fn is_polling(&self) -> bool {
        self.poll_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Signals the polling task to stop. A cycle already in progress finishes
    /// first; no new cycle starts.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Stops the polling task and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns [`AirKoreaError::TaskJoin`] if the task panicked.
    pub async fn shutdown(mut self) -> Result<(), AirKoreaError> {
        self.cancel.cancel();
        if let Some(task) = self.poll_task.take() {
            task.await?;
        }
        Ok(())
    }
}

impl<F: MeasurementFetcher, O: ConditionsObserver> Drop for AirQualityMonitor<F, O> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::criteria::Criteria;
    use crate::types::pollutant::Pollutant;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;
    use tokio::time::sleep;

    const HOUR: Duration = Duration::from_secs(3600);
    const MINUTE: Duration = Duration::from_secs(60);

    #[derive(Default)]
    struct FakeFetcher {
        responses: StdMutex<VecDeque<Result<RawMeasurement, FetchError>>>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeFetcher {
        fn with(responses: Vec<Result<RawMeasurement, FetchError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: StdMutex::new(responses.into()),
                ..Default::default()
            })
        }
    }

    impl MeasurementFetcher for Arc<FakeFetcher> {
        async fn fetch_latest(&self, station: &str) -> Result<RawMeasurement, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let next = self.responses.lock().unwrap().pop_front();
            tokio::task::yield_now().await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            next.unwrap_or_else(|| {
                Err(FetchError::EmptyResponse {
                    station: station.to_string(),
                })
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Grade(Grade),
        Status(bool),
        Density(Pollutant, f64),
        DataTime(String),
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: StdMutex<Vec<Event>>,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        fn grades(&self) -> Vec<Grade> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    Event::Grade(grade) => Some(grade),
                    _ => None,
                })
                .collect()
        }
    }

    impl ConditionsObserver for RecordingObserver {
        fn on_grade(&self, grade: Grade) {
            self.events.lock().unwrap().push(Event::Grade(grade));
        }
        fn set_status_active(&self, active: bool) {
            self.events.lock().unwrap().push(Event::Status(active));
        }
        fn on_density(&self, pollutant: Pollutant, value: f64) {
            self.events.lock().unwrap().push(Event::Density(pollutant, value));
        }
        fn on_data_time(&self, label: &str) {
            self.events.lock().unwrap().push(Event::DataTime(label.to_string()));
        }
    }

    fn record(pm10: Option<f64>, pm25: Option<f64>) -> RawMeasurement {
        RawMeasurement {
            data_time: Some("2024-03-01 13:00".to_string()),
            station_name: Some("종로구".to_string()),
            pm10_value: pm10,
            pm25_value: pm25,
            ..Default::default()
        }
    }

    fn settings(polling: bool) -> Settings {
        Settings {
            polling,
            interval: HOUR,
            criteria: Criteria::parse("khai,pm10,pm25"),
            ..Settings::new("key", "종로구")
        }
    }

    async fn transport_error() -> FetchError {
        let source = reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .unwrap_err();
        FetchError::NetworkRequest {
            station: "종로구".to_string(),
            source,
        }
    }

    fn upstream_error() -> FetchError {
        FetchError::HttpStatus {
            station: "종로구".to_string(),
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn monitor(
        polling: bool,
        fetcher: &Arc<FakeFetcher>,
        observer: &Arc<RecordingObserver>,
    ) -> AirQualityMonitor<Arc<FakeFetcher>, Arc<RecordingObserver>> {
        AirQualityMonitor::builder()
            .settings(settings(polling))
            .fetcher(Arc::clone(fetcher))
            .observer(Arc::clone(observer))
            .build()
            .expect("monitor should build")
    }

    #[tokio::test]
    async fn test_pull_cycle_grades_worst_selected_pollutant() {
        let fetcher = FakeFetcher::with(vec![Ok(record(Some(25.0), Some(40.0)))]);
        let observer = Arc::new(RecordingObserver::default());
        let monitor = monitor(false, &fetcher, &observer);

        assert_eq!(monitor.current_grade().await, Grade::Inferior);

        let conditions = monitor.conditions();
        assert_eq!(conditions.pm10, Some(25.0));
        assert_eq!(conditions.pm25, Some(40.0));
        assert_eq!(conditions.khai, None);
        assert_eq!(conditions.air_quality, Grade::Inferior);
        assert!(monitor.is_status_active());
        assert_eq!(
            observer.events(),
            vec![
                Event::Status(true),
                Event::Density(Pollutant::Pm10, 25.0),
                Event::Density(Pollutant::Pm25, 40.0),
                Event::DataTime("2024-03-01 13:00".to_string()),
            ]
        );
        assert!(observer.grades().is_empty(), "pull cycles do not push grades");
    }

    #[tokio::test]
    async fn test_each_pull_performs_exactly_one_fetch() {
        let fetcher = FakeFetcher::with(vec![
            Ok(record(Some(10.0), None)),
            Ok(record(Some(200.0), None)),
        ]);
        let observer = Arc::new(RecordingObserver::default());
        let monitor = monitor(false, &fetcher, &observer);

        assert_eq!(monitor.current_grade().await, Grade::Good);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(monitor.current_grade().await, Grade::Poor);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(monitor.conditions().air_quality, Grade::Poor);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2, "reading the cache never fetches");
    }

    #[tokio::test]
    async fn test_transport_error_keeps_previous_conditions() {
        let fetcher = FakeFetcher::with(vec![
            Ok(record(Some(90.0), Some(20.0))),
            Err(transport_error().await),
        ]);
        let observer = Arc::new(RecordingObserver::default());
        let monitor = monitor(false, &fetcher, &observer);

        let before = monitor.refresh().await;
        assert!(monitor.is_status_active());

        let grade = monitor.current_grade().await;
        assert_eq!(grade, Grade::Inferior, "last known grade is retained");
        assert_eq!(monitor.conditions(), before);
        assert!(!monitor.is_status_active());
        assert_eq!(observer.events().last(), Some(&Event::Status(false)));
    }

    #[tokio::test]
    async fn test_upstream_error_before_any_success_is_unknown() {
        let fetcher = FakeFetcher::with(vec![Err(upstream_error())]);
        let observer = Arc::new(RecordingObserver::default());
        let monitor = monitor(false, &fetcher, &observer);

        assert_eq!(monitor.current_grade().await, Grade::Unknown);
        assert_eq!(monitor.conditions(), CurrentConditions::default());
        assert_eq!(observer.events(), vec![Event::Status(false)]);
    }

    #[tokio::test]
    async fn test_missing_field_keeps_previous_value() {
        let fetcher = FakeFetcher::with(vec![
            Ok(record(Some(90.0), Some(20.0))),
            Ok(record(None, Some(5.0))),
        ]);
        let observer = Arc::new(RecordingObserver::default());
        let monitor = monitor(false, &fetcher, &observer);

        monitor.refresh().await;
        let conditions = monitor.refresh().await;
        assert_eq!(conditions.pm10, Some(90.0));
        assert_eq!(conditions.pm25, Some(5.0));
        assert_eq!(conditions.air_quality, Grade::Good);
    }

    #[tokio::test]
    async fn test_concurrent_pulls_never_overlap() {
        let fetcher = FakeFetcher::with(vec![
            Ok(record(Some(10.0), None)),
            Ok(record(Some(50.0), None)),
        ]);
        let observer = Arc::new(RecordingObserver::default());
        let monitor = monitor(false, &fetcher, &observer);

        let (first, second) = tokio::join!(monitor.current_grade(), monitor.current_grade());
        let mut grades = vec![first, second];
        grades.sort();
        assert_eq!(grades, vec![Grade::Good, Grade::Fair]);
        assert_eq!(fetcher.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_new_snapshots() {
        let fetcher = FakeFetcher::with(vec![Ok(record(Some(160.0), None))]);
        let observer = Arc::new(RecordingObserver::default());
        let monitor = monitor(false, &fetcher, &observer);
        let mut updates = monitor.subscribe();

        monitor.refresh().await;
        updates.changed().await.expect("sender is alive");
        assert_eq!(updates.borrow().air_quality, Grade::Poor);
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_mode_polls_once_per_interval() {
        let fetcher = FakeFetcher::with(vec![
            Ok(record(Some(25.0), Some(40.0))),
            Ok(record(Some(200.0), None)),
        ]);
        let observer = Arc::new(RecordingObserver::default());
        let monitor = monitor(true, &fetcher, &observer);
        assert!(monitor.is_polling());

        sleep(HOUR - MINUTE).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0, "no cycle before one interval");

        sleep(2 * MINUTE).await;
        assert_eq!(observer.grades(), vec![Grade::Inferior]);

        sleep(HOUR).await;
        assert_eq!(observer.grades(), vec![Grade::Inferior, Grade::Poor]);
        assert_eq!(monitor.conditions().air_quality, Grade::Poor);

        monitor.shutdown().await.unwrap();
        sleep(5 * HOUR).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2, "no cycles after shutdown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_mode_reports_retained_grade_on_failure() {
        let fetcher = FakeFetcher::with(vec![
            Ok(record(Some(40.0), None)),
            Err(upstream_error()),
        ]);
        let observer = Arc::new(RecordingObserver::default());
        let monitor = monitor(true, &fetcher, &observer);

        sleep(2 * HOUR + MINUTE).await;
        assert_eq!(observer.grades(), vec![Grade::Fair, Grade::Fair]);
        assert!(!monitor.is_status_active());

        monitor.stop();
        sleep(3 * HOUR).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert!(!monitor.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_monitor_stops_polling() {
        let fetcher = FakeFetcher::with(vec![]);
        let observer = Arc::new(RecordingObserver::default());
        drop(monitor(true, &fetcher, &observer));

        sleep(3 * HOUR).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_push_mode_requires_a_runtime() {
        let fetcher = FakeFetcher::with(vec![]);
        let result = AirQualityMonitor::builder()
            .settings(settings(true))
            .fetcher(fetcher)
            .observer(Arc::new(RecordingObserver::default()))
            .build();
        assert!(matches!(result, Err(AirKoreaError::RuntimeUnavailable(_))));
    }

    #[test]
    fn test_pull_mode_needs_no_runtime() {
        let fetcher = FakeFetcher::with(vec![]);
        let observer = Arc::new(RecordingObserver::default());
        let monitor = monitor(false, &fetcher, &observer);
        assert!(!monitor.is_polling());
        assert_eq!(monitor.mode(), PollingMode::Pull);
        assert!(!monitor.is_status_active());
        assert_eq!(monitor.accessory_info().serial_number, "종로구");
    }

    #[test]
    fn test_empty_credentials_are_rejected() {
        let build = |settings: Settings| {
            AirQualityMonitor::builder()
                .settings(settings)
                .fetcher(FakeFetcher::with(vec![]))
                .observer(Arc::new(RecordingObserver::default()))
                .build()
        };

        assert!(matches!(
            build(Settings::new("", "종로구")),
            Err(AirKoreaError::Config(ConfigError::MissingApiKey))
        ));
        assert!(matches!(
            build(Settings::new("key", "")),
            Err(AirKoreaError::Config(ConfigError::MissingStation))
        ));
        assert!(matches!(
            build(Settings::new("", "")),
            Err(AirKoreaError::Config(ConfigError::MissingApiKey))
        ));
    }
}
