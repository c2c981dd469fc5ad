//! Monitor facade owning the HTTP client and every background sync loop.
//!
//! [`Monitor::start`] spawns one task per concern: the telemetry poll
//! (5 s, first fetch immediate), three control polls (2 s each), and a
//! one-shot version fetch. Each publishes through its own `watch`
//! channel with a single writer, so consumers always read the most
//! recently applied value and out-of-order completions resolve to
//! last-applied-wins. The loops are independent: a slow status poll
//! never stalls a control poll, and rendering never waits on either.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use wanview_api::{Error as ApiError, MonitorClient, StatusResponse, VersionInfo};

use crate::config::MonitorConfig;
use crate::control::OptimisticControl;
use crate::error::CoreError;
use crate::freshness::{FreshnessConfig, NEVER_UPDATED_ELAPSED};
use crate::model::{BandwidthSource, BrightnessLevels, DisplayPower, TelemetrySnapshot};

/// Wall-clock seconds since the last successful update, measured against
/// the server-declared sample time. `None` (no sample ever) maps to the
/// far-future sentinel so the freshness strip shows fully expired.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn elapsed_since(last_update: Option<DateTime<Utc>>) -> f64 {
    match last_update {
        Some(ts) => (Utc::now() - ts).num_milliseconds() as f64 / 1000.0,
        None => NEVER_UPDATED_ELAPSED,
    }
}

struct Inner {
    client: MonitorClient,
    config: MonitorConfig,
    snapshot: watch::Sender<Option<Arc<TelemetrySnapshot>>>,
    last_update: watch::Sender<Option<DateTime<Utc>>>,
    freshness: watch::Sender<FreshnessConfig>,
    brightness: Arc<OptimisticControl<BrightnessLevels>>,
    power: Arc<OptimisticControl<DisplayPower>>,
    source: Arc<OptimisticControl<BandwidthSource>>,
    version: watch::Sender<Option<VersionInfo>>,
    cancel: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// Handle to one monitored wan-watcher device.
///
/// Cheap to clone; all clones share the same sync loops and state.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<Inner>,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        let client = MonitorClient::new(config.url.clone(), config.timeout)?;
        let (snapshot, _) = watch::channel(None);
        let (last_update, _) = watch::channel(None);
        let (freshness, _) = watch::channel(FreshnessConfig::default());
        let (version, _) = watch::channel(None);

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                config,
                snapshot,
                last_update,
                freshness,
                brightness: Arc::new(OptimisticControl::new()),
                power: Arc::new(OptimisticControl::new()),
                source: Arc::new(OptimisticControl::new()),
                version,
                cancel: CancellationToken::new(),
                tasks: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Spawn all background sync loops. Requires a tokio runtime.
    pub fn start(&self) {
        let mut handles = Vec::with_capacity(5);

        info!(url = %self.inner.client.base_url(), "starting monitor sync loops");

        handles.push(tokio::spawn(status_poll_task(
            self.inner.clone(),
            self.inner.cancel.clone(),
        )));

        let period = self.inner.config.control_interval;
        {
            let client = self.inner.client.clone();
            handles.push(spawn_control_poll(
                self.inner.brightness.clone(),
                period,
                self.inner.cancel.clone(),
                "brightness",
                move || {
                    let client = client.clone();
                    async move { client.get_brightness().await.map(BrightnessLevels::from) }
                },
            ));
        }
        {
            let client = self.inner.client.clone();
            handles.push(spawn_control_poll(
                self.inner.power.clone(),
                period,
                self.inner.cancel.clone(),
                "display-power",
                move || {
                    let client = client.clone();
                    async move { client.get_display_power().await.map(DisplayPower::from) }
                },
            ));
        }
        {
            let client = self.inner.client.clone();
            handles.push(spawn_control_poll(
                self.inner.source.clone(),
                period,
                self.inner.cancel.clone(),
                "bw-source",
                move || {
                    let client = client.clone();
                    async move {
                        client
                            .get_bw_source()
                            .await
                            .map(|s| BandwidthSource::from_wire(&s.source))
                    }
                },
            ));
        }

        handles.push(tokio::spawn(version_fetch_task(self.inner.clone())));

        if let Ok(mut tasks) = self.inner.tasks.lock() {
            tasks.extend(handles);
        }
    }

    /// Stop all sync loops. Idempotent.
    pub fn stop(&self) {
        self.inner.cancel.cancel();
    }

    /// The monitor's base URL.
    pub fn url(&self) -> &url::Url {
        self.inner.client.base_url()
    }

    // ── Subscriptions ───────────────────────────────────────────────

    /// The current telemetry snapshot; `None` until the first
    /// successful poll.
    pub fn snapshot(&self) -> watch::Receiver<Option<Arc<TelemetrySnapshot>>> {
        self.inner.snapshot.subscribe()
    }

    /// Server-declared time of the last good sample.
    pub fn last_update(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.inner.last_update.subscribe()
    }

    /// Active freshness window configuration.
    pub fn freshness(&self) -> watch::Receiver<FreshnessConfig> {
        self.inner.freshness.subscribe()
    }

    pub fn brightness(&self) -> watch::Receiver<Option<BrightnessLevels>> {
        self.inner.brightness.subscribe()
    }

    pub fn display_power(&self) -> watch::Receiver<Option<DisplayPower>> {
        self.inner.power.subscribe()
    }

    pub fn bandwidth_source(&self) -> watch::Receiver<Option<BandwidthSource>> {
        self.inner.source.subscribe()
    }

    /// Device build metadata, fetched once at startup.
    pub fn version(&self) -> watch::Receiver<Option<VersionInfo>> {
        self.inner.version.subscribe()
    }

    /// The bandwidth time-scale currently in effect (firmware default
    /// until the first poll answers).
    pub fn active_source(&self) -> BandwidthSource {
        self.inner.source.current().unwrap_or_default()
    }

    // ── Optimistic writes ───────────────────────────────────────────
    //
    // Each applies the change locally first, then issues the write in a
    // detached task. A failed write is logged and NOT rolled back; the
    // next control poll reconciles the divergence.

    /// Set the effective display brightness (0–15).
    pub fn set_brightness(&self, level: u8) {
        let level = level.min(BrightnessLevels::MAX);
        let next = match self.inner.brightness.current() {
            Some(current) => current.with_effective(level),
            None => BrightnessLevels {
                effective: level,
                pot: level,
            },
        };
        self.inner.brightness.apply_local(next);

        let client = self.inner.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.set_brightness(level).await {
                warn!(error = %e, level, "brightness write failed; next poll reconciles");
            }
        });
    }

    /// Turn the physical displays on or off.
    pub fn set_display_power(&self, on: bool) {
        let next = match self.inner.power.current() {
            Some(current) => current.with_on(on),
            None => DisplayPower {
                on,
                switch_position: on,
            },
        };
        self.inner.power.apply_local(next);

        let client = self.inner.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.set_display_power(on).await {
                warn!(error = %e, on, "display power write failed; next poll reconciles");
            }
        });
    }

    /// Select the bandwidth time-scale for all displays.
    pub fn set_bandwidth_source(&self, source: BandwidthSource) {
        self.inner.source.apply_local(source);

        let client = self.inner.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.set_bw_source(source.as_wire()).await {
                warn!(error = %e, %source, "bw-source write failed; next poll reconciles");
            }
        });
    }
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("url", &self.inner.client.base_url().as_str())
            .finish_non_exhaustive()
    }
}

/// Apply one validated status payload to the shared state.
///
/// The snapshot is replaced wholesale. The last-update instant advances
/// only when the payload carried a parseable server timestamp, and the
/// freshness config is overwritten only when the payload supplied one.
/// Partial overwrites never happen on failure because this function is
/// only reached with a fully decoded payload.
fn apply_status(inner: &Inner, wire: &StatusResponse) {
    if let Some(payload) = wire.freshness {
        let cfg = FreshnessConfig::from(payload);
        inner.freshness.send_if_modified(|current| {
            if *current == cfg {
                false
            } else {
                *current = cfg;
                true
            }
        });
    }

    let snap = TelemetrySnapshot::from(wire);
    if let Some(ts) = snap.timestamp {
        inner.last_update.send_modify(|current| *current = Some(ts));
    }
    inner
        .snapshot
        .send_modify(|current| *current = Some(Arc::new(snap)));
}

/// One status fetch. Failures of either kind leave all published state
/// untouched; the next scheduled tick is the retry.
async fn poll_status_once(inner: &Inner) {
    match inner.client.get_status().await {
        Ok(wire) => {
            debug!("status poll applied");
            apply_status(inner, &wire);
        }
        Err(e) if e.is_validation() => {
            warn!(error = %e, "status payload failed validation; keeping last state");
        }
        Err(e) => {
            debug!(error = %e, "status poll transport failure; keeping last state");
        }
    }
}

/// Telemetry poll loop: immediate first fetch, then every
/// `status_interval`.
async fn status_poll_task(inner: Arc<Inner>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(inner.config.status_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => poll_status_once(&inner).await,
        }
    }
    debug!("status poll loop shut down");
}

/// Shared poll loop for the three control endpoints.
fn spawn_control_poll<T, F, Fut>(
    control: Arc<OptimisticControl<T>>,
    period: Duration,
    cancel: CancellationToken,
    name: &'static str,
    fetch: F,
) -> JoinHandle<()>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    match fetch().await {
                        Ok(state) => control.apply_remote(state),
                        Err(e) => debug!(control = name, error = %e, "control poll failed"),
                    }
                }
            }
        }
        debug!(control = name, "control poll loop shut down");
    })
}

/// One-shot version fetch; purely informational, failure is logged and
/// forgotten.
async fn version_fetch_task(inner: Arc<Inner>) {
    match inner.client.get_version().await {
        Ok(version) => {
            info!(version = %version.version, git = %version.git_hash, "monitor firmware");
            inner.version.send_modify(|v| *v = Some(version));
        }
        Err(e) => debug!(error = %e, "version fetch failed"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn monitor() -> Monitor {
        let url = url::Url::parse("http://monitor.test").unwrap();
        Monitor::new(MonitorConfig::new(url)).unwrap()
    }

    fn status_payload(with_timestamp: bool, with_freshness: bool) -> serde_json::Value {
        let link = serde_json::json!({
            "state": "up", "latency_ms": 8.0, "jitter_ms": 1.2, "loss_pct": 0.0,
            "down_mbps": 50.0, "up_mbps": 10.0,
            "down_1m": 45.0, "down_5m": 40.0, "down_15m": 35.0,
            "up_1m": 9.0, "up_5m": 8.0, "up_15m": 7.0
        });
        let mut payload = serde_json::json!({
            "wan1": link.clone(), "wan2": link.clone(), "local": link
        });
        if with_timestamp {
            payload["timestamp"] = serde_json::json!("2026-08-30T10:00:00Z");
        }
        if with_freshness {
            payload["freshness"] = serde_json::json!({
                "green_fill_end": 30.0, "green_buffer_end": 40.0,
                "yellow_fill_end": 70.0, "yellow_buffer_end": 80.0,
                "red_fill_end": 110.0, "red_buffer_end": 120.0,
                "fill_duration": 30.0
            });
        }
        payload
    }

    fn status_json(with_timestamp: bool, with_freshness: bool) -> StatusResponse {
        serde_json::from_value(status_payload(with_timestamp, with_freshness)).unwrap()
    }

    #[test]
    fn apply_status_publishes_snapshot_and_timestamp() {
        let monitor = monitor();
        apply_status(&monitor.inner, &status_json(true, false));

        let snap = monitor.snapshot().borrow().clone().unwrap();
        assert!((snap.wan1.latency_ms - 8.0).abs() < f64::EPSILON);

        let last = monitor.last_update().borrow().clone().unwrap();
        assert_eq!(last.to_rfc3339(), "2026-08-30T10:00:00+00:00");

        // No freshness block, defaults stay in force.
        assert_eq!(
            *monitor.freshness().borrow(),
            FreshnessConfig::default()
        );
    }

    #[test]
    fn missing_timestamp_keeps_previous_last_update() {
        let monitor = monitor();
        apply_status(&monitor.inner, &status_json(true, false));
        let first = monitor.last_update().borrow().clone();

        apply_status(&monitor.inner, &status_json(false, false));
        assert_eq!(monitor.last_update().borrow().clone(), first);
        // The snapshot itself was still replaced.
        assert!(monitor.snapshot().borrow().is_some());
    }

    #[test]
    fn freshness_payload_overwrites_defaults() {
        let monitor = monitor();
        apply_status(&monitor.inner, &status_json(true, true));

        let cfg = *monitor.freshness().borrow();
        assert!((cfg.red_buffer_end - 120.0).abs() < f64::EPSILON);
        assert_eq!(cfg.led_count, crate::freshness::LED_COUNT);
    }

    #[tokio::test]
    async fn failed_poll_leaves_published_state_untouched() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let url = url::Url::parse(&server.uri()).unwrap();
        let monitor = Monitor::new(MonitorConfig::new(url)).unwrap();

        // First answer is good and gets applied.
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_payload(true, true)))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        poll_status_once(&monitor.inner).await;

        let snap_before = monitor.snapshot().borrow().clone().unwrap();
        let last_before = *monitor.last_update().borrow();
        let fresh_before = *monitor.freshness().borrow();
        assert!(last_before.is_some());

        // Second answer is missing wan2 and fails validation.
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "wan1": { "state": "up" } })),
            )
            .mount(&server)
            .await;
        poll_status_once(&monitor.inner).await;

        let snap_after = monitor.snapshot().borrow().clone().unwrap();
        assert!(Arc::ptr_eq(&snap_before, &snap_after));
        assert_eq!(*monitor.last_update().borrow(), last_before);
        assert_eq!(*monitor.freshness().borrow(), fresh_before);
    }

    #[tokio::test]
    async fn set_brightness_applies_optimistically() {
        let monitor = monitor();
        monitor.inner.brightness.apply_remote(BrightnessLevels {
            effective: 8,
            pot: 8,
        });

        monitor.set_brightness(12);

        let state = monitor.brightness().borrow().unwrap();
        assert_eq!(state.effective, 12);
        assert_eq!(state.pot, 8); // physical position untouched
        assert!(state.is_override());
    }

    #[tokio::test]
    async fn set_bandwidth_source_is_immediate() {
        let monitor = monitor();
        assert_eq!(monitor.active_source(), BandwidthSource::Avg1m);

        monitor.set_bandwidth_source(BandwidthSource::Avg15m);
        assert_eq!(monitor.active_source(), BandwidthSource::Avg15m);
    }

    #[test]
    fn elapsed_sentinel_when_never_updated() {
        assert!((elapsed_since(None) - NEVER_UPDATED_ELAPSED).abs() < f64::EPSILON);
        let recent = Utc::now();
        assert!(elapsed_since(Some(recent)) < 1.0);
    }
}
