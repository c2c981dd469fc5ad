//! Monitor connection and polling configuration.

use std::time::Duration;

use url::Url;

/// Default telemetry poll interval.
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(5);
/// Default control (brightness/power/source) poll interval.
pub const DEFAULT_CONTROL_INTERVAL: Duration = Duration::from_secs(2);
/// Default per-request HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`Monitor`](crate::Monitor).
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Monitor base URL, e.g. `http://wan-watcher.local`.
    pub url: Url,
    /// `/api/status` poll interval.
    pub status_interval: Duration,
    /// Control endpoint poll interval.
    pub control_interval: Duration,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl MonitorConfig {
    /// Config with the standard polling cadence for `url`.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            status_interval: DEFAULT_STATUS_INTERVAL,
            control_interval: DEFAULT_CONTROL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
