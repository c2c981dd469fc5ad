// Monitor HTTP client
//
// Wraps `reqwest::Client` with monitor-specific URL construction and
// decode-with-body error reporting. Every endpoint is a thin typed
// method over the shared `get`/`post` helpers — transport mechanics
// stay in this module.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{
    BrightnessRequest, BrightnessStatus, DisplayPowerRequest, DisplayPowerStatus, SourceRequest,
    SourceStatus, StatusResponse, VersionInfo,
};

/// HTTP client for one wan-watcher monitor.
///
/// All endpoints are unauthenticated and polled, never pushed. The
/// client is cheap to clone (the inner `reqwest::Client` is an `Arc`)
/// so each poll task can own a copy.
#[derive(Clone)]
pub struct MonitorClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MonitorClient {
    /// Create a client for the monitor at `base_url`
    /// (e.g. `http://wan-watcher.local`).
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The monitor base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ───────────────────────────────────────────────────

    /// Fetch the full telemetry snapshot.
    ///
    /// `GET /api/status`
    pub async fn get_status(&self) -> Result<StatusResponse, Error> {
        debug!("fetching status");
        self.get("api/status").await
    }

    /// Fetch the current display brightness and pot position.
    ///
    /// `GET /api/brightness`
    pub async fn get_brightness(&self) -> Result<BrightnessStatus, Error> {
        debug!("fetching brightness");
        self.get("api/brightness").await
    }

    /// Set the effective display brightness (clamped to 0–15 server-side).
    ///
    /// `POST /api/brightness` with `{"brightness": N}`
    pub async fn set_brightness(&self, brightness: u8) -> Result<(), Error> {
        debug!(brightness, "setting brightness");
        self.post("api/brightness", &BrightnessRequest { brightness })
            .await
    }

    /// Fetch the display power state and physical switch position.
    ///
    /// `GET /api/display-power`
    pub async fn get_display_power(&self) -> Result<DisplayPowerStatus, Error> {
        debug!("fetching display power");
        self.get("api/display-power").await
    }

    /// Turn the physical displays on or off.
    ///
    /// `POST /api/display-power` with `{"on": bool}`
    pub async fn set_display_power(&self, on: bool) -> Result<(), Error> {
        debug!(on, "setting display power");
        self.post("api/display-power", &DisplayPowerRequest { on })
            .await
    }

    /// Fetch the active bandwidth time-scale.
    ///
    /// `GET /api/bw-source`
    pub async fn get_bw_source(&self) -> Result<SourceStatus, Error> {
        debug!("fetching bandwidth source");
        self.get("api/bw-source").await
    }

    /// Select the bandwidth time-scale (`"15s"`, `"1m"`, `"5m"`, `"15m"`).
    ///
    /// `POST /api/bw-source` with `{"source": "..."}`
    pub async fn set_bw_source(&self, source: &str) -> Result<(), Error> {
        debug!(source, "setting bandwidth source");
        self.post(
            "api/bw-source",
            &SourceRequest {
                source: source.to_owned(),
            },
        )
        .await
    }

    /// Fetch build/version metadata.
    ///
    /// `GET /version.json`
    pub async fn get_version(&self) -> Result<VersionInfo, Error> {
        debug!("fetching version info");
        self.get("version.json").await
    }

    // ── Transport helpers ───────────────────────────────────────────

    fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// GET `path` and decode the JSON body, keeping the raw text for
    /// error reports when decoding fails.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint_url(path)?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                endpoint: path.to_owned(),
            });
        }
        let body = response.text().await?;
        trace!(path, bytes = body.len(), "response body received");
        serde_json::from_str(&body).map_err(|e| Error::Decode {
            endpoint: path.to_owned(),
            message: e.to_string(),
            body,
        })
    }

    /// POST a JSON body to `path`. The monitor's write endpoints return
    /// trivial acknowledgements, so the response body is discarded.
    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.endpoint_url(path)?;
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                endpoint: path.to_owned(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for MonitorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
