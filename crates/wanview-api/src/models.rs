// Wire-level payload models for the monitor's HTTP API.
//
// These mirror the JSON the firmware emits. Canonical domain types
// (enums, units, derived values) live in `wanview-core`; this crate
// stays at the transport boundary.

use serde::{Deserialize, Serialize};

/// Full `/api/status` payload: one section per monitored link plus
/// router-level metadata.
///
/// `wan1`, `wan2`, and `local` are required; a payload missing any of
/// them fails deserialization, which the sync loop treats as a
/// validation error (existing state is left untouched).
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub wan1: LinkStatus,
    pub wan2: LinkStatus,
    pub local: LinkStatus,
    pub router_ip: Option<String>,
    /// Server-declared sample time (RFC 3339). Authoritative for
    /// freshness; wall-clock receipt time is never used.
    pub timestamp: Option<String>,
    /// Optional freshness window overrides. Absent on older firmware;
    /// client-side defaults apply until the first payload carries one.
    pub freshness: Option<FreshnessPayload>,
}

/// Health and bandwidth figures for one monitored link.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkStatus {
    /// `"up"`, `"degraded"`, or `"down"`.
    pub state: String,
    pub latency_ms: f64,
    pub jitter_ms: f64,
    /// May be fractional.
    pub loss_pct: f64,
    pub monitor_ip: Option<String>,
    pub gateway_ip: Option<String>,
    pub local_ip: Option<String>,
    /// Instantaneous (15 s sample) bandwidth, Mbps.
    pub down_mbps: f64,
    pub up_mbps: f64,
    /// EWMA bandwidth averages, Mbps.
    pub down_1m: f64,
    pub down_5m: f64,
    pub down_15m: f64,
    pub up_1m: f64,
    pub up_5m: f64,
    pub up_15m: f64,
}

/// Freshness timing boundaries, seconds. The LED count is a client-side
/// constant; the firmware only ships the window boundaries.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FreshnessPayload {
    pub green_fill_end: f64,
    pub green_buffer_end: f64,
    pub yellow_fill_end: f64,
    pub yellow_buffer_end: f64,
    pub red_fill_end: f64,
    pub red_buffer_end: f64,
    pub fill_duration: f64,
}

/// `/api/brightness` state: software-effective level plus the physical
/// potentiometer position (0–15 each). They diverge after a software
/// override until the pot is moved again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BrightnessStatus {
    pub brightness: u8,
    pub pot_level: u8,
}

/// `POST /api/brightness` body.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BrightnessRequest {
    pub brightness: u8,
}

/// `/api/display-power` state: effective on/off plus the physical
/// switch position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DisplayPowerStatus {
    pub on: bool,
    pub switch_position: bool,
}

/// `POST /api/display-power` body.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DisplayPowerRequest {
    pub on: bool,
}

/// `/api/bw-source` state: which bandwidth time-scale the displays show
/// (`"15s"`, `"1m"`, `"5m"`, or `"15m"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceStatus {
    pub source: String,
}

/// `POST /api/bw-source` body.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRequest {
    pub source: String,
}

/// `/version.json` build metadata, purely informational.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub git_hash_full: String,
    pub build_time: String,
}
