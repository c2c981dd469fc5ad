//! Domain logic between `wanview-api` and the TUI.
//!
//! This crate owns everything algorithmic about the dashboard:
//!
//! - **[`Monitor`]**: Central facade managing the full lifecycle:
//!   [`start()`](Monitor::start) spawns the status poll loop (5 s), the
//!   three control poll loops (2 s), and a one-off version fetch, all
//!   publishing through `tokio::sync::watch` channels.
//!
//! - **[`FreshnessConfig`]**: The six-window freshness classifier: maps
//!   elapsed time since the last good sample to red/yellow/green cell
//!   counts plus the terminal blink flag, and carries the single
//!   authoritative [`is_stale`](FreshnessConfig::is_stale) predicate.
//!
//! - **[`SegmentFrame`]**: Simulated four-position seven-segment
//!   rendering: glyph-to-segment lookup, the fixed-width value window,
//!   and the dashes fallback for down/stale data.
//!
//! - **[`RotationState`]**: The two independent cyclic metric selectors
//!   shared by every display group (latency/jitter/loss, down/up).
//!
//! - **[`OptimisticControl`]**: Local-first control state (brightness,
//!   display power, bandwidth source): optimistic apply, periodic remote
//!   reconcile, write with no rollback.

pub mod config;
pub mod control;
pub mod error;
pub mod freshness;
pub mod model;
pub mod monitor;
pub mod rotation;
pub mod segment;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::MonitorConfig;
pub use control::OptimisticControl;
pub use error::CoreError;
pub use freshness::{CellColor, FreshnessConfig, FreshnessLevels, NEVER_UPDATED_ELAPSED};
pub use monitor::{Monitor, elapsed_since};
pub use rotation::{BandwidthMetric, PacketMetric, RotationState};
pub use segment::{SegmentFrame, SegmentGlyph};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    BandwidthPair, BandwidthSource, BandwidthWindows, BrightnessLevels, DisplayPower, LinkId,
    LinkState, LinkTelemetry, TelemetrySnapshot,
};

// The device build metadata passes through unchanged.
pub use wanview_api::VersionInfo;
