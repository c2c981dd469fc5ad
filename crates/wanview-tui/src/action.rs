//! All possible UI actions. Actions are the sole mechanism for state
//! mutation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use wanview_core::{
    BandwidthSource, BrightnessLevels, DisplayPower, FreshnessConfig, TelemetrySnapshot,
    VersionInfo,
};

use crate::screen::ScreenId;

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    /// Numbered animation tick from the event pump.
    Tick(u64),
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Data events (from the monitor watch channels) ─────────────
    SnapshotUpdated(Arc<TelemetrySnapshot>),
    LastUpdateChanged(Option<DateTime<Utc>>),
    FreshnessChanged(FreshnessConfig),
    BrightnessChanged(Option<BrightnessLevels>),
    DisplayPowerChanged(Option<DisplayPower>),
    SourceChanged(Option<BandwidthSource>),
    VersionLoaded(VersionInfo),

    // ── Metric rotation ───────────────────────────────────────────
    /// Advance both rotations (the 5 s timer path).
    CycleMetrics,
    /// Advance only the packet metric (key / click path).
    CyclePacketMetric,
    /// Advance only the bandwidth metric (key / click path).
    CycleBandwidthMetric,

    // ── Control writes (optimistic, no rollback) ──────────────────
    SetBrightness(u8),
    ToggleDisplayPower,
    SetSource(BandwidthSource),
}
