//! Canonical domain types built from the wire payloads in `wanview-api`.

mod controls;
mod link;
mod snapshot;

pub use controls::{BrightnessLevels, DisplayPower};
pub use link::{BandwidthPair, BandwidthSource, BandwidthWindows, LinkId, LinkState};
pub use snapshot::{LinkTelemetry, TelemetrySnapshot};
