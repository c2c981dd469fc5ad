// wanview-api: Async Rust client for the wan-watcher monitor HTTP API

pub mod client;
pub mod error;
pub mod models;

pub use client::MonitorClient;
pub use error::Error;
pub use models::{
    BrightnessStatus, DisplayPowerStatus, FreshnessPayload, LinkStatus, SourceStatus,
    StatusResponse, VersionInfo,
};
