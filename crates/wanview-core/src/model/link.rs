// Link identity, health state, and bandwidth figures.

use std::fmt;
use std::ops::Add;

use strum::EnumIter;

/// The three monitored rows on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum LinkId {
    Wan1,
    Wan2,
    /// The router itself, probed by the local pinger. Its bandwidth row
    /// is derived (WAN1 + WAN2), not measured.
    Local,
}

impl LinkId {
    /// Short row label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Wan1 => "WAN1",
            Self::Wan2 => "WAN2",
            Self::Local => "LOCAL",
        }
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Health state of one link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    Up,
    Degraded,
    /// Unknown wire values also land here — the conservative reading.
    #[default]
    Down,
}

impl LinkState {
    /// Parse the wire string, defaulting to `Down` for anything
    /// unrecognized.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "up" => Self::Up,
            "degraded" => Self::Degraded,
            _ => Self::Down,
        }
    }

    /// Uppercase label for table cells.
    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Degraded => "DEGRADED",
            Self::Down => "DOWN",
        }
    }

    pub fn is_down(self) -> bool {
        matches!(self, Self::Down)
    }
}

/// Which bandwidth time-scale the displays show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
pub enum BandwidthSource {
    /// Raw 15-second sample.
    Instant,
    /// 1-minute EWMA (the firmware default).
    #[default]
    Avg1m,
    Avg5m,
    Avg15m,
}

impl BandwidthSource {
    pub const ALL: [Self; 4] = [Self::Instant, Self::Avg1m, Self::Avg5m, Self::Avg15m];

    /// Wire string used by `/api/bw-source`.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Instant => "15s",
            Self::Avg1m => "1m",
            Self::Avg5m => "5m",
            Self::Avg15m => "15m",
        }
    }

    /// Parse the wire string. Unknown values fall back to the
    /// 1-minute firmware default.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "15s" => Self::Instant,
            "5m" => Self::Avg5m,
            "15m" => Self::Avg15m,
            _ => Self::Avg1m,
        }
    }

    /// Next scale in selector order (wraps around).
    pub fn next(self) -> Self {
        match self {
            Self::Instant => Self::Avg1m,
            Self::Avg1m => Self::Avg5m,
            Self::Avg5m => Self::Avg15m,
            Self::Avg15m => Self::Instant,
        }
    }

    /// Human label for the selector UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Instant => "15 sec",
            Self::Avg1m => "1 min avg",
            Self::Avg5m => "5 min avg",
            Self::Avg15m => "15 min avg",
        }
    }
}

impl fmt::Display for BandwidthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A down/up rate pair in Mbps.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BandwidthPair {
    pub down: f64,
    pub up: f64,
}

impl Add for BandwidthPair {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            down: self.down + rhs.down,
            up: self.up + rhs.up,
        }
    }
}

/// Bandwidth at all four time-scales for one link.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BandwidthWindows {
    pub instant: BandwidthPair,
    pub avg_1m: BandwidthPair,
    pub avg_5m: BandwidthPair,
    pub avg_15m: BandwidthPair,
}

impl BandwidthWindows {
    /// The pair for the selected time-scale.
    pub fn at(&self, source: BandwidthSource) -> BandwidthPair {
        match source {
            BandwidthSource::Instant => self.instant,
            BandwidthSource::Avg1m => self.avg_1m,
            BandwidthSource::Avg5m => self.avg_5m,
            BandwidthSource::Avg15m => self.avg_15m,
        }
    }
}
