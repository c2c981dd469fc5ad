//! Cyclic metric selection for the segmented displays.
//!
//! Two independent small indices: the packet group cycles
//! latency → jitter → loss, the bandwidth group cycles down → up. A 5 s
//! timer advances both together; a click or key on one display group
//! advances only that group. Rotation selects what to show — it never
//! touches the telemetry itself, and every re-render goes back through
//! the staleness/down-state policy.

use crate::model::{BandwidthPair, LinkTelemetry};

/// Packet-quality metric shown on the packet displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacketMetric {
    #[default]
    Latency,
    Jitter,
    Loss,
}

impl PacketMetric {
    pub const COUNT: usize = 3;

    /// One-character mode glyph shown as the display prefix.
    pub fn prefix(self) -> char {
        match self {
            Self::Latency => 'L',
            Self::Jitter => 'J',
            Self::Loss => 'P',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Jitter => "jitter",
            Self::Loss => "loss",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Latency => Self::Jitter,
            Self::Jitter => Self::Loss,
            Self::Loss => Self::Latency,
        }
    }

    /// Pull this metric's value out of a link row.
    pub fn value(self, link: &LinkTelemetry) -> f64 {
        match self {
            Self::Latency => link.latency_ms,
            Self::Jitter => link.jitter_ms,
            Self::Loss => link.loss_pct,
        }
    }
}

/// Transfer direction shown on the bandwidth displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandwidthMetric {
    #[default]
    Down,
    Up,
}

impl BandwidthMetric {
    pub const COUNT: usize = 2;

    pub fn prefix(self) -> char {
        match self {
            Self::Down => 'd',
            Self::Up => 'U',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Down => "download",
            Self::Up => "upload",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
        }
    }

    pub fn value(self, pair: BandwidthPair) -> f64 {
        match self {
            Self::Down => pair.down,
            Self::Up => pair.up,
        }
    }
}

/// Current selection for both display groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationState {
    pub packet: PacketMetric,
    pub bandwidth: BandwidthMetric,
}

impl RotationState {
    /// Timer tick: both groups advance together.
    pub fn advance(&mut self) {
        self.packet = self.packet.next();
        self.bandwidth = self.bandwidth.next();
    }

    /// User selection on a packet display.
    pub fn advance_packet(&mut self) {
        self.packet = self.packet.next();
    }

    /// User selection on a bandwidth display.
    pub fn advance_bandwidth(&mut self) {
        self.bandwidth = self.bandwidth.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_metric_wraps_mod_three() {
        let mut m = PacketMetric::default();
        let seen: Vec<PacketMetric> = (0..7)
            .map(|_| {
                let current = m;
                m = m.next();
                current
            })
            .collect();
        assert_eq!(
            seen,
            vec![
                PacketMetric::Latency,
                PacketMetric::Jitter,
                PacketMetric::Loss,
                PacketMetric::Latency,
                PacketMetric::Jitter,
                PacketMetric::Loss,
                PacketMetric::Latency,
            ]
        );
    }

    #[test]
    fn bandwidth_metric_wraps_mod_two() {
        let mut m = BandwidthMetric::default();
        let seen: Vec<BandwidthMetric> = (0..5)
            .map(|_| {
                let current = m;
                m = m.next();
                current
            })
            .collect();
        assert_eq!(
            seen,
            vec![
                BandwidthMetric::Down,
                BandwidthMetric::Up,
                BandwidthMetric::Down,
                BandwidthMetric::Up,
                BandwidthMetric::Down,
            ]
        );
    }

    #[test]
    fn timer_advance_moves_both_groups_by_one() {
        let mut rotation = RotationState::default();
        rotation.advance();
        assert_eq!(rotation.packet, PacketMetric::Jitter);
        assert_eq!(rotation.bandwidth, BandwidthMetric::Up);

        rotation.advance();
        assert_eq!(rotation.packet, PacketMetric::Loss);
        assert_eq!(rotation.bandwidth, BandwidthMetric::Down);
    }

    #[test]
    fn group_advances_are_independent() {
        let mut rotation = RotationState::default();
        rotation.advance_packet();
        assert_eq!(rotation.packet, PacketMetric::Jitter);
        assert_eq!(rotation.bandwidth, BandwidthMetric::Down);

        rotation.advance_bandwidth();
        assert_eq!(rotation.packet, PacketMetric::Jitter);
        assert_eq!(rotation.bandwidth, BandwidthMetric::Up);
    }

    #[test]
    fn prefixes_match_display_glyphs() {
        assert_eq!(PacketMetric::Latency.prefix(), 'L');
        assert_eq!(PacketMetric::Jitter.prefix(), 'J');
        assert_eq!(PacketMetric::Loss.prefix(), 'P');
        assert_eq!(BandwidthMetric::Down.prefix(), 'd');
        assert_eq!(BandwidthMetric::Up.prefix(), 'U');
    }
}
