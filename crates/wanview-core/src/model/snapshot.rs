// Telemetry snapshot: one per successful status poll.

use chrono::{DateTime, Utc};
use tracing::debug;

use wanview_api::{LinkStatus, StatusResponse};

use super::link::{BandwidthPair, BandwidthSource, BandwidthWindows, LinkId, LinkState};

/// Health and bandwidth figures for one monitored link.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkTelemetry {
    pub state: LinkState,
    pub latency_ms: f64,
    pub jitter_ms: f64,
    pub loss_pct: f64,
    pub monitor_ip: Option<String>,
    pub gateway_ip: Option<String>,
    pub local_ip: Option<String>,
    pub bandwidth: BandwidthWindows,
}

impl From<&LinkStatus> for LinkTelemetry {
    fn from(wire: &LinkStatus) -> Self {
        Self {
            state: LinkState::from_wire(&wire.state),
            latency_ms: wire.latency_ms,
            jitter_ms: wire.jitter_ms,
            loss_pct: wire.loss_pct,
            monitor_ip: wire.monitor_ip.clone(),
            gateway_ip: wire.gateway_ip.clone(),
            local_ip: wire.local_ip.clone(),
            bandwidth: BandwidthWindows {
                instant: BandwidthPair {
                    down: wire.down_mbps,
                    up: wire.up_mbps,
                },
                avg_1m: BandwidthPair {
                    down: wire.down_1m,
                    up: wire.up_1m,
                },
                avg_5m: BandwidthPair {
                    down: wire.down_5m,
                    up: wire.up_5m,
                },
                avg_15m: BandwidthPair {
                    down: wire.down_15m,
                    up: wire.up_15m,
                },
            },
        }
    }
}

/// One validated telemetry sample.
///
/// Owned exclusively by the status sync loop and replaced wholesale on
/// every successful poll, never partially mutated. Expiry is a derived
/// condition of elapsed time, not a state transition: the last good
/// values stay available until superseded.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    pub wan1: LinkTelemetry,
    pub wan2: LinkTelemetry,
    pub local: LinkTelemetry,
    pub router_ip: Option<String>,
    /// Server-declared sample time. `None` when the payload omitted the
    /// timestamp or it failed to parse. The previous last-update
    /// instant then stays in force.
    pub timestamp: Option<DateTime<Utc>>,
}

impl TelemetrySnapshot {
    /// The telemetry row for a link.
    pub fn link(&self, id: LinkId) -> &LinkTelemetry {
        match id {
            LinkId::Wan1 => &self.wan1,
            LinkId::Wan2 => &self.wan2,
            LinkId::Local => &self.local,
        }
    }

    /// Measured bandwidth of one WAN at the selected time-scale. For
    /// `Local` this is the derived sum, see [`local_bandwidth`].
    ///
    /// [`local_bandwidth`]: Self::local_bandwidth
    pub fn link_bandwidth(&self, id: LinkId, source: BandwidthSource) -> BandwidthPair {
        match id {
            LinkId::Wan1 => self.wan1.bandwidth.at(source),
            LinkId::Wan2 => self.wan2.bandwidth.at(source),
            LinkId::Local => self.local_bandwidth(source),
        }
    }

    /// The local row's bandwidth: the arithmetic sum of both WANs at the
    /// same time-scale. Computed regardless of either WAN's down-state:
    /// the local row represents the router, so only the global staleness
    /// override dashes it out.
    pub fn local_bandwidth(&self, source: BandwidthSource) -> BandwidthPair {
        self.wan1.bandwidth.at(source) + self.wan2.bandwidth.at(source)
    }
}

impl From<&StatusResponse> for TelemetrySnapshot {
    fn from(wire: &StatusResponse) -> Self {
        let timestamp = wire.timestamp.as_deref().and_then(|raw| {
            match DateTime::parse_from_rfc3339(raw) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(e) => {
                    debug!(raw, error = %e, "unparseable status timestamp");
                    None
                }
            }
        });

        Self {
            wan1: LinkTelemetry::from(&wire.wan1),
            wan2: LinkTelemetry::from(&wire.wan2),
            local: LinkTelemetry::from(&wire.local),
            router_ip: wire.router_ip.clone(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn wire_link(down_1m: f64, up_1m: f64, state: &str) -> LinkStatus {
        serde_json::from_value(serde_json::json!({
            "state": state,
            "latency_ms": 10.0,
            "jitter_ms": 1.0,
            "loss_pct": 0.5,
            "down_mbps": 99.0,
            "up_mbps": 9.0,
            "down_1m": down_1m,
            "down_5m": 50.0,
            "down_15m": 40.0,
            "up_1m": up_1m,
            "up_5m": 5.0,
            "up_15m": 4.0
        }))
        .expect("valid link json")
    }

    fn snapshot() -> TelemetrySnapshot {
        TelemetrySnapshot {
            wan1: LinkTelemetry::from(&wire_link(100.0, 20.0, "up")),
            wan2: LinkTelemetry::from(&wire_link(30.0, 10.0, "down")),
            local: LinkTelemetry::from(&wire_link(0.0, 0.0, "up")),
            router_ip: None,
            timestamp: None,
        }
    }

    #[test]
    fn local_bandwidth_is_wan_sum_even_when_one_wan_is_down() {
        let snap = snapshot();
        assert!(snap.wan2.state.is_down());

        let local = snap.local_bandwidth(BandwidthSource::Avg1m);
        assert!((local.down - 130.0).abs() < f64::EPSILON);
        assert!((local.up - 30.0).abs() < f64::EPSILON);

        // The same sum flows through the generic accessor.
        let via_link = snap.link_bandwidth(LinkId::Local, BandwidthSource::Avg1m);
        assert_eq!(local, via_link);
    }

    #[test]
    fn timestamp_parse_failure_yields_none() {
        let wire: StatusResponse = serde_json::from_value(serde_json::json!({
            "wan1": serde_json::json!({
                "state": "up", "latency_ms": 1.0, "jitter_ms": 1.0, "loss_pct": 0.0,
                "down_mbps": 1.0, "up_mbps": 1.0,
                "down_1m": 1.0, "down_5m": 1.0, "down_15m": 1.0,
                "up_1m": 1.0, "up_5m": 1.0, "up_15m": 1.0
            }),
            "wan2": serde_json::json!({
                "state": "up", "latency_ms": 1.0, "jitter_ms": 1.0, "loss_pct": 0.0,
                "down_mbps": 1.0, "up_mbps": 1.0,
                "down_1m": 1.0, "down_5m": 1.0, "down_15m": 1.0,
                "up_1m": 1.0, "up_5m": 1.0, "up_15m": 1.0
            }),
            "local": serde_json::json!({
                "state": "up", "latency_ms": 1.0, "jitter_ms": 1.0, "loss_pct": 0.0,
                "down_mbps": 1.0, "up_mbps": 1.0,
                "down_1m": 1.0, "down_5m": 1.0, "down_15m": 1.0,
                "up_1m": 1.0, "up_5m": 1.0, "up_15m": 1.0
            }),
            "timestamp": "not-a-timestamp"
        }))
        .expect("valid status json");

        let snap = TelemetrySnapshot::from(&wire);
        assert_eq!(snap.timestamp, None);
    }

    #[test]
    fn rfc3339_timestamp_is_parsed_as_utc() {
        let mut wire_val = serde_json::json!({
            "wan1": {}, "wan2": {}, "local": {},
            "timestamp": "2026-08-30T11:22:33-07:00"
        });
        let link = serde_json::json!({
            "state": "up", "latency_ms": 1.0, "jitter_ms": 1.0, "loss_pct": 0.0,
            "down_mbps": 1.0, "up_mbps": 1.0,
            "down_1m": 1.0, "down_5m": 1.0, "down_15m": 1.0,
            "up_1m": 1.0, "up_5m": 1.0, "up_15m": 1.0
        });
        wire_val["wan1"] = link.clone();
        wire_val["wan2"] = link.clone();
        wire_val["local"] = link;

        let wire: StatusResponse = serde_json::from_value(wire_val).expect("valid status json");
        let snap = TelemetrySnapshot::from(&wire);
        let ts = snap.timestamp.expect("timestamp parsed");
        assert_eq!(ts.to_rfc3339(), "2026-08-30T18:22:33+00:00");
    }
}
