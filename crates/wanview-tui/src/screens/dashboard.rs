//! Dashboard screen — the panel simulation plus a telemetry table.
//!
//! Layout:
//! ┌─ Freshness ──────────────────────────────────────────────────────┐
//! │ ⬤ ⬤ ⬤ … ⬤   (4s ago)                                            │
//! ├─ Links ──────────────────────────────────────────────────────────┤
//! │ ● WAN 1       ● WAN 2       ● Local                              │
//! │   [L  8]        [L 23]        [L  3]    packet displays          │
//! │   [d 45.3]      [d 12.0]      [d 57.3]  bandwidth displays       │
//! ├─ Telemetry ──────────────────────────────────────────────────────┤
//! │ link / state / loss / latency / jitter / four bw scales / IPs    │
//! └──────────────────────────────────────────────────────────────────┘
//!
//! The seven-segment displays follow the hardware rules: the packet row
//! and the bandwidth row each rotate through their metrics every 5 s,
//! `m`/`b` or a mouse click cycles a row by hand, and a stale feed or a
//! down link drops its displays to dashes. The Local packet display is
//! the one exception: its pinger runs on the panel itself, so it only
//! dashes when the local link is down, never on feed staleness.

use std::cell::Cell;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell as TableCell, Paragraph, Row, Table};

use wanview_core::segment::{bandwidth_value, packet_value};
use wanview_core::{
    BandwidthSource, FreshnessConfig, LinkId, LinkState, RotationState, SegmentFrame,
    TelemetrySnapshot, elapsed_since,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{freshness_bar, num_fmt, seven_segment};

/// Ticks per blink half-period: the event pump ticks every
/// [`crate::event::TICK_INTERVAL`], and the blink phase flips every 500 ms.
const TICKS_PER_BLINK: u64 = 2;
/// Ticks per automatic metric rotation (5 s on the hardware panel).
const TICKS_PER_ROTATION: u64 = 20;

pub struct DashboardScreen {
    focused: bool,
    snapshot: Option<Arc<TelemetrySnapshot>>,
    last_update: Option<DateTime<Utc>>,
    freshness: FreshnessConfig,
    source: BandwidthSource,
    /// Physical displays on/off — off renders everything as ghosts.
    powered: bool,
    rotation: RotationState,
    /// Blink phase, driven by the tick counter so every blinking
    /// element flips in lockstep.
    blink_visible: bool,
    /// Display hit regions recorded during render for click-to-cycle.
    packet_region: Cell<Rect>,
    bandwidth_region: Cell<Rect>,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            snapshot: None,
            last_update: None,
            freshness: FreshnessConfig::default(),
            source: BandwidthSource::default(),
            powered: true,
            rotation: RotationState::default(),
            blink_visible: true,
            packet_region: Cell::new(Rect::default()),
            bandwidth_region: Cell::new(Rect::default()),
        }
    }

    fn elapsed(&self) -> f64 {
        elapsed_since(self.last_update)
    }

    fn is_stale(&self) -> bool {
        self.freshness.is_stale(self.elapsed())
    }

    /// The elapsed caption next to the freshness strip.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    fn elapsed_caption(&self) -> String {
        let elapsed = self.elapsed();
        if self.last_update.is_none() {
            return "no data yet".into();
        }
        let secs = elapsed.floor().clamp(0.0, 999.0) as i64;
        if elapsed > 999.0 {
            "(999+s ago)".into()
        } else {
            format!("({secs}s ago)")
        }
    }

    /// The packet-row frame for a link.
    ///
    /// The Local pinger lives on the panel, so its packet display keeps
    /// showing values through feed staleness; it only dashes when the
    /// local link itself is down.
    fn packet_frame(&self, snap: &TelemetrySnapshot, id: LinkId) -> SegmentFrame {
        let link = snap.link(id);
        let stale = id != LinkId::Local && self.is_stale();
        if stale || link.state.is_down() {
            return SegmentFrame::dashes();
        }
        let metric = self.rotation.packet;
        SegmentFrame::format(metric.prefix(), &packet_value(metric.value(link)))
    }

    /// The bandwidth-row frame for a link. WAN columns show their own
    /// link's throughput; the Local column shows the WAN1+WAN2 sum.
    fn bandwidth_frame(&self, snap: &TelemetrySnapshot, id: LinkId) -> SegmentFrame {
        if self.is_stale() {
            return SegmentFrame::dashes();
        }
        let pair = if id == LinkId::Local {
            snap.local_bandwidth(self.source)
        } else {
            if snap.link(id).state.is_down() {
                return SegmentFrame::dashes();
            }
            snap.link_bandwidth(id, self.source)
        };
        let metric = self.rotation.bandwidth;
        SegmentFrame::format(metric.prefix(), &bandwidth_value(metric.value(pair)))
    }

    /// Lamp style for a link row: a stale feed turns the WAN lamps into
    /// blinking red, while the Local lamp keeps tracking its own state.
    fn row_lamp_style(&self, id: LinkId, state: LinkState) -> Style {
        let stale = id != LinkId::Local && self.is_stale();
        theme::lamp_style(state, stale, self.blink_visible)
    }

    // ── Render helpers ──────────────────────────────────────────────

    fn render_freshness(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Freshness ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let levels = self.freshness.levels(self.elapsed());
        let mut line = freshness_bar::line(&levels, self.freshness.led_count, self.blink_visible);
        line.push_span(Span::raw("  "));
        line.push_span(Span::styled(self.elapsed_caption(), theme::key_hint()));
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn render_links(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Links ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(inner);

        let Some(snap) = self.snapshot.as_deref() else {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "waiting for first poll…",
                    theme::key_hint(),
                ))),
                inner,
            );
            return;
        };

        let mut packet_band = Rect::default();
        let mut bandwidth_band = Rect::default();

        for (idx, id) in [LinkId::Wan1, LinkId::Wan2, LinkId::Local]
            .into_iter()
            .enumerate()
        {
            let rows = Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(columns[idx]);

            let link = snap.link(id);
            let label = Line::from(vec![
                Span::styled("● ", self.row_lamp_style(id, link.state)),
                Span::styled(
                    id.label(),
                    Style::default()
                        .fg(theme::DIM_WHITE)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {}", link.state.label()), theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(label), rows[0]);

            let packet = self.packet_frame(snap, id);
            frame.render_widget(
                Paragraph::new(seven_segment::lines(&packet, self.powered)),
                rows[1],
            );

            let bandwidth = self.bandwidth_frame(snap, id);
            frame.render_widget(
                Paragraph::new(seven_segment::lines(&bandwidth, self.powered)),
                rows[2],
            );

            packet_band = if idx == 0 { rows[1] } else { packet_band.union(rows[1]) };
            bandwidth_band = if idx == 0 { rows[2] } else { bandwidth_band.union(rows[2]) };
        }

        // Click regions: any packet display cycles the packet row, any
        // bandwidth display cycles the bandwidth row.
        self.packet_region.set(packet_band);
        self.bandwidth_region.set(bandwidth_band);
    }

    fn render_telemetry(&self, frame: &mut Frame, area: Rect) {
        let source_label = self.source.label();
        let block = Block::default()
            .title(" Telemetry ")
            .title_style(theme::title_style())
            .title_bottom(Line::from(Span::styled(
                format!(" bandwidth down/up Mbps · display scale: {source_label} "),
                theme::key_hint(),
            )))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(snap) = self.snapshot.as_deref() else {
            return;
        };

        let header = Row::new(
            [
                "Link", "State", "Latency", "Jitter", "Loss", "15 sec", "1 min", "5 min",
                "15 min", "Monitor", "Gateway", "Local IP",
            ]
            .map(TableCell::from),
        )
        .style(theme::table_header());

        let rows: Vec<Row> = [LinkId::Wan1, LinkId::Wan2, LinkId::Local]
            .into_iter()
            .map(|id| {
                let link = snap.link(id);
                // The panel has no gateway of its own; its row carries
                // the upstream router address instead.
                let gateway = if id == LinkId::Local {
                    snap.router_ip.clone().unwrap_or_default()
                } else {
                    link.gateway_ip.clone().unwrap_or_default()
                };
                let mut cells = vec![
                    TableCell::from(id.label()),
                    TableCell::from(Span::styled(
                        link.state.label(),
                        theme::lamp_style(link.state, false, true),
                    )),
                    TableCell::from(num_fmt::fmt_ms(link.latency_ms)),
                    TableCell::from(num_fmt::fmt_ms(link.jitter_ms)),
                    TableCell::from(num_fmt::fmt_pct(link.loss_pct)),
                ];
                for source in BandwidthSource::ALL {
                    let pair = if id == LinkId::Local {
                        snap.local_bandwidth(source)
                    } else {
                        snap.link_bandwidth(id, source)
                    };
                    cells.push(TableCell::from(num_fmt::fmt_pair(pair)));
                }
                cells.push(TableCell::from(link.monitor_ip.clone().unwrap_or_default()));
                cells.push(TableCell::from(gateway));
                cells.push(TableCell::from(link.local_ip.clone().unwrap_or_default()));
                Row::new(cells).style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Length(8),
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Length(6),
                Constraint::Length(11),
                Constraint::Length(11),
                Constraint::Length(11),
                Constraint::Length(11),
                Constraint::Length(15),
                Constraint::Length(15),
                Constraint::Min(11),
            ],
        )
        .header(header)
        .column_spacing(1);

        frame.render_widget(table, inner);
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('m') => Ok(Some(Action::CyclePacketMetric)),
            KeyCode::Char('b') => Ok(Some(Action::CycleBandwidthMetric)),
            _ => Ok(None),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }
        let pos = ratatui::layout::Position::new(mouse.column, mouse.row);
        if self.packet_region.get().contains(pos) {
            return Ok(Some(Action::CyclePacketMetric));
        }
        if self.bandwidth_region.get().contains(pos) {
            return Ok(Some(Action::CycleBandwidthMetric));
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SnapshotUpdated(snap) => self.snapshot = Some(snap.clone()),
            Action::LastUpdateChanged(ts) => self.last_update = *ts,
            Action::FreshnessChanged(cfg) => self.freshness = *cfg,
            Action::SourceChanged(Some(source)) => self.source = *source,
            Action::DisplayPowerChanged(power) => {
                self.powered = power.is_none_or(|p| p.on);
            }
            Action::Tick(count) => {
                self.blink_visible = (count / TICKS_PER_BLINK) % 2 == 0;
                if *count > 0 && count % TICKS_PER_ROTATION == 0 {
                    return Ok(Some(Action::CycleMetrics));
                }
            }
            Action::CycleMetrics => self.rotation.advance(),
            Action::CyclePacketMetric => self.rotation.advance_packet(),
            Action::CycleBandwidthMetric => self.rotation.advance_bandwidth(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(3), // Freshness strip
            Constraint::Length(9), // Link label + two display rows
            Constraint::Min(6),    // Telemetry table
        ])
        .split(area);

        self.render_freshness(frame, layout[0]);
        self.render_links(frame, layout[1]);
        self.render_telemetry(frame, layout[2]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "dashboard"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use wanview_core::{BandwidthPair, LinkState, LinkTelemetry, PacketMetric};

    use super::*;

    fn telemetry(state: LinkState) -> LinkTelemetry {
        LinkTelemetry {
            state,
            latency_ms: 8.0,
            jitter_ms: 2.0,
            loss_pct: 0.0,
            ..LinkTelemetry::default()
        }
    }

    fn snapshot() -> TelemetrySnapshot {
        TelemetrySnapshot {
            wan1: telemetry(LinkState::Up),
            wan2: telemetry(LinkState::Down),
            local: telemetry(LinkState::Up),
            router_ip: None,
            timestamp: None,
        }
    }

    fn segments(frame: &SegmentFrame) -> [u8; 4] {
        [
            frame.0[0].segments,
            frame.0[1].segments,
            frame.0[2].segments,
            frame.0[3].segments,
        ]
    }

    fn dashes() -> [u8; 4] {
        segments(&SegmentFrame::dashes())
    }

    #[test]
    fn down_link_shows_dashes_while_up_link_shows_values() {
        let mut screen = DashboardScreen::new();
        screen.last_update = Some(Utc::now());
        let snap = snapshot();

        let up = screen.packet_frame(&snap, LinkId::Wan1);
        assert_ne!(segments(&up), dashes());

        let down = screen.packet_frame(&snap, LinkId::Wan2);
        assert_eq!(segments(&down), dashes());
    }

    #[test]
    fn wan_bandwidth_display_shows_that_links_own_throughput() {
        let mut screen = DashboardScreen::new();
        screen.last_update = Some(Utc::now());

        let mut snap = snapshot();
        snap.wan1.bandwidth.avg_1m = BandwidthPair {
            down: 45.0,
            up: 8.0,
        };
        snap.wan2.bandwidth.avg_1m = BandwidthPair {
            down: 10.0,
            up: 2.0,
        };

        let frame = screen.bandwidth_frame(&snap, LinkId::Wan1);
        let expected = SegmentFrame::format('d', "45.0");
        assert_eq!(segments(&frame), segments(&expected));

        // WAN2 is down, so its bandwidth display is dashed even though
        // the feed is fresh.
        let down = screen.bandwidth_frame(&snap, LinkId::Wan2);
        assert_eq!(segments(&down), dashes());
    }

    #[test]
    fn stale_feed_blanks_wan_displays_but_not_the_local_packet_display() {
        let screen = DashboardScreen::new(); // never updated → stale
        let snap = snapshot();

        assert_eq!(segments(&screen.packet_frame(&snap, LinkId::Wan1)), dashes());
        assert_eq!(
            segments(&screen.bandwidth_frame(&snap, LinkId::Wan1)),
            dashes()
        );
        assert_eq!(
            segments(&screen.bandwidth_frame(&snap, LinkId::Local)),
            dashes()
        );

        // The Local pinger keeps running regardless of feed freshness.
        let local = screen.packet_frame(&snap, LinkId::Local);
        assert_ne!(segments(&local), dashes());
    }

    #[test]
    fn local_packet_display_dashes_when_the_local_link_is_down() {
        let mut screen = DashboardScreen::new();
        screen.last_update = Some(Utc::now());

        let mut snap = snapshot();
        snap.local = telemetry(LinkState::Down);

        let local = screen.packet_frame(&snap, LinkId::Local);
        assert_eq!(segments(&local), dashes());
    }

    #[test]
    fn local_display_sums_both_wans() {
        let mut screen = DashboardScreen::new();
        screen.last_update = Some(Utc::now());

        let mut snap = snapshot();
        snap.wan1.bandwidth.avg_1m = BandwidthPair {
            down: 40.0,
            up: 8.0,
        };
        snap.wan2.bandwidth.avg_1m = BandwidthPair {
            down: 10.0,
            up: 2.0,
        };

        // Downstream at the default 1m scale: 40 + 10 = 50.0 → "50.0".
        let frame = screen.bandwidth_frame(&snap, LinkId::Local);
        let expected = SegmentFrame::format('d', "50.0");
        assert_eq!(segments(&frame), segments(&expected));
    }

    #[test]
    fn stale_feed_turns_wan_lamps_into_blinking_red() {
        let mut screen = DashboardScreen::new(); // never updated → stale

        screen.blink_visible = true;
        let lamp = screen.row_lamp_style(LinkId::Wan1, LinkState::Up);
        assert_eq!(lamp.fg, Some(theme::LAMP_DOWN));

        screen.blink_visible = false;
        let lamp = screen.row_lamp_style(LinkId::Wan1, LinkState::Up);
        assert_eq!(lamp.fg, Some(theme::FRESH_OFF));

        // The Local lamp keeps tracking its own state through staleness.
        let local = screen.row_lamp_style(LinkId::Local, LinkState::Up);
        assert_eq!(local.fg, Some(theme::LAMP_UP));
    }

    #[test]
    fn rotation_advances_every_twentieth_tick() {
        let mut screen = DashboardScreen::new();

        assert!(screen.update(&Action::Tick(0)).unwrap().is_none());
        assert!(screen.update(&Action::Tick(7)).unwrap().is_none());

        let follow_up = screen.update(&Action::Tick(TICKS_PER_ROTATION)).unwrap();
        assert!(matches!(follow_up, Some(Action::CycleMetrics)));

        screen.update(&Action::CycleMetrics).unwrap();
        assert_eq!(screen.rotation.packet, PacketMetric::Jitter);
    }

    #[test]
    fn blink_phase_flips_every_two_ticks() {
        let mut screen = DashboardScreen::new();

        screen.update(&Action::Tick(0)).unwrap();
        assert!(screen.blink_visible);
        screen.update(&Action::Tick(1)).unwrap();
        assert!(screen.blink_visible);
        screen.update(&Action::Tick(2)).unwrap();
        assert!(!screen.blink_visible);
        screen.update(&Action::Tick(4)).unwrap();
        assert!(screen.blink_visible);
    }

    #[test]
    fn manual_cycle_moves_one_group_only() {
        let mut screen = DashboardScreen::new();
        screen.update(&Action::CyclePacketMetric).unwrap();
        assert_eq!(screen.rotation.packet, PacketMetric::Jitter);
        assert_eq!(
            screen.rotation.bandwidth,
            wanview_core::BandwidthMetric::Down
        );
    }

    #[test]
    fn elapsed_caption_has_a_sentinel_for_no_data() {
        let screen = DashboardScreen::new();
        assert_eq!(screen.elapsed_caption(), "no data yet");
    }
}
