//! Controls screen — brightness, display power, and bandwidth scale.
//!
//! Every edit applies optimistically: the UI moves first, the write is
//! fired in the background, and the 2 s control polls pull the panel
//! back if the device disagrees.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use wanview_core::{BandwidthSource, BrightnessLevels, DisplayPower, VersionInfo};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct ControlsScreen {
    focused: bool,
    brightness: Option<BrightnessLevels>,
    power: Option<DisplayPower>,
    source: Option<BandwidthSource>,
    version: Option<VersionInfo>,
}

impl ControlsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            brightness: None,
            power: None,
            source: None,
            version: None,
        }
    }

    /// Brightness to write after a +/- step. Starts from the current
    /// effective level, or mid-scale before the first poll answers.
    fn stepped_brightness(&self, up: bool) -> u8 {
        let current = self
            .brightness
            .map_or(BrightnessLevels::MAX / 2, |b| b.effective);
        if up {
            current.saturating_add(1).min(BrightnessLevels::MAX)
        } else {
            current.saturating_sub(1)
        }
    }

    fn active_source(&self) -> BandwidthSource {
        self.source.unwrap_or_default()
    }

    // ── Render helpers ──────────────────────────────────────────────

    fn panel(&self, title: &'static str) -> Block<'static> {
        Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            })
    }

    fn render_brightness(&self, frame: &mut Frame, area: Rect) {
        let block = self.panel(" Brightness  ↑/↓ adjust ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);

        match self.brightness {
            Some(levels) => {
                let gauge = Gauge::default()
                    .ratio(f64::from(levels.effective) / f64::from(BrightnessLevels::MAX))
                    .label(format!("{}/{}", levels.effective, BrightnessLevels::MAX))
                    .gauge_style(Style::default().fg(theme::SEGMENT_LIT).bg(theme::BG_DARK));
                frame.render_widget(gauge, rows[0]);

                let knob = if levels.is_override() {
                    Line::from(vec![
                        Span::styled(format!("knob at {}", levels.pot), theme::key_hint()),
                        Span::styled(
                            "  · software override active",
                            Style::default().fg(theme::FRESH_YELLOW),
                        ),
                    ])
                } else {
                    Line::from(Span::styled(
                        format!("knob at {}", levels.pot),
                        theme::key_hint(),
                    ))
                };
                frame.render_widget(Paragraph::new(knob), rows[1]);
            }
            None => {
                frame.render_widget(
                    Paragraph::new(Span::styled("waiting for device…", theme::key_hint())),
                    rows[0],
                );
            }
        }
    }

    fn render_power(&self, frame: &mut Frame, area: Rect) {
        let block = self.panel(" Displays  p toggle ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = match self.power {
            Some(power) => {
                let state = if power.on {
                    Span::styled(
                        "ON",
                        Style::default()
                            .fg(theme::FRESH_GREEN)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(
                        "OFF",
                        Style::default()
                            .fg(theme::FRESH_RED)
                            .add_modifier(Modifier::BOLD),
                    )
                };
                let mut spans = vec![state];
                if power.is_override() {
                    let switch = if power.switch_position { "on" } else { "off" };
                    spans.push(Span::styled(
                        format!("  · physical switch is {switch}"),
                        Style::default().fg(theme::FRESH_YELLOW),
                    ));
                }
                Line::from(spans)
            }
            None => Line::from(Span::styled("waiting for device…", theme::key_hint())),
        };
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn render_source(&self, frame: &mut Frame, area: Rect) {
        let block = self.panel(" Bandwidth scale  s cycle ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let active = self.active_source();
        let mut spans: Vec<Span<'static>> = Vec::new();
        for (i, source) in BandwidthSource::ALL.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  │  ", theme::key_hint()));
            }
            let style = if source == active {
                Style::default()
                    .fg(theme::ACCENT_CYAN)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::table_row()
            };
            spans.push(Span::styled(source.label(), style));
        }
        if self.source.is_none() {
            spans.push(Span::styled("   (device default)", theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }

    fn render_version(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.version {
            Some(v) => Line::from(Span::styled(
                format!(
                    " firmware {} ({}) built {}",
                    v.version, v.git_hash, v.build_time
                ),
                theme::key_hint(),
            )),
            None => Line::from(Span::styled(" firmware version unknown", theme::key_hint())),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl Component for ControlsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('+' | 'k') => {
                Ok(Some(Action::SetBrightness(self.stepped_brightness(true))))
            }
            KeyCode::Down | KeyCode::Char('-' | 'j') => {
                Ok(Some(Action::SetBrightness(self.stepped_brightness(false))))
            }
            KeyCode::Char('p') => Ok(Some(Action::ToggleDisplayPower)),
            KeyCode::Char('s') => Ok(Some(Action::SetSource(self.active_source().next()))),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::BrightnessChanged(levels) => self.brightness = *levels,
            Action::DisplayPowerChanged(power) => self.power = *power,
            Action::SourceChanged(source) => self.source = *source,
            Action::VersionLoaded(version) => self.version = Some(version.clone()),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(4), // Brightness
            Constraint::Length(3), // Display power
            Constraint::Length(3), // Bandwidth scale
            Constraint::Length(1), // Version footer
            Constraint::Min(0),
        ])
        .split(area);

        self.render_brightness(frame, layout[0]);
        self.render_power(frame, layout[1]);
        self.render_source(frame, layout[2]);
        self.render_version(frame, layout[3]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "controls"
    }
}
