//! Color palette and semantic styling — tuned to mimic the LED panel
//! hardware the monitor drives.

use ratatui::style::{Color, Modifier, Style};

// ── LED palette ───────────────────────────────────────────────────────

/// Lit seven-segment elements (classic red LED).
pub const SEGMENT_LIT: Color = Color::Rgb(255, 64, 48); // #ff4030
/// Unlit ghost segments, barely visible like a powered-off display.
pub const SEGMENT_GHOST: Color = Color::Rgb(58, 28, 24); // #3a1c18

/// Freshness strip cell colors.
pub const FRESH_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const FRESH_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const FRESH_RED: Color = Color::Rgb(255, 85, 85); // #ff5555
/// Unlit freshness cell.
pub const FRESH_OFF: Color = Color::Rgb(45, 47, 58); // #2d2f3a

/// Link state lamps.
pub const LAMP_UP: Color = FRESH_GREEN;
pub const LAMP_DEGRADED: Color = FRESH_YELLOW;
pub const LAMP_DOWN: Color = FRESH_RED;

// ── Chrome ────────────────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const ACCENT_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Semantic styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(ACCENT_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(ACCENT_CYAN)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(ACCENT_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default()
        .fg(ACCENT_CYAN)
        .add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(ACCENT_CYAN).add_modifier(Modifier::BOLD)
}

/// Style for a link state lamp.
///
/// A stale feed overrides the state with a blinking red lamp: red on
/// the visible phase, unlit on the off phase. Callers decide which rows
/// the staleness override applies to.
pub fn lamp_style(state: wanview_core::LinkState, stale: bool, blink_visible: bool) -> Style {
    if stale {
        let color = if blink_visible { LAMP_DOWN } else { FRESH_OFF };
        return Style::default().fg(color);
    }
    let color = match state {
        wanview_core::LinkState::Up => LAMP_UP,
        wanview_core::LinkState::Degraded => LAMP_DEGRADED,
        wanview_core::LinkState::Down => LAMP_DOWN,
    };
    Style::default().fg(color)
}

#[cfg(test)]
mod tests {
    use wanview_core::LinkState;

    use super::*;

    #[test]
    fn stale_lamp_blinks_red_regardless_of_state() {
        let on = lamp_style(LinkState::Up, true, true);
        assert_eq!(on.fg, Some(LAMP_DOWN));

        let off = lamp_style(LinkState::Up, true, false);
        assert_eq!(off.fg, Some(FRESH_OFF));
    }

    #[test]
    fn fresh_lamp_follows_link_state() {
        assert_eq!(lamp_style(LinkState::Up, false, false).fg, Some(LAMP_UP));
        assert_eq!(
            lamp_style(LinkState::Degraded, false, true).fg,
            Some(LAMP_DEGRADED)
        );
        assert_eq!(lamp_style(LinkState::Down, false, true).fg, Some(LAMP_DOWN));
    }
}
