//! The 24-cell freshness strip, mirroring the hardware LED ring.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use wanview_core::{CellColor, FreshnessLevels};

use crate::theme;

/// Render the strip as a single line of cells.
///
/// During the terminal blink phase, `blink_visible` alternates at the
/// hardware's 500 ms cadence; the whole strip goes dark on the off
/// phase. Outside the blink phase the flag is ignored.
pub fn line(levels: &FreshnessLevels, led_count: usize, blink_visible: bool) -> Line<'static> {
    let dark = levels.blink && !blink_visible;

    let mut spans: Vec<Span<'static>> = Vec::with_capacity(led_count);
    for i in 0..led_count {
        let color = if dark {
            theme::FRESH_OFF
        } else {
            match levels.cell(i) {
                Some(CellColor::Red) => theme::FRESH_RED,
                Some(CellColor::Yellow) => theme::FRESH_YELLOW,
                Some(CellColor::Green) => theme::FRESH_GREEN,
                None => theme::FRESH_OFF,
            }
        };
        spans.push(Span::styled("⬤", Style::default().fg(color)));
        if i + 1 < led_count {
            spans.push(Span::raw(" "));
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn cell_colors(line: &Line<'_>) -> Vec<ratatui::style::Color> {
        line.spans
            .iter()
            .filter(|s| s.content != " ")
            .filter_map(|s| s.style.fg)
            .collect()
    }

    #[test]
    fn strip_has_one_styled_cell_per_led() {
        let levels = FreshnessLevels {
            red: 2,
            yellow: 3,
            green: 4,
            blink: false,
        };
        let colors = cell_colors(&line(&levels, 24, true));
        assert_eq!(colors.len(), 24);
        assert_eq!(colors[0], theme::FRESH_RED);
        assert_eq!(colors[2], theme::FRESH_YELLOW);
        assert_eq!(colors[5], theme::FRESH_GREEN);
        assert_eq!(colors[9], theme::FRESH_OFF);
    }

    #[test]
    fn blink_off_phase_darkens_everything() {
        let levels = FreshnessLevels {
            red: 24,
            yellow: 0,
            green: 0,
            blink: true,
        };
        let off = cell_colors(&line(&levels, 24, false));
        assert!(off.iter().all(|&c| c == theme::FRESH_OFF));

        let on = cell_colors(&line(&levels, 24, true));
        assert!(on.iter().all(|&c| c == theme::FRESH_RED));
    }

    #[test]
    fn blink_flag_ignored_outside_terminal_phase() {
        let levels = FreshnessLevels {
            red: 0,
            yellow: 0,
            green: 24,
            blink: false,
        };
        let colors = cell_colors(&line(&levels, 24, false));
        assert!(colors.iter().all(|&c| c == theme::FRESH_GREEN));
    }
}
