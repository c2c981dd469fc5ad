//! ASCII rendering of a four-position seven-segment display.
//!
//! Each glyph occupies a 3x3 character cell plus a decimal-point
//! column, three terminal rows tall:
//!
//! ```text
//!  _       _   _
//! | |   | _| _|.
//! |_|   ||_  _|
//! ```
//!
//! Unlit segments are drawn as faint "ghost" strokes, the way a real
//! LED module shows its dark elements.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use wanview_core::SegmentFrame;
use wanview_core::segment::{FRAME_WIDTH, SEG_A, SEG_B, SEG_C, SEG_D, SEG_E, SEG_F, SEG_G};

use crate::theme;

/// Character columns one rendered frame occupies (4 glyphs of 3 cells
/// plus a decimal column, with one spacer between glyphs).
#[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
pub const RENDER_WIDTH: u16 = (FRAME_WIDTH as u16) * 5 - 1;
/// Terminal rows one rendered frame occupies.
pub const RENDER_HEIGHT: u16 = 3;

/// One visual stroke: its character, and the segment bit that lights it.
/// A zero mask marks a filler cell that is always blank.
const LAYOUT: [[(char, u8); 4]; 3] = [
    [(' ', 0), ('_', SEG_A), (' ', 0), (' ', 0)],
    [('|', SEG_F), ('_', SEG_G), ('|', SEG_B), (' ', 0)],
    [('|', SEG_E), ('_', SEG_D), ('|', SEG_C), ('.', u8::MAX)],
];

/// Render a frame into three styled lines.
///
/// `powered` dims everything to the ghost style, simulating the panel
/// with its displays switched off.
pub fn lines(frame: &SegmentFrame, powered: bool) -> Vec<Line<'static>> {
    let lit = Style::default().fg(theme::SEGMENT_LIT);
    let ghost = Style::default().fg(theme::SEGMENT_GHOST);

    (0..3)
        .map(|row| {
            let mut spans: Vec<Span<'static>> = Vec::with_capacity(FRAME_WIDTH * 5);
            for (pos, glyph) in frame.0.iter().enumerate() {
                if pos > 0 {
                    spans.push(Span::raw(" "));
                }
                for &(ch, mask) in &LAYOUT[row] {
                    let on = match mask {
                        0 => false,
                        u8::MAX => glyph.decimal,
                        _ => glyph.is_lit(mask),
                    };
                    let style = if on && powered { lit } else { ghost };
                    // Ghost strokes keep the stroke character so the
                    // display shape stays visible when dark.
                    let text = if on || mask != 0 {
                        ch.to_string()
                    } else {
                        " ".into()
                    };
                    spans.push(Span::styled(text, style));
                }
            }
            Line::from(spans)
        })
        .collect()
}
