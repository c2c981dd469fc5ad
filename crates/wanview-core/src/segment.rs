//! Simulated seven-segment display formatting.
//!
//! Maps a displayable value plus a one-character metric prefix onto
//! per-segment on/off states for a fixed four-position display, exactly
//! the way the hardware renders it: `[prefix, c0, c1, c2]` with the
//! value window right-aligned in the last three positions.
//!
//! Segment layout and bit assignment follow the HT16K33 convention:
//!
//! ```text
//!    AAA
//!   F   B
//!    GGG
//!   E   C
//!    DDD  dp
//! ```

pub const SEG_A: u8 = 0x01;
pub const SEG_B: u8 = 0x02;
pub const SEG_C: u8 = 0x04;
pub const SEG_D: u8 = 0x08;
pub const SEG_E: u8 = 0x10;
pub const SEG_F: u8 = 0x20;
pub const SEG_G: u8 = 0x40;

/// Glyph positions per display.
pub const FRAME_WIDTH: usize = 4;

/// Segment pattern for one glyph. Unknown glyphs render fully blank
/// rather than erroring — the display simply shows nothing there.
pub fn glyph_segments(c: char) -> u8 {
    match c {
        '0' => SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,
        '1' => SEG_B | SEG_C,
        '2' => SEG_A | SEG_B | SEG_D | SEG_E | SEG_G,
        '3' => SEG_A | SEG_B | SEG_C | SEG_D | SEG_G,
        '4' => SEG_B | SEG_C | SEG_F | SEG_G,
        '5' => SEG_A | SEG_C | SEG_D | SEG_F | SEG_G,
        '6' => SEG_A | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,
        '7' => SEG_A | SEG_B | SEG_C,
        '8' => SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,
        '9' => SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G,
        'L' => SEG_D | SEG_E | SEG_F,
        'J' => SEG_B | SEG_C | SEG_D | SEG_E,
        'P' => SEG_A | SEG_B | SEG_E | SEG_F | SEG_G,
        'd' => SEG_B | SEG_C | SEG_D | SEG_E | SEG_G,
        'U' => SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,
        '-' => SEG_G,
        _ => 0,
    }
}

/// One display position: lit segments plus the decimal indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentGlyph {
    pub segments: u8,
    pub decimal: bool,
}

impl SegmentGlyph {
    fn of(c: char) -> Self {
        Self {
            segments: glyph_segments(c),
            decimal: false,
        }
    }

    pub fn is_lit(self, segment: u8) -> bool {
        self.segments & segment != 0
    }
}

/// The full four-position segment state for one display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentFrame(pub [SegmentGlyph; FRAME_WIDTH]);

impl SegmentFrame {
    /// Compose `[prefix, c0, c1, c2]` from a metric prefix glyph and a
    /// value with at most one decimal point.
    ///
    /// The decimal point is stripped from the value, which is then
    /// left-padded with blanks to three characters, or truncated keeping
    /// the rightmost three. If the original value had a point and at
    /// least two of its characters survive in the window, the decimal
    /// indicator lights on the third position — a fixed placement that
    /// deliberately does not track where the point actually was,
    /// matching the hardware renderer.
    pub fn format(prefix: char, value: &str) -> Self {
        let has_point = value.contains('.');
        let stripped: Vec<char> = value.chars().filter(|&c| c != '.').collect();

        let mut window = [' '; 3];
        let skip = stripped.len().saturating_sub(3);
        for (slot, &c) in window
            .iter_mut()
            .rev()
            .zip(stripped.iter().skip(skip).rev())
        {
            *slot = c;
        }

        let mut glyphs = [
            SegmentGlyph::of(prefix),
            SegmentGlyph::of(window[0]),
            SegmentGlyph::of(window[1]),
            SegmentGlyph::of(window[2]),
        ];
        if has_point && stripped.len() >= 2 {
            glyphs[2].decimal = true;
        }
        Self(glyphs)
    }

    /// Every position shows only the middle segment, decimal indicator
    /// off. Used for down links and globally stale data instead of
    /// normal formatting.
    pub fn dashes() -> Self {
        Self(
            [SegmentGlyph {
                segments: SEG_G,
                decimal: false,
            }; FRAME_WIDTH],
        )
    }
}

/// Format a packet metric (latency/jitter/loss) for the display: whole
/// number, capped to the three digits the hardware can show.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn packet_value(v: f64) -> String {
    let capped = v.round().clamp(0.0, 999.0) as i64;
    capped.to_string()
}

/// Format a bandwidth rate (Mbps) for the display: one decimal place,
/// matching the firmware's `toFixed(1)` client rendering. The frame
/// formatter's fixed window then decides what survives.
pub fn bandwidth_value(v: f64) -> String {
    format!("{v:.1}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn segments(frame: &SegmentFrame) -> [u8; 4] {
        [
            frame.0[0].segments,
            frame.0[1].segments,
            frame.0[2].segments,
            frame.0[3].segments,
        ]
    }

    fn decimals(frame: &SegmentFrame) -> [bool; 4] {
        [
            frame.0[0].decimal,
            frame.0[1].decimal,
            frame.0[2].decimal,
            frame.0[3].decimal,
        ]
    }

    #[test]
    fn single_digit_is_right_aligned_with_blank_padding() {
        let frame = SegmentFrame::format('d', "7");
        assert_eq!(
            segments(&frame),
            [
                glyph_segments('d'),
                glyph_segments(' '),
                glyph_segments(' '),
                glyph_segments('7'),
            ]
        );
        assert_eq!(decimals(&frame), [false; 4]);
    }

    #[test]
    fn decimal_value_lights_third_position_only() {
        let frame = SegmentFrame::format('L', "12.5");
        assert_eq!(
            segments(&frame),
            [
                glyph_segments('L'),
                glyph_segments('1'),
                glyph_segments('2'),
                glyph_segments('5'),
            ]
        );
        assert_eq!(decimals(&frame), [false, false, true, false]);
    }

    #[test]
    fn long_value_keeps_rightmost_three() {
        // 123.4 Mbps renders as toFixed(1) = "123.4" → window "234".
        let frame = SegmentFrame::format('d', "123.4");
        assert_eq!(
            segments(&frame),
            [
                glyph_segments('d'),
                glyph_segments('2'),
                glyph_segments('3'),
                glyph_segments('4'),
            ]
        );
        // Still had a decimal point and enough retained characters.
        assert_eq!(decimals(&frame), [false, false, true, false]);
    }

    #[test]
    fn short_decimal_value_does_not_light_indicator() {
        // A single surviving original character: indicator stays off.
        let frame = SegmentFrame::format('U', ".5");
        assert_eq!(frame.0[3].segments, glyph_segments('5'));
        assert_eq!(decimals(&frame), [false; 4]);
    }

    #[test]
    fn unknown_glyphs_render_blank() {
        let frame = SegmentFrame::format('?', "x#z");
        assert_eq!(segments(&frame), [0, 0, 0, 0]);
    }

    #[test]
    fn dashes_light_only_the_middle_segment() {
        let frame = SegmentFrame::dashes();
        for glyph in frame.0 {
            assert_eq!(glyph.segments, SEG_G);
            assert!(!glyph.decimal);
            assert!(glyph.is_lit(SEG_G));
            assert!(!glyph.is_lit(SEG_A));
        }
    }

    #[test]
    fn packet_value_caps_at_hardware_range() {
        assert_eq!(packet_value(42.0), "42");
        assert_eq!(packet_value(41.6), "42");
        assert_eq!(packet_value(1500.0), "999");
        assert_eq!(packet_value(-3.0), "0");
    }

    #[test]
    fn bandwidth_value_has_one_decimal() {
        assert_eq!(bandwidth_value(45.23), "45.2");
        assert_eq!(bandwidth_value(0.0), "0.0");
        assert_eq!(bandwidth_value(123.45), "123.5");
    }

    #[test]
    fn prefix_letters_match_hardware_patterns() {
        assert_eq!(glyph_segments('L'), SEG_D | SEG_E | SEG_F);
        assert_eq!(glyph_segments('J'), SEG_B | SEG_C | SEG_D | SEG_E);
        assert_eq!(glyph_segments('P'), SEG_A | SEG_B | SEG_E | SEG_F | SEG_G);
        assert_eq!(
            glyph_segments('d'),
            SEG_B | SEG_C | SEG_D | SEG_E | SEG_G
        );
        assert_eq!(
            glyph_segments('U'),
            SEG_B | SEG_C | SEG_D | SEG_E | SEG_F
        );
        assert_eq!(glyph_segments('-'), SEG_G);
        assert_eq!(glyph_segments(' '), 0);
    }
}
