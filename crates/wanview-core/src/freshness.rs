//! Freshness strip engine.
//!
//! Classifies elapsed time since the last good telemetry sample into a
//! three-color fill distribution over a fixed-length indicator strip.
//! Colors alternate fill and buffer phases: green fills the strip, holds,
//! then yellow overwrites it from the low end, holds, then red overwrites
//! yellow, holds, and finally the whole strip blinks red.
//!
//! The classifier is an ordered table of half-open windows rather than
//! nested conditionals, so the boundary invariants are visible in one
//! place and each phase is testable in isolation.

use wanview_api::FreshnessPayload;

/// Cells on the indicator strip (matches the 24-LED hardware bargraph).
pub const LED_COUNT: usize = 24;

/// Blink half-period once the strip has fully expired, milliseconds.
pub const BLINK_INTERVAL_MS: u64 = 500;

/// Elapsed-seconds sentinel used when no sample has ever arrived: far
/// beyond any sane final boundary, forcing the fully-expired state.
pub const NEVER_UPDATED_ELAPSED: f64 = 999.0;

/// Freshness window boundaries, seconds since the last good sample.
///
/// Six non-decreasing boundaries carve elapsed time into alternating
/// fill and buffer phases. Defaults match the firmware; the server may
/// replace them wholesale via the `freshness` object on `/api/status`.
/// A non-monotonic config degrades to clamped (possibly empty) bands;
/// it never panics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreshnessConfig {
    pub green_fill_end: f64,
    pub green_buffer_end: f64,
    pub yellow_fill_end: f64,
    pub yellow_buffer_end: f64,
    pub red_fill_end: f64,
    pub red_buffer_end: f64,
    /// Seconds a fill phase takes to sweep the whole strip.
    pub fill_duration: f64,
    pub led_count: usize,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            green_fill_end: 15.0,
            green_buffer_end: 20.0,
            yellow_fill_end: 35.0,
            yellow_buffer_end: 40.0,
            red_fill_end: 55.0,
            red_buffer_end: 60.0,
            fill_duration: 15.0,
            led_count: LED_COUNT,
        }
    }
}

impl From<FreshnessPayload> for FreshnessConfig {
    fn from(wire: FreshnessPayload) -> Self {
        Self {
            green_fill_end: wire.green_fill_end,
            green_buffer_end: wire.green_buffer_end,
            yellow_fill_end: wire.yellow_fill_end,
            yellow_buffer_end: wire.yellow_buffer_end,
            red_fill_end: wire.red_fill_end,
            red_buffer_end: wire.red_buffer_end,
            fill_duration: wire.fill_duration,
            // The payload carries no LED count; it is a property of the
            // strip, not of the timing windows.
            led_count: LED_COUNT,
        }
    }
}

/// Color cell counts for the strip, plus the terminal blink flag.
///
/// Counts are clamped to `[0, led_count]` and sum to at most
/// `led_count`. Layout along the strip is fixed: red occupies the lowest
/// indices, then yellow, then green, then unlit; the oldest signal
/// stays nearest the reference end as colors overwrite each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FreshnessLevels {
    pub red: usize,
    pub yellow: usize,
    pub green: usize,
    pub blink: bool,
}

impl FreshnessLevels {
    /// Color of cell `i`, low index first: red, yellow, green, or unlit
    /// (`None`).
    pub fn cell(&self, i: usize) -> Option<CellColor> {
        if i < self.red {
            Some(CellColor::Red)
        } else if i < self.red + self.yellow {
            Some(CellColor::Yellow)
        } else if i < self.red + self.yellow + self.green {
            Some(CellColor::Green)
        } else {
            None
        }
    }
}

/// Color of a single strip cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellColor {
    Red,
    Yellow,
    Green,
}

/// How a phase maps elapsed time to cell counts.
#[derive(Debug, Clone, Copy)]
enum PhaseRule {
    /// `color` grows from zero as elapsed passes `fill_start`.
    Fill { color: CellColor, fill_start: f64 },
    /// `color` holds the entire strip.
    Hold { color: CellColor },
}

impl FreshnessConfig {
    /// The ordered window table: `(exclusive_upper_bound, rule)`.
    /// Elapsed times beyond the last bound are the blinking terminal
    /// state, handled separately in [`levels`](Self::levels).
    fn phases(&self) -> [(f64, PhaseRule); 6] {
        [
            (
                self.green_fill_end,
                PhaseRule::Fill {
                    color: CellColor::Green,
                    fill_start: 0.0,
                },
            ),
            (
                self.green_buffer_end,
                PhaseRule::Hold {
                    color: CellColor::Green,
                },
            ),
            (
                self.yellow_fill_end,
                PhaseRule::Fill {
                    color: CellColor::Yellow,
                    fill_start: self.green_buffer_end,
                },
            ),
            (
                self.yellow_buffer_end,
                PhaseRule::Hold {
                    color: CellColor::Yellow,
                },
            ),
            (
                self.red_fill_end,
                PhaseRule::Fill {
                    color: CellColor::Red,
                    fill_start: self.yellow_buffer_end,
                },
            ),
            (
                self.red_buffer_end,
                PhaseRule::Hold {
                    color: CellColor::Red,
                },
            ),
        ]
    }

    /// Cells swept by a fill phase after `delta` seconds, floored and
    /// clamped to `[0, led_count]`. Tolerates zero/negative
    /// `fill_duration` and negative deltas from non-monotonic configs.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    fn fill_cells(&self, delta: f64) -> usize {
        let count = self.led_count as f64;
        let cells = (delta * count) / self.fill_duration;
        if cells.is_finite() {
            cells.floor().clamp(0.0, count) as usize
        } else {
            self.led_count
        }
    }

    /// Classify `elapsed` seconds into strip cell counts.
    ///
    /// Pure and cheap — intended to run on the fast render tick so fill
    /// transitions animate smoothly between network polls. Fractional
    /// elapsed values matter: a fill phase sweeps the strip over
    /// `fill_duration` seconds, roughly one cell per 0.6 s at defaults.
    pub fn levels(&self, elapsed: f64) -> FreshnessLevels {
        if elapsed >= self.red_buffer_end {
            // Terminal state: idempotent however large elapsed grows.
            return FreshnessLevels {
                red: self.led_count,
                yellow: 0,
                green: 0,
                blink: true,
            };
        }

        for (upper, rule) in self.phases() {
            if elapsed < upper {
                return self.apply(rule, elapsed);
            }
        }

        // Only reachable with a non-monotonic config (some window upper
        // bound sits below red_buffer_end yet above every phase bound).
        // Degrade to the rule of the final buffer.
        self.apply(
            PhaseRule::Hold {
                color: CellColor::Red,
            },
            elapsed,
        )
    }

    fn apply(&self, rule: PhaseRule, elapsed: f64) -> FreshnessLevels {
        match rule {
            PhaseRule::Fill { color, fill_start } => {
                let filled = self.fill_cells(elapsed - fill_start);
                match color {
                    CellColor::Green => FreshnessLevels {
                        green: filled,
                        ..FreshnessLevels::default()
                    },
                    // Overwrite phases: the new color claims `filled`
                    // cells from the low end, the previous color keeps
                    // the remainder.
                    CellColor::Yellow => FreshnessLevels {
                        yellow: filled,
                        green: self.led_count - filled,
                        ..FreshnessLevels::default()
                    },
                    CellColor::Red => FreshnessLevels {
                        red: filled,
                        yellow: self.led_count - filled,
                        ..FreshnessLevels::default()
                    },
                }
            }
            PhaseRule::Hold { color } => match color {
                CellColor::Green => FreshnessLevels {
                    green: self.led_count,
                    ..FreshnessLevels::default()
                },
                CellColor::Yellow => FreshnessLevels {
                    yellow: self.led_count,
                    ..FreshnessLevels::default()
                },
                CellColor::Red => FreshnessLevels {
                    red: self.led_count,
                    ..FreshnessLevels::default()
                },
            },
        }
    }

    /// The single authoritative staleness predicate: elapsed time has
    /// crossed the final configured boundary. Display renderers and the
    /// per-link state lamps consume this flag, never their own timing.
    pub fn is_stale(&self, elapsed: f64) -> bool {
        elapsed >= self.red_buffer_end
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn cfg() -> FreshnessConfig {
        FreshnessConfig::default()
    }

    fn assert_invariants(levels: FreshnessLevels, led_count: usize) {
        assert!(levels.red <= led_count);
        assert!(levels.yellow <= led_count);
        assert!(levels.green <= led_count);
        assert!(levels.red + levels.yellow + levels.green <= led_count);
    }

    #[test]
    fn green_fill_is_proportional() {
        let cfg = cfg();
        for tenths in 0..150 {
            let elapsed = f64::from(tenths) / 10.0;
            let levels = cfg.levels(elapsed);
            #[allow(
                clippy::cast_precision_loss,
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::as_conversions
            )]
            let expected = ((elapsed * 24.0) / 15.0).floor() as usize;
            assert_eq!(levels.green, expected, "elapsed={elapsed}");
            assert_eq!(levels.yellow, 0);
            assert_eq!(levels.red, 0);
            assert!(!levels.blink);
        }
    }

    #[test]
    fn green_buffer_holds_full_strip() {
        let cfg = cfg();
        for elapsed in [15.0, 17.3, 19.999] {
            let levels = cfg.levels(elapsed);
            assert_eq!(levels.green, 24);
            assert_eq!(levels.yellow, 0);
        }
    }

    #[test]
    fn yellow_overwrites_green_keeping_strip_full() {
        let cfg = cfg();
        for tenths in 200..350 {
            let elapsed = f64::from(tenths) / 10.0;
            let levels = cfg.levels(elapsed);
            assert_eq!(
                levels.green + levels.yellow,
                24,
                "strip stays full during overwrite at {elapsed}"
            );
            assert_eq!(levels.red, 0);
            assert!(!levels.blink);
        }
        // Midway through the yellow fill: 27.5s is 7.5s in = half swept.
        let mid = cfg.levels(27.5);
        assert_eq!(mid.yellow, 12);
        assert_eq!(mid.green, 12);
    }

    #[test]
    fn red_overwrites_yellow() {
        let cfg = cfg();
        let mid = cfg.levels(47.5); // 7.5s into the red fill
        assert_eq!(mid.red, 12);
        assert_eq!(mid.yellow, 12);
        assert_eq!(mid.green, 0);

        let buffered = cfg.levels(56.0);
        assert_eq!(buffered.red, 24);
        assert_eq!(buffered.yellow, 0);
    }

    #[test]
    fn terminal_state_blinks_and_is_idempotent() {
        let cfg = cfg();
        for elapsed in [60.0, 61.0, 600.0, NEVER_UPDATED_ELAPSED, 1.0e12] {
            let levels = cfg.levels(elapsed);
            assert_eq!(levels.red, 24, "elapsed={elapsed}");
            assert_eq!(levels.yellow, 0);
            assert_eq!(levels.green, 0);
            assert!(levels.blink);
            assert!(cfg.is_stale(elapsed));
        }
    }

    #[test]
    fn blink_is_false_below_final_boundary() {
        let cfg = cfg();
        for elapsed in [0.0, 14.9, 20.0, 39.9, 59.999] {
            assert!(!cfg.levels(elapsed).blink, "elapsed={elapsed}");
            assert!(!cfg.is_stale(elapsed));
        }
    }

    #[test]
    fn boundary_exactness() {
        let cfg = cfg();
        // Each boundary is exclusive of the phase before it.
        assert_eq!(cfg.levels(14.999).green, 23);
        assert_eq!(cfg.levels(15.0).green, 24); // buffer starts
        assert_eq!(cfg.levels(20.0).yellow, 0); // yellow fill starts at zero
        assert_eq!(cfg.levels(20.0).green, 24);
        assert_eq!(cfg.levels(40.0).red, 0);
        assert_eq!(cfg.levels(40.0).yellow, 24);
        assert!(cfg.levels(60.0).blink);
        assert!(!cfg.levels(59.999_999).blink);
    }

    #[test]
    fn counts_clamped_for_hostile_configs() {
        // Non-monotonic boundaries and a zero fill duration: every
        // output must stay within range, no panic.
        let hostile = FreshnessConfig {
            green_fill_end: 10.0,
            green_buffer_end: 5.0,
            yellow_fill_end: 2.0,
            yellow_buffer_end: 50.0,
            red_fill_end: 1.0,
            red_buffer_end: 60.0,
            fill_duration: 0.0,
            led_count: 24,
        };
        for tenths in 0..700 {
            let levels = hostile.levels(f64::from(tenths) / 10.0);
            assert_invariants(levels, 24);
        }
    }

    #[test]
    fn negative_elapsed_clamps_to_empty() {
        let levels = cfg().levels(-3.0);
        assert_eq!(levels.green, 0);
        assert_eq!(levels.yellow, 0);
        assert_eq!(levels.red, 0);
        assert!(!levels.blink);
    }

    #[test]
    fn cell_layout_red_then_yellow_then_green() {
        let levels = FreshnessLevels {
            red: 2,
            yellow: 3,
            green: 4,
            blink: false,
        };
        assert_eq!(levels.cell(0), Some(CellColor::Red));
        assert_eq!(levels.cell(1), Some(CellColor::Red));
        assert_eq!(levels.cell(2), Some(CellColor::Yellow));
        assert_eq!(levels.cell(4), Some(CellColor::Yellow));
        assert_eq!(levels.cell(5), Some(CellColor::Green));
        assert_eq!(levels.cell(8), Some(CellColor::Green));
        assert_eq!(levels.cell(9), None);
        assert_eq!(levels.cell(23), None);
    }

    #[test]
    fn payload_override_keeps_led_count() {
        let wire = FreshnessPayload {
            green_fill_end: 30.0,
            green_buffer_end: 40.0,
            yellow_fill_end: 70.0,
            yellow_buffer_end: 80.0,
            red_fill_end: 110.0,
            red_buffer_end: 120.0,
            fill_duration: 30.0,
        };
        let cfg = FreshnessConfig::from(wire);
        assert_eq!(cfg.led_count, LED_COUNT);
        assert!(cfg.is_stale(120.0));
        assert!(!cfg.is_stale(119.9));
    }
}
