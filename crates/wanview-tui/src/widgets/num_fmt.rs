//! Human-readable metric formatting for the telemetry table.

use wanview_core::BandwidthPair;

/// Milliseconds, rounded to a whole number and right-aligned to three
/// digits: `"  8 ms"`. Caps at 999 like the physical displays.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn fmt_ms(value: f64) -> String {
    let v = value.round().clamp(0.0, 999.0) as i64;
    format!("{v:>3} ms")
}

/// Loss percentage with one decimal: `"0.3 %"`.
pub fn fmt_pct(value: f64) -> String {
    format!("{value:.1} %")
}

/// Bandwidth in Mbps with one decimal, right-aligned: `" 45.3"`.
pub fn fmt_bw(value: f64) -> String {
    format!("{value:>5.1}")
}

/// Down/up pair with both halves padded to the `XXX.X` width, so the
/// table columns don't wobble as values change: `" 45.3/  9.1"`.
pub fn fmt_pair(pair: BandwidthPair) -> String {
    format!("{}/{}", fmt_bw(pair.down), fmt_bw(pair.up))
}
