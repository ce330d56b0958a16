use std::f64;

/// Linearly maps a value from one range to another while preserving its relative proportion.
pub fn remap(val: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let t = (val - in_min) / (in_max - in_min);
    out_min + t * (out_max - out_min)
}

/// Decimal places needed so price labels stay distinguishable across `high - low`.
/// Tight FX ranges (e.g. 0.0012) need more digits than index-sized ranges.
pub fn dynamic_precision(low: f64, high: f64) -> usize {
    let range = high - low;
    if range <= 0.0 {
        return 2;
    }
    let digits = (-range.log10()).ceil() as i64 + 1;
    (digits + 1).max(0) as usize
}

/// Bars that fit the screen width.
/// + 1 because the first and last bar are only partially visible.
pub fn max_bars_on_screen(bar_width: f64, bar_spacing: f64, screen_width: f64) -> usize {
    (screen_width / (bar_width + bar_spacing)).ceil() as usize + 1
}
