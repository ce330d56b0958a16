use log::warn;

use crate::config::CHART;
use crate::data::ViewportAdjustment;
use crate::utils::remap;

/// Geometry change notification. Mutators queue these; the owner drains the
/// queue and decides repaint vs prefetch per kind, so no hidden re-entrant
/// callback chain exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    Panned,
    ZoomedX,
    ZoomedY,
    Resized,
    PriceWindowSet,
}

/// Camera state mapping bar index / price space onto pixel space: pan
/// offsets, candle width, canvas size, and the displayed price window.
///
/// All pixel math routes through the effective width/height (canvas minus
/// the scale margins); the raw canvas size only bounds the overlay regions.
pub struct Viewport {
    offset_x: f64,
    offset_y: f64,
    candle_width: f64,
    canvas_width: f64,
    canvas_height: f64,
    price_window: Option<(f64, f64)>,
    events: Vec<ViewportEvent>,
}

impl Viewport {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            candle_width: CHART.geometry.candle_width,
            canvas_width,
            canvas_height,
            price_window: None,
            events: Vec::new(),
        }
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn candle_width(&self) -> f64 {
        self.candle_width
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    /// Horizontal footprint of one bar slot: body plus spacing.
    pub fn slot_width(&self) -> f64 {
        self.candle_width + CHART.geometry.candle_spacing
    }

    pub fn effective_width(&self) -> f64 {
        self.canvas_width - CHART.geometry.price_scale_margin
    }

    pub fn effective_height(&self) -> f64 {
        self.canvas_height - CHART.geometry.date_scale_margin
    }

    pub fn price_window(&self) -> Option<(f64, f64)> {
        self.price_window
    }

    pub fn index_to_x(&self, index: i64) -> f64 {
        index as f64 * self.slot_width() - self.offset_x
    }

    pub fn x_to_index(&self, x: f64) -> i64 {
        ((x + self.offset_x) / self.slot_width()).floor() as i64
    }

    pub fn price_to_y(&self, value: f64, low: f64, high: f64) -> f64 {
        remap(value, low, high, self.effective_height(), 0.0) - self.offset_y
    }

    pub fn y_to_price(&self, y: f64, low: f64, high: f64) -> f64 {
        remap(y + self.offset_y, self.effective_height(), 0.0, low, high)
    }

    /// Price bounds actually on screen once the vertical pan is applied.
    pub fn visible_price_window(&self, low: f64, high: f64) -> (f64, f64) {
        let price_per_pixel = (high - low) / self.effective_height();
        let price_offset = -self.offset_y * price_per_pixel;
        (low + price_offset, high + price_offset)
    }

    pub fn is_index_visible(&self, index: i64) -> bool {
        let x = self.index_to_x(index);
        x >= 0.0 && x <= self.effective_width()
    }

    pub fn is_price_visible(&self, value: f64, low: f64, high: f64) -> bool {
        let y = self.price_to_y(value, low, high);
        y >= 0.0 && y <= self.effective_height()
    }

    /// Whether a canvas-local x sits in the price-scale margin.
    pub fn is_on_price_scale(&self, x: f64) -> bool {
        x >= self.effective_width() && x <= self.canvas_width
    }

    /// Cursor x snapped to the center of the nearest candle slot, for
    /// crosshair and date-overlay alignment.
    pub fn snap_to_candle_center(&self, x: f64) -> f64 {
        let index = ((x + self.offset_x) / self.slot_width()).round();
        let snapped = index * self.slot_width() + self.candle_width / 2.0 - self.offset_x;
        snapped.min(self.canvas_width)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
        self.events.push(ViewportEvent::Panned);
    }

    /// Converts a bar-count delta into a pixel offset delta at the current
    /// slot width.
    pub fn pan_by_bars(&mut self, bars: f64) {
        self.offset_x += bars * self.slot_width();
        self.events.push(ViewportEvent::Panned);
    }

    /// Consumes a merge's camera correction: bars prepended on the left
    /// shift the content right, so the offset follows to keep the view
    /// anchored. Does not count as user navigation.
    pub fn apply_adjustment(&mut self, adjustment: ViewportAdjustment) {
        if adjustment.shift_bars > 0 {
            self.offset_x += adjustment.shift_bars as f64 * self.slot_width();
        }
    }

    /// Anchor-preserving horizontal zoom: the bar under `anchor_x` stays
    /// under `anchor_x` across the width change.
    pub fn zoom_x(&mut self, delta: f64, anchor_x: f64) {
        let anchor_fraction = (anchor_x + self.offset_x) / self.slot_width();

        self.candle_width = (self.candle_width + delta)
            .clamp(CHART.geometry.candle_width_min, CHART.geometry.candle_width_max);

        self.offset_x = anchor_fraction * self.slot_width() - anchor_x;
        self.events.push(ViewportEvent::ZoomedX);
    }

    /// Symmetric vertical zoom: trims (or pads, for negative `fraction`)
    /// each side of the displayed price window by `fraction * range`.
    pub fn zoom_y(&mut self, fraction: f64) {
        let Some((low, high)) = self.price_window else {
            warn!("zoom_y ignored: price window not set");
            return;
        };
        let range = high - low;
        let (new_low, new_high) = (low + fraction * range, high - fraction * range);
        if new_low >= new_high {
            warn!("zoom_y ignored: window would collapse");
            return;
        }
        self.price_window = Some((new_low, new_high));
        self.events.push(ViewportEvent::ZoomedY);
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
        self.events.push(ViewportEvent::Resized);
    }

    pub fn set_price_window(&mut self, low: f64, high: f64) {
        self.price_window = Some((low, high));
        self.events.push(ViewportEvent::PriceWindowSet);
    }

    pub fn take_events(&mut self) -> Vec<ViewportEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        // effective width 500 with the 100px price-scale margin
        Viewport::new(600.0, 430.0)
    }

    #[test]
    fn index_x_round_trip_snaps_to_the_same_index() {
        let mut vp = viewport();
        vp.pan(137.0, 0.0);
        vp.take_events();

        for x in [0.0, 5.5, 123.0, 480.9] {
            let index = vp.x_to_index(x);
            let snapped = vp.index_to_x(index);
            // snapped x lies within one slot of the probe...
            assert!((snapped - x).abs() <= vp.slot_width());
            // ...and maps back to the same index
            assert_eq!(vp.x_to_index(snapped), index);
        }
    }

    #[test]
    fn price_y_round_trip_is_exact_up_to_float_noise() {
        let mut vp = viewport();
        vp.pan(0.0, -25.0);
        vp.take_events();

        let (low, high) = (1.0, 2.0);
        for price in [1.0, 1.25, 1.9] {
            let y = vp.price_to_y(price, low, high);
            assert!((vp.y_to_price(y, low, high) - price).abs() < 1e-9);
        }
    }

    #[test]
    fn anchored_zoom_keeps_the_bar_under_the_cursor() {
        let mut vp = viewport();
        vp.pan(300.0, 0.0);
        let anchor_x = 250.0;
        let before = vp.x_to_index(anchor_x);

        vp.zoom_x(2.0, anchor_x);
        let after = vp.x_to_index(anchor_x);
        assert!((before - after).abs() <= 1);

        vp.zoom_x(-5.0, anchor_x);
        let after = vp.x_to_index(anchor_x);
        assert!((before - after).abs() <= 1);
    }

    #[test]
    fn zoom_x_clamps_the_candle_width() {
        let mut vp = viewport();
        vp.zoom_x(100.0, 0.0);
        assert_eq!(vp.candle_width(), CHART.geometry.candle_width_max);
        vp.zoom_x(-100.0, 0.0);
        assert_eq!(vp.candle_width(), CHART.geometry.candle_width_min);
    }

    #[test]
    fn zoom_y_shrinks_symmetrically() {
        let mut vp = viewport();
        vp.set_price_window(1.0, 2.0);
        vp.zoom_y(0.1);
        let (low, high) = vp.price_window().unwrap();
        assert!((low - 1.1).abs() < 1e-12);
        assert!((high - 1.9).abs() < 1e-12);
    }

    #[test]
    fn zoom_y_refuses_to_collapse_the_window() {
        let mut vp = viewport();
        vp.set_price_window(1.0, 2.0);
        vp.take_events();
        vp.zoom_y(0.6);
        assert_eq!(vp.price_window(), Some((1.0, 2.0)));
        assert!(vp.take_events().is_empty());
    }

    #[test]
    fn pan_by_bars_moves_whole_slots() {
        let mut vp = viewport();
        let x_before = vp.index_to_x(40);
        vp.pan_by_bars(3.0);
        assert!((vp.index_to_x(43) - x_before).abs() < 1e-9);
    }

    #[test]
    fn adjustment_keeps_the_same_bar_on_screen_after_a_prepend() {
        let mut vp = viewport();
        // bar 10 sits somewhere on screen
        let x_before = vp.index_to_x(10);
        // 25 bars get prepended: the old bar 10 is now bar 35
        vp.apply_adjustment(ViewportAdjustment { shift_bars: 25 });
        assert!((vp.index_to_x(35) - x_before).abs() < 1e-9);
        // consuming the adjustment is not user navigation
        assert!(vp.take_events().is_empty());
    }

    #[test]
    fn effective_size_excludes_scale_margins() {
        let vp = viewport();
        assert_eq!(vp.effective_width(), 500.0);
        assert_eq!(vp.effective_height(), 400.0);
        assert!(vp.is_on_price_scale(550.0));
        assert!(!vp.is_on_price_scale(499.0));
    }

    #[test]
    fn visibility_is_judged_against_the_effective_area() {
        let mut vp = viewport();
        assert!(vp.is_index_visible(0));
        assert!(vp.is_index_visible(41));
        // slot 42 starts at x = 504, past the 500px effective width
        assert!(!vp.is_index_visible(42));

        vp.pan(24.0, 0.0);
        assert!(!vp.is_index_visible(0));

        let (low, high) = (1.0, 2.0);
        assert!(vp.is_price_visible(1.5, low, high));
        // above the displayed window maps to a negative y
        assert!(!vp.is_price_visible(2.5, low, high));
    }

    #[test]
    fn mutators_queue_typed_events() {
        let mut vp = viewport();
        vp.pan(1.0, 0.0);
        vp.zoom_x(0.2, 10.0);
        vp.set_price_window(1.0, 2.0);
        vp.zoom_y(0.1);
        vp.set_canvas_size(800.0, 600.0);

        assert_eq!(
            vp.take_events(),
            vec![
                ViewportEvent::Panned,
                ViewportEvent::ZoomedX,
                ViewportEvent::PriceWindowSet,
                ViewportEvent::ZoomedY,
                ViewportEvent::Resized,
            ]
        );
        assert!(vp.take_events().is_empty());
    }

    #[test]
    fn snap_centers_on_the_nearest_slot() {
        let vp = viewport();
        // slot width 12, candle width 10: slot 3 spans [36, 48), center 41
        assert_eq!(vp.snap_to_candle_center(38.0), 41.0);
        // a probe just past the midpoint snaps to the next slot
        assert_eq!(vp.snap_to_candle_center(43.0), 53.0);
    }
}
