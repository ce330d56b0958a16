use log::warn;

use crate::chart::surface::{DrawSurface, LineStyle, TextAlign, TextStyle};
use crate::chart::viewport::Viewport;
use crate::config::CHART;
use crate::domain::{Bar, BarKind};
use crate::utils::{dynamic_precision, epoch_s_to_date_string, epoch_s_to_time_string};

/// Inclusive index range of bars intersecting the effective viewport. The
/// same predicate decides render candidacy and feeds the prefetch policy.
pub fn visible_range(viewport: &Viewport, bars: &[Bar]) -> Option<(usize, usize)> {
    let mut range = None;
    for index in 0..bars.len() {
        let x = viewport.index_to_x(index as i64);
        if x + viewport.candle_width() > 0.0 && x < viewport.effective_width() {
            range = Some(match range {
                None => (index, index),
                Some((start, _)) => (start, index),
            });
        }
    }
    range
}

/// Stateless drawing pass over a `DrawSurface`. Order is fixed: clear,
/// candles, price scale + price overlay, time scale + date overlay,
/// crosshair.
pub struct ChartRenderer;

impl ChartRenderer {
    pub fn render(
        surface: &mut dyn DrawSurface,
        viewport: &Viewport,
        bars: &[Bar],
        cursor: Option<(f64, f64)>,
    ) {
        let Some((low, high)) = viewport.price_window() else {
            warn!("render skipped: price window not set");
            return;
        };

        surface.clear(CHART.palette.background);
        Self::draw_candles(surface, viewport, bars, low, high);
        Self::draw_price_scale(surface, viewport, low, high, cursor);
        Self::draw_time_scale(surface, viewport, bars, cursor);
        if let Some((x, y)) = cursor {
            Self::draw_crosshair(surface, viewport, x, y);
        }
    }

    fn draw_candles(
        surface: &mut dyn DrawSurface,
        viewport: &Viewport,
        bars: &[Bar],
        low: f64,
        high: f64,
    ) {
        let palette = &CHART.palette;
        let width = viewport.candle_width();

        for (index, bar) in bars.iter().enumerate() {
            let x = viewport.index_to_x(index as i64);
            if x + width <= 0.0 || x >= viewport.effective_width() {
                continue;
            }

            let y_high = viewport.price_to_y(bar.high, low, high);
            let y_low = viewport.price_to_y(bar.low, low, high);
            let y_open = viewport.price_to_y(bar.open, low, high);
            let y_close = viewport.price_to_y(bar.close, low, high);

            let center_x = (x + width / 2.0) as f32;
            surface.line(
                (center_x, y_high as f32),
                (center_x, y_low as f32),
                LineStyle::solid(palette.wick, palette.wick_width),
            );

            let body_color = match bar.kind() {
                BarKind::Bullish => palette.candle_bullish,
                BarKind::Bearish => palette.candle_bearish,
            };
            // Doji bodies still get one pixel
            let body_height = (y_close - y_open).abs().max(1.0);
            surface.fill_rect(
                x as f32,
                y_open.min(y_close) as f32,
                width as f32,
                body_height as f32,
                body_color,
            );
        }
    }

    fn draw_price_scale(
        surface: &mut dyn DrawSurface,
        viewport: &Viewport,
        low: f64,
        high: f64,
        cursor: Option<(f64, f64)>,
    ) {
        let palette = &CHART.palette;
        let (canvas_width, _) = viewport.canvas_size();
        let label_style = TextStyle { color: palette.scale_text, size: palette.scale_text_size };
        let precision = dynamic_precision(low, high);

        let steps = viewport.effective_height() / palette.price_label_spacing;
        let step_value = (high - low) / steps;
        if step_value <= f64::EPSILON {
            return;
        }

        let (visible_low, visible_high) = viewport.visible_price_window(low, high);
        let end_value = (visible_high / step_value).floor() * step_value;
        let mut price = (visible_low / step_value).ceil() * step_value;
        while price <= end_value {
            let y = viewport.price_to_y(price, low, high);
            if y > 0.0 && y < viewport.effective_height() {
                surface.text(
                    &format!("{price:.precision$}"),
                    (canvas_width - 10.0) as f32,
                    y as f32,
                    TextAlign::Right,
                    label_style,
                );
            }
            price += step_value;
        }

        // Price readout pinned to the cursor row
        if let Some((_, cursor_y)) = cursor {
            let price_at_cursor = viewport.y_to_price(cursor_y, low, high);
            surface.fill_rect(
                (canvas_width - 100.0) as f32,
                (cursor_y - 10.0) as f32,
                90.0,
                20.0,
                palette.overlay_background,
            );
            surface.text(
                &format!("{price_at_cursor:.precision$}"),
                (canvas_width - 10.0) as f32,
                cursor_y as f32,
                TextAlign::Right,
                TextStyle { color: palette.overlay_text, size: palette.overlay_text_size },
            );
        }
    }

    fn draw_time_scale(
        surface: &mut dyn DrawSurface,
        viewport: &Viewport,
        bars: &[Bar],
        cursor: Option<(f64, f64)>,
    ) {
        let palette = &CHART.palette;
        let (canvas_width, canvas_height) = viewport.canvas_size();
        let label_style = TextStyle { color: palette.scale_text, size: palette.scale_text_size };

        // Thin labels out as candles narrow so they never overlap
        let interval = ((100.0 / viewport.candle_width().max(1.0)).ceil() as usize).max(1);

        let mut last_drawn: Option<String> = None;
        for (index, bar) in bars.iter().enumerate() {
            if index % interval != 0 && index != bars.len().saturating_sub(1) {
                continue;
            }
            let x = viewport.index_to_x(index as i64);
            if x <= 0.0 || x >= viewport.effective_width() {
                continue;
            }
            let label = epoch_s_to_time_string(bar.time);
            if last_drawn.as_deref() == Some(label.as_str()) {
                continue;
            }
            surface.text(
                &label,
                x as f32,
                (canvas_height - 10.0) as f32,
                TextAlign::Center,
                label_style,
            );
            last_drawn = Some(label);
        }

        // Date readout for the bar under the cursor; a cursor past the data
        // simply draws nothing
        if let Some((cursor_x, _)) = cursor {
            let index = viewport.x_to_index(cursor_x);
            if index >= 0
                && let Some(bar) = bars.get(index as usize)
            {
                surface.fill_rect(
                    (cursor_x - 100.0) as f32,
                    (canvas_height - 30.0) as f32,
                    200.0,
                    20.0,
                    palette.overlay_background,
                );
                surface.text(
                    &epoch_s_to_date_string(bar.time),
                    cursor_x as f32,
                    (canvas_height - 15.0) as f32,
                    TextAlign::Center,
                    TextStyle { color: palette.overlay_text, size: palette.overlay_text_size },
                );
            }
        }
    }

    fn draw_crosshair(surface: &mut dyn DrawSurface, viewport: &Viewport, x: f64, y: f64) {
        let palette = &CHART.palette;
        let (canvas_width, canvas_height) = viewport.canvas_size();
        let style = LineStyle::dashed(
            palette.crosshair,
            palette.crosshair_width,
            palette.crosshair_dash,
        );

        surface.line((x as f32, 0.0), (x as f32, canvas_height as f32), style);
        surface.line((0.0, y as f32), (canvas_width as f32, y as f32), style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::surface::{DrawOp, RecordingSurface};

    fn bars(count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| Bar::new(i as i64 * 3600, 1.0, 1.4, 0.9, 1.2, 5))
            .collect()
    }

    fn loaded_viewport() -> Viewport {
        let mut vp = Viewport::new(600.0, 430.0);
        vp.set_price_window(0.9, 1.4);
        vp.take_events();
        vp
    }

    #[test]
    fn render_without_price_window_is_a_no_op() {
        let vp = Viewport::new(600.0, 430.0);
        let mut surface = RecordingSurface::new();
        ChartRenderer::render(&mut surface, &vp, &bars(10), None);
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn drawing_order_is_clear_candles_scales_crosshair() {
        let vp = loaded_viewport();
        let mut surface = RecordingSurface::new();
        ChartRenderer::render(&mut surface, &vp, &bars(5), Some((60.0, 100.0)));

        assert_eq!(surface.ops.first(), Some(&DrawOp::Clear));
        // the first primitive after clear is a candle wick
        assert!(matches!(surface.ops.get(1), Some(DrawOp::Line { dashed: false, .. })));
        // the crosshair closes the frame with two dashed lines
        let tail: Vec<_> = surface.ops.iter().rev().take(2).collect();
        assert!(tail.iter().all(|op| matches!(op, DrawOp::Line { dashed: true, .. })));
    }

    #[test]
    fn only_bars_intersecting_the_effective_viewport_are_drawn() {
        let vp = loaded_viewport();
        // slot width 12, effective width 500: indexes 0..=41 intersect
        assert_eq!(visible_range(&vp, &bars(200)), Some((0, 41)));

        let mut surface = RecordingSurface::new();
        ChartRenderer::render(&mut surface, &vp, &bars(200), None);
        assert_eq!(surface.rect_count(), 42);
    }

    #[test]
    fn panned_out_bars_drop_off_the_left_edge() {
        let mut vp = loaded_viewport();
        vp.pan(120.0, 0.0);
        vp.take_events();
        // ten slots panned away; bar 9's body ends left of the edge
        assert_eq!(visible_range(&vp, &bars(200)), Some((10, 51)));
    }

    #[test]
    fn visible_range_is_empty_when_panned_past_the_data() {
        let mut vp = loaded_viewport();
        vp.pan(10_000.0, 0.0);
        vp.take_events();
        assert_eq!(visible_range(&vp, &bars(20)), None);
    }

    #[test]
    fn cursor_past_the_sequence_draws_no_date_overlay() {
        let vp = loaded_viewport();
        let mut surface = RecordingSurface::new();
        // two bars end at x = 24; the cursor hovers far to the right
        ChartRenderer::render(&mut surface, &vp, &bars(2), Some((400.0, 50.0)));

        let bottom_texts = surface
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Text { y, .. } if *y == 415.0))
            .count();
        assert_eq!(bottom_texts, 0);
    }

    #[test]
    fn price_labels_use_range_adapted_precision() {
        let mut vp = Viewport::new(600.0, 430.0);
        vp.set_price_window(1.1000, 1.1010);
        vp.take_events();
        let mut surface = RecordingSurface::new();
        ChartRenderer::render(&mut surface, &vp, &bars(3), None);

        // range 0.001 needs five decimals to tell labels apart
        assert!(surface.texts().iter().any(|t| t.len() == 7 && t.starts_with("1.10")));
    }
}
