use std::time::{Duration, Instant};

use log::debug;

use crate::chart::render::{ChartRenderer, visible_range};
use crate::chart::surface::DrawSurface;
use crate::chart::viewport::{Viewport, ViewportEvent};
use crate::config::CHART;
use crate::data::{BarWindow, FetchDirection, ViewportAdjustment};
use crate::domain::Bar;
use crate::utils::max_bars_on_screen;

/// Normalized input, already reduced to canvas-local coordinates and deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Drag { dx: f64, dy: f64 },
    PointerMove { x: f64, y: f64 },
    Wheel { dx: f64, dy: f64, x: f64 },
    Resized { width: f64, height: f64 },
}

/// What the owner should do in response to handled input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Repaint,
    Fetch(FetchDirection),
}

/// Coalesces bursts of pan/zoom events into at most one dispatched fetch per
/// interval, so the store's single-flight guard is not flooded with calls it
/// would only reject.
struct PrefetchThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl PrefetchThrottle {
    fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    fn allow(&mut self) -> bool {
        match self.last {
            Some(last) if last.elapsed() < self.interval => false,
            _ => {
                self.last = Some(Instant::now());
                true
            }
        }
    }
}

/// Ties pointer/wheel input to viewport mutation, decides when the loaded
/// window no longer covers the screen, and drives repaints.
pub struct ChartController {
    viewport: Viewport,
    bars: Vec<Bar>,
    loaded: bool,
    cursor: Option<(f64, f64)>,
    throttle: PrefetchThrottle,
}

impl ChartController {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            viewport: Viewport::new(canvas_width, canvas_height),
            bars: Vec::new(),
            loaded: false,
            cursor: None,
            throttle: PrefetchThrottle::new(Duration::from_millis(CHART.prefetch.throttle_ms)),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Vec<ControlAction> {
        match event {
            InputEvent::Drag { dx, dy } => {
                self.viewport.pan(-dx, -dy);
            }
            InputEvent::Wheel { dx, dy, x } => {
                if dy.abs() > dx.abs() {
                    if self.viewport.is_on_price_scale(x) {
                        let fraction = if dy < 0.0 {
                            CHART.geometry.zoom_y_step
                        } else {
                            -CHART.geometry.zoom_y_step
                        };
                        self.viewport.zoom_y(fraction);
                    } else {
                        let delta = if dy < 0.0 {
                            CHART.geometry.zoom_x_step
                        } else {
                            -CHART.geometry.zoom_x_step
                        };
                        self.viewport.zoom_x(delta, x);
                    }
                } else {
                    self.viewport.pan(dx, 0.0);
                }
            }
            InputEvent::PointerMove { x, y } => {
                if !self.loaded {
                    debug!("pointer ignored: no data loaded");
                    return Vec::new();
                }
                self.cursor = Some((self.viewport.snap_to_candle_center(x), y));
                // cursor movement repaints, never fetches
                return vec![ControlAction::Repaint];
            }
            InputEvent::Resized { width, height } => {
                self.viewport.set_canvas_size(width, height);
            }
        }
        self.drain_viewport_events()
    }

    /// Installs a merged window snapshot. Explicit price bounds only land on
    /// the first window of a session; later windows reuse the displayed
    /// bounds so the view does not flicker when only the bar set changed.
    pub fn apply_window(
        &mut self,
        window: BarWindow,
        adjustment: ViewportAdjustment,
        initial: bool,
    ) -> Vec<ControlAction> {
        if initial || self.viewport.price_window().is_none() {
            self.viewport.set_price_window(window.price_low, window.price_high);
        }
        self.viewport.apply_adjustment(adjustment);
        self.bars = window.bars;
        self.loaded = true;
        // window application repaints with the data it carries; it never
        // re-enters the prefetch policy
        self.viewport.take_events();
        vec![ControlAction::Repaint]
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        ChartRenderer::render(surface, &self.viewport, &self.bars, self.cursor);
    }

    fn drain_viewport_events(&mut self) -> Vec<ControlAction> {
        let events = self.viewport.take_events();
        if events.is_empty() {
            return Vec::new();
        }

        let mut actions = vec![ControlAction::Repaint];
        let horizontal_change = events
            .iter()
            .any(|e| matches!(e, ViewportEvent::Panned | ViewportEvent::ZoomedX));
        if horizontal_change
            && self.loaded
            && let Some(direction) = self.prefetch_direction()
            && self.throttle.allow()
        {
            actions.push(ControlAction::Fetch(direction));
        }
        actions
    }

    /// Hysteresis-banded comparison of bars that fit the screen against bars
    /// actually rendered. Backward when the rendered range already starts at
    /// the sequence front (out of bars on the left), forward otherwise.
    fn prefetch_direction(&self) -> Option<FetchDirection> {
        let desired = max_bars_on_screen(
            self.viewport.candle_width(),
            CHART.geometry.candle_spacing,
            self.viewport.effective_width(),
        );
        let (rendered, starts_at_front) = match visible_range(&self.viewport, &self.bars) {
            Some((start, end)) => (end - start + 1, start == 0),
            None => (0, false),
        };

        if desired.abs_diff(rendered) <= CHART.prefetch.hysteresis_bars {
            return None;
        }
        Some(if starts_at_front {
            FetchDirection::Backward
        } else {
            FetchDirection::Forward
        })
    }
}
