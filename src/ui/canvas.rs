use eframe::egui::{
    Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Response, Shape, Stroke, Ui, Vec2,
    vec2,
};

use crate::chart::{DrawSurface, InputEvent, LineStyle, TextAlign, TextStyle};

/// `DrawSurface` over an egui painter, translating chart-local pixels into
/// the allocated screen rect.
pub struct EguiSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    fn to_screen(&self, x: f32, y: f32) -> Pos2 {
        self.rect.min + vec2(x, y)
    }
}

impl DrawSurface for EguiSurface<'_> {
    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.rect, CornerRadius::ZERO, color);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), style: LineStyle) {
        let points = [self.to_screen(from.0, from.1), self.to_screen(to.0, to.1)];
        let stroke = Stroke::new(style.width, style.color);
        match style.dash {
            None => self.painter.line_segment(points, stroke),
            Some((on, off)) => {
                self.painter.extend(Shape::dashed_line(&points, stroke, on, off));
            }
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color32) {
        let rect = Rect::from_min_size(self.to_screen(x, y), vec2(w, h));
        self.painter.rect_filled(rect, CornerRadius::ZERO, color);
    }

    fn text(&mut self, text: &str, x: f32, y: f32, align: TextAlign, style: TextStyle) {
        let anchor = match align {
            TextAlign::Left => Align2::LEFT_CENTER,
            TextAlign::Center => Align2::CENTER_CENTER,
            TextAlign::Right => Align2::RIGHT_CENTER,
        };
        self.painter.text(
            self.to_screen(x, y),
            anchor,
            text,
            FontId::proportional(style.size),
            style.color,
        );
    }
}

/// Reduces egui pointer/wheel state over the chart rect into normalized
/// canvas-local input events. The chart core never sees raw egui state.
pub fn collect_input(ui: &Ui, response: &Response, rect: Rect) -> Vec<InputEvent> {
    let mut events = Vec::new();

    if response.dragged() {
        let delta = response.drag_delta();
        if delta != Vec2::ZERO {
            events.push(InputEvent::Drag { dx: delta.x as f64, dy: delta.y as f64 });
        }
    }

    if let Some(pos) = response.hover_pos() {
        let local = pos - rect.min;

        // egui's wheel y is positive scrolling up; the chart expects the
        // browser-style convention (positive down)
        let scroll = ui.input(|i| i.raw_scroll_delta);
        if scroll != Vec2::ZERO {
            events.push(InputEvent::Wheel {
                dx: -scroll.x as f64,
                dy: -scroll.y as f64,
                x: local.x as f64,
            });
        }

        // pointer position last, so the cursor snaps against post-zoom geometry
        events.push(InputEvent::PointerMove { x: local.x as f64, y: local.y as f64 });
    }

    events
}
