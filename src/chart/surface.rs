use eframe::egui::Color32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color32,
    pub width: f32,
    /// (on, off) dash lengths in px; `None` draws solid
    pub dash: Option<(f32, f32)>,
}

impl LineStyle {
    pub fn solid(color: Color32, width: f32) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: Color32, width: f32, dash: (f32, f32)) -> Self {
        Self { color, width, dash: Some(dash) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color32,
    pub size: f32,
}

/// Primitive drawing operations over a fixed-size pixel canvas. The chart
/// only issues these; it never reads pixel state back.
pub trait DrawSurface {
    fn clear(&mut self, color: Color32);
    fn line(&mut self, from: (f32, f32), to: (f32, f32), style: LineStyle);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color32);
    fn text(&mut self, text: &str, x: f32, y: f32, align: TextAlign, style: TextStyle);
}

/// One recorded primitive call, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Line {
        from: (f32, f32),
        to: (f32, f32),
        dashed: bool,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        align: TextAlign,
    },
}

/// Headless surface that records every call instead of rasterizing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn rect_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { .. }))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, _color: Color32) {
        self.ops.push(DrawOp::Clear);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), style: LineStyle) {
        self.ops.push(DrawOp::Line { from, to, dashed: style.dash.is_some() });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color32) {
        self.ops.push(DrawOp::Rect { x, y, w, h, color });
    }

    fn text(&mut self, text: &str, x: f32, y: f32, align: TextAlign, style: TextStyle) {
        let _ = style;
        self.ops.push(DrawOp::Text { text: text.to_string(), x, y, align });
    }
}
