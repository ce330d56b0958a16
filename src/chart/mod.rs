mod controller;
mod render;
mod surface;
mod viewport;

pub use controller::{ChartController, ControlAction, InputEvent};
pub use render::{ChartRenderer, visible_range};
pub use surface::{DrawOp, DrawSurface, LineStyle, RecordingSurface, TextAlign, TextStyle};
pub use viewport::{Viewport, ViewportEvent};
