mod app;
mod canvas;

pub use app::CandleScopeApp;
pub use canvas::{EguiSurface, collect_input};
