mod bar;
mod chunk;
mod timeframe;

pub use bar::{Bar, BarKind};
pub use chunk::{Chunk, normalize_chunks};
pub use timeframe::Timeframe;
