use crate::data::{BarWindow, FetchDirection, SkipReason, ViewportAdjustment};
use crate::domain::Timeframe;

/// Everything the worker needs to open a chart session.
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    LoadInitial,
    Extend { direction: FetchDirection, amount: u64 },
}

/// Worker -> UI. `Window` carries the full merged snapshot plus the camera
/// correction owed for bars prepended on the left.
#[derive(Debug)]
pub enum EngineEvent {
    Window {
        window: BarWindow,
        adjustment: ViewportAdjustment,
        initial: bool,
    },
    Skipped(SkipReason),
    Empty,
    Failed(String),
}
