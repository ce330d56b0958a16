mod fetch_lock;
mod source;
mod store;

pub use fetch_lock::{FetchGuard, FetchLock};
pub use source::{BarSource, ChunkedHttpSource};
pub use store::{
    BarStore, BarWindow, FetchDirection, FetchOutcome, SkipReason, ViewportAdjustment,
};
