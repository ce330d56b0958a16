use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq)]
pub enum BarKind {
    Bullish,
    Bearish,
}

/// One OHLCV price sample for a fixed time bucket. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bucket open time, seconds since epoch
    pub time: i64,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    pub tick_volume: u64,
}

impl Bar {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, tick_volume: u64) -> Self {
        Bar {
            time,
            open,
            high,
            low,
            close,
            tick_volume,
        }
    }

    pub fn kind(&self) -> BarKind {
        if self.close >= self.open {
            BarKind::Bullish
        } else {
            BarKind::Bearish
        }
    }

    /// Low and high of the candle body as a tuple.
    pub fn body_range(&self) -> (f64, f64) {
        match self.kind() {
            BarKind::Bullish => (self.open, self.close),
            BarKind::Bearish => (self.close, self.open),
        }
    }

    /// low <= min(open, close) <= max(open, close) <= high
    pub fn is_well_formed(&self) -> bool {
        let (body_low, body_high) = self.body_range();
        self.low <= body_low && body_high <= self.high
    }
}
