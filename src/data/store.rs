use std::collections::HashSet;

use anyhow::{Result, bail};
use log::{debug, warn};

use crate::data::fetch_lock::FetchLock;
use crate::data::source::BarSource;
use crate::domain::{Bar, Timeframe, normalize_chunks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDirection {
    Backward,
    Forward,
}

/// Why a fetch request was a no-op. Not an error: state is unchanged and the
/// caller may try again later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another fetch holds the single-flight lock
    FetchInFlight,
    /// Backward extension would cross offset zero without partial permission,
    /// or history before the current window is already exhausted
    OutOfRange,
    /// Extension requested before any successful initial load
    NotLoaded,
}

/// Camera correction owed to the viewport after a merge prepended bars on the
/// left. Produced by the store, consumed exactly once by the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportAdjustment {
    pub shift_bars: usize,
}

impl ViewportAdjustment {
    pub const NONE: Self = Self { shift_bars: 0 };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchOutcome {
    /// Bars were merged; `added` counts survivors of dedup (may be zero when
    /// the response fully overlapped the sequence)
    Loaded {
        added: usize,
        adjustment: ViewportAdjustment,
    },
    /// The source had nothing for the requested range; terminal for this call
    Empty,
    Skipped(SkipReason),
}

/// Snapshot of the loaded sequence plus its running price bounds.
#[derive(Debug, Clone)]
pub struct BarWindow {
    pub bars: Vec<Bar>,
    pub price_low: f64,
    pub price_high: f64,
}

/// Owns the ordered, duplicate-free bar sequence and mediates every remote
/// fetch behind a single-flight lock.
///
/// `start`/`end` are abstract pagination offsets bounding the requested
/// window, advanced outward by the count of bars actually merged, never by
/// the requested amount.
pub struct BarStore<S> {
    source: S,
    symbol: String,
    timeframe: Timeframe,

    bars: Vec<Bar>,
    known_times: HashSet<i64>,

    start: u64,
    end: u64,

    price_low: Option<f64>,
    price_high: Option<f64>,

    lock: FetchLock,
    loaded: bool,
}

impl<S: BarSource> BarStore<S> {
    pub fn new(
        source: S,
        symbol: impl Into<String>,
        timeframe: Timeframe,
        start: u64,
        end: u64,
    ) -> Self {
        Self {
            source,
            symbol: symbol.into(),
            timeframe,
            bars: Vec::new(),
            known_times: HashSet::new(),
            start,
            end,
            price_low: None,
            price_high: None,
            lock: FetchLock::new(),
            loaded: false,
        }
    }

    /// Cloneable handle onto the Idle/Fetching state, for callers that want
    /// to avoid dispatching requests that would only be rejected.
    pub fn fetch_lock(&self) -> FetchLock {
        self.lock.clone()
    }

    pub fn cursors(&self) -> (u64, u64) {
        (self.start, self.end)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Fetches the session's first window `[start, end)` and replaces any
    /// prior content. `end` becomes `start + bars`.
    pub async fn load_initial(&mut self) -> Result<FetchOutcome> {
        let Some(_guard) = self.lock.try_acquire() else {
            return Ok(FetchOutcome::Skipped(SkipReason::FetchInFlight));
        };

        let chunks = self
            .source
            .fetch_chunks(&self.symbol, self.timeframe.minutes(), self.start, self.end)
            .await?;
        let bars = normalize_chunks(chunks);
        if bars.is_empty() {
            warn!("{}: initial load returned no bars", self.symbol);
            return Ok(FetchOutcome::Empty);
        }
        validate_response(&bars)?;

        self.end = self.start + bars.len() as u64;
        self.known_times = bars.iter().map(|b| b.time).collect();
        self.widen_price_bounds(&bars);
        self.bars = bars;
        self.loaded = true;

        Ok(FetchOutcome::Loaded {
            added: self.bars.len(),
            adjustment: ViewportAdjustment::NONE,
        })
    }

    /// Fetches `[start - amount, start)` and prepends whatever is not already
    /// known. With `allow_partial`, a request crossing offset zero is clamped
    /// to the bars that remain before the earliest known offset.
    pub async fn extend_backward(&mut self, amount: u64, allow_partial: bool) -> Result<FetchOutcome> {
        let Some(_guard) = self.lock.try_acquire() else {
            return Ok(FetchOutcome::Skipped(SkipReason::FetchInFlight));
        };
        if !self.loaded {
            return Ok(FetchOutcome::Skipped(SkipReason::NotLoaded));
        }

        let amount = if self.start >= amount {
            amount
        } else if allow_partial {
            self.start
        } else {
            debug!(
                "{}: backward extension of {amount} would cross offset zero (start={})",
                self.symbol, self.start
            );
            return Ok(FetchOutcome::Skipped(SkipReason::OutOfRange));
        };
        if amount == 0 {
            debug!("{}: history exhausted, nothing before offset 0", self.symbol);
            return Ok(FetchOutcome::Skipped(SkipReason::OutOfRange));
        }

        let chunks = self
            .source
            .fetch_chunks(
                &self.symbol,
                self.timeframe.minutes(),
                self.start - amount,
                self.start,
            )
            .await?;
        let incoming = normalize_chunks(chunks);
        if incoming.is_empty() {
            return Ok(FetchOutcome::Empty);
        }
        validate_response(&incoming)?;

        let fresh: Vec<Bar> = incoming
            .into_iter()
            .filter(|bar| !self.known_times.contains(&bar.time))
            .collect();
        if fresh.is_empty() {
            debug!("{}: backward fetch fully overlapped the sequence", self.symbol);
            return Ok(FetchOutcome::Loaded {
                added: 0,
                adjustment: ViewportAdjustment::NONE,
            });
        }

        // Survivors must all precede the current front, or the source's
        // offsets disagree with its content.
        if let (Some(newest), Some(first_existing)) = (fresh.last(), self.bars.first())
            && newest.time >= first_existing.time
        {
            bail!(
                "{}: backward response interleaves with loaded bars (t={} >= t={})",
                self.symbol,
                newest.time,
                first_existing.time
            );
        }

        self.widen_price_bounds(&fresh);
        self.known_times.extend(fresh.iter().map(|b| b.time));
        let added = fresh.len();
        self.bars.splice(0..0, fresh);
        self.start -= added as u64;

        Ok(FetchOutcome::Loaded {
            added,
            adjustment: ViewportAdjustment { shift_bars: added },
        })
    }

    /// Fetches `[end, end + amount)` and appends whatever is not already
    /// known. `end` advances by the count actually merged.
    pub async fn extend_forward(&mut self, amount: u64) -> Result<FetchOutcome> {
        let Some(_guard) = self.lock.try_acquire() else {
            return Ok(FetchOutcome::Skipped(SkipReason::FetchInFlight));
        };
        if !self.loaded {
            return Ok(FetchOutcome::Skipped(SkipReason::NotLoaded));
        }

        let chunks = self
            .source
            .fetch_chunks(
                &self.symbol,
                self.timeframe.minutes(),
                self.end,
                self.end + amount,
            )
            .await?;
        let incoming = normalize_chunks(chunks);
        if incoming.is_empty() {
            return Ok(FetchOutcome::Empty);
        }
        validate_response(&incoming)?;

        let fresh: Vec<Bar> = incoming
            .into_iter()
            .filter(|bar| !self.known_times.contains(&bar.time))
            .collect();
        if fresh.is_empty() {
            debug!("{}: forward fetch fully overlapped the sequence", self.symbol);
            return Ok(FetchOutcome::Loaded {
                added: 0,
                adjustment: ViewportAdjustment::NONE,
            });
        }

        if let (Some(oldest), Some(last_existing)) = (fresh.first(), self.bars.last())
            && oldest.time <= last_existing.time
        {
            bail!(
                "{}: forward response interleaves with loaded bars (t={} <= t={})",
                self.symbol,
                oldest.time,
                last_existing.time
            );
        }

        self.widen_price_bounds(&fresh);
        self.known_times.extend(fresh.iter().map(|b| b.time));
        let added = fresh.len();
        self.bars.extend(fresh);
        self.end += added as u64;

        Ok(FetchOutcome::Loaded {
            added,
            adjustment: ViewportAdjustment::NONE,
        })
    }

    /// Snapshot of the full sequence plus running price bounds. Errors until
    /// the first successful load.
    pub fn current_window(&self) -> Result<BarWindow> {
        if !self.loaded {
            bail!("bars are not loaded");
        }
        let (Some(price_low), Some(price_high)) = (self.price_low, self.price_high) else {
            bail!("price bounds are not set");
        };
        Ok(BarWindow {
            bars: self.bars.clone(),
            price_low,
            price_high,
        })
    }

    /// Widens the running bounds over newly merged bars only; previously
    /// merged bars are never re-examined.
    fn widen_price_bounds(&mut self, new_bars: &[Bar]) {
        for bar in new_bars {
            self.price_low = Some(self.price_low.map_or(bar.low, |low| low.min(bar.low)));
            self.price_high = Some(self.price_high.map_or(bar.high, |high| high.max(bar.high)));
        }
    }
}

/// A response that is not strictly chronological or carries impossible OHLC
/// values is a source defect; corrupting the sequence silently is worse than
/// failing the call.
fn validate_response(bars: &[Bar]) -> Result<()> {
    for pair in bars.windows(2) {
        if pair[1].time <= pair[0].time {
            bail!(
                "response is not chronological: t={} follows t={}",
                pair[1].time,
                pair[0].time
            );
        }
    }
    if let Some(bad) = bars.iter().find(|b| !b.is_well_formed()) {
        bail!("response bar at t={} violates low <= body <= high", bad.time);
    }
    Ok(())
}
