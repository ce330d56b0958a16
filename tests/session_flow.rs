//! Drives a full chart session over a deterministic market: initial load,
//! panning into both data edges, prefetch dispatch, merge, and the camera
//! correction after a backward extension.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use candle_scope::chart::{ChartController, ControlAction, DrawOp, InputEvent, RecordingSurface};
use candle_scope::data::{BarSource, BarStore, FetchDirection, FetchOutcome, ViewportAdjustment};
use candle_scope::domain::{Bar, Chunk, Timeframe};

const BAR_SECONDS: i64 = 60;

/// Synthetic market: offset `k` maps to a bar opening at `k * 60` seconds.
/// Nothing exists at or past `horizon` (the present), and responses come
/// back split into two chunks with chunk-relative times.
struct ScriptedMarket {
    horizon: u64,
}

#[async_trait]
impl BarSource for ScriptedMarket {
    async fn fetch_chunks(
        &self,
        _symbol: &str,
        _timeframe_minutes: u32,
        start: u64,
        end: u64,
    ) -> Result<Vec<Chunk>> {
        let end = end.min(self.horizon);
        if start >= end {
            return Ok(Vec::new());
        }

        let mid = start + (end - start) / 2;
        let chunk = |from: u64, to: u64| Chunk {
            chunk_start: from as i64 * BAR_SECONDS,
            bars: (0..to - from)
                .map(|i| Bar::new(i as i64 * BAR_SECONDS, 1.10, 1.15, 1.05, 1.12, 3))
                .collect(),
        };

        if mid > start && mid < end {
            Ok(vec![chunk(start, mid), chunk(mid, end)])
        } else {
            Ok(vec![chunk(start, end)])
        }
    }
}

fn fetch_actions(actions: &[ControlAction]) -> Vec<FetchDirection> {
    actions
        .iter()
        .filter_map(|a| match a {
            ControlAction::Fetch(direction) => Some(*direction),
            ControlAction::Repaint => None,
        })
        .collect()
}

async fn run_fetch(
    store: &mut BarStore<ScriptedMarket>,
    controller: &mut ChartController,
    direction: FetchDirection,
) -> FetchOutcome {
    let outcome = match direction {
        FetchDirection::Backward => store.extend_backward(100, true).await.unwrap(),
        FetchDirection::Forward => store.extend_forward(100).await.unwrap(),
    };
    if let FetchOutcome::Loaded { adjustment, .. } = outcome {
        let window = store.current_window().unwrap();
        controller.apply_window(window, adjustment, false);
    }
    outcome
}

#[tokio::test]
async fn pan_to_both_edges_extends_the_window_and_holds_the_camera() {
    let market = ScriptedMarket { horizon: 11_050 };
    let mut store = BarStore::new(market, "EURUSD", Timeframe::H1, 10_000, 11_000);

    // --- initial load ---
    let outcome = store.load_initial().await.unwrap();
    assert!(matches!(outcome, FetchOutcome::Loaded { added: 1000, .. }));
    assert_eq!(store.cursors(), (10_000, 11_000));

    // canvas 600x430: effective area 500px wide, 43 bars fit at default zoom
    let mut controller = ChartController::new(600.0, 430.0);
    let window = store.current_window().unwrap();
    assert_eq!(window.bars.first().unwrap().time, 10_000 * BAR_SECONDS);
    controller.apply_window(window, ViewportAdjustment::NONE, true);

    let mut surface = RecordingSurface::new();
    controller.draw(&mut surface);
    assert_eq!(surface.ops.first(), Some(&DrawOp::Clear));
    assert!(surface.rect_count() > 0);

    // --- pan toward the left edge: the window runs out of bars ---
    let actions = controller.handle_input(InputEvent::Drag { dx: 150.0, dy: 0.0 });
    assert_eq!(fetch_actions(&actions), vec![FetchDirection::Backward]);

    // where the old front bar sits before the merge lands
    let front_x_before = controller.viewport().index_to_x(0);

    let outcome = run_fetch(&mut store, &mut controller, FetchDirection::Backward).await;
    assert!(matches!(outcome, FetchOutcome::Loaded { added: 100, .. }));
    assert_eq!(store.cursors(), (9_900, 11_000));

    // the prepend shifted indexes by 100, but not the pixels under the camera
    let front_x_after = controller.viewport().index_to_x(100);
    assert!((front_x_after - front_x_before).abs() < 1e-9);

    // extension merges must not touch the displayed price bounds
    assert_eq!(controller.viewport().price_window(), Some((1.05, 1.15)));

    // --- pan far past the right edge ---
    tokio::time::sleep(Duration::from_millis(1100)).await; // let the throttle open
    let actions = controller.handle_input(InputEvent::Drag { dx: -15_000.0, dy: 0.0 });
    assert_eq!(fetch_actions(&actions), vec![FetchDirection::Forward]);

    // the source caps the response at the present: 50 of 100 requested bars
    let outcome = run_fetch(&mut store, &mut controller, FetchDirection::Forward).await;
    assert!(matches!(outcome, FetchOutcome::Loaded { added: 50, .. }));
    assert_eq!(store.cursors(), (9_900, 11_050));
    assert_eq!(controller.bar_count(), 1150);

    // --- the present is a hard edge: the next forward fetch finds nothing ---
    let outcome = run_fetch(&mut store, &mut controller, FetchDirection::Forward).await;
    assert_eq!(outcome, FetchOutcome::Empty);
    assert_eq!(store.cursors(), (9_900, 11_050));

    // the merged sequence stayed strictly chronological throughout
    let window = store.current_window().unwrap();
    assert!(window.bars.windows(2).all(|w| w[0].time < w[1].time));
}
