use std::time::Duration;

use eframe::egui::{
    Align2, CentralPanel, ComboBox, Context, CornerRadius, FontId, Frame, Sense, TopBottomPanel,
    Visuals,
};
use strum::IntoEnumIterator;

use crate::Cli;
use crate::chart::{ChartController, ControlAction, InputEvent};
use crate::config::{API, CHART, SYMBOLS};
use crate::data::ChunkedHttpSource;
use crate::domain::Timeframe;
use crate::engine::{self, EngineCommand, EngineEvent, EngineHandle, SessionParams};
use crate::ui::canvas::{EguiSurface, collect_input};

pub struct CandleScopeApp {
    symbol: String,
    timeframe: Timeframe,
    api_url: String,

    controller: ChartController,
    engine: Option<EngineHandle>,
    status: String,
}

impl CandleScopeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> Self {
        cc.egui_ctx.set_visuals(Visuals::dark());

        Self {
            symbol: args.symbol.unwrap_or_else(|| SYMBOLS[0].to_string()),
            timeframe: Timeframe::default(),
            api_url: args.api_url.unwrap_or_else(|| API.base_url.to_string()),
            controller: ChartController::new(0.0, 0.0),
            engine: None,
            status: "Pick a symbol and press Load".to_string(),
        }
    }

    /// Replaces any running session: fresh store, fresh camera, initial load.
    fn start_session(&mut self) {
        let (canvas_width, canvas_height) = self.controller.viewport().canvas_size();

        match ChunkedHttpSource::new(self.api_url.clone()) {
            Ok(source) => {
                let session = SessionParams {
                    symbol: self.symbol.clone(),
                    timeframe: self.timeframe,
                    start: CHART.prefetch.initial_start_offset,
                    end: CHART.prefetch.initial_end_offset,
                };
                let handle = engine::spawn(source, session);
                handle.send(EngineCommand::LoadInitial);
                self.engine = Some(handle);
                self.controller = ChartController::new(canvas_width, canvas_height);
                self.status = format!("Loading {} {}...", self.symbol, self.timeframe);
            }
            Err(e) => {
                log::error!("failed to start session: {e:#}");
                self.status = format!("Failed to start session: {e:#}");
            }
        }
    }

    fn drain_engine_events(&mut self) {
        let Some(handle) = &self.engine else { return };

        while let Some(event) = handle.try_event() {
            match event {
                EngineEvent::Window { window, adjustment, initial } => {
                    self.status = format!(
                        "{} {} - {} bars loaded",
                        self.symbol,
                        self.timeframe,
                        window.bars.len()
                    );
                    self.controller.apply_window(window, adjustment, initial);
                }
                EngineEvent::Skipped(reason) => {
                    log::debug!("fetch skipped: {reason:?}");
                }
                EngineEvent::Empty => {
                    self.status = format!("{}: the source has no more data there", self.symbol);
                }
                EngineEvent::Failed(msg) => {
                    log::error!("fetch failed: {msg}");
                    self.status = format!("Fetch failed: {msg}");
                }
            }
        }
    }
}

impl eframe::App for CandleScopeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.drain_engine_events();

        TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ComboBox::from_label("Symbol")
                    .selected_text(self.symbol.clone())
                    .show_ui(ui, |ui| {
                        for symbol in SYMBOLS {
                            ui.selectable_value(&mut self.symbol, symbol.to_string(), *symbol);
                        }
                    });

                ComboBox::from_label("Timeframe")
                    .selected_text(self.timeframe.to_string())
                    .show_ui(ui, |ui| {
                        for timeframe in Timeframe::iter() {
                            ui.selectable_value(&mut self.timeframe, timeframe, timeframe.to_string());
                        }
                    });

                if ui.button("Load").clicked() {
                    self.start_session();
                }

                ui.separator();
                ui.label(self.status.clone());
            });
        });

        CentralPanel::default().frame(Frame::NONE).show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
            let rect = response.rect;

            let mut events = Vec::new();
            let size = (f64::from(rect.width()), f64::from(rect.height()));
            if self.controller.viewport().canvas_size() != size {
                events.push(InputEvent::Resized { width: size.0, height: size.1 });
            }
            events.extend(collect_input(ui, &response, rect));

            for event in events {
                for action in self.controller.handle_input(event) {
                    match action {
                        ControlAction::Repaint => ctx.request_repaint(),
                        ControlAction::Fetch(direction) => {
                            if let Some(handle) = &self.engine {
                                if handle.is_fetching() {
                                    log::debug!("{direction:?} fetch not dispatched: one in flight");
                                } else {
                                    handle.send(EngineCommand::Extend {
                                        direction,
                                        amount: CHART.prefetch.batch_bars,
                                    });
                                }
                            }
                        }
                    }
                }
            }

            if self.controller.is_loaded() {
                let mut surface = EguiSurface::new(&painter, rect);
                self.controller.draw(&mut surface);
            } else {
                painter.rect_filled(rect, CornerRadius::ZERO, CHART.palette.background);
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "Load a symbol to draw the chart",
                    FontId::proportional(14.0),
                    CHART.palette.scale_text,
                );
            }
        });

        // keep polling while a session is live so worker events land even
        // without fresh input
        if self.engine.is_some() {
            ctx.request_repaint_after(Duration::from_millis(150));
        }
    }
}
