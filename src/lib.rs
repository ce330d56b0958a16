// Core modules
pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod ui;
pub mod utils;

// Re-export commonly used types outside of crate
pub use chart::{ChartController, ControlAction, InputEvent, Viewport};
pub use data::{BarSource, BarStore, ChunkedHttpSource};
pub use domain::{Bar, Timeframe};
pub use ui::CandleScopeApp;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Override the chunked-bars endpoint URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Symbol preselected at startup
    #[arg(long)]
    pub symbol: Option<String>,
}

/// Main application entry point - creates the GUI app.
/// This is the public API for the binary to call.
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> CandleScopeApp {
    CandleScopeApp::new(cc, args)
}
