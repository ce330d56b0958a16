//! Chart geometry and visual configuration

use eframe::egui::Color32;

pub struct GeometryConfig {
    /// Horizontal gap between candles, px
    pub candle_spacing: f64,
    /// Starting candle body width, px
    pub candle_width: f64,
    /// Candle body width clamp range, px
    pub candle_width_min: f64,
    pub candle_width_max: f64,
    /// Right-side margin reserved for the price scale, px
    pub price_scale_margin: f64,
    /// Bottom margin reserved for the date scale, px
    pub date_scale_margin: f64,
    /// Width change applied per wheel notch when zooming X
    pub zoom_x_step: f64,
    /// Fraction of the price window trimmed per side per wheel notch when zooming Y
    pub zoom_y_step: f64,
}

pub struct PrefetchConfig {
    /// Trigger a fetch only when |bars-that-fit - bars-rendered| exceeds this
    pub hysteresis_bars: usize,
    /// Minimum interval between dispatched fetches, ms
    pub throttle_ms: u64,
    /// Bars requested per extension fetch
    pub batch_bars: u64,
    /// Pagination offsets of the first session window
    pub initial_start_offset: u64,
    pub initial_end_offset: u64,
}

pub struct PaletteConfig {
    pub background: Color32,
    pub candle_bullish: Color32,
    pub candle_bearish: Color32,
    pub wick: Color32,
    pub scale_text: Color32,
    pub overlay_background: Color32,
    pub overlay_text: Color32,
    pub crosshair: Color32,
    pub crosshair_width: f32,
    pub wick_width: f32,
    /// Dash on/off lengths for the crosshair, px
    pub crosshair_dash: (f32, f32),
    /// Target vertical spacing between price labels, px
    pub price_label_spacing: f64,
    pub scale_text_size: f32,
    pub overlay_text_size: f32,
}

pub struct ChartConfig {
    pub geometry: GeometryConfig,
    pub prefetch: PrefetchConfig,
    pub palette: PaletteConfig,
}

pub const CHART: ChartConfig = ChartConfig {
    geometry: GeometryConfig {
        candle_spacing: 2.0,
        candle_width: 10.0,
        candle_width_min: 0.5,
        candle_width_max: 20.0,
        price_scale_margin: 100.0,
        date_scale_margin: 30.0,
        zoom_x_step: 0.2,
        zoom_y_step: 0.1,
    },
    prefetch: PrefetchConfig {
        hysteresis_bars: 10,
        throttle_ms: 1000,
        batch_bars: 100,
        initial_start_offset: 10_000,
        initial_end_offset: 11_000,
    },
    palette: PaletteConfig {
        background: Color32::from_rgb(16, 18, 24),
        candle_bullish: Color32::from_rgb(38, 166, 154), // TradingView Green
        candle_bearish: Color32::from_rgb(239, 83, 80),  // TradingView Red
        wick: Color32::from_gray(160),
        scale_text: Color32::from_gray(200),
        overlay_background: Color32::from_rgba_premultiplied(40, 44, 52, 230),
        overlay_text: Color32::WHITE,
        crosshair: Color32::from_gray(120),
        crosshair_width: 1.0,
        wick_width: 1.0,
        crosshair_dash: (5.0, 5.0),
        price_label_spacing: 50.0,
        scale_text_size: 12.0,
        overlay_text_size: 12.0,
    },
};
