//! Rendering
//!
//! The browser build draws each `Snapshot` with the Canvas 2D API. Colors are
//! shared so other presenters can match the look.

use crate::sim::Sentiment;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

pub mod palette {
    pub const BACKGROUND: &str = "#1a1a1a";
    pub const MARKET_LINE: &str = "#4CAF50";
    pub const TRADER: &str = "#00ff00";
    pub const NEWS_BOX: &str = "#2C3E50";
    pub const TEXT: &str = "#ffffff";
    pub const BULLISH: &str = "#4CAF50";
    pub const BEARISH: &str = "#F44336";
    pub const OVERLAY: &str = "rgba(0, 0, 0, 0.7)";
    pub const SHARE_BUTTON: &str = "#2196F3";
    pub const PLAY_AGAIN_BUTTON: &str = "#666666";
}

/// HUD color for a market mood
pub fn sentiment_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Bullish => palette::BULLISH,
        Sentiment::Bearish => palette::BEARISH,
        Sentiment::Neutral => palette::TEXT,
    }
}
