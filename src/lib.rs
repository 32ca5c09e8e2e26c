//! Market Runner - dodge the market line, ride the news
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, news, physics, collisions)
//! - `game`: Run state machine (countdown, running, game over)
//! - `platform`: Clock and timer abstractions
//! - `present`: Render snapshot and share data handed to the host
//! - `ui` / `app`: Host-side input handling, game-over buttons, high score
//! - `renderer`: Canvas 2D drawing (wasm32 only)

pub mod app;
pub mod config;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod present;
pub mod renderer;
pub mod sim;
pub mod ui;

pub use app::{App, UiAction, UiEvent};
pub use config::{ConfigError, GameConfig};
pub use game::Game;
pub use highscores::HighScore;

/// Fixed geometry and pacing constants
pub mod consts {
    /// Simulation frames per score point (one point per second at 60 Hz)
    pub const FRAMES_PER_SECOND: u64 = 60;

    /// Horizontal distance between market line points
    pub const SEGMENT_SPACING: f32 = 10.0;

    /// Smallest drawable surface the simulation accepts
    pub const MIN_SURFACE_WIDTH: f32 = 100.0;
    pub const MIN_SURFACE_HEIGHT: f32 = 100.0;

    /// Trader placement as fractions of the surface
    pub const TRADER_X_FRACTION: f32 = 0.2;
    pub const TRADER_Y_FRACTION: f32 = 0.3;
    pub const TRADER_SIZE_FRACTION: f32 = 0.05;

    /// News proximity box half-extent, in trader sizes
    pub const NEWS_PICKUP_FACTOR: f32 = 1.5;
    /// News tokens never spawn closer than this to the top edge
    pub const NEWS_MIN_Y: f32 = 50.0;
    /// Vertical clearance kept between a new token and the market line
    pub const NEWS_TERRAIN_CLEARANCE: f32 = 30.0;
    /// Token box width cap (matches the renderer)
    pub const NEWS_MAX_WIDTH: f32 = 200.0;
    pub const NEWS_PADDING: f32 = 10.0;
    /// Average glyph advance of the 14px news font
    pub const NEWS_GLYPH_WIDTH: f32 = 7.0;

    /// Velocity kept (and flipped) when bouncing off the top/bottom edge
    pub const BOUNCE_DAMPING: f32 = 0.5;

    /// Collected headlines shown per column on the game-over screen
    pub const SUMMARY_LINES: usize = 5;
}
