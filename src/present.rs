//! Data handed to the presentation layer
//!
//! The core never draws. Each frame it produces a `Snapshot` borrowed from
//! the live state; at game over it also materializes a `GameOverSummary`,
//! and on request a `ShareCard` the host can turn into an image.

use glam::Vec2;
use serde::Serialize;

use crate::consts::SUMMARY_LINES;
use crate::sim::{GamePhase, GameState, NewsKind, NewsToken, Sentiment};

/// Implemented by whatever draws the game (canvas, terminal, logger)
pub trait Presenter {
    fn present(&mut self, snapshot: &Snapshot<'_>);
}

/// Trader as drawn
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TraderView {
    pub pos: Vec2,
    pub size: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub countdown: u32,
    pub score: u64,
    pub high_score: u64,
    pub stop_loss: u8,
    pub max_stop_loss: u8,
    pub sentiment: Sentiment,
    /// Whether a news gravity effect is still running
    pub effect_active: bool,
    pub trader: TraderView,
    pub terrain: &'a [Vec2],
    pub news: &'a [NewsToken],
    /// Only present once the run is over
    pub summary: Option<GameOverSummary>,
}

impl<'a> Snapshot<'a> {
    pub fn capture(state: &'a GameState, high_score: u64) -> Self {
        let trader = &state.trader;
        Self {
            width: state.surface.width,
            height: state.surface.height,
            phase: state.phase,
            countdown: state.countdown,
            score: state.score,
            high_score: high_score.max(state.score),
            stop_loss: trader.stop_loss,
            max_stop_loss: state.config.stop_loss,
            sentiment: trader.sentiment(),
            effect_active: trader.gravity_timer > 0,
            trader: TraderView {
                pos: trader.pos,
                size: trader.size,
            },
            terrain: &state.terrain.points,
            news: &state.news,
            summary: state
                .is_over()
                .then(|| GameOverSummary::from_state(state)),
        }
    }
}

/// Final score and the headlines collected during the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameOverSummary {
    pub score: u64,
    /// Most recent first
    pub positive: Vec<String>,
    /// Most recent first
    pub negative: Vec<String>,
}

impl GameOverSummary {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            positive: state.collected.recent_texts(NewsKind::Positive),
            negative: state.collected.recent_texts(NewsKind::Negative),
        }
    }

    /// Keep at most `lines` headlines per column
    pub fn truncated(&self, lines: usize) -> Self {
        Self {
            score: self.score,
            positive: self.positive.iter().take(lines).cloned().collect(),
            negative: self.negative.iter().take(lines).cloned().collect(),
        }
    }
}

/// Content of the shareable score image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareCard {
    pub title: String,
    pub file_name: String,
    pub score: u64,
    pub high_score: u64,
    pub summary: GameOverSummary,
}

impl ShareCard {
    pub const TITLE: &'static str = "Market Runner Score";
    pub const FILE_NAME: &'static str = "market-runner-score.png";

    pub fn new(summary: &GameOverSummary, high_score: u64) -> Self {
        Self {
            title: Self::TITLE.to_string(),
            file_name: Self::FILE_NAME.to_string(),
            score: summary.score,
            high_score: high_score.max(summary.score),
            summary: summary.truncated(SUMMARY_LINES),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
