//! Game-over screen layout
//!
//! Shared by the renderer (where to draw) and the input handler (what was
//! clicked), so both always agree.

use serde::Serialize;

/// Screen-space rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Edges count as inside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOverButton {
    Share,
    PlayAgain,
}

impl GameOverButton {
    pub fn label(&self) -> &'static str {
        match self {
            GameOverButton::Share => "Share",
            GameOverButton::PlayAgain => "Play Again",
        }
    }
}

pub const BUTTON_WIDTH: f32 = 200.0;
pub const BUTTON_HEIGHT: f32 = 50.0;
pub const BUTTON_SPACING: f32 = 20.0;

/// Positions on the game-over overlay for a given surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GameOverLayout {
    /// Title font size; everything else scales from it
    pub font_size: f32,
    pub share: Rect,
    pub play_again: Rect,
}

impl GameOverLayout {
    pub fn new(width: f32, height: f32) -> Self {
        let font_size = width.min(height) * 0.08;
        let total = BUTTON_WIDTH * 2.0 + BUTTON_SPACING;
        let start_x = (width - total) / 2.0;
        let y = height - BUTTON_HEIGHT - font_size;

        Self {
            font_size,
            share: Rect {
                x: start_x,
                y,
                width: BUTTON_WIDTH,
                height: BUTTON_HEIGHT,
            },
            play_again: Rect {
                x: start_x + BUTTON_WIDTH + BUTTON_SPACING,
                y,
                width: BUTTON_WIDTH,
                height: BUTTON_HEIGHT,
            },
        }
    }

    /// Summary text size (column headings)
    pub fn summary_font_size(&self) -> f32 {
        self.font_size * 0.4
    }

    pub fn hit(&self, x: f32, y: f32) -> Option<GameOverButton> {
        if self.share.contains(x, y) {
            Some(GameOverButton::Share)
        } else if self.play_again.contains(x, y) {
            Some(GameOverButton::PlayAgain)
        } else {
            None
        }
    }

    pub fn buttons(&self) -> [(GameOverButton, Rect); 2] {
        [
            (GameOverButton::Share, self.share),
            (GameOverButton::PlayAgain, self.play_again),
        ]
    }
}
