//! Host-facing controller
//!
//! Wraps a `Game` with the bits that belong to the presentation side: the
//! session high score, game-over button handling and the scroll offset of
//! the summary screen. Platform code only translates raw DOM/terminal events
//! into `UiEvent`s and performs the returned `UiAction`s.

use crate::config::GameConfig;
use crate::game::Game;
use crate::highscores::HighScore;
use crate::platform::Clock;
use crate::present::{ShareCard, Snapshot};
use crate::sim::{GameEvent, GamePhase};
use crate::ui::{GameOverButton, GameOverLayout};

/// Input after platform translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    /// Space bar
    JumpKey,
    /// Click or touch at surface coordinates
    PointerDown { x: f32, y: f32 },
    /// Mouse wheel
    Wheel { delta_y: f32 },
    Resize { width: f32, height: f32 },
}

/// Work the platform has to do in response to input
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Export the score image
    Share(ShareCard),
    /// A new run was started
    Restarted,
}

pub struct App<C: Clock> {
    game: Game<C>,
    high_score: HighScore,
    /// Presentation-only scroll of the game-over screen
    scroll_offset: f32,
}

impl<C: Clock> App<C> {
    pub fn new(config: GameConfig, width: f32, height: f32, seed: u64, clock: C) -> Self {
        Self {
            game: Game::new(config, width, height, seed, clock),
            high_score: HighScore::new(),
            scroll_offset: 0.0,
        }
    }

    /// Advance one display frame
    pub fn frame(&mut self) -> Vec<GameEvent> {
        let events = self.game.update();
        for event in &events {
            if let GameEvent::GameOver { score } = event {
                self.high_score.record(*score);
                self.scroll_offset = 0.0;
            }
        }
        events
    }

    pub fn handle(&mut self, event: UiEvent) -> Option<UiAction> {
        match event {
            UiEvent::JumpKey => {
                self.game.jump();
                None
            }
            UiEvent::PointerDown { x, y } => {
                if self.game.phase() == GamePhase::GameOver {
                    self.click_game_over(x, y)
                } else {
                    self.game.jump();
                    None
                }
            }
            UiEvent::Wheel { delta_y } => {
                if self.game.phase() == GamePhase::GameOver {
                    self.scroll_offset = (self.scroll_offset + delta_y * 0.5).max(0.0);
                }
                None
            }
            UiEvent::Resize { width, height } => {
                self.game.resize(width, height);
                None
            }
        }
    }

    fn click_game_over(&mut self, x: f32, y: f32) -> Option<UiAction> {
        let surface = self.game.surface();
        let layout = GameOverLayout::new(surface.width, surface.height);
        match layout.hit(x, y)? {
            GameOverButton::Share => self.share_card().map(UiAction::Share),
            GameOverButton::PlayAgain => {
                self.restart();
                Some(UiAction::Restarted)
            }
        }
    }

    pub fn restart(&mut self) {
        self.scroll_offset = 0.0;
        self.game.reset();
    }

    /// Share data for the finished run
    pub fn share_card(&self) -> Option<ShareCard> {
        let summary = self.game.summary()?;
        Some(ShareCard::new(&summary, self.high_score.best()))
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.game.snapshot(self.high_score.best())
    }

    pub fn game(&self) -> &Game<C> {
        &self.game
    }

    /// Test access for staging scenarios through `Game::state_mut`
    #[doc(hidden)]
    pub fn game_mut(&mut self) -> &mut Game<C> {
        &mut self.game
    }

    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }
}
