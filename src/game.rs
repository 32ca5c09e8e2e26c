//! Run state machine
//!
//! `Game` owns one run's `GameState` plus the wall-clock timers that drive
//! the countdown:
//!
//! - Countdown: a repeating one-second timer counts down from
//!   `countdown_seconds`; a one-shot timer spawns the first news one second
//!   in. When the count reaches zero the run starts and one more token is
//!   force-spawned.
//! - Running: `update` steps the physics once per display frame.
//! - GameOver: terminal. Only `reset` leaves it.
//!
//! `reset` cancels every pending timer before rebuilding, so a countdown from
//! an abandoned run can never fire into the new one.

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::platform::{Clock, TimerId, TimerQueue};
use crate::present::{GameOverSummary, Snapshot};
use crate::sim::{GameEvent, GamePhase, GameState, Surface, tick};

const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

/// Countdown timers of the current run
#[derive(Debug, Default, Clone, Copy)]
struct CountdownTimers {
    first_news: Option<TimerId>,
    tick: Option<TimerId>,
}

pub struct Game<C: Clock> {
    clock: C,
    config: GameConfig,
    state: GameState,
    timers: TimerQueue,
    countdown: CountdownTimers,
    runs: u32,
}

impl<C: Clock> Game<C> {
    /// Start a new game (already counting down) on a `width` x `height` surface
    pub fn new(config: GameConfig, width: f32, height: f32, seed: u64, clock: C) -> Self {
        let surface = Surface::clamped(width, height);
        let rng = Pcg32::seed_from_u64(seed);
        let mut game = Self {
            state: GameState::new(config.clone(), surface, rng),
            clock,
            config,
            timers: TimerQueue::new(),
            countdown: CountdownTimers::default(),
            runs: 0,
        };
        game.reset();
        game
    }

    /// Throw away the current run and start a new countdown
    ///
    /// Valid in any phase. The RNG stream carries over so consecutive runs
    /// differ.
    pub fn reset(&mut self) {
        self.cancel_countdown();

        let surface = self.state.surface;
        let rng = self.state.rng.clone();
        self.state = GameState::new(self.config.clone(), surface, rng);
        self.runs += 1;

        let now = self.clock.now();
        self.countdown = CountdownTimers {
            first_news: Some(self.timers.schedule_once(now, COUNTDOWN_STEP)),
            tick: Some(self.timers.schedule_repeating(now, COUNTDOWN_STEP)),
        };
        log::info!(
            "Run {} reset: {}x{}, countdown {}s",
            self.runs,
            surface.width,
            surface.height,
            self.state.countdown
        );
    }

    fn cancel_countdown(&mut self) {
        if let Some(id) = self.countdown.first_news.take() {
            self.timers.cancel(id);
        }
        if let Some(id) = self.countdown.tick.take() {
            self.timers.cancel(id);
        }
    }

    /// Fire every countdown timer due by the clock
    ///
    /// Independent of the frame loop; call it as often as convenient.
    pub fn pump_timers(&mut self) -> Vec<GameEvent> {
        let now = self.clock.now();
        let mut events = Vec::new();
        while let Some(id) = self.timers.pop_due(now) {
            if Some(id) == self.countdown.first_news {
                self.countdown.first_news = None;
                if !self.state.is_over() {
                    let kind = self.state.spawn_news();
                    events.push(GameEvent::NewsSpawned { kind });
                }
            } else if Some(id) == self.countdown.tick {
                self.countdown_step(&mut events);
            }
        }
        events
    }

    fn countdown_step(&mut self, events: &mut Vec<GameEvent>) {
        if self.state.phase != GamePhase::Countdown {
            return;
        }
        self.state.countdown = self.state.countdown.saturating_sub(1);
        log::debug!("Countdown: {}", self.state.countdown);

        if self.state.countdown == 0 {
            if let Some(id) = self.countdown.tick.take() {
                self.timers.cancel(id);
            }
            self.state.phase = GamePhase::Running;
            let kind = self.state.spawn_news();
            events.push(GameEvent::NewsSpawned { kind });
            log::info!("Run {} started", self.runs);
        }
    }

    /// One display frame: fire due timers, then step the physics once
    pub fn update(&mut self) -> Vec<GameEvent> {
        let mut events = self.pump_timers();
        let was_running = self.state.phase == GamePhase::Running;
        events.extend(tick(&mut self.state));

        if was_running && self.state.is_over() {
            self.cancel_countdown();
            log::info!(
                "Game over after {} frames, score {}",
                self.state.frame,
                self.state.score
            );
        }
        events
    }

    /// Jump; ignored unless the run is active
    pub fn jump(&mut self) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }
        self.state.trader.velocity = self.config.jump_force;
        true
    }

    /// Adapt to a new drawable size (degenerate sizes are clamped)
    pub fn resize(&mut self, width: f32, height: f32) {
        let surface = Surface::clamped(width, height);
        if surface != self.state.surface {
            self.state.resize(surface);
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Stage a scenario in tests; play itself only mutates state in `update`
    #[doc(hidden)]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn surface(&self) -> Surface {
        self.state.surface
    }

    /// True while countdown timers are still pending
    pub fn countdown_pending(&self) -> bool {
        self.countdown.first_news.is_some() || self.countdown.tick.is_some()
    }

    /// End-of-run data; `None` until the game is over
    pub fn summary(&self) -> Option<GameOverSummary> {
        self.state
            .is_over()
            .then(|| GameOverSummary::from_state(&self.state))
    }

    /// Everything the presentation layer draws this frame
    pub fn snapshot(&self, high_score: u64) -> Snapshot<'_> {
        Snapshot::capture(&self.state, high_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualClock;
    use glam::Vec2;

    fn game() -> (Game<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let game = Game::new(GameConfig::default(), 800.0, 600.0, 1234, clock.clone());
        (game, clock)
    }

    fn advance_seconds(game: &mut Game<ManualClock>, clock: &ManualClock, seconds: u32) {
        for _ in 0..seconds {
            clock.advance(COUNTDOWN_STEP);
            game.pump_timers();
        }
    }

    #[test]
    fn test_countdown_starts_the_run() {
        let (mut game, clock) = game();
        assert_eq!(game.phase(), GamePhase::Countdown);
        assert_eq!(game.state().countdown, 5);
        assert!(game.state().news.is_empty());

        advance_seconds(&mut game, &clock, 1);
        assert_eq!(game.state().countdown, 4);
        assert_eq!(game.state().news.len(), 1);

        advance_seconds(&mut game, &clock, 4);
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.state().countdown, 0);
        // Initial countdown spawn plus the start-of-run spawn
        assert_eq!(game.state().news.len(), 2);
        assert_eq!(game.state().frame, 0);
        assert!(!game.countdown_pending());
    }

    #[test]
    fn test_countdown_in_one_large_step() {
        let (mut game, clock) = game();
        clock.advance(Duration::from_secs(30));
        let events = game.pump_timers();
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(events.len(), 2);
        assert_eq!(game.state().news.len(), 2);
    }

    #[test]
    fn test_physics_waits_for_countdown() {
        let (mut game, clock) = game();
        let start = game.state().trader.pos;
        clock.advance(Duration::from_millis(500));
        for _ in 0..30 {
            game.update();
        }
        assert_eq!(game.state().trader.pos, start);
        assert_eq!(game.state().frame, 0);
    }

    #[test]
    fn test_jump_only_while_running() {
        let (mut game, clock) = game();
        assert!(!game.jump());
        assert_eq!(game.state().trader.velocity, 0.0);

        advance_seconds(&mut game, &clock, 5);
        assert!(game.jump());
        assert_eq!(game.state().trader.velocity, -6.5);

        // Takes effect on the next integration step
        let y = game.state().trader.pos.y;
        game.update();
        assert!((game.state().trader.pos.y - (y - 6.2)).abs() < 1e-3);
    }

    #[test]
    fn test_reset_cancels_inflight_countdown() {
        let (mut game, clock) = game();
        advance_seconds(&mut game, &clock, 2);
        assert_eq!(game.state().countdown, 3);

        game.reset();
        assert_eq!(game.state().countdown, 5);
        assert!(game.state().news.is_empty());

        // Three seconds later only the new countdown has moved
        advance_seconds(&mut game, &clock, 3);
        assert_eq!(game.phase(), GamePhase::Countdown);
        assert_eq!(game.state().countdown, 2);

        advance_seconds(&mut game, &clock, 2);
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.state().news.len(), 2);
    }

    #[test]
    fn test_repeated_resets_never_double_start() {
        let (mut game, clock) = game();
        for _ in 0..3 {
            clock.advance(Duration::from_millis(700));
            game.pump_timers();
            game.reset();
        }
        advance_seconds(&mut game, &clock, 4);
        assert_eq!(game.phase(), GamePhase::Countdown);
        assert_eq!(game.state().countdown, 1);
        assert_eq!(game.state().news.len(), 1);
    }

    #[test]
    fn test_game_over_is_terminal_until_reset() {
        let (mut game, clock) = game();
        advance_seconds(&mut game, &clock, 5);

        let state = game.state_mut();
        state.trader.stop_loss = 1;
        state.terrain.points = vec![Vec2::new(100.0, 170.0), Vec2::new(220.0, 170.0)];
        state.trader.pos = Vec2::new(160.0, 180.0);
        game.update();

        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(!game.countdown_pending());
        let summary = game.summary().unwrap();
        assert_eq!(summary.score, 0);

        let frozen = game.state().trader.pos;
        assert!(!game.jump());
        for _ in 0..60 {
            clock.advance(Duration::from_millis(16));
            game.update();
        }
        assert_eq!(game.state().trader.pos, frozen);
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.reset();
        assert_eq!(game.phase(), GamePhase::Countdown);
        assert_eq!(game.state().trader.stop_loss, 3);
        assert!(game.summary().is_none());
    }

    #[test]
    fn test_resize_clamps_and_relayouts() {
        let (mut game, _clock) = game();
        game.resize(0.0, 0.0);
        let surface = game.surface();
        assert_eq!((surface.width, surface.height), (100.0, 100.0));
        assert!(game.state().trader.size > 0.0);
        assert!(game.state().terrain.last().unwrap().x >= 100.0);

        game.resize(1000.0, 500.0);
        assert!((game.state().trader.pos.x - 200.0).abs() < 1e-3);
        assert!((game.state().trader.size - 25.0).abs() < 1e-3);
    }
}
