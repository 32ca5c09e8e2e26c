use std::time::Duration;

use glam::Vec2;
use market_runner::platform::ManualClock;
use market_runner::sim::{GameEvent, GamePhase};
use market_runner::ui::GameOverLayout;
use market_runner::{App, GameConfig, UiAction, UiEvent};

fn line_y_at(points: &[Vec2], x: f32) -> f32 {
    points
        .windows(2)
        .find(|w| w[0].x <= x && x <= w[1].x)
        .map(|w| {
            let t = (x - w[0].x) / (w[1].x - w[0].x);
            w[0].y + (w[1].y - w[0].y) * t
        })
        .expect("trader x is covered by the line")
}

/// Park the trader where the line will be after the next scroll
fn pin_to_line(app: &mut App<ManualClock>) {
    let state = app.game_mut().state_mut();
    // Off the 2.5px grid the line points live on
    state.trader.pos.x = 163.7;
    let ahead = state.trader.pos.x + state.game_speed;
    let y = line_y_at(&state.terrain.points, ahead);
    state.trader.velocity = 0.0;
    state.trader.pos.y = y - state.trader.current_gravity;
}

#[test]
fn test_countdown_play_game_over_restart() {
    let clock = ManualClock::new();
    let mut app = App::new(GameConfig::default(), 800.0, 600.0, 99, clock.clone());

    // Countdown: nothing moves yet
    assert!(app.frame().is_empty());
    assert_eq!(app.game().phase(), GamePhase::Countdown);
    let resting = app.game().state().trader.clone();
    assert_eq!(app.handle(UiEvent::JumpKey), None);
    assert_eq!(app.game().state().trader.velocity, resting.velocity);
    assert_eq!(app.game().state().trader.pos, resting.pos);

    clock.advance(Duration::from_secs(1));
    let events = app.frame();
    assert!(matches!(events[..], [GameEvent::NewsSpawned { .. }]));
    assert_eq!(app.game().state().countdown, 4);
    assert_eq!(app.game().state().news.len(), 1);

    clock.advance(Duration::from_secs(4));
    let events = app.frame();
    assert_eq!(app.game().phase(), GamePhase::Running);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::NewsSpawned { .. }))
    );
    assert!(app.game().state().news.len() >= 2);
    assert!(!app.game().countdown_pending());

    // Play
    assert_eq!(app.handle(UiEvent::JumpKey), None);
    assert_eq!(app.game().state().trader.velocity, -6.5);
    let snapshot = app.snapshot();
    assert_eq!(snapshot.phase, GamePhase::Running);
    assert!(snapshot.summary.is_none());

    // Ten seconds in, hit the line three times
    app.game_mut().state_mut().frame = 600;
    let mut hits = Vec::new();
    for _ in 0..3 {
        pin_to_line(&mut app);
        hits.extend(app.frame());
    }
    let stop_losses: Vec<u8> = hits
        .iter()
        .filter_map(|e| match e {
            GameEvent::StopLossHit { remaining } => Some(*remaining),
            _ => None,
        })
        .collect();
    assert_eq!(stop_losses, vec![2, 1, 0]);
    assert!(hits.contains(&GameEvent::GameOver { score: 10 }));
    assert_eq!(app.game().phase(), GamePhase::GameOver);

    // Game over is terminal until restart
    let frozen = app.game().state().frame;
    clock.advance(Duration::from_secs(3));
    assert!(app.frame().is_empty());
    assert_eq!(app.game().state().frame, frozen);
    assert_eq!(app.high_score().best(), 10);

    let card = app.share_card().expect("share card at game over");
    assert_eq!(card.score, 10);
    assert_eq!(card.high_score, 10);
    assert!(app.snapshot().summary.is_some());

    // Restart from the overlay
    let layout = GameOverLayout::new(800.0, 600.0);
    let (sx, sy) = layout.share.center();
    assert!(matches!(
        app.handle(UiEvent::PointerDown { x: sx, y: sy }),
        Some(UiAction::Share(_))
    ));
    let (px, py) = layout.play_again.center();
    assert_eq!(
        app.handle(UiEvent::PointerDown { x: px, y: py }),
        Some(UiAction::Restarted)
    );

    let state = app.game().state();
    assert_eq!(state.phase, GamePhase::Countdown);
    assert_eq!(state.countdown, 5);
    assert_eq!(state.score, 0);
    assert_eq!(state.trader.stop_loss, 3);
    assert!(state.news.is_empty());
    assert!(state.collected.counts().positive + state.collected.counts().negative == 0);
    assert_eq!(app.high_score().best(), 10);

    clock.advance(Duration::from_secs(5));
    app.frame();
    assert_eq!(app.game().phase(), GamePhase::Running);
    assert_eq!(app.snapshot().high_score, 10);
}
