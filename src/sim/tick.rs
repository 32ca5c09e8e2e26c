//! Per-frame simulation step
//!
//! Advances a running game by exactly one frame. The step order matters for
//! gameplay feel and is fixed: spawn, integrate, effect timer, scroll, news
//! pickup, terrain collision, boundary bounce.

use super::collision::{first_polyline_hit, within_proximity};
use super::news::NewsKind;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Advance the game state by one frame
///
/// Does nothing unless the phase is `Running`. Returns the events produced
/// during the frame.
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    state.frame += 1;
    state.score = state.frame / FRAMES_PER_SECOND;

    // Timed news
    let frame = state.frame as i64;
    if frame - state.last_news_frame >= i64::from(state.config.news_interval) {
        let kind = state.spawn_news();
        state.last_news_frame = frame;
        events.push(GameEvent::NewsSpawned { kind });
    }

    // Gravity
    let trader = &mut state.trader;
    trader.velocity += trader.current_gravity;
    trader.pos.y += trader.velocity;

    if trader.gravity_timer > 0 {
        trader.gravity_timer -= 1;
        if trader.gravity_timer == 0 {
            trader.current_gravity = trader.base_gravity;
        }
    }

    // Scroll
    let speed = state.game_speed;
    state.terrain.advance(
        speed,
        state.surface.width,
        state.surface.height,
        &mut state.rng,
    );
    for token in &mut state.news {
        token.pos.x -= speed;
    }

    collect_news(state, &mut events);

    // Market line contact: at most one penalty per frame
    if first_polyline_hit(&state.terrain.points, &state.trader.bounds()).is_some() {
        let trader = &mut state.trader;
        trader.stop_loss = trader.stop_loss.saturating_sub(1);
        events.push(GameEvent::StopLossHit {
            remaining: trader.stop_loss,
        });
        log::debug!("Stop-loss hit, {} left", trader.stop_loss);

        if trader.stop_loss == 0 {
            state.phase = GamePhase::GameOver;
            events.push(GameEvent::GameOver { score: state.score });
            return events;
        }

        trader.pos.y = state.surface.respawn_y();
        trader.velocity = 0.0;
    }

    bounce_off_edges(state);

    events
}

/// Pick up overlapping news and drop tokens that scrolled off screen
fn collect_news(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let reach = state.trader.size * NEWS_PICKUP_FACTOR;
    let trader_pos = state.trader.pos;

    // Newest first, so simultaneous pickups resolve like a reverse scan
    let mut i = state.news.len();
    while i > 0 {
        i -= 1;
        if within_proximity(state.news[i].pos, trader_pos, reach) {
            let token = state.news.remove(i);
            let trader = &mut state.trader;
            trader.current_gravity = match token.kind {
                NewsKind::Positive => state.config.bullish_gravity(),
                NewsKind::Negative => state.config.bearish_gravity(),
            };
            trader.gravity_timer = state.config.effect_duration;

            log::debug!("News collected: {} ({})", token.text, token.kind.as_str());
            events.push(GameEvent::NewsCollected {
                kind: token.kind,
                text: token.text.clone(),
            });
            state.collected.push(token);
        } else if state.news[i].is_offscreen() {
            state.news.remove(i);
        }
    }
}

/// Soft bounce off the top and bottom edges
fn bounce_off_edges(state: &mut GameState) {
    let height = state.surface.height;
    let trader = &mut state.trader;

    if trader.pos.y < trader.size {
        trader.pos.y = trader.size;
        trader.velocity = trader.velocity.abs() * BOUNCE_DAMPING;
    } else if trader.pos.y > height - trader.size {
        trader.pos.y = height - trader.size;
        trader.velocity = -trader.velocity.abs() * BOUNCE_DAMPING;
    }
}
