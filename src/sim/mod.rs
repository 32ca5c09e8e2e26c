//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame
//! - Seeded RNG only
//! - No rendering, timer or platform dependencies

pub mod collision;
pub mod news;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{Aabb, Segment, segment_intersects_box, segments_intersect, within_proximity};
pub use news::{NewsCounts, NewsKind, NewsToken};
pub use state::{
    CollectedNews, GameEvent, GamePhase, GameState, Sentiment, Surface, Trader, TraderLayout,
    layout_for,
};
pub use terrain::MarketLine;
pub use tick::tick;
