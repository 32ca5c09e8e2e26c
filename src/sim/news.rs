//! News tokens and the fairness-balanced spawner

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::terrain::MarketLine;
use crate::consts::{
    NEWS_GLYPH_WIDTH, NEWS_MAX_WIDTH, NEWS_MIN_Y, NEWS_PADDING, NEWS_TERRAIN_CLEARANCE,
};

/// Fallback ceiling for the spawn corridor, as a fraction of height
pub const DEFAULT_CEILING_FRACTION: f32 = 0.4;

/// Market sentiment carried by a news token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewsKind {
    /// Lightens gravity (bullish)
    Positive,
    /// Drags the trader down (bearish)
    Negative,
}

impl NewsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsKind::Positive => "positive",
            NewsKind::Negative => "negative",
        }
    }

    /// Catalogue entries of this kind
    pub fn catalogue(&self) -> &'static [Headline] {
        match self {
            NewsKind::Positive => &POSITIVE_HEADLINES,
            NewsKind::Negative => &NEGATIVE_HEADLINES,
        }
    }
}

/// A static catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headline {
    pub text: &'static str,
    pub desc: &'static str,
}

const fn headline(text: &'static str, desc: &'static str) -> Headline {
    Headline { text, desc }
}

pub const POSITIVE_HEADLINES: [Headline; 10] = [
    headline("-6% Inflation", "Easing cost pressures"),
    headline("-4% Unemployment", "More jobs created"),
    headline("-5% Interest Rates", "Cheaper borrowing for businesses"),
    headline("-3% Corporate Taxes", "More profits for companies"),
    headline("-4% Energy Prices", "Lower costs for industries"),
    headline("-7% Federal Debt", "Government in control"),
    headline("-6% Budget Deficit", "Strong fiscal policy"),
    headline("-3% Mortgage Rates", "Better housing affordability"),
    headline("-5% Trade Surplus", "Strong exports"),
    headline("-4% Consumer Confidence Index", "More spending"),
];

pub const NEGATIVE_HEADLINES: [Headline; 10] = [
    headline("+5% Inflation", "Market uncertainty"),
    headline("+4% Unemployment", "Weak labor market"),
    headline("+6% Interest Rates", "Higher borrowing costs"),
    headline("+3% GDP Contraction", "Economic slowdown"),
    headline("+7% Oil Prices", "Higher costs for businesses"),
    headline("+10% Corporate Layoffs", "Weak job market"),
    headline("+8% Trade Deficit", "Weak exports"),
    headline("+6% Debt-to-GDP Ratio", "Rising government debt"),
    headline("+5% Consumer Debt", "People struggling financially"),
    headline("+4% Housing Market Crash", "Property market downturn"),
];

/// A floating news item (position is the center of its box)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsToken {
    pub pos: Vec2,
    pub text: String,
    pub desc: String,
    pub kind: NewsKind,
    /// Box width, used for the off-screen check
    pub width: f32,
}

impl NewsToken {
    pub fn new(pos: Vec2, headline: &Headline, kind: NewsKind) -> Self {
        Self {
            pos,
            text: headline.text.to_string(),
            desc: headline.desc.to_string(),
            kind,
            width: Self::width_for(headline.text),
        }
    }

    /// Box width for a label in the 14px news font, capped at 200
    pub fn width_for(text: &str) -> f32 {
        let glyphs = text.chars().count() as f32;
        (glyphs * NEWS_GLYPH_WIDTH + NEWS_PADDING * 2.0).min(NEWS_MAX_WIDTH)
    }

    /// Fully scrolled past the left edge
    pub fn is_offscreen(&self) -> bool {
        self.pos.x + self.width < 0.0
    }
}

/// Per-kind tallies used to balance the spawner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewsCounts {
    pub positive: usize,
    pub negative: usize,
}

impl NewsCounts {
    pub fn add(&mut self, kind: NewsKind) {
        match kind {
            NewsKind::Positive => self.positive += 1,
            NewsKind::Negative => self.negative += 1,
        }
    }

    /// Tally every token in `tokens` on top of the current counts
    pub fn with_tokens<'a>(mut self, tokens: impl IntoIterator<Item = &'a NewsToken>) -> Self {
        for token in tokens {
            self.add(token.kind);
        }
        self
    }
}

/// Pick the kind for the next token
///
/// The less frequent kind is forced; a tie is a fair coin flip.
pub fn choose_kind<R: Rng + ?Sized>(counts: NewsCounts, rng: &mut R) -> NewsKind {
    use std::cmp::Ordering;
    match counts.positive.cmp(&counts.negative) {
        Ordering::Less => NewsKind::Positive,
        Ordering::Greater => NewsKind::Negative,
        Ordering::Equal => {
            if rng.random_bool(0.5) {
                NewsKind::Positive
            } else {
                NewsKind::Negative
            }
        }
    }
}

/// Vertical range a new token may occupy: from the top margin down to just
/// above the highest visible terrain point
pub fn spawn_corridor(line: &MarketLine, width: f32, height: f32) -> (f32, f32) {
    let default_ceiling = height * DEFAULT_CEILING_FRACTION;
    let ceiling = line
        .ceiling_within(width)
        .map_or(default_ceiling, |y| y.min(default_ceiling));

    let lo = NEWS_MIN_Y;
    let hi = ceiling - NEWS_TERRAIN_CLEARANCE;
    if hi > lo {
        (lo, hi)
    } else {
        // Surface too short for a real corridor
        (lo, lo + 1.0)
    }
}

/// Create the next news token at the right edge of the surface
pub fn spawn<R: Rng + ?Sized>(
    line: &MarketLine,
    width: f32,
    height: f32,
    counts: NewsCounts,
    rng: &mut R,
) -> NewsToken {
    let kind = choose_kind(counts, rng);
    let catalogue = kind.catalogue();
    let headline = &catalogue[rng.random_range(0..catalogue.len())];

    let (lo, hi) = spawn_corridor(line, width, height);
    let y = rng.random_range(lo..hi);

    NewsToken::new(Vec2::new(width, y), headline, kind)
}
