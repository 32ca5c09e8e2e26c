//! Market line generation
//!
//! The market line is a polyline with a fixed 10 unit spacing that scrolls
//! left every frame. Points falling off the left edge are dropped and new
//! points are grown on the right as a bounded random walk, so the line stays
//! locally smooth and always spans the visible width.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::SEGMENT_SPACING;

/// Baseline of the opening line, as a fraction of height
pub const INITIAL_MID_FRACTION: f32 = 0.6;
/// Jitter (and half the upward trend) of the opening line, as a fraction of height
pub const INITIAL_AMPLITUDE_FRACTION: f32 = 0.1;
/// Center of the band new points are clamped to during play
pub const PLAY_MID_FRACTION: f32 = 0.5;
/// Half-height of that band
pub const PLAY_AMPLITUDE_FRACTION: f32 = 0.2;
/// Largest step of the random walk, up or down
pub const MAX_STEP: f32 = 10.0;

/// The scrolling market-price polyline (points ordered left to right)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketLine {
    pub points: Vec<Vec2>,
}

impl MarketLine {
    /// Build the opening line across `0..=width`
    ///
    /// Starts low (60% of height) and trends gently upward with jitter.
    pub fn initialize<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Self {
        let num_points = (width / SEGMENT_SPACING).ceil() as usize + 1;
        let mid_y = height * INITIAL_MID_FRACTION;
        let amplitude = height * INITIAL_AMPLITUDE_FRACTION;

        let points = (0..num_points)
            .map(|i| {
                let progress = i as f32 / num_points as f32;
                let trend = -progress * amplitude * 2.0;
                let jitter = (rng.random::<f32>() - 0.5) * amplitude;
                Vec2::new(i as f32 * SEGMENT_SPACING, mid_y + trend + jitter)
            })
            .collect();

        Self { points }
    }

    /// Scroll the line left and recycle points so it still covers `0..width`
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        scroll_speed: f32,
        width: f32,
        height: f32,
        rng: &mut R,
    ) {
        for point in &mut self.points {
            point.x -= scroll_speed;
        }

        let expired = self
            .points
            .iter()
            .take_while(|p| p.x + SEGMENT_SPACING < 0.0)
            .count();
        self.points.drain(..expired);

        let mid_y = height * PLAY_MID_FRACTION;
        let amplitude = height * PLAY_AMPLITUDE_FRACTION;

        if self.points.is_empty() {
            self.points.push(Vec2::new(0.0, mid_y));
        }

        while let Some(&last) = self.points.last() {
            if last.x >= width {
                break;
            }
            let step = rng.random_range(-MAX_STEP..MAX_STEP);
            let y = (last.y + step).clamp(mid_y - amplitude, mid_y + amplitude);
            self.points.push(Vec2::new(last.x + SEGMENT_SPACING, y));
        }
    }

    /// Highest point (smallest y) among points strictly inside `0..width`
    pub fn ceiling_within(&self, width: f32) -> Option<f32> {
        self.points
            .iter()
            .filter(|p| p.x > 0.0 && p.x < width)
            .map(|p| p.y)
            .reduce(f32::min)
    }

    pub fn first(&self) -> Option<Vec2> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_initialize_covers_width() {
        let mut rng = Pcg32::seed_from_u64(7);
        let line = MarketLine::initialize(800.0, 600.0, &mut rng);
        assert_eq!(line.len(), 81);
        assert_eq!(line.first().unwrap().x, 0.0);
        assert!(line.last().unwrap().x >= 800.0);
        for w in line.points.windows(2) {
            assert!((w[1].x - w[0].x - SEGMENT_SPACING).abs() < 1e-4);
        }
    }

    #[test]
    fn test_initialize_stays_in_opening_band() {
        let mut rng = Pcg32::seed_from_u64(11);
        let height = 600.0;
        let line = MarketLine::initialize(800.0, height, &mut rng);
        // 360 baseline, trend down to -120, jitter +-30
        for p in &line.points {
            assert!(p.y <= 360.0 + 30.0 && p.y >= 360.0 - 120.0 - 30.0, "y = {}", p.y);
        }
        // Upward trend: the right end sits higher (smaller y) than the left
        assert!(line.last().unwrap().y < line.first().unwrap().y);
    }

    #[test]
    fn test_advance_scrolls_prunes_and_extends() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut line = MarketLine {
            points: vec![Vec2::new(-9.0, 300.0), Vec2::new(1.0, 300.0), Vec2::new(11.0, 300.0)],
        };
        line.advance(2.5, 100.0, 600.0, &mut rng);

        // -11.5 + 10 < 0 drops; -1.5 + 10 >= 0 stays
        assert_eq!(line.first().unwrap().x, -1.5);
        assert!(line.last().unwrap().x >= 100.0);
        for w in line.points.windows(2) {
            assert!((w[1].y - w[0].y).abs() <= MAX_STEP);
        }
    }

    #[test]
    fn test_extension_clamped_to_play_band() {
        let mut rng = Pcg32::seed_from_u64(5);
        // Start far outside the 180..420 play band
        let mut line = MarketLine {
            points: vec![Vec2::new(0.0, 10.0)],
        };
        line.advance(0.0, 400.0, 600.0, &mut rng);
        for p in line.points.iter().skip(1) {
            assert!(p.y >= 180.0 && p.y <= 420.0);
        }
    }

    #[test]
    fn test_advance_reseeds_empty_line() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut line = MarketLine::default();
        line.advance(2.5, 200.0, 400.0, &mut rng);
        assert_eq!(line.first(), Some(Vec2::new(0.0, 200.0)));
        assert!(line.last().unwrap().x >= 200.0);
    }

    #[test]
    fn test_ceiling_within_ignores_offscreen_points() {
        let line = MarketLine {
            points: vec![
                Vec2::new(-5.0, 10.0),
                Vec2::new(50.0, 300.0),
                Vec2::new(60.0, 250.0),
                Vec2::new(120.0, 5.0),
            ],
        };
        assert_eq!(line.ceiling_within(100.0), Some(250.0));
        assert_eq!(line.ceiling_within(0.0), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_line_always_spans_surface(
            seed in any::<u64>(),
            width in 100u32..2000,
            height in 100u32..1200,
            frames in 1usize..10_000,
        ) {
            let (w, h) = (width as f32, height as f32);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut line = MarketLine::initialize(w, h, &mut rng);
            let max_len = line.len() + 2;

            for _ in 0..frames {
                line.advance(2.5, w, h, &mut rng);
                let first = line.first().unwrap();
                let last = line.last().unwrap();
                prop_assert!(last.x >= w);
                prop_assert!(first.x + SEGMENT_SPACING >= 0.0);
                prop_assert!(line.len() <= max_len);
            }
        }
    }
}
