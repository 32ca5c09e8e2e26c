//! Canvas 2D renderer

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::{palette, sentiment_color};
use crate::consts::{NEWS_MAX_WIDTH, NEWS_PADDING, SUMMARY_LINES};
use crate::present::{GameOverSummary, Presenter, Snapshot};
use crate::sim::{GamePhase, NewsToken};
use crate::ui::{GameOverButton, GameOverLayout};

const FONT: &str = "Space Grotesk";
const NEWS_BOX_HEIGHT: f64 = 30.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    scroll_offset: f32,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            scroll_offset: 0.0,
        }
    }

    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset;
    }

    /// Draw a full frame
    pub fn draw(&self, snapshot: &Snapshot<'_>) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (snapshot.width as f64, snapshot.height as f64);

        ctx.set_fill_style_str(palette::BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);

        self.draw_market_line(snapshot);
        self.draw_news(snapshot.news)?;
        self.draw_trader(snapshot)?;
        self.draw_hud(snapshot)?;

        match snapshot.phase {
            GamePhase::Countdown => self.draw_countdown(snapshot)?,
            GamePhase::Running => {}
            GamePhase::GameOver => {
                if let Some(summary) = &snapshot.summary {
                    self.draw_game_over(snapshot, summary)?;
                }
            }
        }
        Ok(())
    }

    fn draw_market_line(&self, snapshot: &Snapshot<'_>) {
        let ctx = &self.ctx;
        let Some((first, rest)) = snapshot.terrain.split_first() else {
            return;
        };
        ctx.begin_path();
        ctx.set_stroke_style_str(palette::MARKET_LINE);
        ctx.set_line_width(2.0);
        ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            ctx.line_to(p.x as f64, p.y as f64);
        }
        ctx.stroke();
    }

    fn draw_news(&self, news: &[NewsToken]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_font(&format!("14px {FONT}"));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        let padding = NEWS_PADDING as f64;
        for token in news {
            let measured = ctx.measure_text(&token.text)?.width();
            let box_width = (measured + padding * 2.0).min(NEWS_MAX_WIDTH as f64);
            let (x, y) = (token.pos.x as f64, token.pos.y as f64);

            // Neutral color: the player can't tell good news from bad at a glance
            ctx.set_fill_style_str(palette::NEWS_BOX);
            ctx.fill_rect(
                x - box_width / 2.0,
                y - NEWS_BOX_HEIGHT / 2.0,
                box_width,
                NEWS_BOX_HEIGHT,
            );

            let mut label = token.text.clone();
            let max_text = box_width - padding * 2.0;
            while !label.is_empty() && ctx.measure_text(&label)?.width() > max_text {
                label.pop();
            }
            ctx.set_fill_style_str(palette::TEXT);
            ctx.fill_text(&label, x, y)?;
        }
        ctx.restore();
        Ok(())
    }

    fn draw_trader(&self, snapshot: &Snapshot<'_>) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let trader = snapshot.trader;
        ctx.set_fill_style_str(palette::TRADER);
        ctx.begin_path();
        ctx.arc(
            trader.pos.x as f64,
            trader.pos.y as f64,
            (trader.size / 2.0) as f64,
            0.0,
            TAU,
        )?;
        ctx.fill();
        Ok(())
    }

    fn draw_hud(&self, snapshot: &Snapshot<'_>) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_font(&format!("16px \"{FONT}\""));
        ctx.set_text_align("left");
        ctx.set_text_baseline("alphabetic");

        ctx.set_fill_style_str(sentiment_color(snapshot.sentiment));
        ctx.fill_text(
            &format!("Market: {}", snapshot.sentiment.as_str()),
            10.0,
            30.0,
        )?;

        ctx.set_fill_style_str(palette::TEXT);
        ctx.fill_text(&format!("Score: {}", snapshot.score), 10.0, 60.0)?;
        ctx.fill_text(
            &format!("Stop Loss: {}/{}", snapshot.stop_loss, snapshot.max_stop_loss),
            10.0,
            90.0,
        )?;
        ctx.fill_text(
            &format!("High Score: {}", snapshot.high_score),
            10.0,
            120.0,
        )?;
        ctx.restore();
        Ok(())
    }

    fn draw_countdown(&self, snapshot: &Snapshot<'_>) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (snapshot.width as f64, snapshot.height as f64);
        ctx.save();
        ctx.set_fill_style_str(palette::OVERLAY);
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.set_fill_style_str(palette::TEXT);
        ctx.set_text_align("center");
        ctx.set_font(&format!("bold 48px \"{FONT}\""));
        ctx.fill_text(&snapshot.countdown.to_string(), w / 2.0, h / 2.0)?;

        ctx.set_font(&format!("24px \"{FONT}\""));
        let lines = [
            "Use SPACEBAR or CLICK to control the trader".to_string(),
            "Collect good news (green) and avoid bad news (red)".to_string(),
            format!(
                "You have {} stop losses before margin call!",
                snapshot.max_stop_loss
            ),
        ];
        for (i, line) in lines.iter().enumerate() {
            ctx.fill_text(line, w / 2.0, h / 2.0 + 50.0 + 40.0 * i as f64)?;
        }
        ctx.restore();
        Ok(())
    }

    fn draw_game_over(
        &self,
        snapshot: &Snapshot<'_>,
        summary: &GameOverSummary,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (snapshot.width as f64, snapshot.height as f64);
        let layout = GameOverLayout::new(snapshot.width, snapshot.height);
        let font_size = layout.font_size as f64;
        let summary_size = layout.summary_font_size() as f64;
        let scroll = self.scroll_offset as f64;

        ctx.save();
        ctx.set_fill_style_str(palette::OVERLAY);
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.set_text_align("center");
        ctx.set_font(&format!("{font_size}px {FONT}"));
        ctx.set_fill_style_str(palette::TEXT);
        ctx.fill_text("Game Over!", w / 2.0, font_size * 2.0 - scroll)?;

        ctx.set_font(&format!("{}px {FONT}", summary_size * 0.8));
        ctx.fill_text(
            &format!("Score: {}   Best: {}", summary.score, snapshot.high_score),
            w / 2.0,
            font_size * 2.6 - scroll,
        )?;

        let shown = summary.truncated(SUMMARY_LINES);
        let columns = [
            ("Positive News", palette::BULLISH, &shown.positive, w / 4.0),
            ("Negative News", palette::BEARISH, &shown.negative, w / 4.0 * 3.0),
        ];
        for (heading, color, lines, x) in columns {
            let top = font_size * 3.0 - scroll;
            ctx.set_fill_style_str(color);
            ctx.set_font(&format!("{summary_size}px {FONT}"));
            ctx.fill_text(heading, x, top)?;

            ctx.set_font(&format!("{}px {FONT}", summary_size * 0.8));
            for (i, text) in lines.iter().enumerate() {
                let y = top + summary_size + summary_size * 1.2 * i as f64;
                ctx.fill_text(text, x, y)?;
            }
        }

        ctx.set_font(&format!("{}px {FONT}", font_size * 0.4));
        for (button, rect) in layout.buttons() {
            ctx.set_fill_style_str(match button {
                GameOverButton::Share => palette::SHARE_BUTTON,
                GameOverButton::PlayAgain => palette::PLAY_AGAIN_BUTTON,
            });
            ctx.fill_rect(
                rect.x as f64,
                rect.y as f64,
                rect.width as f64,
                rect.height as f64,
            );
            let (cx, cy) = rect.center();
            ctx.set_fill_style_str(palette::TEXT);
            ctx.fill_text(button.label(), cx as f64, cy as f64 + font_size * 0.15)?;
        }

        ctx.restore();
        Ok(())
    }
}

impl Presenter for CanvasRenderer {
    fn present(&mut self, snapshot: &Snapshot<'_>) {
        if let Err(e) = self.draw(snapshot) {
            log::warn!("Render error: {:?}", e);
        }
    }
}
