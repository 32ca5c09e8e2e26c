//! Market Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, KeyboardEvent,
        MouseEvent, TouchEvent, WheelEvent,
    };

    use market_runner::platform::PerformanceClock;
    use market_runner::present::Presenter;
    use market_runner::renderer::CanvasRenderer;
    use market_runner::{App, GameConfig, UiAction, UiEvent};

    struct Host {
        app: App<PerformanceClock>,
        renderer: CanvasRenderer,
        canvas: HtmlCanvasElement,
    }

    impl Host {
        fn handle(&mut self, event: UiEvent) {
            match self.app.handle(event) {
                Some(UiAction::Share(card)) => {
                    // Draw the current frame first so the export has the summary on it
                    self.render();
                    if let Err(e) = download_canvas(&self.canvas, &card.file_name) {
                        log::warn!("Share failed: {:?}", e);
                    }
                }
                Some(UiAction::Restarted) => log::info!("Restarted from game over"),
                None => {}
            }
        }

        fn render(&mut self) {
            self.renderer.set_scroll_offset(self.app.scroll_offset());
            let snapshot = self.app.snapshot();
            self.renderer.present(&snapshot);
        }
    }

    fn download_canvas(canvas: &HtmlCanvasElement, file_name: &str) -> Result<(), JsValue> {
        let url = canvas.to_data_url_with_type("image/png")?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        link.set_download(file_name);
        link.set_href(&url);
        link.click();
        Ok(())
    }

    /// Size the canvas to its parent element (or the window)
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (f32, f32) {
        let (w, h) = match canvas.parent_element() {
            Some(parent) => (parent.client_width(), parent.client_height()),
            None => web_sys::window()
                .map(|w| {
                    let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                    let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                    (width as i32, height as i32)
                })
                .unwrap_or((0, 0)),
        };
        canvas.set_width(w.max(0) as u32);
        canvas.set_height(h.max(0) as u32);
        (w as f32, h as f32)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Market Runner starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        let (width, height) = fit_canvas(&canvas);
        let clock = PerformanceClock::new().ok_or_else(|| JsValue::from_str("no performance"))?;
        let seed = js_sys::Date::now() as u64;
        let host = Rc::new(RefCell::new(Host {
            app: App::new(GameConfig::default(), width, height, seed, clock),
            renderer: CanvasRenderer::new(ctx),
            canvas: canvas.clone(),
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&window, &canvas, host.clone())?;
        request_animation_frame(host);

        log::info!("Market Runner running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        host: Rc<RefCell<Host>>,
    ) -> Result<(), JsValue> {
        // Keyboard
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    host.borrow_mut().handle(UiEvent::JumpKey);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse click
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                host.borrow_mut().handle(UiEvent::PointerDown {
                    x: event.offset_x() as f32,
                    y: event.offset_y() as f32,
                });
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start
        {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    host.borrow_mut().handle(UiEvent::PointerDown { x, y });
                }
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Wheel scrolls the game-over summary
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                host.borrow_mut().handle(UiEvent::Wheel {
                    delta_y: event.delta_y() as f32,
                });
            });
            canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Resize
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let (width, height) = fit_canvas(&canvas_clone);
                host.borrow_mut().handle(UiEvent::Resize { width, height });
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(host);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>) {
        {
            let mut h = host.borrow_mut();
            h.app.frame();
            h.render();
        }

        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use clap::Parser;

    use market_runner::consts::FRAMES_PER_SECOND;
    use market_runner::platform::ManualClock;
    use market_runner::present::{GameOverSummary, ShareCard};
    use market_runner::sim::GamePhase;
    use market_runner::{App, GameConfig, UiEvent};

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;
    /// How far above the line the autopilot tries to stay
    const SAFETY_MARGIN: f32 = 40.0;

    /// Market Runner - headless autopilot run
    #[derive(Parser, Debug)]
    #[command(name = "market-runner")]
    #[command(about = "Plays a seeded Market Runner game and prints the share card as JSON")]
    #[command(version)]
    pub struct Args {
        /// JSON file with game config overrides
        #[arg(long, env = "MARKET_RUNNER_CONFIG")]
        pub config: Option<PathBuf>,

        /// Frames to play before stopping
        #[arg(long, default_value_t = 3600)]
        pub frames: u64,

        /// RNG seed for terrain and news
        #[arg(long, default_value_t = 0x5eed)]
        pub seed: u64,
    }

    /// Read a config file, falling back to defaults when it is unusable
    pub fn load_config(path: Option<&Path>) -> GameConfig {
        let Some(path) = path else {
            return GameConfig::default();
        };
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| GameConfig::from_json(&json).map_err(|e| e.to_string()));
        match loaded {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default config, {} is unusable: {}", path.display(), e);
                GameConfig::default()
            }
        }
    }

    /// Height of the market line at `x`, interpolated between points
    fn line_y_at(points: &[glam::Vec2], x: f32) -> Option<f32> {
        points.windows(2).find_map(|w| {
            let (a, b) = (w[0], w[1]);
            if x < a.x || x > b.x {
                return None;
            }
            let span = b.x - a.x;
            let t = if span > 0.0 { (x - a.x) / span } else { 0.0 };
            Some(a.y + (b.y - a.y) * t)
        })
    }

    fn should_jump(app: &App<ManualClock>) -> bool {
        let state = app.game().state();
        let trader = &state.trader;
        let bottom = trader.pos.y + trader.size / 2.0;
        if trader.velocity < 0.0 {
            return false;
        }
        let floor = line_y_at(&state.terrain.points, trader.pos.x).unwrap_or(state.surface.height);
        bottom + SAFETY_MARGIN > floor.min(state.surface.height)
    }

    /// Play `frames` frames with a simple autopilot and return the share card
    pub fn run(config: GameConfig, frames: u64, seed: u64) -> ShareCard {
        let clock = ManualClock::new();
        let mut app = App::new(config, WIDTH, HEIGHT, seed, clock.clone());
        let frame_time = Duration::from_secs_f64(1.0 / FRAMES_PER_SECOND as f64);

        for _ in 0..frames {
            clock.advance(frame_time);
            app.frame();
            if app.game().phase() == GamePhase::GameOver {
                break;
            }
            if app.game().phase() == GamePhase::Running && should_jump(&app) {
                app.handle(UiEvent::JumpKey);
            }
        }

        let state = app.game().state();
        log::info!(
            "Autopilot finished: phase {:?}, score {}, frame {}",
            state.phase,
            state.score,
            state.frame
        );
        app.share_card().unwrap_or_else(|| {
            ShareCard::new(&GameOverSummary::from_state(state), app.high_score().best())
        })
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    let args = headless::Args::parse();
    log::info!("Market Runner (native) starting...");
    log::info!("Headless autopilot mode - run with `trunk serve` for the web version");

    let config = headless::load_config(args.config.as_deref());
    let card = headless::run(config, args.frames, args.seed);
    match card.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize share card: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
