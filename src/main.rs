//! Chicken Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use chicken_run::Settings;
    use chicken_run::audio::AudioManager;
    use chicken_run::consts::*;
    use chicken_run::hud::{END_TEXT_COLOR, HIGHLIGHT_COLOR, Hud, HudView, Overlay};
    use chicken_run::renderer::{Animator, InitError, RenderState, scene};
    use chicken_run::sim::{GameState, TickInput, tick};

    /// Overlay element ids, shown one at a time
    const OVERLAY_IDS: [&str; 3] = ["start-screen", "info-screen", "game-over-screen"];

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: Option<AudioManager>,
        anim: Animator,
        hud: Hud,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                render_state: None,
                audio: None,
                anim: Animator::new(),
                hud: Hud::new(),
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Queue a one-shot input for the next substep
        fn press(&mut self, advance: bool, ascend: bool) {
            self.input.advance |= advance;
            self.input.ascend |= ascend;

            // Audio can only start from a user gesture
            if self.audio.is_none() {
                self.audio = Some(AudioManager::new(&self.settings));
            }
            if let Some(audio) = &self.audio {
                audio.on_user_input(self.state.phase);
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.advance = false;
                self.input.ascend = false;

                for event in self.state.drain_events() {
                    self.anim.handle_event(&event);
                    if let Some(audio) = &self.audio {
                        audio.handle_event(&event);
                    }
                }
                self.anim.step(&self.state.snapshot(), SIM_DT);
            }

            if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
                log::trace!("Dropping {:.3}s of backlog", self.accumulator);
                self.accumulator = 0.0;
            }

            if let Some(audio) = &self.audio {
                audio.sync_music(self.state.phase);
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame. Skipped until the GPU is ready.
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };

            let vertices = scene::build(&self.state.snapshot(), &self.anim);
            match render_state.render(&vertices) {
                Ok(()) => {}
                Err(e) if e.needs_reconfigure() => {
                    log::debug!("{}; reconfiguring", e);
                    render_state.reconfigure();
                }
                Err(chicken_run::renderer::FrameError::ZeroSize) => {}
                Err(chicken_run::renderer::FrameError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document, dt: f32) {
            let snap = self.state.snapshot();
            let view = self.hud.update(&snap, dt);
            apply_hud(document, &view);

            if let Some(el) = document.get_element_by_id("fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&format!("{} FPS", self.fps)));
                } else {
                    el.set_text_content(None);
                }
            }

            // "+10" bonus text, positioned over the canvas in percent
            if let Some(el) = element::<HtmlElement>(document, "float-text") {
                match snap.floating_texts.first() {
                    Some(text) => {
                        el.set_text_content(Some(&text.text));
                        let style = el.style();
                        let _ = style.set_property("left", &format!("{}%", text.pos.x / CANVAS_WIDTH * 100.0));
                        let _ = style.set_property("top", &format!("{}%", text.pos.y / CANVAS_HEIGHT * 100.0));
                        let _ = style.set_property("opacity", &text.alpha.to_string());
                    }
                    None => el.set_text_content(None),
                }
            }
        }
    }

    fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
        document.get_element_by_id(id)?.dyn_into::<T>().ok()
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn apply_hud(document: &Document, view: &HudView) {
        if let Some(el) = element::<HtmlElement>(document, "score") {
            el.set_text_content(Some(&view.score));
            let _ = el.style().set_property("color", view.score_color);
        }
        if let Some(el) = document.get_element_by_id("high-score") {
            el.set_text_content(view.high_score.as_deref());
        }

        let shown = view.overlay.element_id();
        for id in OVERLAY_IDS {
            set_hidden(document, id, shown != Some(id));
        }
        set_hidden(document, "hud", view.overlay != Overlay::None);

        if let Overlay::GameOver {
            your_score,
            high_score,
            new_high,
        } = &view.overlay
        {
            if let Some(el) = element::<HtmlElement>(document, "final-score") {
                el.set_text_content(Some(your_score));
                let _ = el.style().set_property("color", END_TEXT_COLOR);
            }
            if let Some(el) = element::<HtmlElement>(document, "final-high-score") {
                el.set_text_content(Some(high_score));
                let color = if *new_high { HIGHLIGHT_COLOR } else { END_TEXT_COLOR };
                let _ = el.style().set_property("color", color);
            }
        }
    }

    async fn init_gpu(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<RenderState, InitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height).await
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let settings = Settings::load();
        if let Err(e) = console_log::init_with_level(settings.log_level()) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Chicken Run starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        set_hidden(&document, "loading", true);

        let Some(canvas) = element::<HtmlCanvasElement>(&document, "canvas") else {
            log::error!("No #canvas element");
            return;
        };

        // Fixed logical size, scaled for the display
        let dpr = window.device_pixel_ratio();
        let width = (CANVAS_WIDTH as f64 * dpr) as u32;
        let height = (CANVAS_HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(settings, seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_visibility(game.clone());

        // The loop runs (and the start screen shows) while the GPU initializes
        request_animation_frame(game.clone());

        match init_gpu(canvas, width, height).await {
            Ok(render_state) => {
                game.borrow_mut().render_state = Some(render_state);
                log::info!("Chicken Run running!");
            }
            Err(e) => log::error!("Rendering disabled: {}", e),
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Keyboard: Space/Enter advance, ArrowUp/W ascend
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let (advance, ascend) = match event.code().as_str() {
                    "Space" | "Enter" => (true, false),
                    "ArrowUp" | "KeyW" => (false, true),
                    _ => return,
                };
                event.prevent_default();
                game.borrow_mut().press(advance, ascend);
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click advances
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().press(true, false);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: upper half ascends, lower half advances
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let rect = canvas_clone.get_bounding_client_rect();
                let y = touch.client_y() as f64 - rect.top();
                let upper = y < rect.height() / 2.0;
                game.borrow_mut().press(!upper, upper);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_visibility(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            let mut g = game.borrow_mut();
            if let Some(audio) = g.audio.as_mut() {
                audio.set_hidden(hidden);
            }
            // Don't feed the hidden time into the accumulator
            g.last_time = 0.0;
            log::debug!("Visibility changed (hidden: {})", hidden);
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window; game loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud(&document, dt.min(MAX_FRAME_DT));
        } else {
            log::warn!("Frame skipped: no document");
        }

        // Always reschedule
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Simulated seconds the headless demo runs for by default
#[cfg(not(target_arch = "wasm32"))]
const DEMO_SECONDS: f32 = 60.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use chicken_run::Settings;
    use chicken_run::consts::SIM_DT;
    use chicken_run::sim::{GameEvent, GameState, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Chicken Run (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - use `trunk serve` for the game");

    let settings = Settings::load();
    let seconds = match std::env::args().nth(1).map(|s| s.parse::<f32>()) {
        Some(Ok(s)) if s > 0.0 => s,
        Some(_) => {
            log::warn!("Invalid duration argument; using {}s", DEMO_SECONDS);
            DEMO_SECONDS
        }
        None => DEMO_SECONDS,
    };
    let seed = settings.seed.unwrap_or(42);

    let mut state = GameState::new(seed);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let ticks = (seconds / SIM_DT) as u64;
    let mut runs = 0u32;
    let mut jumps = 0u32;
    let mut bugs = 0u32;
    for _ in 0..ticks {
        tick(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            match event {
                GameEvent::GameOver(_) => runs += 1,
                GameEvent::Jumped | GameEvent::DoubleJumped => jumps += 1,
                GameEvent::BugEaten { .. } => bugs += 1,
                _ => {}
            }
        }
    }

    log::info!(
        "Demo finished: {:.0}s simulated, seed {}, {} runs ended, {} jumps, {} bugs, high score {}",
        seconds,
        seed,
        runs,
        jumps,
        bugs,
        state.high_score.best()
    );

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => log::debug!("Final snapshot:\n{}", json),
        Err(e) => log::warn!("Failed to serialize snapshot: {}", e),
    }
}
