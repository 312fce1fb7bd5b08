//! Color Flip Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

    use color_flip_rush::audio::AudioManager;
    use color_flip_rush::highscores::LocalStore;
    use color_flip_rush::platform::FrameClock;
    use color_flip_rush::renderer::{RenderState, build_frame};
    use color_flip_rush::sim::{RunStatus, Viewport};
    use color_flip_rush::{QualityPreset, Session, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStore, AudioManager>,
        render_state: Option<RenderState>,
        clock: FrameClock,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, viewport: Viewport, settings: Settings) -> Self {
            let audio = AudioManager::new(&settings);
            Self {
                session: Session::new(seed, viewport, Tuning::load(), settings, LocalStore, audio),
                render_state: None,
                clock: FrameClock::new(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn update(&mut self, time: f64) {
            let elapsed = self.clock.elapsed_ms(time);
            self.session.frame(elapsed);

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 && time > oldest_time {
                self.fps = (59000.0 / (time - oldest_time)).round() as u32;
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let state = self.session.state();
            let logical = (state.viewport.width, state.viewport.height);
            let vertices = build_frame(state, self.session.settings(), time / 1000.0);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices, logical) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let state = self.session.state();

            set_text(document, "#hud-score .hud-value", &state.score.to_string());
            set_text(document, "#hud-best .hud-value", &state.high_score.to_string());
            set_text(document, "#hud-fps .hud-value", &self.fps.to_string());

            let playing = state.status == RunStatus::Playing;
            set_visible(document, "hud", playing);

            // Multiplier badge only once a tier is earned
            let multiplier = state.multiplier();
            set_visible(document, "hud-combo", playing && multiplier > 1);
            if multiplier > 1 {
                set_text(document, "#hud-combo .multiplier", &format!("x{}", multiplier));
            }

            let power_up = state.power_up.filter(|_| playing);
            set_visible(document, "power-up", power_up.is_some());
            if let Some(active) = power_up {
                set_text(
                    document,
                    "#power-up .hud-value",
                    &format!("{} {:.1}s", active.kind.as_str(), active.remaining_ms / 1000.0),
                );
            }

            set_visible(document, "autopilot", self.session.autopilot());
            set_visible(document, "menu", state.status == RunStatus::Menu);

            set_visible(document, "game-over", state.status == RunStatus::GameOver);
            set_visible(document, "victory", state.status == RunStatus::Victory);
            if matches!(state.status, RunStatus::GameOver | RunStatus::Victory) {
                set_text(document, "#final-score", &state.score.to_string());
                set_text(document, "#final-best", &state.high_score.to_string());
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let class = if visible { "" } else { "hidden" };
            if el.get_attribute("class").as_deref() != Some(class) {
                let _ = el.set_attribute("class", class);
            }
        }
    }

    /// Settings from LocalStorage, with `?quality=low|medium|high` overriding the preset
    fn load_settings(window: &web_sys::Window) -> Settings {
        let mut settings = Settings::load();
        let preset = window
            .location()
            .search()
            .ok()
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
            .and_then(|params| params.get("quality"))
            .and_then(|q| QualityPreset::from_str(&q));
        if let Some(preset) = preset {
            log::info!("Quality preset from URL: {}", preset.as_str());
            settings.apply_preset(preset);
        }
        settings
    }

    /// Size the canvas backing store to its CSS size times the device pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (Viewport, u32, u32) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (Viewport::new(client_w as f32, client_h as f32), width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Color Flip Rush starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> found");
            return;
        };

        let (viewport, width, height) = fit_canvas(&window, &canvas);

        let seed = js_sys::Date::now() as u64;
        let settings = load_settings(&window);
        let game = Rc::new(RefCell::new(Game::new(seed, viewport, settings)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU (falls back to WebGL2)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::warn!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::warn!("No GPU adapter, rendering disabled: {}", e),
                }
            }
            Err(e) => log::warn!("Failed to create surface, rendering disabled: {}", e),
        }

        setup_input_handlers(&window, &canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(&window, canvas, game.clone());
        setup_visibility(&document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Color Flip Rush running!");
    }

    fn setup_input_handlers(window: &web_sys::Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click - flip or start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.on_primary_input();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().session.on_primary_input();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => {
                        event.prevent_default();
                        g.session.on_primary_input();
                    }
                    "Escape" => g.session.return_to_menu(),
                    "i" | "I" => g.session.toggle_autopilot(),
                    "m" | "M" => g.session.toggle_mute().save(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        // Retry after a crash
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.on_primary_input();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Victory screen back to the title
        if let Some(btn) = document.get_element_by_id("continue-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.return_to_menu();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &web_sys::Window, canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let win = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (viewport, width, height) = fit_canvas(&win, &canvas);
            let mut g = game.borrow_mut();
            g.session.resize(viewport.width, viewport.height);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height);
            }
            log::debug!("Resized to {}x{}", viewport.width, viewport.height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_visibility(document: &Document, game: Rc<RefCell<Game>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            // Resume timing from scratch instead of one giant frame
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                game.borrow_mut().clock.reset();
                log::info!("Tab hidden");
            }
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Frames the headless demo will run before giving up (two minutes at 60fps)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_MAX_FRAMES: u32 = 60 * 120;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use color_flip_rush::platform::Muted;
    use color_flip_rush::sim::{RunStatus, Viewport};
    use color_flip_rush::{MemoryStore, Session, Settings, Tuning};

    env_logger::init();
    log::info!("Color Flip Rush (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - use the web build to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(1);

    let mut session = Session::new(
        seed,
        Viewport::new(420.0, 860.0),
        Tuning::default(),
        Settings::default(),
        MemoryStore::new(),
        Muted,
    );
    session.set_autopilot(true);
    session.on_primary_input();

    let frame_ms = 1000.0 / 60.0;
    let mut frames = 0;
    while frames < DEMO_MAX_FRAMES {
        session.frame(frame_ms);
        frames += 1;
        if frames > 1 && session.status() != RunStatus::Playing {
            break;
        }
    }

    let state = session.state();
    println!("\nSeed {}: {:?} after {} frames", seed, state.status, frames);
    println!("  score      {}", state.score);
    println!("  multiplier x{}", state.multiplier());
    println!("  top speed  {:.2}", state.speed);
    println!("  best       {}", state.high_score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
