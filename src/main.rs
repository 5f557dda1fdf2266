//! Cyber Aim entry point
//!
//! Handles platform-specific initialization and runs the game loop.
//! On the web this is the full front-end; natively it runs a headless
//! autoplay session and reports the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::{FRAC_PI_2, TAU};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, HtmlInputElement};

    use cyber_aim::audio::{AudioManager, Cue};
    use cyber_aim::consts::FLASH_DURATION_MS;
    use cyber_aim::highscores::LocalStorageStore;
    use cyber_aim::sim::{Game, GameEvent, GamePhase, HitOutcome, TargetKind, TickToken};
    use cyber_aim::{CrosshairColor, Settings};

    const TRAP_COLOR: &str = "#ef4444";
    const GOLD_COLOR: &str = "#eab308";
    const MISS_COLOR: &str = "#6b7280";
    /// Health below which the screen pulses red
    const LOW_HEALTH: u32 = 30;

    fn now_ms() -> u64 {
        js_sys::Date::now() as u64
    }

    /// Expanding ring left where the player clicked
    struct Particle {
        x: f64,
        y: f64,
        color: &'static str,
        born: u64,
    }

    /// App instance holding all state
    struct App {
        game: Game,
        /// Token of the run the frame loop is currently driving
        token: TickToken,
        settings: Settings,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        particles: Vec<Particle>,
        hype: Option<(&'static str, u64)>,
        show_settings: bool,
    }

    impl App {
        fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d, seed: u64) -> Self {
            let game = Game::seeded(seed, Box::new(LocalStorageStore));
            let token = game.tick_token();
            Self {
                game,
                token,
                settings: Settings::default(),
                audio: AudioManager::new(),
                canvas,
                ctx,
                particles: Vec::new(),
                hype: None,
                show_settings: false,
            }
        }

        fn start(&mut self) {
            self.audio.resume();
            self.particles.clear();
            self.game.start(now_ms());
            self.token = self.game.tick_token();
        }

        fn set_settings_open(&mut self, open: bool) {
            if self.show_settings == open {
                return;
            }
            self.show_settings = open;
            let now = now_ms();
            if open {
                self.game.pause(now);
            } else {
                self.game.resume(now);
                self.token = self.game.tick_token();
            }
        }

        /// Resolve a press at canvas-relative CSS pixels
        fn shoot(&mut self, x: f64, y: f64) {
            if !self.game.is_running() {
                return;
            }
            let w = self.canvas.client_width() as f32;
            let h = self.canvas.client_height() as f32;
            let color = match self.game.click(x as f32, y as f32, w, h, now_ms()) {
                Some(HitOutcome::Trap { .. }) => TRAP_COLOR,
                Some(HitOutcome::Scored {
                    kind: TargetKind::Gold,
                    ..
                }) => GOLD_COLOR,
                Some(HitOutcome::Scored { .. }) => self.settings.crosshair.hex(),
                None => MISS_COLOR,
            };
            self.particles.push(Particle {
                x,
                y,
                color,
                born: now_ms(),
            });
        }

        /// Advance the simulation and route its events to audio/overlays
        fn update(&mut self, now: u64) {
            // A stale token (round ended, overlay opened) makes this a no-op
            self.game.advance(self.token, now);

            for event in self.game.drain_events() {
                if let Some(cue) = Cue::for_event(&event) {
                    self.audio.play(cue);
                }
                if let GameEvent::Hype { text } = event {
                    self.hype = Some((text, now + FLASH_DURATION_MS));
                }
            }

            self.particles
                .retain(|p| now.saturating_sub(p.born) < FLASH_DURATION_MS);
            if matches!(self.hype, Some((_, until)) if now >= until) {
                self.hype = None;
            }
        }

        /// Render targets and particles onto the canvas
        fn render(&self, now: u64) {
            let w = self.canvas.client_width();
            let h = self.canvas.client_height();
            if self.canvas.width() != w as u32 || self.canvas.height() != h as u32 {
                self.canvas.set_width(w as u32);
                self.canvas.set_height(h as u32);
            }
            let (w, h) = (w as f64, h as f64);
            let ctx = &self.ctx;
            ctx.clear_rect(0.0, 0.0, w, h);

            let snapshot = self.game.snapshot(now);
            if snapshot.session.phase == GamePhase::Playing {
                for target in &snapshot.targets {
                    let cx = target.x as f64 / 100.0 * w;
                    let cy = target.y as f64 / 100.0 * h;
                    let r = target.kind.radius_px() as f64;
                    let color = match target.kind {
                        TargetKind::Trap => TRAP_COLOR,
                        TargetKind::Gold => GOLD_COLOR,
                        TargetKind::Standard => self.settings.crosshair.hex(),
                    };
                    ctx.set_fill_style_str(color);
                    ctx.set_stroke_style_str(color);

                    // Body
                    ctx.begin_path();
                    let _ = ctx.arc(cx, cy, r * 0.8, 0.0, TAU);
                    ctx.set_global_alpha(0.15);
                    ctx.fill();
                    ctx.set_global_alpha(1.0);
                    ctx.set_line_width(2.0);
                    ctx.stroke();

                    // Countdown ring
                    ctx.begin_path();
                    let sweep = TAU * target.remaining as f64;
                    let _ = ctx.arc(cx, cy, r * 0.92, -FRAC_PI_2, -FRAC_PI_2 + sweep);
                    ctx.set_line_width(3.0);
                    ctx.stroke();
                }
            }

            for p in &self.particles {
                let t = now.saturating_sub(p.born) as f64 / FLASH_DURATION_MS as f64;
                ctx.set_stroke_style_str(p.color);
                ctx.set_global_alpha((1.0 - t).max(0.0));
                ctx.set_line_width(2.0);
                ctx.begin_path();
                let _ = ctx.arc(p.x, p.y, 24.0 * (1.0 + t), 0.0, TAU);
                ctx.stroke();
            }
            ctx.set_global_alpha(1.0);
        }

        /// Update HUD and overlay elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();
            let session = self.game.session();
            let playing = session.phase == GamePhase::Playing;

            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };
            let set_visible = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };

            set_visible("hud", playing);
            set_text("hud-level", &format!("LEVEL {}", session.level));
            set_text("hud-level-name", &self.game.level_config().name);
            set_text("hud-score", &session.score.to_string());
            set_text("hud-combo", &format!("COMBO x{}", session.combo));
            set_text("hud-highscore", &format!("HIGHSCORE: {}", session.high_score));

            if let Some(bar) = document
                .get_element_by_id("hud-health-bar")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let _ = bar
                    .style()
                    .set_property("width", &format!("{}%", session.health));
                let _ = bar.set_attribute(
                    "class",
                    if session.health < LOW_HEALTH { "low" } else { "" },
                );
            }
            set_visible("low-health", playing && session.health < LOW_HEALTH);

            match self.hype {
                Some((text, _)) => {
                    set_text("hype", text);
                    set_visible("hype", true);
                }
                None => set_visible("hype", false),
            }

            set_visible("menu", !playing && !self.show_settings);
            set_visible("settings", self.show_settings);
            let game_over = session.phase == GamePhase::GameOver;
            set_visible("mission-report", game_over);
            if game_over {
                set_text("final-score", &session.score.to_string());
                set_text("best-score", &session.high_score.to_string());
            }
            set_text(
                "start-btn",
                if game_over {
                    "RETRY MISSION"
                } else {
                    "INITIATE PROTOCOL"
                },
            );
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cyber Aim starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(canvas.clone(), ctx, seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_pointer(&canvas, app.clone());
        setup_buttons(app.clone());
        setup_settings(app.clone());
        setup_keyboard(app.clone());
        setup_auto_pause(app.clone());

        request_animation_frame(app);

        log::info!("Cyber Aim running!");
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PointerEvent| {
            event.prevent_default();
            app.borrow_mut()
                .shoot(event.offset_x() as f64, event.offset_y() as f64);
        });
        let _ = canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("settings-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                event.stop_propagation();
                let mut a = app.borrow_mut();
                let open = !a.show_settings;
                a.set_settings_open(open);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("settings-close-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().set_settings_open(false);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_settings(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Volume slider
        if let Some(slider) = document
            .get_element_by_id("volume-slider")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let app = app.clone();
            let slider_clone = slider.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Ok(value) = slider_clone.value().parse::<f32>() else {
                    return;
                };
                let mut a = app.borrow_mut();
                a.settings.set_volume(value);
                let volume = a.settings.master_volume;
                a.audio.set_volume(volume);
            });
            let _ = slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Crosshair swatches
        for color in CrosshairColor::ALL {
            let Some(btn) = document.get_element_by_id(&format!("swatch-{}", color.as_str())) else {
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().settings.crosshair = color;
                log::info!("Crosshair theme: {}", color.as_str());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut a = app.borrow_mut();
            match event.key().as_str() {
                "Escape" => {
                    let open = !a.show_settings;
                    a.set_settings_open(open);
                }
                "Enter" if a.game.phase() != GamePhase::Playing && !a.show_settings => a.start(),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    if a.game.is_running() {
                        a.set_settings_open(true);
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                if a.game.is_running() {
                    a.set_settings_open(true);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            let now = now_ms();
            a.update(now);
            a.render(now);
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use cyber_aim::MemoryStore;
    use cyber_aim::sim::{
        Autopilot, Game, GameEvent, GamePhase, LevelTable, PcgSource, step,
    };

    /// Frame length of the simulated driver (~60 Hz)
    const FRAME_MS: u64 = 16;

    /// Run a headless Cyber Aim session driven by the autopilot
    #[derive(Parser, Debug)]
    #[command(name = "cyber-aim", version, about)]
    pub struct Args {
        /// Seed for target rolls and the autopilot
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Chance (0-1) each autopilot shot lands
        #[arg(long, default_value_t = 0.9)]
        accuracy: f64,
        /// Autopilot reaction time before clicking a target
        #[arg(long, default_value_t = 350)]
        reaction_ms: u64,
        /// Stop after this much simulated time even if still alive
        #[arg(long, default_value_t = 180)]
        max_secs: u64,
        /// JSON level table to play instead of the built-in one
        #[arg(long)]
        levels: Option<PathBuf>,
    }

    fn load_levels(path: Option<&PathBuf>) -> Result<LevelTable, String> {
        let Some(path) = path else {
            return Ok(LevelTable::default());
        };
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        LevelTable::from_json(&json).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn run(args: Args) -> Result<(), String> {
        let levels = load_levels(args.levels.as_ref())?;
        let mut game = Game::new(
            levels,
            Box::new(PcgSource::new(args.seed)),
            Box::new(MemoryStore::default()),
        );
        let mut bot = Autopilot::new(args.seed.wrapping_add(1), args.accuracy, args.reaction_ms);

        log::info!(
            "Autoplay: seed {}, accuracy {:.2}, reaction {}ms",
            args.seed,
            args.accuracy,
            args.reaction_ms
        );

        game.start(0);
        let limit = args.max_secs * 1000;
        let mut now = 0;
        while game.phase() == GamePhase::Playing && now <= limit {
            let input = bot.plan(&game, now);
            step(&mut game, &input, now);
            for event in game.drain_events() {
                match event {
                    GameEvent::LevelUp { .. } | GameEvent::GameOver { .. } => {
                        log::info!("[{:>6}ms] {:?}", now, event)
                    }
                    _ => log::debug!("[{:>6}ms] {:?}", now, event),
                }
            }
            now += FRAME_MS;
        }

        let session = game.session();
        let stats = &session.stats;
        println!("\nCyber Aim autoplay (seed {})", args.seed);
        println!(
            "  survived:  {:.1}s{}",
            now as f64 / 1000.0,
            if game.phase() == GamePhase::GameOver { "" } else { " (time limit)" }
        );
        println!("  score:     {}", session.score);
        println!("  level:     {} ({})", session.level, game.level_config().name);
        println!("  health:    {}", session.health);
        println!("  accuracy:  {:.1}%", stats.accuracy() * 100.0);
        println!(
            "  hits {} (gold {}), misses {}, traps hit {}, expired {}, traps avoided {}, best combo x{}",
            stats.hits,
            stats.gold_hits,
            stats.misses,
            stats.traps_hit,
            stats.targets_expired,
            stats.traps_avoided,
            stats.best_combo
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    let args = headless::Args::parse();
    if let Err(e) = headless::run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
