//! Dino Jump entry point
//!
//! Handles platform-specific initialization and runs the two game clocks.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent};

    use dino_jump::sim::{
        CueSink, GameEvent, JumpLatch, ObstacleKind, PcgSource, Simulation, Snapshot,
    };
    use dino_jump::{GameConfig, format_score};

    /// Shows and hides page elements in response to cues
    struct DomCues {
        document: Document,
    }

    impl DomCues {
        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let classes = el.class_list();
                let _ = if hidden {
                    classes.add_1("hidden")
                } else {
                    classes.remove_1("hidden")
                };
            }
        }
    }

    impl CueSink for DomCues {
        fn cue(&mut self, event: GameEvent) {
            match event {
                GameEvent::Jumped => log::debug!("Jump"),
                GameEvent::GameOver { score } => {
                    log::info!("Game over, score {}", score);
                    if let Some(el) = self.document.get_element_by_id("final-score") {
                        el.set_text_content(Some(&format_score(score)));
                    }
                    self.set_hidden("game-over", false);
                }
                GameEvent::Restarted => self.set_hidden("game-over", true),
                GameEvent::SpeedUp { level, .. } => {
                    if let Some(el) = self.document.query_selector("#hud-level .hud-value").ok().flatten() {
                        el.set_text_content(Some(&level.to_string()));
                    }
                }
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        sim: Simulation<PcgSource, DomCues>,
        ctx: CanvasRenderingContext2d,
        /// Jump edge seen since the last frame
        jump: JumpLatch,
        /// A requestAnimationFrame callback is outstanding
        frame_armed: bool,
        /// setInterval handle for the score clock
        score_interval: Option<i32>,
    }

    impl Game {
        /// Run one frame and draw it
        fn frame(&mut self, time: f64) {
            let jump = self.jump.take();
            let snapshot = self.sim.tick(time, jump);
            self.render(&snapshot);
            self.update_hud(&snapshot);
        }

        fn render(&self, snapshot: &Snapshot) {
            let config = self.sim.config();
            let ctx = &self.ctx;
            let width = config.playfield_width as f64;
            let height = config.playfield_height as f64;

            ctx.clear_rect(0.0, 0.0, width, height);

            // Ground
            ctx.set_fill_style_str("black");
            ctx.fill_rect(
                0.0,
                config.ground_line() as f64,
                width,
                config.ground_height as f64,
            );

            let c = snapshot.character.rect();
            ctx.set_fill_style_str("#2e7d32");
            ctx.fill_rect(
                c.left() as f64,
                c.top() as f64,
                c.size.x as f64,
                c.size.y as f64,
            );

            for obstacle in &snapshot.obstacles {
                let color = match obstacle.kind {
                    ObstacleKind::Regular => "black",
                    ObstacleKind::Hazard => "#b71c1c",
                };
                let r = obstacle.rect();
                ctx.set_fill_style_str(color);
                ctx.fill_rect(
                    r.left() as f64,
                    r.top() as f64,
                    r.size.x as f64,
                    r.size.y as f64,
                );
            }
        }

        fn update_hud(&self, snapshot: &Snapshot) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&format_score(snapshot.score)));
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Dino Jump starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let config = GameConfig::load();
        canvas.set_width(config.playfield_width as u32);
        canvas.set_height(config.playfield_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let mut sim = match Simulation::new(
            config,
            PcgSource::new(seed),
            DomCues {
                document: document.clone(),
            },
        ) {
            Ok(sim) => sim,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };
        sim.start();
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            sim,
            ctx,
            jump: JumpLatch::default(),
            frame_armed: false,
            score_interval: None,
        }));

        setup_input_handlers(game.clone());
        setup_restart_button(game.clone());

        start_score_clock(game.clone());
        request_animation_frame(game);

        log::info!("Dino Jump running!");
    }

    fn restart(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.jump.clear();
            g.sim.restart();
        }
        start_score_clock(game.clone());
        request_animation_frame(game.clone());
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            // Held keys repeat; only the press counts
            if event.repeat() {
                return;
            }
            match event.code().as_str() {
                "Space" | "ArrowUp" => {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    let phase = g.sim.phase();
                    g.jump.press(phase);
                }
                "Enter" => {
                    let over = game.borrow().sim.snapshot().game_over;
                    if over {
                        restart(&game);
                    }
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                restart(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Arm the score clock, replacing any previous interval
    fn start_score_clock(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        stop_score_clock(&game);

        let period = game.borrow().sim.config().score_period_ms as i32;
        let clock = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let active = {
                let mut g = clock.borrow_mut();
                g.sim.on_score_tick();
                g.sim.is_active()
            };
            if !active {
                stop_score_clock(&clock);
            }
        });
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            period,
        ) {
            Ok(handle) => game.borrow_mut().score_interval = Some(handle),
            Err(e) => log::error!("Failed to start score clock: {:?}", e),
        }
        closure.forget();
    }

    fn stop_score_clock(game: &Rc<RefCell<Game>>) {
        if let Some(handle) = game.borrow_mut().score_interval.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(handle);
            }
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.frame_armed {
                return;
            }
            g.frame_armed = true;
        }
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let active = {
            let mut g = game.borrow_mut();
            g.frame_armed = false;
            g.frame(time);
            g.sim.is_active()
        };

        // Stop after drawing the terminal frame; restart re-arms
        if active {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    use dino_jump::consts::{FRAME_MS, MAX_HEADLESS_FRAMES};
    use dino_jump::sim::{Autopilot, SharedSimulation, Simulation};
    use dino_jump::{ConfigError, GameConfig, format_score};

    /// Run one headless game with the autopilot on the controls
    ///
    /// The frame clock and the score clock each get a thread; the shared
    /// simulation's lock is the only thing they touch in common.
    pub fn run(config: GameConfig, seed: u64) -> Result<u32, ConfigError> {
        let score_period = Duration::from_millis(config.score_period_ms);
        let shared = SharedSimulation::new(Simulation::seeded(config.clone(), seed)?);
        let clocks_running = Arc::new(AtomicBool::new(true));

        shared.start();
        log::info!("Headless run with seed {}", seed);

        let score_clock = {
            let shared = shared.clone();
            let clocks_running = clocks_running.clone();
            thread::spawn(move || shared.run_score_clock(score_period, &clocks_running))
        };

        let frame_clock = {
            let shared = shared.clone();
            let clocks_running = clocks_running.clone();
            thread::spawn(move || {
                let origin = Instant::now();
                let autopilot = Autopilot;
                let mut jump = false;
                for _ in 0..MAX_HEADLESS_FRAMES {
                    if !clocks_running.load(Ordering::Acquire) {
                        break;
                    }
                    let now_ms = origin.elapsed().as_secs_f64() * 1000.0;
                    let snapshot = shared.tick(now_ms, jump);
                    if !shared.is_active() {
                        break;
                    }
                    jump = autopilot.wants_jump(&snapshot, &config);
                    thread::sleep(Duration::from_millis(FRAME_MS));
                }
                // Both clocks stop together
                clocks_running.store(false, Ordering::Release);
            })
        };

        if frame_clock.join().is_err() {
            log::error!("Frame clock panicked");
        }
        if score_clock.join().is_err() {
            log::error!("Score clock panicked");
        }

        let snapshot = shared.snapshot();
        log::info!(
            "Run ended after {} frames: score {} (level {}, game over: {})",
            snapshot.frame,
            format_score(snapshot.score),
            snapshot.level,
            snapshot.game_over
        );
        Ok(snapshot.score)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dino_jump::GameConfig;

    env_logger::init();
    log::info!("Dino Jump (native) starting...");

    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => match GameConfig::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    match native::run(config, seed) {
        Ok(score) => println!("Final score: {}", dino_jump::format_score(score)),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
