//! Neon Tiles entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlSelectElement, MouseEvent,
    };

    use neon_tiles::audio::{AudioManager, Cue};
    use neon_tiles::consts::*;
    use neon_tiles::settings::{self, Difficulty};
    use neon_tiles::sim::{
        GameEvent, GamePhase, GameState, InputEvent, TileState, apply_input, tick,
    };
    use neon_tiles::{BestScores, lane_x, sim::Tile};

    /// Lane colors: bright center, darkened gradient edge, dimmed hint disc
    const LANE_COLORS: [&str; LANE_COUNT] = ["#00ffff", "#ff00ff", "#ffff00", "#00ff00"];
    const LANE_COLORS_DARK: [&str; LANE_COUNT] = ["#005555", "#550055", "#555500", "#005500"];
    const LANE_COLORS_DIM: [&str; LANE_COUNT] = [
        "rgba(0, 80, 80, 0.6)",
        "rgba(80, 0, 80, 0.6)",
        "rgba(80, 80, 0, 0.6)",
        "rgba(0, 80, 0, 0.6)",
    ];

    /// Key bindings, one per lane
    const LANE_KEYS: [&str; LANE_COUNT] = ["a", "s", "d", "f"];

    /// Game instance holding all state
    struct Game {
        state: GameState,
        audio: AudioManager,
        scores: BestScores,
        ctx: CanvasRenderingContext2d,
        accumulator: f32,
        last_time: f64,
        // Track phase for the once-per-run persistence write
        last_phase: GamePhase,
    }

    impl Game {
        fn new(
            seed: u64,
            difficulty: Difficulty,
            scores: BestScores,
            ctx: CanvasRenderingContext2d,
        ) -> Self {
            let mut state = GameState::new(seed, difficulty);
            state.best_score = scores.best(difficulty);
            Self {
                state,
                audio: AudioManager::new(),
                scores,
                ctx,
                accumulator: 0.0,
                last_time: 0.0,
                last_phase: GamePhase::Idle,
            }
        }

        /// Begin (or restart) a run; resuming audio here satisfies the
        /// user-gesture requirement.
        fn start(&mut self) {
            self.audio.resume();
            self.state.request_start();
        }

        /// Run fixed-timestep simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= TICK_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state);
                self.accumulator -= TICK_DT;
                substeps += 1;
            }
        }

        /// Persist the best score once when a run ends
        fn settle_run_end(&mut self) {
            let phase = self.state.phase;
            if phase != self.last_phase {
                if phase == GamePhase::GameOver
                    && self.state.new_best
                    && self.scores.record(self.state.difficulty, self.state.score)
                {
                    self.scores.save(self.state.difficulty);
                }
                self.last_phase = phase;
            }
        }

        /// Forward queued sim events to the audio and alert collaborators
        fn flush_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Note { tone } => self.audio.play(Cue::Note(tone)),
                    GameEvent::CountdownBeep { .. } => self.audio.play(Cue::CountdownBeep),
                    GameEvent::GameOverCue => self.audio.play(Cue::GameOver),
                    GameEvent::NewBestScore => {
                        self.audio.play(Cue::NewBestScore);
                        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                            show_new_best_alert(&document);
                        }
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&self, time: f64) {
            let ctx = &self.ctx;
            ctx.clear_rect(0.0, 0.0, BOARD_WIDTH as f64, BOARD_HEIGHT as f64);

            for tile in &self.state.tiles {
                draw_tile(ctx, tile);
            }

            match self.state.phase {
                GamePhase::Countdown => draw_countdown(ctx, self.state.countdown_beats_left()),
                GamePhase::Idle | GamePhase::GameOver => draw_key_hints(ctx, time),
                GamePhase::Running => {}
            }
        }

        /// Update HUD elements in the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("scoreValue") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("bestScoreSpan") {
                el.set_text_content(Some(&self.state.best_score.to_string()));
            }

            let game_over = self.state.phase == GamePhase::GameOver;
            let menus = matches!(self.state.phase, GamePhase::Idle | GamePhase::GameOver);
            set_visible(&document, "gameOverScreen", game_over);
            set_visible(&document, "startBtn", self.state.phase == GamePhase::Idle);
            set_visible(&document, "difficultyPanel", menus);
            set_visible(&document, "helpText", menus);

            if game_over {
                if let Some(el) = document.get_element_by_id("finalScoreSpan") {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Transient celebratory banner; removes itself after a few seconds
    fn show_new_best_alert(document: &Document) {
        let Ok(alert) = document.create_element("div") else {
            return;
        };
        alert.set_text_content(Some("New Best Score!"));
        let _ = alert.set_attribute("class", "new-best-score-alert");

        if let Some(body) = document.body() {
            let _ = body.append_child(&alert);
            let remove = Closure::once_into_js(move || {
                alert.remove();
            });
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    remove.unchecked_ref(),
                    3000,
                );
            }
        }
    }

    fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
        ctx.begin_path();
        ctx.move_to(x + r, y);
        let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
        let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
        let _ = ctx.arc_to(x, y + h, x, y, r);
        let _ = ctx.arc_to(x, y, x + w, y, r);
        ctx.close_path();
    }

    fn draw_tile(ctx: &CanvasRenderingContext2d, tile: &Tile) {
        let x = tile.x() as f64;
        let y = tile.y as f64;
        let w = TILE_WIDTH as f64;
        let h = TILE_HEIGHT as f64;

        rounded_rect_path(ctx, x, y, w, h, 10.0);

        if tile.state == TileState::Hit {
            // White flash dissolving with the fade
            let alpha = (1.0 - tile.fade).max(0.0);
            ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {alpha:.3})"));
        } else {
            let cx = x + w / 2.0;
            let cy = y + h / 2.0;
            if let Ok(gradient) = ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, w / 2.0) {
                let _ = gradient.add_color_stop(0.0, LANE_COLORS[tile.lane]);
                let _ = gradient.add_color_stop(1.0, LANE_COLORS_DARK[tile.lane]);
                ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
        ctx.fill();

        ctx.set_stroke_style_str("rgba(255, 255, 255, 0.5)");
        ctx.set_line_width(2.0);
        ctx.stroke();
    }

    fn draw_countdown(ctx: &CanvasRenderingContext2d, beats_left: u32) {
        ctx.save();
        ctx.set_fill_style_str("white");
        ctx.set_font("bold 96px Orbitron, sans-serif");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_shadow_color("rgba(255, 255, 255, 0.5)");
        ctx.set_shadow_blur(20.0);
        let _ = ctx.fill_text(
            &beats_left.to_string(),
            BOARD_WIDTH as f64 / 2.0,
            BOARD_HEIGHT as f64 / 2.0,
        );
        ctx.restore();
    }

    /// Attract-mode key hints, pulsing while no run is active
    fn draw_key_hints(ctx: &CanvasRenderingContext2d, time: f64) {
        let y = (BOARD_HEIGHT - TILE_WIDTH) as f64;
        let pulse = time / 500.0;

        ctx.save();
        ctx.set_font("bold 24px Orbitron, sans-serif");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        for (lane, key) in LANE_KEYS.iter().enumerate() {
            let x = (lane_x(lane) + TILE_WIDTH / 2.0) as f64;
            let color = LANE_COLORS[lane];

            ctx.set_fill_style_str(LANE_COLORS_DIM[lane]);
            ctx.begin_path();
            let _ = ctx.arc(x, y, TILE_WIDTH as f64 / 3.0, 0.0, std::f64::consts::TAU);
            ctx.fill();

            ctx.set_fill_style_str(color);
            ctx.set_shadow_color(color);
            ctx.set_shadow_blur(15.0);
            let _ = ctx.fill_text(&key.to_uppercase(), x, y);
            ctx.set_shadow_blur(0.0);

            ctx.set_global_alpha(0.5 + (pulse + lane as f64).sin() * 0.5);
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(3.0);
            ctx.begin_path();
            let _ = ctx.arc(x, y, TILE_WIDTH as f64 / 2.5, 0.0, std::f64::consts::TAU);
            ctx.stroke();
            ctx.set_global_alpha(1.0);
        }
        ctx.restore();
    }

    /// Static backdrop: gradient, starfield, lane separators. Drawn once.
    fn draw_background(ctx: &CanvasRenderingContext2d) {
        let w = BOARD_WIDTH as f64;
        let h = BOARD_HEIGHT as f64;

        let gradient = ctx.create_linear_gradient(0.0, 0.0, w, h);
        for (color, stop) in [("#1a1a2e", 0.0), ("#16213e", 0.5), ("#0f3460", 1.0)] {
            let _ = gradient.add_color_stop(stop, color);
        }
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, w, h);

        for _ in 0..100 {
            let alpha = js_sys::Math::random() * 0.5;
            ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {alpha:.3})"));
            ctx.begin_path();
            let _ = ctx.arc(
                js_sys::Math::random() * w,
                js_sys::Math::random() * h,
                js_sys::Math::random() * 2.0,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }

        ctx.set_stroke_style_str("rgba(0, 255, 255, 0.5)");
        ctx.set_line_width(2.0);
        for lane in 1..LANE_COUNT {
            let x = lane_x(lane) as f64;
            ctx.begin_path();
            ctx.move_to(x, 0.0);
            ctx.line_to(x, h);
            ctx.stroke();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Tiles starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameBoard")
            .expect("no game board canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(BOARD_WIDTH as u32);
        canvas.set_height(BOARD_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        if let Some(background) = document
            .get_element_by_id("background")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            background.set_width(BOARD_WIDTH as u32);
            background.set_height(BOARD_HEIGHT as u32);
            if let Some(bg_ctx) = background
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            {
                draw_background(&bg_ctx);
            }
        }

        let difficulty = settings::load_difficulty();
        let scores = BestScores::load();

        if let Some(select) = document
            .get_element_by_id("difficultySelect")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            select.set_value(difficulty.as_str());
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, difficulty, scores, ctx)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, &document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Neon Tiles running!");
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) {
        // Keyboard: lane keys hit tiles, Enter/Space/Tab start a run
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                let lane = LANE_KEYS.iter().position(|k| k.eq_ignore_ascii_case(&key));
                if let Some(lane) = lane {
                    apply_input(&mut game.borrow_mut().state, &InputEvent::KeyPress { lane });
                } else if matches!(key.as_str(), "Enter" | "Tab" | " ") {
                    event.prevent_default();
                    game.borrow_mut().start();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer taps on the board
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                if rect.width() <= 0.0 || rect.height() <= 0.0 {
                    return;
                }
                let x = (event.client_x() as f64 - rect.left()) * BOARD_WIDTH as f64
                    / rect.width();
                let y = (event.client_y() as f64 - rect.top()) * BOARD_HEIGHT as f64
                    / rect.height();
                let point = Vec2::new(x as f32, y as f32);
                apply_input(
                    &mut game.borrow_mut().state,
                    &InputEvent::PointerDown { point },
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Start button
        if let Some(btn) = document.get_element_by_id("startBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart button; request_start rejects it while a run is in flight
        if let Some(btn) = document.get_element_by_id("restartBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Difficulty selector
        if let Some(select) = document
            .get_element_by_id("difficultySelect")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            let game = game.clone();
            let select_clone = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let Some(difficulty) = Difficulty::from_str(&select_clone.value()) else {
                    return;
                };
                if g.state.change_difficulty(difficulty) {
                    settings::save_difficulty(difficulty);
                    g.state.best_score = g.scores.best(difficulty);
                    log::info!("Difficulty changed to {}", difficulty.as_str());
                } else {
                    // Mid-run changes are rejected; snap the selector back
                    select_clone.set_value(g.state.difficulty.as_str());
                }
            });
            let _ = select
                .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mute toggle
        if let Some(btn) = document.get_element_by_id("muteBtn") {
            let game = game.clone();
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let muted = !g.audio.muted();
                g.audio.set_muted(muted);
                btn_clone.set_text_content(Some(if muted { "🔇" } else { "🔊" }));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                TICK_DT
            };
            g.last_time = time;

            g.update(dt);
            g.settle_run_end();
            g.flush_events();
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Tiles (native) starting...");
    log::info!("Native mode is headless - build with trunk for the web version");

    println!("\nRunning smoke simulation...");
    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Deterministic headless run: count down, then key the first three tiles.
#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use neon_tiles::settings::Difficulty;
    use neon_tiles::sim::{GamePhase, GameState, InputEvent, Outcome, apply_input, tick};

    let mut state = GameState::new(42, Difficulty::Easy);
    state.request_start();
    while state.phase == GamePhase::Countdown {
        tick(&mut state);
    }

    let mut hits = 0;
    while hits < 3 {
        tick(&mut state);
        assert_eq!(state.phase, GamePhase::Running, "run ended early");
        let lane = state
            .tiles
            .iter()
            .find(|t| t.hittable() && t.on_board())
            .map(|t| t.lane);
        if let Some(lane) = lane {
            if matches!(
                apply_input(&mut state, &InputEvent::KeyPress { lane }),
                Outcome::Hit(_)
            ) {
                hits += 1;
            }
        }
    }

    assert_eq!(state.score, 3);
    println!("✓ Smoke simulation passed (score {})", state.score);
}
