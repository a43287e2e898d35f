//! Nova Strike entry point
//!
//! The wasm shell owns everything outside the simulation: the frame loop,
//! device polling, the DOM HUD and menu overlays, persistence, audio, and
//! the advisory request. The native build is a headless smoke run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use nova_strike::advice::{self, AdviceSlot};
    use nova_strike::audio::{AudioEngine, SoundEffect};
    use nova_strike::consts::*;
    use nova_strike::highscores::HighScore;
    use nova_strike::maps::{ALL_SECTORS, SectorId};
    use nova_strike::renderer::{RenderState, build_scene};
    use nova_strike::sim::{
        GameEvent, GamePhase, GameState, PadButton, PadSnapshot, TickInput, tick,
    };

    /// Ticks between background music pulses
    const MUSIC_PULSE_TICKS: u32 = 32;

    /// What the DOM HUD last showed; rewritten only on change
    #[derive(Debug, Clone, PartialEq, Default)]
    struct StatusSnapshot {
        score: u64,
        level: u32,
        lives: String,
        high_score: u64,
        phase: Option<GamePhase>,
        multiplayer: bool,
        sector: Option<SectorId>,
        /// Resolved advisory title; None while the request is in flight
        advice_title: Option<String>,
    }

    /// Game instance holding all shell state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        high_score: HighScore,
        advice: AdviceSlot,
        audio: AudioEngine,
        /// Lobby selections, applied on the next round start
        selected_sector: SectorId,
        dual_ships: bool,
        shown: StatusSnapshot,
        music_countdown: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                high_score: HighScore::load(),
                advice: AdviceSlot::new(),
                audio: AudioEngine::new(),
                selected_sector: SectorId::Orion,
                dual_ships: false,
                shown: StatusSnapshot::default(),
                music_countdown: MUSIC_PULSE_TICKS,
            }
        }

        /// Apply the current lobby selection and launch a round
        fn launch_round(&mut self) {
            self.advice.reset();
            let sector = self.selected_sector.config();
            if let Some(render_state) = &mut self.render_state {
                render_state.set_clear_color(sector.background);
            }
            self.state.start_round(self.dual_ships, sector);
            self.audio.resume();
        }

        /// Poll connected controllers into plain-data snapshots, one per ship
        fn poll_gamepads(&mut self) {
            self.input.pads = [PadSnapshot::default(); 2];

            let Some(window) = web_sys::window() else { return };
            let Ok(pads) = window.navigator().get_gamepads() else {
                return;
            };

            for (slot, entry) in self.input.pads.iter_mut().zip(pads.iter()) {
                let Ok(pad) = entry.dyn_into::<web_sys::Gamepad>() else {
                    continue;
                };
                slot.connected = true;
                for (i, axis) in pad.axes().iter().take(slot.axes.len()).enumerate() {
                    slot.axes[i] = axis.as_f64().unwrap_or(0.0) as f32;
                }
                for (i, button) in pad.buttons().iter().take(slot.buttons.len()).enumerate() {
                    if let Ok(button) = button.dyn_into::<web_sys::GamepadButton>() {
                        slot.buttons[i] = PadButton {
                            pressed: button.pressed(),
                            value: button.value() as f32,
                        };
                    }
                }
            }
        }

        /// Run simulation ticks for one frame
        fn update(&mut self, dt: f32) {
            self.poll_gamepads();

            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause_key = false;

                if self.state.phase == GamePhase::Playing {
                    self.music_countdown -= 1;
                    if self.music_countdown == 0 {
                        self.music_countdown = MUSIC_PULSE_TICKS;
                        self.audio.music_pulse();
                    }
                }
            }

            let events = self.state.drain_events();
            for event in events {
                self.handle_event(event);
            }
        }

        /// React to simulation notifications: SFX, persistence, the advisory
        /// request
        fn handle_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::BulletFired { .. } => self.audio.play(SoundEffect::Fire),
                GameEvent::AsteroidDestroyed { .. } => self.audio.play(SoundEffect::Explosion),
                GameEvent::ShipHit { .. } => self.audio.play(SoundEffect::ShipHit),
                GameEvent::ScoreChanged { .. } => {}
                GameEvent::LevelUp { level } => {
                    self.audio.play(SoundEffect::LevelUp);
                    log::info!("level up: {level}");
                }
                GameEvent::GameOver { score } => {
                    self.audio.play(SoundEffect::GameOver);
                    if self.high_score.record(score) {
                        log::info!("new high score: {score}");
                    }
                    let generation = self.advice.reset();
                    advice::request(self.advice.clone(), generation, score, self.state.level);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(&self.state);
            if let Some(render_state) = &mut self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory");
                    }
                    Err(e) => log::warn!("render error: {e:?}"),
                }
            }
        }

        fn lives_display(&self) -> String {
            let lives: Vec<String> =
                self.state.ships.iter().map(|s| s.lives.to_string()).collect();
            if lives.is_empty() { "-".to_string() } else { lives.join(" : ") }
        }

        /// Push the status snapshot into the DOM, but only when it changed
        fn update_hud(&mut self) {
            let snapshot = StatusSnapshot {
                score: self.state.total_score(),
                level: self.state.level,
                lives: self.lives_display(),
                high_score: self.high_score.get(),
                phase: Some(self.state.phase),
                multiplayer: self.state.multiplayer,
                sector: Some(self.state.sector.id),
                advice_title: self.advice.current().map(|a| a.title),
            };
            let phase_changed = self.shown.phase != snapshot.phase;
            if snapshot == self.shown {
                return;
            }

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "hud-score", &snapshot.score.to_string());
            set_text(&document, "hud-level", &snapshot.level.to_string());
            set_text(&document, "hud-lives", &snapshot.lives);
            set_text(&document, "hud-highscore", &snapshot.high_score.to_string());

            if phase_changed {
                let phase = self.state.phase;
                set_visible(&document, "menu", phase == GamePhase::Menu);
                set_visible(&document, "lobby", phase == GamePhase::Lobby);
                set_visible(&document, "pause-menu", phase == GamePhase::Paused);
                set_visible(&document, "game-over", phase == GamePhase::GameOver);
            }

            if self.state.phase == GamePhase::GameOver {
                set_text(&document, "final-score", &snapshot.score.to_string());
                match self.advice.current() {
                    Some(advice) => {
                        set_text(&document, "advice-title", &advice.title);
                        set_text(&document, "advice-text", &advice.advice);
                    }
                    None => {
                        set_text(&document, "advice-title", "...");
                        set_text(&document, "advice-text", "Awaiting debrief from command.");
                    }
                }
            }

            self.shown = snapshot;
        }
    }

    fn set_text(document: &web_sys::Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Nova Strike starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("game initialized with seed: {seed}");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_keyboard(game.clone());
        setup_menu_buttons(&document, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Nova Strike running");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                match event.code().as_str() {
                    "ArrowLeft" | "KeyA" => g.input.keyboard.rotate_left = true,
                    "ArrowRight" | "KeyD" => g.input.keyboard.rotate_right = true,
                    "ArrowUp" | "KeyW" => g.input.keyboard.thrust = true,
                    "Space" => g.input.keyboard.fire = true,
                    "Escape" | "KeyP" => g.input.pause_key = true,
                    "KeyM" => {
                        let muted = g.audio.toggle_mute();
                        log::info!("audio muted: {muted}");
                    }
                    _ => return,
                }
                event.prevent_default();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" | "KeyA" => g.input.keyboard.rotate_left = false,
                    "ArrowRight" | "KeyD" => g.input.keyboard.rotate_right = false,
                    "ArrowUp" | "KeyW" => g.input.keyboard.thrust = false,
                    "Space" => g.input.keyboard.fire = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Wire one click handler to a DOM button
    fn on_click(
        document: &web_sys::Document,
        id: &str,
        game: Rc<RefCell<Game>>,
        handler: impl Fn(&mut Game) + 'static,
    ) {
        let Some(button) = document.get_element_by_id(id) else {
            log::warn!("missing button #{id}");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            handler(&mut game.borrow_mut());
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_menu_buttons(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        // Title screen: quick single-ship start, or open the lobby
        on_click(document, "start-btn", game.clone(), |g| {
            g.dual_ships = false;
            g.selected_sector = SectorId::Orion;
            g.launch_round();
        });
        on_click(document, "lobby-btn", game.clone(), |g| g.state.open_lobby());

        // Lobby: sector select, mode toggle, deploy
        for sector in ALL_SECTORS {
            let id = format!("sector-{}", sector.as_str());
            on_click(document, &id, game.clone(), move |g| {
                g.selected_sector = sector;
                log::info!("sector selected: {}", sector.as_str());
            });
        }
        on_click(document, "mode-btn", game.clone(), |g| {
            g.dual_ships = !g.dual_ships;
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                let label = if g.dual_ships { "MODE: DUAL" } else { "MODE: SOLO" };
                set_text(&document, "mode-btn", label);
            }
        });
        on_click(document, "deploy-btn", game.clone(), |g| g.launch_round());

        // Pause overlay
        on_click(document, "resume-btn", game.clone(), |g| g.input.pause_key = true);
        on_click(document, "quit-btn", game.clone(), |g| g.state.back_to_menu());

        // Game over: redeploy with the same selection, or back out
        on_click(document, "redeploy-btn", game.clone(), |g| g.launch_round());
        on_click(document, "menu-btn", game, |g| g.state.back_to_menu());
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Tab hidden: request a pause rather than silently eating ticks
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.input.pause_key = true;
                    log::info!("auto-paused (tab hidden)");
                }
            }
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
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
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Nova Strike (native) starting...");
    log::info!("native mode is a headless smoke run - build for wasm32 to play");

    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive a short deterministic round and print where it lands
#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use nova_strike::maps::SectorId;
    use nova_strike::sim::{GameState, TickInput, tick};

    let mut state = GameState::new(0xA57E);
    state.start_round(false, SectorId::Orion.config());

    let mut input = TickInput::default();
    input.keyboard.thrust = true;
    input.keyboard.fire = true;

    for _ in 0..600 {
        tick(&mut state, &input);
    }

    println!(
        "after 600 ticks: phase={} score={} level={} asteroids={} bullets={} particles={}",
        state.phase.as_str(),
        state.total_score(),
        state.level,
        state.asteroids.len(),
        state.bullets.len(),
        state.particles.len(),
    );
}
