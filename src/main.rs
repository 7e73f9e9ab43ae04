//! MeloDash entry point
//!
//! Native: a headless runner that plays a session (optionally with the demo
//! bot) and prints the result. Web: wires the session to the page.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use melodash::audio::AudioManager;
    use melodash::highscores::LocalStorageStore;
    use melodash::lanes;
    use melodash::sim::GamePhase;
    use melodash::{Command, Session, Settings};

    /// Game instance holding the session and frame timing
    struct Game {
        session: Session,
        last_time: f64,
    }

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    fn with_game(f: impl FnOnce(&mut Game)) {
        GAME.with(|cell| {
            if let Some(game) = cell.borrow().as_ref() {
                f(&mut game.borrow_mut());
            }
        });
    }

    impl Game {
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).max(0.0)
            } else {
                0.0
            };
            self.last_time = time;
            self.session
                .update(std::time::Duration::from_secs_f64(dt / 1000.0));
        }

        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let snap = self.session.snapshot();
            let set = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };
            set("score", &(snap.score.floor() as u64).to_string());
            set("combo", &snap.combo.to_string());
            set("high-score", &(snap.high_score.floor() as u64).to_string());
            set(
                "status",
                match snap.phase {
                    GamePhase::NotStarted => "Press Enter to start",
                    GamePhase::Running => "",
                    GamePhase::Paused => "Paused",
                    GamePhase::GameOver if snap.new_high_score => "New High Score!",
                    GamePhase::GameOver => "Game Over",
                },
            );
        }
    }

    /// Latest snapshot as JSON, for the page's renderer
    #[wasm_bindgen]
    pub fn snapshot_json() -> String {
        let mut json = String::new();
        with_game(|g| {
            json = g.session.snapshot().to_json().unwrap_or_default();
        });
        json
    }

    #[wasm_bindgen]
    pub fn start_game() {
        with_game(|g| g.session.apply(Command::Start));
    }

    #[wasm_bindgen]
    pub fn toggle_pause() {
        with_game(|g| g.session.apply(Command::TogglePause));
    }

    #[wasm_bindgen]
    pub fn restart_game() {
        with_game(|g| g.session.apply(Command::Restart));
    }

    #[wasm_bindgen]
    pub fn reset_high_score() {
        with_game(|g| g.session.apply(Command::ClearHighScore));
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("MeloDash starting...");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let audio = AudioManager::from_settings(&settings);
        let session = Session::new(
            &settings,
            seed,
            Box::new(LocalStorageStore),
            Box::new(audio),
        );
        let game = Rc::new(RefCell::new(Game {
            session,
            last_time: 0.0,
        }));
        GAME.with(|cell| *cell.borrow_mut() = Some(game.clone()));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("MeloDash running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                // Held keys auto-repeat; only the first edge counts
                if event.repeat() {
                    return;
                }
                let key = event.key();
                if lanes::lane_for_key(&key).is_some() || key == " " {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                if key == "Enter" {
                    g.session.apply(Command::Start);
                } else {
                    g.session.key_down(&key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().session.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::thread;
    use std::time::{Duration, Instant};

    use clap::Parser;

    use melodash::autoplay::Autoplayer;
    use melodash::driver::Driver;
    use melodash::highscores::{FileStore, HighScoreStore, MemoryStore};
    use melodash::sim::GamePhase;
    use melodash::{Command, LogAudio, Session, Settings};

    /// Headless MeloDash runner
    #[derive(Debug, Parser)]
    #[command(name = "melodash", version, about)]
    pub struct Args {
        /// RNG seed for tile lanes
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many seconds
        #[arg(long, default_value_t = 30)]
        seconds: u64,
        /// Let the demo bot play
        #[arg(long)]
        autoplay: bool,
        /// Forget the stored high score before playing
        #[arg(long)]
        reset_high_score: bool,
        /// Override the tick period (ms)
        #[arg(long)]
        tick_ms: Option<u64>,
    }

    fn open_store() -> Box<dyn HighScoreStore> {
        match FileStore::in_data_dir() {
            Ok(store) => {
                log::info!("High score file: {}", store.path().display());
                Box::new(store)
            }
            Err(e) => {
                log::warn!("{}; high score will not persist", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() {
        let args = Args::parse();
        let mut settings = Settings::load();
        if let Some(tick_ms) = args.tick_ms {
            settings.tick_ms = tick_ms;
        }
        let seed = args
            .seed
            .or(settings.seed)
            .unwrap_or_else(rand::random::<u64>);
        let frame = settings.tick_period();

        let session_settings = settings.clone();
        let driver = Driver::spawn(move || {
            Session::new(&session_settings, seed, open_store(), Box::new(LogAudio))
        });

        if args.reset_high_score {
            driver.send(Command::ClearHighScore);
        }
        driver.send(Command::Start);

        let mut bot = args.autoplay.then(Autoplayer::new);
        let deadline = Instant::now() + Duration::from_secs(args.seconds);
        while Instant::now() < deadline {
            let snap = driver.snapshot();
            if snap.phase == GamePhase::GameOver {
                break;
            }
            if let Some(bot) = bot.as_mut() {
                for command in bot.plan(&snap) {
                    driver.send(command);
                }
            }
            thread::sleep(frame);
        }

        let snap = driver.shutdown();
        println!("Phase:      {}", snap.phase.as_str());
        println!("Score:      {:.1}", snap.score);
        println!("Combo:      {}", snap.combo);
        println!("High score: {:.1}", snap.high_score);
        if snap.new_high_score {
            println!("New high score!");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("MeloDash (native) starting...");
    native::run();
}
