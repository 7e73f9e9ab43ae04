//! Game session
//!
//! The single owner of a play session's state. Ticks and input both go
//! through `&mut self`, so every mutation is serialized and score, combo and
//! tiles always change together. Events raised by the simulation are handed
//! to the audio and high score collaborators after each call.

use std::time::Duration;

use crate::audio::AudioSink;
use crate::clock::SimClock;
use crate::highscores::{HighScore, HighScoreStore};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GamePhase, GameState, KeyOutcome, Score, TileGenerator};
use crate::snapshot::GameSnapshot;

/// A user command from the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    TogglePause,
    Restart,
    KeyDown(String),
    KeyUp(String),
    ClearHighScore,
}

pub struct Session {
    state: GameState,
    generator: TileGenerator,
    clock: SimClock,
    high_score: HighScore,
    audio: Box<dyn AudioSink>,
    /// Set when the last finished round beat the high score
    new_high_score: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("clock", &self.clock)
            .field("high_score", &self.high_score)
            .finish()
    }
}

impl Session {
    pub fn new(
        settings: &Settings,
        seed: u64,
        store: Box<dyn HighScoreStore>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let period = settings.tick_period();
        log::info!("New session (seed {}, tick {:?})", seed, period);
        Self {
            state: GameState::new(period.as_millis() as u64),
            generator: TileGenerator::seeded(seed),
            clock: SimClock::new(period),
            high_score: HighScore::load(store),
            audio,
            new_high_score: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn high_score(&self) -> Score {
        self.high_score.best()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state, self.high_score.best(), self.new_high_score)
    }

    pub fn start(&mut self) -> bool {
        let changed = self.state.start();
        if changed {
            log::info!("Game started");
        }
        self.after_update();
        changed
    }

    pub fn toggle_pause(&mut self) -> bool {
        let changed = self.state.toggle_pause();
        self.after_update();
        changed
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.new_high_score = false;
        log::info!("Game restarted");
        self.after_update();
    }

    /// Run one simulation tick now, regardless of the clock
    pub fn tick(&mut self) {
        sim::tick(&mut self.state, &mut self.generator);
        self.after_update();
    }

    /// Feed elapsed wall time; ticks if the clock says one is due
    pub fn update(&mut self, elapsed: Duration) -> bool {
        if self.clock.advance(elapsed) {
            self.tick();
            true
        } else {
            false
        }
    }

    pub fn key_down(&mut self, key: &str) -> KeyOutcome {
        let outcome = sim::key_down(&mut self.state, key);
        if outcome == KeyOutcome::Restarted {
            self.new_high_score = false;
            log::info!("Game restarted");
        }
        self.after_update();
        outcome
    }

    pub fn key_up(&mut self, key: &str) {
        sim::key_up(&mut self.state, key);
    }

    pub fn clear_high_score(&mut self) {
        self.high_score.clear();
        self.new_high_score = false;
    }

    /// Apply a presentation command
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start => {
                self.start();
            }
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::Restart => self.restart(),
            Command::KeyDown(key) => {
                self.key_down(&key);
            }
            Command::KeyUp(key) => self.key_up(&key),
            Command::ClearHighScore => self.clear_high_score(),
        }
    }

    /// Deliver pending events and keep the clock in step with the phase
    fn after_update(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::NoteHit { lane, .. } => self.audio.on_note_hit(lane),
                GameEvent::ComboMilestone { combo } => {
                    log::debug!("Combo milestone {}", combo);
                    self.audio.on_combo_milestone();
                }
                GameEvent::TileMissed { id, lane } => {
                    log::debug!("Tile {} missed in lane {}", id, lane);
                }
                GameEvent::GameOver { score } => {
                    self.audio.on_tile_missed();
                    self.new_high_score = self.high_score.submit(score);
                    if self.new_high_score {
                        log::info!("New high score: {}", score);
                    }
                }
                GameEvent::Paused => log::info!("Paused"),
                GameEvent::Resumed => log::info!("Resumed"),
                GameEvent::Started
                | GameEvent::TileSpawned { .. }
                | GameEvent::ComboBroken { .. } => {}
            }
        }
        self.clock.set_running(self.state.is_running());
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::highscores::MemoryStore;
    use crate::sim::Tile;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Cue {
        Note(usize),
        Milestone,
        Missed,
    }

    #[derive(Clone, Default)]
    struct RecordingAudio(Rc<RefCell<Vec<Cue>>>);

    impl AudioSink for RecordingAudio {
        fn on_note_hit(&mut self, lane: usize) {
            self.0.borrow_mut().push(Cue::Note(lane));
        }
        fn on_combo_milestone(&mut self) {
            self.0.borrow_mut().push(Cue::Milestone);
        }
        fn on_tile_missed(&mut self) {
            self.0.borrow_mut().push(Cue::Missed);
        }
    }

    #[derive(Clone, Default)]
    struct RecordingStore {
        value: Rc<RefCell<Option<f64>>>,
        saves: Rc<RefCell<Vec<f64>>>,
    }

    impl HighScoreStore for RecordingStore {
        fn load(&self) -> Result<Option<f64>> {
            Ok(*self.value.borrow())
        }
        fn save(&mut self, score: f64) -> Result<()> {
            self.saves.borrow_mut().push(score);
            *self.value.borrow_mut() = Some(score);
            Ok(())
        }
        fn clear(&mut self) -> Result<()> {
            *self.value.borrow_mut() = None;
            Ok(())
        }
    }

    fn session() -> Session {
        Session::new(
            &Settings::default(),
            1,
            Box::new(MemoryStore::new()),
            Box::new(crate::audio::NullAudio),
        )
    }

    fn place(session: &mut Session, id: u64, lane: usize, position: f32) {
        let mut tile = Tile::new(id, lane);
        tile.position = position;
        session.state_mut().tiles.push(tile);
    }

    /// Push a tile across the miss line on the next tick
    fn force_miss(session: &mut Session) {
        place(session, 999, 0, 89.9);
        session.tick();
        assert_eq!(session.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_clock_follows_phase() {
        let mut s = session();
        assert!(!s.clock().is_running());
        assert!(!s.update(Duration::from_millis(100)));

        s.start();
        assert!(s.clock().is_running());
        assert!(s.update(Duration::from_millis(16)));
        assert_eq!(s.state().time_ticks, 1);

        s.toggle_pause();
        assert!(!s.clock().is_running());
        assert!(!s.update(Duration::from_millis(100)));
        assert_eq!(s.state().time_ticks, 1);

        s.toggle_pause();
        force_miss(&mut s);
        assert!(!s.clock().is_running());
    }

    #[test]
    fn test_hit_then_empty_press_scenario() {
        let mut s = session();
        s.start();
        place(&mut s, 1, 2, 65.0);

        s.key_down("ArrowRight");
        s.key_up("ArrowRight");
        assert!(s.state().tiles[0].hit);
        assert_eq!(s.state().combo, 1);
        assert_eq!(s.state().score.as_f64(), 1.0);

        s.key_down("ArrowLeft");
        assert_eq!(s.state().combo, 0);
        assert_eq!(s.state().score.as_f64(), 1.0);
    }

    #[test]
    fn test_audio_cues() {
        let audio = RecordingAudio::default();
        let cues = audio.0.clone();
        let mut s = Session::new(
            &Settings::default(),
            1,
            Box::new(MemoryStore::new()),
            Box::new(audio),
        );
        s.start();
        for i in 0..10 {
            place(&mut s, 100 + i, 1, 70.0);
            s.key_down("ArrowDown");
            s.key_up("ArrowDown");
        }
        force_miss(&mut s);

        let cues = cues.borrow();
        assert_eq!(cues.iter().filter(|c| **c == Cue::Note(1)).count(), 10);
        assert_eq!(cues[10], Cue::Milestone);
        assert_eq!(cues.last(), Some(&Cue::Missed));
        assert_eq!(cues.iter().filter(|c| **c == Cue::Missed).count(), 1);
    }

    #[test]
    fn test_no_mutation_after_game_over() {
        let mut s = session();
        s.start();
        force_miss(&mut s);
        let before = s.state().clone();

        assert_eq!(s.key_down("ArrowLeft"), KeyOutcome::Ignored);
        s.tick();
        s.toggle_pause();
        assert_eq!(s.state(), &before);

        s.restart();
        assert_eq!(s.phase(), GamePhase::NotStarted);
        assert!(s.state().tiles.is_empty());
    }

    #[test]
    fn test_high_score_saved_only_when_beaten() {
        let store = RecordingStore::default();
        *store.value.borrow_mut() = Some(2.0);
        let saves = store.saves.clone();
        let mut s = Session::new(
            &Settings::default(),
            1,
            Box::new(store),
            Box::new(crate::audio::NullAudio),
        );
        assert_eq!(s.high_score(), Score::from_tenths(20));

        // Round 1: score 1.0, not a record
        s.start();
        place(&mut s, 1, 0, 65.0);
        s.key_down("ArrowLeft");
        s.key_up("ArrowLeft");
        force_miss(&mut s);
        assert!(saves.borrow().is_empty());
        assert!(!s.snapshot().new_high_score);

        // Round 2: score 3.0, a record
        s.key_down(crate::consts::RESTART_KEY);
        assert_eq!(s.phase(), GamePhase::NotStarted);
        s.start();
        for i in 0..3 {
            place(&mut s, 10 + i, 0, 65.0);
            s.key_down("ArrowLeft");
            s.key_up("ArrowLeft");
        }
        force_miss(&mut s);
        assert_eq!(*saves.borrow(), vec![3.0]);
        let snap = s.snapshot();
        assert!(snap.new_high_score);
        assert_eq!(snap.high_score, 3.0);

        s.restart();
        assert!(!s.snapshot().new_high_score);
        assert_eq!(s.high_score(), Score::from_tenths(30));
    }

    #[test]
    fn test_clear_high_score() {
        let mut s = Session::new(
            &Settings::default(),
            1,
            Box::new(MemoryStore::with_value(50.0)),
            Box::new(crate::audio::NullAudio),
        );
        assert_eq!(s.high_score(), Score::from_tenths(500));
        s.apply(Command::ClearHighScore);
        assert_eq!(s.high_score(), Score::ZERO);
    }

    #[test]
    fn test_commands() {
        let mut s = session();
        s.apply(Command::Start);
        assert_eq!(s.phase(), GamePhase::Running);
        s.apply(Command::KeyDown("ArrowUp".into()));
        assert!(s.state().pressed[3]);
        s.apply(Command::KeyUp("ArrowUp".into()));
        assert!(!s.state().pressed[3]);
        s.apply(Command::TogglePause);
        assert_eq!(s.phase(), GamePhase::Paused);
        s.apply(Command::Restart);
        assert_eq!(s.state(), &GameState::new(16));
    }

    #[test]
    fn test_same_seed_same_game() {
        let run = || {
            let mut s = session();
            s.start();
            for _ in 0..1000 {
                s.tick();
            }
            s.snapshot()
        };
        assert_eq!(run(), run());
    }
}
