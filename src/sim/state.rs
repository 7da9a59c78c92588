//! Game state and core simulation types
//!
//! Everything the presentation layer needs each frame is readable from
//! `GameState`; the sim never calls out to the platform.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Difficulty;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No active run; attract mode
    Idle,
    /// Beat countdown before tiles start moving
    Countdown,
    /// Active gameplay
    Running,
    /// Run ended
    GameOver,
}

/// Lifecycle of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    /// Moving down the board, hittable
    Falling,
    /// Successfully hit, fading out
    Hit,
    /// Fell past the board unclicked
    Expired,
}

/// One falling tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// Lane index, immutable once created
    pub lane: usize,
    /// Strictly increasing creation index; also the required hit order
    pub order: u32,
    /// Top edge in board coordinates; tiles spawn one height above the board
    pub y: f32,
    pub state: TileState,
    /// Fade-out progress in [0,1], meaningful once `state == Hit`
    pub fade: f32,
    /// Index into the cyclic hit melody
    pub tone: usize,
}

impl Tile {
    pub fn new(lane: usize, order: u32) -> Self {
        Self {
            lane,
            order,
            y: -TILE_HEIGHT,
            state: TileState::Falling,
            fade: 0.0,
            tone: order as usize % MELODY_LEN,
        }
    }

    /// Left edge in board coordinates
    pub fn x(&self) -> f32 {
        crate::lane_x(self.lane)
    }

    /// True while the tile can still be hit
    pub fn hittable(&self) -> bool {
        self.state == TileState::Falling
    }

    /// Whether the vertical extent intersects the visible board
    pub fn on_board(&self) -> bool {
        self.y + TILE_HEIGHT > 0.0 && self.y < BOARD_HEIGHT
    }

    /// Point test against the tile bounds expanded vertically by `hit_zone`
    pub fn contains(&self, p: Vec2, hit_zone: f32) -> bool {
        p.x >= self.x()
            && p.x < self.x() + TILE_WIDTH
            && p.y >= self.y - hit_zone
            && p.y < self.y + TILE_HEIGHT + hit_zone
    }
}

/// One-shot cues produced by the sim and drained by the platform layer.
///
/// Dropping an event (no audio context, muted) must never affect game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A tile was hit; play the melody note at this index
    Note { tone: usize },
    /// One countdown beat elapsed
    CountdownBeep { beats_left: u32 },
    /// Run ended without beating the stored best
    GameOverCue,
    /// Run ended with a new best score
    NewBestScore,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducible lane sequences
    pub seed: u64,
    /// Lane sequencing RNG
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    /// Tiles hit this run; also the order of the next required tile
    pub score: u32,
    /// Fall speed in pixels per tick
    pub speed: f32,
    /// Live tiles in creation order
    pub tiles: Vec<Tile>,
    /// Best score on record for the current difficulty
    pub best_score: u32,
    /// Set exactly once on game-over entry when the run beat the stored best
    pub new_best: bool,
    /// Ticks remaining in the countdown
    pub countdown_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Order assigned to the next spawned tile
    next_order: u32,
    /// Lane of the most recently spawned tile
    pub(crate) last_lane: Option<usize>,
    /// Per-frame event outbox, drained by the platform layer
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            difficulty,
            score: 0,
            speed: difficulty.base_speed(),
            tiles: Vec::new(),
            best_score: 0,
            new_best: false,
            countdown_ticks: 0,
            time_ticks: 0,
            next_order: 0,
            last_lane: None,
            events: Vec::new(),
        }
    }

    /// Order the next hittable tile must have
    pub fn expected_order(&self) -> u32 {
        self.score
    }

    /// Beats remaining, for the countdown display
    pub fn countdown_beats_left(&self) -> u32 {
        self.countdown_ticks.div_ceil(COUNTDOWN_BEAT_TICKS)
    }

    /// Allocate the next tile order
    pub(crate) fn take_order(&mut self) -> u32 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    /// Begin a new run: reset the run counters and enter the countdown.
    ///
    /// A no-op while a countdown or run is already in progress, so repeated
    /// start requests cannot stack countdowns.
    pub fn request_start(&mut self) {
        match self.phase {
            GamePhase::Countdown | GamePhase::Running => {}
            GamePhase::Idle | GamePhase::GameOver => {
                self.score = 0;
                self.speed = self.difficulty.base_speed();
                self.tiles.clear();
                self.next_order = 0;
                self.last_lane = None;
                self.new_best = false;
                self.countdown_ticks = COUNTDOWN_BEATS * COUNTDOWN_BEAT_TICKS;
                self.phase = GamePhase::Countdown;
            }
        }
    }

    /// Switch difficulty between runs. Returns false (and changes nothing)
    /// while a countdown or run is in progress.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> bool {
        match self.phase {
            GamePhase::Countdown | GamePhase::Running => false,
            GamePhase::Idle | GamePhase::GameOver => {
                self.difficulty = difficulty;
                self.speed = difficulty.base_speed();
                true
            }
        }
    }

    /// End the run, settling the best-score comparison exactly once.
    pub(crate) fn enter_game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        if self.score > self.best_score {
            self.best_score = self.score;
            self.new_best = true;
            self.push_event(GameEvent::NewBestScore);
        } else {
            self.push_event(GameEvent::GameOverCue);
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain the event outbox; called once per frame by the platform layer
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
