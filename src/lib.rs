//! Neon Tiles - a lane-tapping reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile lifecycle, lane sequencing, hit resolution)
//! - `audio`: Procedural audio cues via the Web Audio API
//! - `scores`: Per-difficulty best score ledger (LocalStorage)
//! - `settings`: Difficulty table and selection persistence

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod scores;
pub mod settings;
pub mod sim;

pub use scores::BestScores;
pub use settings::Difficulty;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tile step per display frame)
    pub const TICK_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Board dimensions (logical pixels)
    pub const BOARD_WIDTH: f32 = 480.0;
    pub const BOARD_HEIGHT: f32 = 640.0;

    /// Lanes and tile geometry
    pub const LANE_COUNT: usize = 4;
    pub const TILE_WIDTH: f32 = BOARD_WIDTH / LANE_COUNT as f32;
    pub const TILE_HEIGHT: f32 = 120.0;

    /// Added to the fall speed on every successful hit
    pub const SPEED_STEP: f32 = 0.05;
    /// Vertical hit tolerance per unit of fall speed
    pub const HIT_ZONE_PER_SPEED: f32 = 10.0;

    /// Hit fade-out duration in ticks; wall time, unaffected by fall speed
    pub const HIT_FADE_TICKS: u32 = 30;

    /// Countdown beats before a run starts, and ticks per beat
    pub const COUNTDOWN_BEATS: u32 = 3;
    pub const COUNTDOWN_BEAT_TICKS: u32 = 60;

    /// Length of the cyclic hit melody
    pub const MELODY_LEN: usize = 16;

    // Lane sequencing requires at least two lanes.
    const _: () = assert!(LANE_COUNT >= 2);
}

/// Left edge of a lane in board coordinates
#[inline]
pub fn lane_x(lane: usize) -> f32 {
    lane as f32 * consts::TILE_WIDTH
}
