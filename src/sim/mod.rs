//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod resolve;
pub mod sequencer;
pub mod state;
pub mod tick;

pub use resolve::{InputEvent, Outcome, apply_input, resolve};
pub use sequencer::{next_lane, top_up};
pub use state::{GameEvent, GamePhase, GameState, Tile, TileState};
pub use tick::tick;
