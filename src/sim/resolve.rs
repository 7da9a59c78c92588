//! Input resolution: map a key press or pointer tap to a tile outcome.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState, TileState};
use crate::consts::*;

/// An input event delivered from the platform layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Lane-mapped key press
    KeyPress { lane: usize },
    /// Pointer tap in board coordinates
    PointerDown { point: Vec2 },
}

/// Result of resolving one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Index into the live tile list of the tile that was hit
    Hit(usize),
    /// Wrong tile: ends the run
    Miss,
    /// The event carried no game meaning; no penalty
    Ignored,
}

/// Resolve an input event against the live tile list without mutating state.
///
/// Key presses target the lowest-order hittable tile in the lane that is
/// visible on the board; a press into an empty lane is not penalized.
/// Pointer taps target any hittable tile whose bounds, expanded vertically by
/// the speed-scaled tolerance margin, contain the point; among overlapping
/// candidates the one closest to the bottom wins, ties by lowest order.
pub fn resolve(state: &GameState, event: &InputEvent) -> Outcome {
    if state.phase != GamePhase::Running {
        return Outcome::Ignored;
    }

    let candidate = match event {
        InputEvent::KeyPress { lane } => {
            if *lane >= LANE_COUNT {
                return Outcome::Ignored;
            }
            state
                .tiles
                .iter()
                .position(|t| t.hittable() && t.lane == *lane && t.on_board())
        }
        InputEvent::PointerDown { point } => {
            let hit_zone = HIT_ZONE_PER_SPEED * state.speed;
            state
                .tiles
                .iter()
                .enumerate()
                .filter(|(_, t)| t.hittable() && t.contains(*point, hit_zone))
                .max_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then(b.order.cmp(&a.order)))
                .map(|(i, _)| i)
        }
    };

    match candidate {
        None => Outcome::Ignored,
        Some(i) if state.tiles[i].order == state.expected_order() => Outcome::Hit(i),
        Some(_) => Outcome::Miss,
    }
}

/// Resolve and apply an input event: advance the score and speed ramp on a
/// hit, end the run on a miss.
pub fn apply_input(state: &mut GameState, event: &InputEvent) -> Outcome {
    let outcome = resolve(state, event);
    match outcome {
        Outcome::Hit(i) => {
            let tile = &mut state.tiles[i];
            tile.state = TileState::Hit;
            tile.fade = 0.0;
            let tone = tile.tone;
            state.score += 1;
            state.speed += SPEED_STEP;
            state.push_event(GameEvent::Note { tone });
        }
        Outcome::Miss => state.enter_game_over(),
        Outcome::Ignored => {}
    }
    outcome
}
