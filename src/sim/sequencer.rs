//! Lane sequencing and tile queue top-up
//!
//! Consecutive tiles never share a lane: same-lane adjacency would make
//! near-simultaneous taps ambiguous.

use rand::Rng;

use super::state::{GameState, Tile};
use crate::consts::*;

/// Pick the lane for the next tile, uniform over all lanes except `prev`.
pub fn next_lane<R: Rng>(rng: &mut R, prev: Option<usize>) -> usize {
    match prev {
        None => rng.random_range(0..LANE_COUNT),
        Some(prev) => {
            // Draw from the other lanes directly rather than rejection-sampling
            let lane = rng.random_range(0..LANE_COUNT - 1);
            if lane >= prev { lane + 1 } else { lane }
        }
    }
}

/// Keep exactly one tile pending entry above the board.
///
/// Spawns when the live list is empty or the most recently queued tile has
/// fully entered the board, so the queue scales with any fall speed.
pub fn top_up(state: &mut GameState) {
    let needs_tile = match state.tiles.last() {
        None => true,
        Some(last) => last.y > 0.0,
    };
    if !needs_tile {
        return;
    }

    let lane = next_lane(&mut state.rng, state.last_lane);
    let order = state.take_order();
    state.tiles.push(Tile::new(lane, order));
    state.last_lane = Some(lane);
}
