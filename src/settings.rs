//! Difficulty table and selection persistence
//!
//! The selected difficulty is persisted separately from the score ledger in
//! LocalStorage.

use serde::{Deserialize, Serialize};

/// Difficulty levels, each fixing the base fall speed for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Beginner,
    #[default]
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    /// All difficulties, in menu order
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Beginner,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "extreme" => Some(Difficulty::Extreme),
            _ => None,
        }
    }

    /// Label shown in the difficulty selector
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
        }
    }

    /// Base fall speed in pixels per tick
    pub fn base_speed(&self) -> f32 {
        match self {
            Difficulty::Beginner => 2.0,
            Difficulty::Easy => 4.0,
            Difficulty::Medium => 6.0,
            Difficulty::Hard => 8.0,
            Difficulty::Extreme => 16.0,
        }
    }
}

/// LocalStorage key for the last selected difficulty
#[allow(dead_code)]
const STORAGE_KEY: &str = "neon_tiles_difficulty";

/// Load the last selected difficulty (WASM only); missing or unknown values
/// fall back to the default.
#[cfg(target_arch = "wasm32")]
pub fn load_difficulty() -> Difficulty {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        if let Ok(Some(name)) = storage.get_item(STORAGE_KEY) {
            if let Some(difficulty) = Difficulty::from_str(&name) {
                log::info!("Loaded difficulty: {}", difficulty.as_str());
                return difficulty;
            }
        }
    }

    log::info!("Using default difficulty");
    Difficulty::default()
}

/// Persist the selected difficulty (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn save_difficulty(difficulty: Difficulty) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        let _ = storage.set_item(STORAGE_KEY, difficulty.as_str());
        log::info!("Difficulty saved: {}", difficulty.as_str());
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load_difficulty() -> Difficulty {
    Difficulty::default()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_difficulty(_difficulty: Difficulty) {
    // No-op for native
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_round_trip() {
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(difficulty.as_str()), Some(difficulty));
        }
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
    }

    #[test]
    fn test_from_str_unknown() {
        assert_eq!(Difficulty::from_str("nightmare"), None);
        assert_eq!(Difficulty::from_str(""), None);
    }

    #[test]
    fn test_base_speed_increases_with_difficulty() {
        for pair in Difficulty::ALL.windows(2) {
            assert!(pair[0].base_speed() < pair[1].base_speed());
        }
    }
}
