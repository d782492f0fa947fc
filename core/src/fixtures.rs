//! Reference configuration shared by tests across the workspace.

use crate::GameConfig;

/// Configuration document mirroring the engine's default unit table.
pub const GAME_CONFIG_JSON: &str = include_str!("../fixtures/game_config.json");

/// Parses [`GAME_CONFIG_JSON`].
///
/// # Panics
///
/// Panics when the bundled document no longer parses.
#[must_use]
pub fn game_config() -> GameConfig {
    GameConfig::from_json(GAME_CONFIG_JSON).expect("bundled configuration parses")
}
