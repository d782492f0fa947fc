#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! One-way health controller that drops spend thresholds once the next hit
//! could be fatal.

use serde::{Deserialize, Serialize};

/// Whether the controller is still gating spends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandState {
    /// Spends wait for their configured thresholds.
    #[default]
    Normal,
    /// Every positive resource amount is spent. Terminal for the match.
    LastStand,
}

/// Resource amounts that must be exceeded before a spend is attempted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Structural resource gate for the support step.
    pub structural: f64,
    /// Mobility resource gate for mobile-unit dispatch.
    pub mobility: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            structural: 4.0,
            mobility: 10.0,
        }
    }
}

impl Thresholds {
    /// Thresholds that let any positive amount through.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            structural: 0.0,
            mobility: 0.0,
        }
    }

    /// Thresholds in force for the given controller state.
    #[must_use]
    pub const fn effective(self, state: StandState) -> Self {
        match state {
            StandState::Normal => self,
            StandState::LastStand => Self::zeroed(),
        }
    }
}

/// Tracks the largest single-turn health loss and flips to [`StandState::LastStand`]
/// once current health no longer covers it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LastStand {
    previous_health: f64,
    peak_drop: f64,
    state: StandState,
}

impl LastStand {
    /// Creates a controller seeded with the match's starting health.
    #[must_use]
    pub const fn new(starting_health: f64) -> Self {
        Self {
            previous_health: starting_health,
            peak_drop: 0.0,
            state: StandState::Normal,
        }
    }

    /// Feeds this turn's health and returns the resulting state.
    pub fn observe(&mut self, current_health: f64) -> StandState {
        let drop = (self.previous_health - current_health).max(0.0);
        self.peak_drop = self.peak_drop.max(drop);
        self.previous_health = current_health;

        if self.state == StandState::Normal && current_health <= self.peak_drop {
            self.state = StandState::LastStand;
            tracing::info!(
                health = current_health,
                peak_drop = self.peak_drop,
                "entering last stand"
            );
        }
        self.state
    }

    /// Current state without observing a new turn.
    #[must_use]
    pub const fn state(&self) -> StandState {
        self.state
    }

    /// Largest single-turn health loss seen so far.
    #[must_use]
    pub const fn peak_drop(&self) -> f64 {
        self.peak_drop
    }

    /// Health recorded by the latest observation.
    #[must_use]
    pub const fn previous_health(&self) -> f64 {
        self.previous_health
    }
}
