//! Per-match bookkeeping owned by the turn driver.

use bastion_core::{Arena, BoardSide, Coordinate};
use bastion_system_build_planner::SlotCounter;
use bastion_system_last_stand::LastStand;

/// Frozen split between the walled-off side and the side kept open for the
/// turret line and support row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideChoice {
    /// Side that only receives the static wall line.
    pub blocked: BoardSide,
    /// Side that receives the escalating turret line and supports.
    pub open: BoardSide,
}

impl SideChoice {
    /// Choice with the given open side and the other side blocked.
    #[must_use]
    pub const fn opening(open: BoardSide) -> Self {
        Self {
            blocked: open.opposite(),
            open,
        }
    }
}

/// Decision point for which side to keep open, consulted once per match.
pub trait SidePolicy {
    /// Picks the sides from the first turn's snapshot.
    fn choose<A>(&self, arena: &A) -> SideChoice
    where
        A: Arena;
}

/// Policy that always returns the same choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedSides {
    open: BoardSide,
}

impl FixedSides {
    /// Keeps `open` open and blocks the other side.
    #[must_use]
    pub const fn new(open: BoardSide) -> Self {
        Self { open }
    }
}

impl SidePolicy for FixedSides {
    fn choose<A>(&self, _arena: &A) -> SideChoice
    where
        A: Arena,
    {
        SideChoice::opening(self.open)
    }
}

/// Everything the driver carries from one turn to the next.
#[derive(Clone, Debug)]
pub struct MatchState {
    turn_number: u32,
    last_stand: LastStand,
    support_count: u32,
    turret_slots: SlotCounter,
    sides: Option<SideChoice>,
    breaches: Vec<Coordinate>,
}

impl MatchState {
    /// Fresh state for a match starting at `starting_health`.
    #[must_use]
    pub fn new(starting_health: f64, turret_slots: SlotCounter) -> Self {
        Self {
            turn_number: 0,
            last_stand: LastStand::new(starting_health),
            support_count: 0,
            turret_slots,
            sides: None,
            breaches: Vec::new(),
        }
    }

    /// Turn most recently driven.
    #[must_use]
    pub const fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Health-loss controller.
    #[must_use]
    pub const fn last_stand(&self) -> &LastStand {
        &self.last_stand
    }

    /// Support steps attempted so far.
    #[must_use]
    pub const fn support_count(&self) -> u32 {
        self.support_count
    }

    /// Turret slots currently unlocked.
    #[must_use]
    pub const fn turret_slots(&self) -> SlotCounter {
        self.turret_slots
    }

    /// Side choice, once made.
    #[must_use]
    pub const fn sides(&self) -> Option<SideChoice> {
        self.sides
    }

    /// Cells where enemy units scored against us, oldest first.
    #[must_use]
    pub fn breaches(&self) -> &[Coordinate] {
        &self.breaches
    }

    pub(crate) fn begin_turn(&mut self, turn_number: u32) {
        self.turn_number = turn_number;
    }

    pub(crate) fn last_stand_mut(&mut self) -> &mut LastStand {
        &mut self.last_stand
    }

    pub(crate) fn turret_slots_mut(&mut self) -> &mut SlotCounter {
        &mut self.turret_slots
    }

    /// Returns the frozen choice, making it with `decide` if none exists yet.
    pub(crate) fn sides_or_choose(&mut self, decide: impl FnOnce() -> SideChoice) -> SideChoice {
        *self.sides.get_or_insert_with(decide)
    }

    /// Claims the next support position index.
    pub(crate) fn next_support(&mut self) -> u32 {
        let index = self.support_count;
        self.support_count += 1;
        index
    }

    pub(crate) fn record_breach(&mut self, at: Coordinate) {
        self.breaches.push(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_choice_is_frozen_after_the_first_decision() {
        let mut state = MatchState::new(30.0, SlotCounter::new(2, 5));

        let first = state.sides_or_choose(|| SideChoice::opening(BoardSide::Right));
        let second = state.sides_or_choose(|| SideChoice::opening(BoardSide::Left));

        assert_eq!(first, second);
        assert_eq!(first.blocked, BoardSide::Left);
        assert_eq!(state.sides(), Some(first));
    }

    #[test]
    fn support_indices_only_grow() {
        let mut state = MatchState::new(30.0, SlotCounter::new(2, 5));
        assert_eq!(state.next_support(), 0);
        assert_eq!(state.next_support(), 1);
        assert_eq!(state.support_count(), 2);
    }
}
