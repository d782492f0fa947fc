#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that measures how heavily the opponent guards a board region.

use std::collections::BTreeSet;

use bastion_core::{Arena, Player, StructureSnapshot, UnitKind};

/// Selects enemy structures by kind, column and row.
///
/// Every criterion left unset matches all structures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitFilter {
    kind: Option<UnitKind>,
    columns: Option<BTreeSet<i32>>,
    rows: Option<BTreeSet<i32>>,
}

impl UnitFilter {
    /// Filter matching every enemy structure.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts matches to one unit kind.
    #[must_use]
    pub fn kind(mut self, kind: UnitKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts matches to the listed columns.
    #[must_use]
    pub fn columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        self.columns = Some(columns.into_iter().collect());
        self
    }

    /// Restricts matches to the listed rows.
    #[must_use]
    pub fn rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        self.rows = Some(rows.into_iter().collect());
        self
    }

    /// Whether a structure satisfies every configured criterion.
    #[must_use]
    pub fn matches(&self, snapshot: &StructureSnapshot) -> bool {
        self.kind.map_or(true, |kind| kind == snapshot.kind)
            && self
                .columns
                .as_ref()
                .map_or(true, |columns| columns.contains(&snapshot.at.x()))
            && self
                .rows
                .as_ref()
                .map_or(true, |rows| rows.contains(&snapshot.at.y()))
    }
}

/// Counts enemy stationary units matching the filter.
#[must_use]
pub fn count_enemy_units<A>(arena: &A, filter: &UnitFilter) -> u32
where
    A: Arena,
{
    let count = arena
        .structure_view()
        .iter()
        .filter(|snapshot| snapshot.owner == Player::Enemy)
        .filter(|snapshot| filter.matches(snapshot))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Threshold test deciding whether a region counts as heavily guarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardCheck {
    filter: UnitFilter,
    threshold: u32,
}

/// Result of a [`GuardCheck`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Posture {
    /// Matching enemy structures.
    pub count: u32,
    /// Whether `count` exceeded the threshold.
    pub heavily_guarded: bool,
}

impl GuardCheck {
    /// Creates a check that trips when more than `threshold` structures match.
    #[must_use]
    pub fn new(filter: UnitFilter, threshold: u32) -> Self {
        Self { filter, threshold }
    }

    /// Scans the board once.
    #[must_use]
    pub fn assess<A>(&self, arena: &A) -> Posture
    where
        A: Arena,
    {
        let count = count_enemy_units(arena, &self.filter);
        Posture {
            count,
            heavily_guarded: count > self.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::{fixtures, Coordinate};
    use bastion_world::GameState;

    fn entrance_band() -> UnitFilter {
        UnitFilter::any().rows([14, 15])
    }

    #[test]
    fn counts_only_enemy_units_in_the_band() {
        let config = fixtures::game_config();
        let mut state = GameState::new(&config, 3, 30.0, 0.0, 0.0);
        let _ = state.place_structure(Player::Enemy, UnitKind::Wall, Coordinate::new(5, 14), false);
        let _ = state.place_structure(Player::Enemy, UnitKind::Turret, Coordinate::new(6, 15), false);
        let _ = state.place_structure(Player::Enemy, UnitKind::Turret, Coordinate::new(6, 16), false);
        let _ = state.place_structure(Player::Friendly, UnitKind::Wall, Coordinate::new(5, 13), false);

        assert_eq!(count_enemy_units(&state, &entrance_band()), 2);
        assert_eq!(count_enemy_units(&state, &UnitFilter::any()), 3);
        assert_eq!(
            count_enemy_units(&state, &entrance_band().kind(UnitKind::Turret)),
            1
        );
        assert_eq!(
            count_enemy_units(&state, &UnitFilter::any().columns([6])),
            2
        );
    }

    #[test]
    fn eleven_units_on_the_entrance_rows_trip_the_check() {
        let config = fixtures::game_config();
        let mut state = GameState::new(&config, 3, 30.0, 0.0, 0.0);
        for x in 4..15 {
            assert!(state.place_structure(Player::Enemy, UnitKind::Wall, Coordinate::new(x, 14), false));
        }

        let posture = GuardCheck::new(entrance_band(), 10).assess(&state);

        assert_eq!(posture.count, 11);
        assert!(posture.heavily_guarded);
    }

    #[test]
    fn reaching_the_threshold_exactly_is_not_heavy() {
        let config = fixtures::game_config();
        let mut state = GameState::new(&config, 3, 30.0, 0.0, 0.0);
        for x in 4..14 {
            let _ = state.place_structure(Player::Enemy, UnitKind::Wall, Coordinate::new(x, 15), false);
        }

        let posture = GuardCheck::new(entrance_band(), 10).assess(&state);

        assert_eq!(posture.count, 10);
        assert!(!posture.heavily_guarded);
    }
}
