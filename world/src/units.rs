//! Stationary unit bookkeeping for a single turn snapshot.

use std::collections::BTreeMap;

use bastion_core::{Coordinate, Player, StructureSnapshot, StructureView, UnitKind};

/// Stationary unit stored inside the snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StationaryUnit {
    /// Owner of the unit.
    pub(crate) owner: Player,
    /// Kind of structure.
    pub(crate) kind: UnitKind,
    /// Remaining health.
    pub(crate) health: f64,
    /// Whether the unit has been upgraded.
    pub(crate) upgraded: bool,
}

/// Registry holding at most one stationary unit per cell.
#[derive(Clone, Debug, Default)]
pub(crate) struct UnitRegistry {
    entries: BTreeMap<Coordinate, StationaryUnit>,
}

impl UnitRegistry {
    /// Stores a unit, refusing cells that are already occupied.
    pub(crate) fn insert(&mut self, at: Coordinate, unit: StationaryUnit) -> bool {
        if self.entries.contains_key(&at) {
            return false;
        }
        let _ = self.entries.insert(at, unit);
        true
    }

    /// Unit occupying the cell, if any.
    pub(crate) fn get(&self, at: Coordinate) -> Option<&StationaryUnit> {
        self.entries.get(&at)
    }

    /// Mutable access to the unit occupying the cell.
    pub(crate) fn get_mut(&mut self, at: Coordinate) -> Option<&mut StationaryUnit> {
        self.entries.get_mut(&at)
    }

    /// Whether any unit occupies the cell.
    pub(crate) fn contains(&self, at: Coordinate) -> bool {
        self.entries.contains_key(&at)
    }

    /// Iterator over occupied cells in coordinate order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Coordinate, &StationaryUnit)> {
        self.entries.iter().map(|(at, unit)| (*at, unit))
    }

    /// Captures a read-only view of every stored unit.
    pub(crate) fn view(&self) -> StructureView {
        StructureView::from_snapshots(self.iter().map(|(at, unit)| snapshot(at, unit)).collect())
    }
}

/// Converts a stored unit into its public snapshot form.
pub(crate) fn snapshot(at: Coordinate, unit: &StationaryUnit) -> StructureSnapshot {
    StructureSnapshot {
        owner: unit.owner,
        kind: unit.kind,
        at,
        health: unit.health,
        upgraded: unit.upgraded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(owner: Player) -> StationaryUnit {
        StationaryUnit {
            owner,
            kind: UnitKind::Wall,
            health: 60.0,
            upgraded: false,
        }
    }

    #[test]
    fn registry_starts_empty() {
        let registry = UnitRegistry::default();
        assert!(registry.view().is_empty());
        assert!(!registry.contains(Coordinate::new(3, 13)));
    }

    #[test]
    fn insert_refuses_occupied_cells() {
        let mut registry = UnitRegistry::default();
        let at = Coordinate::new(3, 13);

        assert!(registry.insert(at, wall(Player::Friendly)));
        assert!(!registry.insert(at, wall(Player::Enemy)));
        assert_eq!(registry.get(at).map(|unit| unit.owner), Some(Player::Friendly));
    }

    #[test]
    fn snapshot_preserves_unit_fields() {
        let at = Coordinate::new(5, 14);
        let unit = StationaryUnit {
            owner: Player::Enemy,
            kind: UnitKind::Turret,
            health: 12.5,
            upgraded: true,
        };
        let captured = snapshot(at, &unit);

        assert_eq!(captured.at, at);
        assert_eq!(captured.kind, UnitKind::Turret);
        assert_eq!(captured.owner, Player::Enemy);
        assert!(captured.upgraded);
    }
}
