#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn snapshot for the Bastion decision engine.
//!
//! A [`GameState`] is built from one engine frame and answers every query the
//! decision systems make through [`Arena`]. It also acts as the turn's spend
//! ledger: accepted placements deduct resources and occupy cells, so later
//! attempts in the same turn observe earlier ones.

mod frame;
mod navigation;
mod submission;
mod units;

use bastion_core::{
    Arena, Coordinate, Cost, Edge, GameConfig, Player, ResourcePool, StructureSnapshot,
    StructureView, UnitKind,
};
use thiserror::Error;

pub use frame::{Breach, BreachReport, Frame, FrameKind};
pub use submission::TurnSubmission;

use frame::RawUnit;
use units::{StationaryUnit, UnitRegistry};

/// Index of the upgrade markers inside a player's unit table.
const UPGRADE_TABLE: usize = 7;

/// Errors raised while decoding an engine frame.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The frame is not valid JSON or does not have the expected shape.
    #[error("could not parse frame: {0}")]
    Malformed(#[from] serde_json::Error),
    /// `turnInfo` is absent or too short.
    #[error("frame is missing turn information")]
    MissingTurnInfo,
    /// `turnInfo[0]` names a phase the engine does not define.
    #[error("frame declares unknown phase {0}")]
    UnknownPhase(i64),
    /// `turnInfo[1]` is not a valid turn number.
    #[error("frame declares invalid turn number {0}")]
    InvalidTurn(i64),
    /// `p1Stats` does not carry health and both resource pools.
    #[error("frame is missing player statistics")]
    MissingStats,
    /// A unit is listed outside the arena.
    #[error("unit listed outside the arena at {0:?}")]
    OutOfArena(Coordinate),
}

/// Authoritative view of the board for one turn.
#[derive(Clone, Debug)]
pub struct GameState<'config> {
    config: &'config GameConfig,
    turn_number: u32,
    health: f64,
    structural: f64,
    mobility: f64,
    units: UnitRegistry,
}

impl<'config> GameState<'config> {
    /// Creates an empty board with the provided friendly totals.
    #[must_use]
    pub fn new(
        config: &'config GameConfig,
        turn_number: u32,
        health: f64,
        structural: f64,
        mobility: f64,
    ) -> Self {
        Self {
            config,
            turn_number,
            health,
            structural: structural.max(0.0),
            mobility: mobility.max(0.0),
            units: UnitRegistry::default(),
        }
    }

    /// Decodes a turn-start line into a snapshot.
    pub fn from_turn_string(
        config: &'config GameConfig,
        line: &str,
    ) -> Result<Self, SnapshotError> {
        let frame = Frame::parse(line)?;
        Self::from_frame(config, &frame)
    }

    /// Builds a snapshot from an already decoded frame.
    pub fn from_frame(config: &'config GameConfig, frame: &Frame) -> Result<Self, SnapshotError> {
        let raw = frame.raw();
        let [health, structural, mobility] = match raw.p1_stats.as_slice() {
            [health, structural, mobility, ..] => [*health, *structural, *mobility],
            _ => return Err(SnapshotError::MissingStats),
        };

        let mut state = Self::new(config, frame.turn_number(), health, structural, mobility);
        state.load_units(Player::Friendly, &raw.p1_units)?;
        state.load_units(Player::Enemy, &raw.p2_units)?;

        tracing::debug!(
            turn = state.turn_number,
            health,
            structural,
            mobility,
            structures = state.units.view().len(),
            "decoded turn snapshot"
        );
        Ok(state)
    }

    fn load_units(&mut self, owner: Player, tables: &[Vec<RawUnit>]) -> Result<(), SnapshotError> {
        for kind in UnitKind::ALL.into_iter().filter(|kind| kind.is_stationary()) {
            let Some(table) = tables.get(kind.index()) else {
                continue;
            };
            for &(x, y, health, _) in table {
                let at = Coordinate::new(x, y);
                if !at.in_arena() {
                    return Err(SnapshotError::OutOfArena(at));
                }
                let _ = self.units.insert(
                    at,
                    StationaryUnit {
                        owner,
                        kind,
                        health,
                        upgraded: false,
                    },
                );
            }
        }

        if let Some(upgrades) = tables.get(UPGRADE_TABLE) {
            for &(x, y, _, _) in upgrades {
                if let Some(unit) = self.units.get_mut(Coordinate::new(x, y)) {
                    unit.upgraded = true;
                }
            }
        }
        Ok(())
    }

    /// Adds a structure without charging for it, for hypothetical boards.
    ///
    /// Returns `false` when the cell is outside the arena or already occupied.
    pub fn place_structure(
        &mut self,
        owner: Player,
        kind: UnitKind,
        at: Coordinate,
        upgraded: bool,
    ) -> bool {
        if !kind.is_stationary() || !at.in_arena() {
            return false;
        }
        let stats = self.config.stats(kind);
        let health = match (&stats.upgrade, upgraded) {
            (Some(upgrade), true) => upgrade.start_health,
            _ => stats.start_health,
        };
        self.units.insert(
            at,
            StationaryUnit {
                owner,
                kind,
                health,
                upgraded,
            },
        )
    }

    fn affordable(&self, cost: Cost) -> bool {
        self.structural >= cost.structural && self.mobility >= cost.mobility
    }

    fn charge(&mut self, cost: Cost) {
        self.structural = (self.structural - cost.structural).max(0.0);
        self.mobility = (self.mobility - cost.mobility).max(0.0);
    }

    fn can_place(&self, kind: UnitKind, at: Coordinate) -> bool {
        if !at.in_arena() || self.units.contains(at) {
            return false;
        }
        if kind.is_stationary() {
            at.on_friendly_half()
        } else {
            Edge::BottomLeft.contains(at) || Edge::BottomRight.contains(at)
        }
    }
}

impl Arena for GameState<'_> {
    fn config(&self) -> &GameConfig {
        self.config
    }

    fn turn_number(&self) -> u32 {
        self.turn_number
    }

    fn my_health(&self) -> f64 {
        self.health
    }

    fn resource(&self, pool: ResourcePool) -> f64 {
        match pool {
            ResourcePool::Structural => self.structural,
            ResourcePool::Mobility => self.mobility,
        }
    }

    fn contains_stationary_unit(&self, at: Coordinate) -> bool {
        self.units.contains(at)
    }

    fn structure_view(&self) -> StructureView {
        self.units.view()
    }

    fn find_path_to_edge(&self, start: Coordinate) -> Vec<Coordinate> {
        navigation::path_to_edge(start, |cell| !cell.in_arena() || self.units.contains(cell))
    }

    fn attackers_in_range(&self, at: Coordinate, target: Player) -> Vec<StructureSnapshot> {
        self.units
            .iter()
            .filter(|(_, unit)| unit.owner != target)
            .filter(|(origin, unit)| {
                let stats = self.config.stats(unit.kind);
                stats.damage(unit.upgraded) > 0.0
                    && origin.distance(at) <= stats.range(unit.upgraded)
            })
            .map(|(origin, unit)| units::snapshot(origin, unit))
            .collect()
    }

    fn attempt_spawn(&mut self, kind: UnitKind, at: Coordinate, count: u32) -> u32 {
        let cost = self.config.stats(kind).cost;
        let mut placed = 0;
        while placed < count && self.can_place(kind, at) && self.affordable(cost) {
            self.charge(cost);
            if kind.is_stationary() {
                let _ = self.units.insert(
                    at,
                    StationaryUnit {
                        owner: Player::Friendly,
                        kind,
                        health: self.config.stats(kind).start_health,
                        upgraded: false,
                    },
                );
            }
            placed += 1;
        }
        placed
    }

    fn attempt_upgrade(&mut self, at: Coordinate) -> bool {
        let Some(unit) = self.units.get(at).copied() else {
            return false;
        };
        if unit.owner != Player::Friendly || unit.upgraded {
            return false;
        }
        let Some(upgrade) = self.config.stats(unit.kind).upgrade else {
            return false;
        };
        if !self.affordable(upgrade.cost) {
            return false;
        }

        self.charge(upgrade.cost);
        if let Some(unit) = self.units.get_mut(at) {
            unit.upgraded = true;
            unit.health = upgrade.start_health;
        }
        true
    }
}
