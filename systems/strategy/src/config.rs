//! Tuning knobs for the turn driver, loadable from TOML.

use bastion_core::{BoardSide, Coordinate, UnitKind};
use bastion_system_dispatcher::Patrol;
use bastion_system_last_stand::Thresholds;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading strategy tuning.
#[derive(Debug, Error)]
pub enum StrategyConfigError {
    /// The document is not valid TOML or has the wrong shape.
    #[error("could not parse strategy configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is syntactically fine but unusable.
    #[error("invalid strategy configuration: {0}")]
    Invalid(&'static str),
}

/// Rule that launches an extra heavy unit when the entrance is crowded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Rows scanned for enemy structures.
    pub rows: Vec<i32>,
    /// Count that must be exceeded to escalate.
    pub threshold: u32,
    /// Unit launched, in the right-half frame; placed on the blocked side.
    pub launch: Patrol,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            rows: vec![14, 15],
            threshold: 10,
            launch: Patrol {
                kind: UnitKind::Demolisher,
                at: Coordinate::new(24, 10),
            },
        }
    }
}

/// Strategy constants. Sided coordinates are written in the right-half frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Walls in the blocked-side wall line along the top friendly row.
    pub wall_length: u32,
    /// Innermost wall-line walls upgraded every turn.
    pub wall_upgrade_count: u32,
    /// First turret of the diagonal turret line.
    pub turret_origin: Coordinate,
    /// Turret slots unlocked at match start.
    pub turret_slots: u32,
    /// Upper bound on unlocked turret slots.
    pub turret_slot_limit: u32,
    /// Upgraded wall capping the turret line.
    pub cap_wall: Coordinate,
    /// First wall of the diagonal edge wall.
    pub edge_wall_origin: Coordinate,
    /// Edge walls placed beyond one per unlocked turret slot.
    pub edge_wall_padding: u32,
    /// First cell of the support row.
    pub support_origin: Coordinate,
    /// Support positions cycled through, one per turn.
    pub support_row_length: u32,
    /// Resource gates outside of the last stand.
    pub thresholds: Thresholds,
    /// Crowded-entrance escalation.
    pub escalation: EscalationConfig,
    /// Turn-zero launches.
    pub patrols: Vec<Patrol>,
    /// Side that keeps the turret line and support row.
    pub open_side: BoardSide,
    /// Launch cells scored by lane selection; every friendly edge cell when unset.
    pub lane_candidates: Option<Vec<Coordinate>>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            wall_length: 20,
            wall_upgrade_count: 3,
            turret_origin: Coordinate::new(23, 12),
            turret_slots: 2,
            turret_slot_limit: 5,
            cap_wall: Coordinate::new(23, 13),
            edge_wall_origin: Coordinate::new(27, 13),
            edge_wall_padding: 3,
            support_origin: Coordinate::new(16, 12),
            support_row_length: 5,
            thresholds: Thresholds::default(),
            escalation: EscalationConfig::default(),
            patrols: vec![
                Patrol {
                    kind: UnitKind::Demolisher,
                    at: Coordinate::new(7, 6),
                },
                Patrol {
                    kind: UnitKind::Interceptor,
                    at: Coordinate::new(20, 6),
                },
            ],
            open_side: BoardSide::Right,
            lane_candidates: None,
        }
    }
}

impl StrategyConfig {
    /// Parses a TOML document; omitted keys keep their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, StrategyConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), StrategyConfigError> {
        if self.support_row_length == 0 {
            return Err(StrategyConfigError::Invalid(
                "support_row_length must be at least 1",
            ));
        }
        if self.turret_slot_limit == 0 {
            return Err(StrategyConfigError::Invalid(
                "turret_slot_limit must be at least 1",
            ));
        }
        if self
            .lane_candidates
            .as_ref()
            .is_some_and(|candidates| candidates.is_empty())
        {
            return Err(StrategyConfigError::Invalid(
                "lane_candidates must not be empty when given",
            ));
        }
        Ok(())
    }
}
