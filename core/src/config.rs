//! Match configuration document supplied by the engine at game start.

use serde::Deserialize;
use thiserror::Error;

use crate::UnitKind;

const DEFAULT_STARTING_HEALTH: f64 = 30.0;
/// Position of the upgrade command entry in the unit table.
const UPGRADE_ENTRY: usize = 7;

/// Errors raised while loading the configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("could not parse configuration document: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The unit table ends before the entry for the given kind.
    #[error("configuration is missing the unit entry for {0:?}")]
    MissingUnit(UnitKind),
    /// A required field of a unit entry is absent.
    #[error("unit entry for {kind:?} is missing `{field}`")]
    MissingField {
        /// Kind whose entry is incomplete.
        kind: UnitKind,
        /// Name of the absent field.
        field: &'static str,
    },
    /// The upgrade command entry is absent or has no shorthand.
    #[error("configuration is missing the upgrade command shorthand (entry 7)")]
    MissingUpgradeShorthand,
    /// Two unit kinds share the same shorthand.
    #[error("shorthand `{0}` is used by more than one unit")]
    DuplicateShorthand(String),
}

/// Resource price of a placement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cost {
    /// Structural points charged.
    pub structural: f64,
    /// Mobility points charged.
    pub mobility: f64,
}

/// Stats a unit gains once upgraded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradeStats {
    /// Health of the upgraded unit.
    pub start_health: f64,
    /// Price of the upgrade.
    pub cost: Cost,
    /// Damage dealt per shot to mobile units once upgraded.
    pub damage_per_shot: f64,
    /// Attack radius once upgraded.
    pub attack_range: f64,
}

/// Static stats of one unit kind.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitStats {
    /// Token the engine uses for this kind in commands and snapshots.
    pub shorthand: String,
    /// Health of a freshly placed unit.
    pub start_health: f64,
    /// Price of placing one unit.
    pub cost: Cost,
    /// Damage dealt per shot to mobile units.
    pub damage_per_shot: f64,
    /// Attack radius in cells.
    pub attack_range: f64,
    /// Upgraded stats, when the kind can be upgraded.
    pub upgrade: Option<UpgradeStats>,
}

impl UnitStats {
    /// Damage per shot for a unit in the given upgrade state.
    #[must_use]
    pub fn damage(&self, upgraded: bool) -> f64 {
        match (&self.upgrade, upgraded) {
            (Some(upgrade), true) => upgrade.damage_per_shot,
            _ => self.damage_per_shot,
        }
    }

    /// Attack radius for a unit in the given upgrade state.
    #[must_use]
    pub fn range(&self, upgraded: bool) -> f64 {
        match (&self.upgrade, upgraded) {
            (Some(upgrade), true) => upgrade.attack_range,
            _ => self.attack_range,
        }
    }
}

/// Immutable configuration loaded once per match.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    units: Vec<UnitStats>,
    upgrade_shorthand: String,
    starting_health: f64,
}

impl GameConfig {
    /// Parses the engine's configuration document.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(document)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut units = Vec::with_capacity(UnitKind::ALL.len());
        for kind in UnitKind::ALL {
            let entry = raw
                .unit_information
                .get(kind.index())
                .ok_or(ConfigError::MissingUnit(kind))?;
            let stats = entry.to_stats(kind)?;
            if units
                .iter()
                .any(|existing: &UnitStats| existing.shorthand == stats.shorthand)
            {
                return Err(ConfigError::DuplicateShorthand(stats.shorthand));
            }
            units.push(stats);
        }

        let upgrade_shorthand = raw
            .unit_information
            .get(UPGRADE_ENTRY)
            .and_then(|entry| entry.shorthand.clone())
            .filter(|shorthand| !shorthand.is_empty())
            .ok_or(ConfigError::MissingUpgradeShorthand)?;
        if units.iter().any(|unit| unit.shorthand == upgrade_shorthand) {
            return Err(ConfigError::DuplicateShorthand(upgrade_shorthand));
        }

        let starting_health = raw
            .resources
            .and_then(|resources| resources.starting_hp)
            .unwrap_or(DEFAULT_STARTING_HEALTH);

        Ok(Self {
            units,
            upgrade_shorthand,
            starting_health,
        })
    }

    /// Stats of the requested unit kind.
    #[must_use]
    pub fn stats(&self, kind: UnitKind) -> &UnitStats {
        &self.units[kind.index()]
    }

    /// Token used for upgrade commands.
    #[must_use]
    pub fn upgrade_shorthand(&self) -> &str {
        &self.upgrade_shorthand
    }

    /// Health each player starts the match with.
    #[must_use]
    pub const fn starting_health(&self) -> f64 {
        self.starting_health
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    unit_information: Vec<RawUnit>,
    #[serde(default)]
    resources: Option<RawResources>,
}

#[derive(Debug, Deserialize)]
struct RawResources {
    #[serde(rename = "startingHP", default)]
    starting_hp: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUnit {
    shorthand: Option<String>,
    start_health: Option<f64>,
    cost1: Option<f64>,
    cost2: Option<f64>,
    attack_damage_walker: Option<f64>,
    attack_range: Option<f64>,
    upgrade: Option<RawUpgrade>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUpgrade {
    start_health: Option<f64>,
    cost1: Option<f64>,
    cost2: Option<f64>,
    attack_damage_walker: Option<f64>,
    attack_range: Option<f64>,
}

impl RawUnit {
    fn to_stats(&self, kind: UnitKind) -> Result<UnitStats, ConfigError> {
        let shorthand = self
            .shorthand
            .clone()
            .filter(|shorthand| !shorthand.is_empty())
            .ok_or(ConfigError::MissingField {
                kind,
                field: "shorthand",
            })?;
        let start_health = self.start_health.ok_or(ConfigError::MissingField {
            kind,
            field: "startHealth",
        })?;
        let cost = if kind.is_stationary() {
            Cost {
                structural: self.cost1.ok_or(ConfigError::MissingField {
                    kind,
                    field: "cost1",
                })?,
                mobility: self.cost2.unwrap_or(0.0),
            }
        } else {
            Cost {
                structural: self.cost1.unwrap_or(0.0),
                mobility: self.cost2.ok_or(ConfigError::MissingField {
                    kind,
                    field: "cost2",
                })?,
            }
        };
        let damage_per_shot = self.attack_damage_walker.unwrap_or(0.0);
        let attack_range = self.attack_range.unwrap_or(0.0);

        let upgrade = self.upgrade.as_ref().map(|upgrade| UpgradeStats {
            start_health: upgrade.start_health.unwrap_or(start_health),
            cost: Cost {
                structural: upgrade.cost1.unwrap_or(cost.structural),
                mobility: upgrade.cost2.unwrap_or(cost.mobility),
            },
            damage_per_shot: upgrade.attack_damage_walker.unwrap_or(damage_per_shot),
            attack_range: upgrade.attack_range.unwrap_or(attack_range),
        });

        Ok(UnitStats {
            shorthand,
            start_health,
            cost,
            damage_per_shot,
            attack_range,
            upgrade,
        })
    }
}
