#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that spends the mobility pool on a heavy/light unit mix.

use bastion_core::{Arena, Command, Coordinate, ResourcePool, UnitKind};
use bastion_system_path_risk::LaneCandidate;
use serde::{Deserialize, Serialize};

/// Unit kind that soaks damage ahead of the light units.
pub const HEAVY_UNIT: UnitKind = UnitKind::Demolisher;
/// Unit kind launched in bulk once a lane is judged survivable.
pub const LIGHT_UNIT: UnitKind = UnitKind::Scout;

/// Fixed launch used to seed map information before any risk data exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patrol {
    /// Kind of unit launched.
    pub kind: UnitKind,
    /// Launch cell.
    pub at: Coordinate,
}

/// Units launched by one dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Heavy units launched.
    pub heavy: u32,
    /// Light units launched.
    pub light: u32,
}

/// Mobile-unit dispatch system.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dispatcher;

impl Dispatcher {
    /// Creates a new dispatcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Launches a heavy/light mix down `lane`, reporting accepted spawns in `out`.
    ///
    /// The light units' combined health is the mobility pool times a light
    /// unit's start health. When the lane's risk exceeds it, enough heavy
    /// units to cover the shortfall (rounded down) go first. Light units
    /// follow with whatever mobility remains, provided the lane was cheaper
    /// than their combined health to begin with or the remaining light units
    /// still outlast the part of the shortfall the heavy units left uncovered.
    pub fn dispatch<A>(&self, arena: &mut A, lane: &LaneCandidate, out: &mut Vec<Command>) -> DispatchReport
    where
        A: Arena,
    {
        let light_health = arena.config().stats(LIGHT_UNIT).start_health;
        let heavy_health = arena.config().stats(HEAVY_UNIT).start_health;
        let light_budget = arena.resource(ResourcePool::Mobility) * light_health;
        let mut report = DispatchReport::default();

        if lane.risk > light_budget && heavy_health > 0.0 {
            let wanted = ((lane.risk - light_budget) / heavy_health).floor() as u32;
            if wanted > 0 {
                report.heavy = spawn(arena, HEAVY_UNIT, lane.at, wanted, out);
            }
        }

        let remaining = arena.resource(ResourcePool::Mobility);
        let uncovered = (lane.risk - light_budget - f64::from(report.heavy) * heavy_health).max(0.0);
        let survivable = lane.risk < light_budget || (report.heavy > 0 && remaining * light_health > uncovered);
        if survivable {
            report.light = spawn(arena, LIGHT_UNIT, lane.at, remaining.floor() as u32, out);
        }

        tracing::debug!(
            at = ?lane.at,
            risk = lane.risk,
            light_budget,
            heavy = report.heavy,
            light = report.light,
            "dispatched mobile units"
        );
        report
    }

    /// Launches one unit at each patrol cell, returning how many were placed.
    pub fn opening<A>(&self, arena: &mut A, patrols: &[Patrol], out: &mut Vec<Command>) -> u32
    where
        A: Arena,
    {
        patrols
            .iter()
            .map(|patrol| spawn(arena, patrol.kind, patrol.at, 1, out))
            .sum()
    }
}

fn spawn<A>(arena: &mut A, kind: UnitKind, at: Coordinate, count: u32, out: &mut Vec<Command>) -> u32
where
    A: Arena,
{
    if count == 0 {
        return 0;
    }
    let placed = arena.attempt_spawn(kind, at, count);
    if placed > 0 {
        out.push(Command::Spawn {
            kind,
            at,
            count: placed,
        });
    }
    placed
}
