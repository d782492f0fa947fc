#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that scores launch lanes by the damage expected along their path.

use bastion_core::{Arena, Coordinate, Player};
use thiserror::Error;

/// Reasons lane selection cannot produce a lane.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LaneError {
    /// Every candidate was blocked, or none was supplied.
    #[error("no viable lane among {candidates} candidate(s)")]
    NoViableLane {
        /// Number of candidates supplied before filtering.
        candidates: usize,
    },
}

/// Launch coordinate together with its expected incoming damage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneCandidate {
    /// Cell mobile units are launched from.
    pub at: Coordinate,
    /// Sum of per-shot damage from every attacker in range of every path cell.
    pub risk: f64,
}

/// Expected damage a friendly mobile unit takes walking from `start` to its far edge.
///
/// Each cell of the path contributes the per-shot damage of every enemy
/// structure able to hit it in the current snapshot.
#[must_use]
pub fn path_risk<A>(arena: &A, start: Coordinate) -> f64
where
    A: Arena,
{
    let config = arena.config();
    arena
        .find_path_to_edge(start)
        .into_iter()
        .flat_map(|cell| arena.attackers_in_range(cell, Player::Friendly))
        .map(|attacker| config.stats(attacker.kind).damage(attacker.upgraded))
        .sum()
}

/// Picks the candidate whose path carries the least expected damage.
///
/// Candidates occupied by a stationary unit are never scored. Ties keep the
/// earliest candidate in input order.
pub fn select_lane<A>(arena: &A, candidates: &[Coordinate]) -> Result<LaneCandidate, LaneError>
where
    A: Arena,
{
    let mut best: Option<LaneCandidate> = None;

    for &at in candidates {
        if arena.contains_stationary_unit(at) {
            continue;
        }

        let current = LaneCandidate {
            at,
            risk: path_risk(arena, at),
        };

        match &mut best {
            Some(existing) => {
                if current.risk < existing.risk {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }

    let lane = best.ok_or(LaneError::NoViableLane {
        candidates: candidates.len(),
    })?;
    tracing::debug!(at = ?lane.at, risk = lane.risk, "selected lane");
    Ok(lane)
}
