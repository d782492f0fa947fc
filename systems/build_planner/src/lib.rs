#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure build-plan system that replays idempotent structure steps against the
//! structural resource pool.

use bastion_core::{Arena, BuildStep, Command, ResourcePool};

/// Tally of what one plan application achieved.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlanOutcome {
    /// Structures newly placed.
    pub placed: u32,
    /// Structures newly upgraded.
    pub upgraded: u32,
    /// Structural resource left after the plan.
    pub remaining: f64,
}

impl PlanOutcome {
    fn absorb(&mut self, other: PlanOutcome) {
        self.placed += other.placed;
        self.upgraded += other.upgraded;
        self.remaining = other.remaining;
    }
}

/// Build-plan system that turns ordered steps into accepted placement commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildPlanner;

impl BuildPlanner {
    /// Creates a new build planner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies every step in order and reports the accepted commands in `out`.
    ///
    /// Each step issues its spawn, then its upgrade when requested and the
    /// kind can be upgraded, regardless of whether the spawn succeeded.
    /// Mirrored steps expand into one independent sub-step per side.
    /// Placements that are unaffordable or blocked are skipped and the plan
    /// carries on with the next step.
    pub fn apply<A>(&self, arena: &mut A, steps: &[BuildStep], out: &mut Vec<Command>) -> PlanOutcome
    where
        A: Arena,
    {
        let mut outcome = PlanOutcome {
            remaining: arena.resource(ResourcePool::Structural),
            ..PlanOutcome::default()
        };
        for step in steps {
            outcome.absorb(self.apply_step(arena, step, out));
        }
        outcome
    }

    /// Applies a single step, expanding mirrored placements.
    pub fn apply_step<A>(&self, arena: &mut A, step: &BuildStep, out: &mut Vec<Command>) -> PlanOutcome
    where
        A: Arena,
    {
        let kind = step.spec.kind;
        let upgradable = step.upgrade && arena.config().stats(kind).upgrade.is_some();
        let mut outcome = PlanOutcome::default();

        for at in step.spec.expand() {
            let placed = arena.attempt_spawn(kind, at, 1);
            if placed > 0 {
                outcome.placed += placed;
                out.push(Command::Spawn {
                    kind,
                    at,
                    count: placed,
                });
            } else {
                tracing::trace!(?kind, ?at, "spawn skipped");
            }

            if upgradable {
                if arena.attempt_upgrade(at) {
                    outcome.upgraded += 1;
                    out.push(Command::Upgrade { at });
                } else {
                    tracing::trace!(?kind, ?at, "upgrade skipped");
                }
            }
        }

        outcome.remaining = arena.resource(ResourcePool::Structural);
        outcome
    }
}

/// Structural resource reading taken before a sequence of steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Checkpoint {
    structural: f64,
}

impl Checkpoint {
    /// Reads the structural pool ahead of the bracketed sequence.
    #[must_use]
    pub fn open<A>(arena: &A) -> Self
    where
        A: Arena,
    {
        Self {
            structural: arena.resource(ResourcePool::Structural),
        }
    }

    /// Structural resource consumed since the checkpoint was opened.
    #[must_use]
    pub fn spent<A>(&self, arena: &A) -> f64
    where
        A: Arena,
    {
        (self.structural - arena.resource(ResourcePool::Structural)).max(0.0)
    }
}

/// Counter of unlocked slots that grows by one per qualifying turn, up to a cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotCounter {
    current: u32,
    limit: u32,
}

impl SlotCounter {
    /// Creates a counter starting at `initial`, never exceeding `limit`.
    #[must_use]
    pub const fn new(initial: u32, limit: u32) -> Self {
        let current = if initial < limit { initial } else { limit };
        Self { current, limit }
    }

    /// Currently unlocked slots.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Unlocks one more slot when `spent` is positive, returning whether it grew.
    pub fn unlock_if_spent(&mut self, spent: f64) -> bool {
        if spent <= 0.0 || self.current >= self.limit {
            return false;
        }
        self.current += 1;
        true
    }
}
