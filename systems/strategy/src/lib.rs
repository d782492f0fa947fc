#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn driver for the Bastion decision engine.
//!
//! [`Strategy`] owns the per-match [`MatchState`] and runs the decision
//! systems once per turn against an [`Arena`]: the health controller first,
//! then the build plan, the posture scan and finally mobile-unit dispatch.
//! Every accepted placement is returned as a [`Command`] for the adapter to
//! commit.

mod config;
mod plan;
mod state;

use bastion_core::{friendly_edge_cells, Arena, Command, ResourcePool};
use bastion_system_build_planner::{BuildPlanner, Checkpoint, SlotCounter};
use bastion_system_dispatcher::{Dispatcher, Patrol};
use bastion_system_last_stand::Thresholds;
use bastion_system_path_risk::select_lane;
use bastion_system_posture::{GuardCheck, UnitFilter};
use bastion_world::BreachReport;

pub use config::{EscalationConfig, StrategyConfig, StrategyConfigError};
pub use state::{FixedSides, MatchState, SideChoice, SidePolicy};

/// Per-match decision engine.
#[derive(Clone, Debug)]
pub struct Strategy<P = FixedSides> {
    config: StrategyConfig,
    policy: P,
    state: MatchState,
    planner: BuildPlanner,
    dispatcher: Dispatcher,
}

impl Strategy<FixedSides> {
    /// Creates a driver that keeps the configured side open.
    #[must_use]
    pub fn new(config: StrategyConfig, starting_health: f64) -> Self {
        let policy = FixedSides::new(config.open_side);
        Self::with_policy(config, policy, starting_health)
    }
}

impl<P> Strategy<P>
where
    P: SidePolicy,
{
    /// Creates a driver that consults `policy` for the side choice.
    #[must_use]
    pub fn with_policy(config: StrategyConfig, policy: P, starting_health: f64) -> Self {
        let slots = SlotCounter::new(config.turret_slots, config.turret_slot_limit);
        Self {
            state: MatchState::new(starting_health, slots),
            config,
            policy,
            planner: BuildPlanner::new(),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Match bookkeeping carried between turns.
    #[must_use]
    pub const fn state(&self) -> &MatchState {
        &self.state
    }

    /// Tuning in force for this match.
    #[must_use]
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Runs one turn and returns every placement the arena accepted, in order.
    pub fn on_turn<A>(&mut self, arena: &mut A) -> Vec<Command>
    where
        A: Arena,
    {
        let turn = arena.turn_number();
        self.state.begin_turn(turn);
        let stand = self.state.last_stand_mut().observe(arena.my_health());
        let thresholds = self.config.thresholds.effective(stand);
        let mut commands = Vec::new();

        if turn == 0 {
            let launched = self
                .dispatcher
                .opening(arena, &self.config.patrols, &mut commands);
            tracing::debug!(turn, launched, "opening patrols launched");
            return commands;
        }

        let sides = self.choose_sides(arena);
        self.build(arena, sides, thresholds, &mut commands);
        self.escalate(arena, sides, &mut commands);
        self.dispatch(arena, thresholds, &mut commands);

        tracing::debug!(
            turn,
            ?stand,
            commands = commands.len(),
            structural = arena.resource(ResourcePool::Structural),
            mobility = arena.resource(ResourcePool::Mobility),
            "turn planned"
        );
        commands
    }

    /// Records where enemy units scored during an action frame.
    pub fn on_action_frame(&mut self, report: &BreachReport) {
        for breach in report.breaches() {
            self.state.record_breach(breach.at);
            tracing::info!(
                at = ?breach.at,
                damage = breach.damage,
                total = self.state.breaches().len(),
                "scored on"
            );
        }
    }

    fn choose_sides<A>(&mut self, arena: &A) -> SideChoice
    where
        A: Arena,
    {
        let policy = &self.policy;
        let was_unset = self.state.sides().is_none();
        let sides = self.state.sides_or_choose(|| policy.choose(arena));
        if was_unset {
            tracing::info!(open = ?sides.open, blocked = ?sides.blocked, "sides chosen");
        }
        sides
    }

    fn build<A>(&mut self, arena: &mut A, sides: SideChoice, thresholds: Thresholds, out: &mut Vec<Command>)
    where
        A: Arena,
    {
        let _ = self
            .planner
            .apply(arena, &plan::wall_line(&self.config, sides.blocked), out);

        let checkpoint = Checkpoint::open(arena);
        let slots = self.state.turret_slots().current();
        let _ = self
            .planner
            .apply(arena, &plan::turret_line(&self.config, sides.open, slots), out);
        let spent = checkpoint.spent(arena);
        if self.state.turret_slots_mut().unlock_if_spent(spent) {
            tracing::debug!(
                spent,
                slots = self.state.turret_slots().current(),
                "turret slot unlocked"
            );
        }

        let _ = self
            .planner
            .apply(arena, &plan::wall_upgrades(&self.config, sides.blocked), out);

        if arena.resource(ResourcePool::Structural) > thresholds.structural {
            let index = self.state.next_support();
            let step = plan::support(&self.config, sides.open, index);
            let _ = self.planner.apply_step(arena, &step, out);
        }
    }

    fn escalate<A>(&self, arena: &mut A, sides: SideChoice, out: &mut Vec<Command>)
    where
        A: Arena,
    {
        let escalation = &self.config.escalation;
        let check = GuardCheck::new(
            UnitFilter::any().rows(escalation.rows.iter().copied()),
            escalation.threshold,
        );
        let posture = check.assess(arena);
        if !posture.heavily_guarded {
            return;
        }

        let launch = Patrol {
            kind: escalation.launch.kind,
            at: sides.blocked.place(escalation.launch.at),
        };
        let launched = self.dispatcher.opening(arena, &[launch], out);
        tracing::info!(
            count = posture.count,
            at = ?launch.at,
            launched,
            "entrance heavily guarded, escalating"
        );
    }

    fn dispatch<A>(&self, arena: &mut A, thresholds: Thresholds, out: &mut Vec<Command>)
    where
        A: Arena,
    {
        if arena.resource(ResourcePool::Mobility) <= thresholds.mobility {
            return;
        }

        let candidates = self
            .config
            .lane_candidates
            .clone()
            .unwrap_or_else(friendly_edge_cells);
        match select_lane(arena, &candidates) {
            Ok(lane) => {
                let _ = self.dispatcher.dispatch(arena, &lane, out);
            }
            Err(error) => tracing::warn!(%error, "skipping mobile dispatch"),
        }
    }
}
