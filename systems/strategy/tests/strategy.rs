use std::collections::BTreeSet;

use bastion_core::{fixtures, Arena, BoardSide, Command, Coordinate, Player, ResourcePool, UnitKind};
use bastion_strategy::{SideChoice, SidePolicy, Strategy, StrategyConfig};
use bastion_system_last_stand::StandState;
use bastion_world::{BreachReport, Frame, GameState};

fn spawns_of(commands: &[Command], wanted: UnitKind) -> Vec<(Coordinate, u32)> {
    commands
        .iter()
        .filter_map(|command| match *command {
            Command::Spawn { kind, at, count } if kind == wanted => Some((at, count)),
            _ => None,
        })
        .collect()
}

/// Rebuilds the friendly structures a batch of commands left on the board.
fn board_after(state: &mut GameState<'_>, commands: &[Command]) {
    let upgraded: BTreeSet<Coordinate> = commands
        .iter()
        .filter_map(|command| match *command {
            Command::Upgrade { at } => Some(at),
            Command::Spawn { .. } => None,
        })
        .collect();
    for command in commands {
        if let Command::Spawn { kind, at, .. } = *command {
            if kind.is_stationary() {
                assert!(state.place_structure(Player::Friendly, kind, at, upgraded.contains(&at)));
            }
        }
    }
}

#[test]
fn turn_zero_banks_structure_and_launches_patrols() {
    let config = fixtures::game_config();
    let mut state = GameState::new(&config, 0, 30.0, 40.0, 5.0);
    let mut strategy = Strategy::new(StrategyConfig::default(), 30.0);

    let commands = strategy.on_turn(&mut state);

    assert_eq!(
        commands,
        vec![
            Command::Spawn {
                kind: UnitKind::Demolisher,
                at: Coordinate::new(7, 6),
                count: 1,
            },
            Command::Spawn {
                kind: UnitKind::Interceptor,
                at: Coordinate::new(20, 6),
                count: 1,
            },
        ]
    );
    assert_eq!(state.resource(ResourcePool::Structural), 40.0);
    assert_eq!(strategy.state().sides(), None);
}

#[test]
fn first_build_turn_lays_the_base_and_unlocks_a_slot() {
    let config = fixtures::game_config();
    let mut state = GameState::new(&config, 1, 30.0, 40.0, 5.0);
    let mut strategy = Strategy::new(StrategyConfig::default(), 30.0);

    let commands = strategy.on_turn(&mut state);

    assert_eq!(
        strategy.state().sides(),
        Some(SideChoice {
            blocked: BoardSide::Left,
            open: BoardSide::Right,
        })
    );
    let walls = spawns_of(&commands, UnitKind::Wall);
    assert!(walls.contains(&(Coordinate::new(0, 13), 1)));
    assert!(walls.contains(&(Coordinate::new(19, 13), 1)));
    assert_eq!(walls.len(), 20 + 1 + 5);
    assert_eq!(
        spawns_of(&commands, UnitKind::Turret),
        vec![(Coordinate::new(23, 12), 1), (Coordinate::new(22, 11), 1)]
    );
    assert!(spawns_of(&commands, UnitKind::Support).is_empty(), "4 SP left is not above the gate");
    assert_eq!(state.resource(ResourcePool::Structural), 4.0);
    assert_eq!(strategy.state().turret_slots().current(), 3);
    assert!(spawns_of(&commands, UnitKind::Scout).is_empty(), "5 MP is below the gate");
}

#[test]
fn replaying_the_plan_only_fills_what_is_missing() {
    let config = fixtures::game_config();
    let mut strategy = Strategy::new(StrategyConfig::default(), 30.0);
    let mut first = GameState::new(&config, 1, 30.0, 40.0, 5.0);
    let built = strategy.on_turn(&mut first);

    let mut second = GameState::new(&config, 2, 30.0, 40.0, 5.0);
    board_after(&mut second, &built);
    let commands = strategy.on_turn(&mut second);

    assert_eq!(
        commands,
        vec![
            Command::Spawn {
                kind: UnitKind::Turret,
                at: Coordinate::new(21, 10),
                count: 1,
            },
            Command::Upgrade {
                at: Coordinate::new(25, 11),
            },
            Command::Spawn {
                kind: UnitKind::Wall,
                at: Coordinate::new(22, 8),
                count: 1,
            },
            Command::Spawn {
                kind: UnitKind::Support,
                at: Coordinate::new(16, 12),
                count: 1,
            },
            Command::Upgrade {
                at: Coordinate::new(16, 12),
            },
        ]
    );
    assert_eq!(strategy.state().turret_slots().current(), 4);
    assert_eq!(strategy.state().support_count(), 1);
}

#[test]
fn crowded_entrance_launches_one_heavy_unit_on_the_blocked_side() {
    let config = fixtures::game_config();
    let mut state = GameState::new(&config, 1, 30.0, 0.0, 5.0);
    for x in 4..15 {
        assert!(state.place_structure(Player::Enemy, UnitKind::Wall, Coordinate::new(x, 14), false));
    }
    let mut strategy = Strategy::new(StrategyConfig::default(), 30.0);

    let commands = strategy.on_turn(&mut state);

    assert_eq!(
        commands,
        vec![Command::Spawn {
            kind: UnitKind::Demolisher,
            at: Coordinate::new(3, 10),
            count: 1,
        }]
    );
}

#[test]
fn ten_entrance_units_do_not_escalate() {
    let config = fixtures::game_config();
    let mut state = GameState::new(&config, 1, 30.0, 0.0, 5.0);
    for x in 4..14 {
        assert!(state.place_structure(Player::Enemy, UnitKind::Wall, Coordinate::new(x, 15), false));
    }
    let mut strategy = Strategy::new(StrategyConfig::default(), 30.0);

    assert!(strategy.on_turn(&mut state).is_empty());
}

#[test]
fn open_lane_receives_the_whole_mobility_pool() {
    let config = fixtures::game_config();
    let mut state = GameState::new(&config, 3, 30.0, 0.0, 12.0);
    let strategy_config = StrategyConfig {
        lane_candidates: Some(vec![Coordinate::new(13, 0)]),
        ..StrategyConfig::default()
    };
    let mut strategy = Strategy::new(strategy_config, 30.0);

    let commands = strategy.on_turn(&mut state);

    assert_eq!(spawns_of(&commands, UnitKind::Scout), vec![(Coordinate::new(13, 0), 12)]);
    assert!(spawns_of(&commands, UnitKind::Demolisher).is_empty());
}

#[test]
fn blocked_lanes_skip_dispatch() {
    let config = fixtures::game_config();
    let mut state = GameState::new(&config, 3, 30.0, 0.0, 12.0);
    assert!(state.place_structure(Player::Friendly, UnitKind::Wall, Coordinate::new(13, 0), false));
    let strategy_config = StrategyConfig {
        lane_candidates: Some(vec![Coordinate::new(13, 0)]),
        ..StrategyConfig::default()
    };
    let mut strategy = Strategy::new(strategy_config, 30.0);

    let commands = strategy.on_turn(&mut state);

    assert!(commands.is_empty());
    assert_eq!(state.resource(ResourcePool::Mobility), 12.0);
}

#[test]
fn last_stand_spends_below_the_normal_gates() {
    let config = fixtures::game_config();
    let mut strategy = Strategy::new(StrategyConfig::default(), 30.0);

    let mut hit = GameState::new(&config, 1, 22.0, 0.0, 3.0);
    assert!(strategy.on_turn(&mut hit).is_empty());

    let mut desperate = GameState::new(&config, 2, 8.0, 0.0, 3.0);
    let commands = strategy.on_turn(&mut desperate);

    assert_eq!(strategy.state().last_stand().state(), StandState::LastStand);
    assert_eq!(spawns_of(&commands, UnitKind::Scout), vec![(Coordinate::new(13, 0), 3)]);

    let mut recovered = GameState::new(&config, 3, 30.0, 0.0, 2.0);
    let commands = strategy.on_turn(&mut recovered);
    assert_eq!(strategy.state().last_stand().state(), StandState::LastStand);
    assert_eq!(spawns_of(&commands, UnitKind::Scout), vec![(Coordinate::new(13, 0), 2)]);
}

#[test]
fn breaches_are_logged_for_enemy_units_only() {
    let mut strategy = Strategy::new(StrategyConfig::default(), 30.0);
    let frame = Frame::parse(
        r#"{"turnInfo": [1, 3, 5], "events": {"breach": [
            [[13, 0], 1, 3, "12", 2],
            [[14, 27], 1, 3, "13", 1],
            [[20, 6], 2, 4, "14", 2]
        ]}}"#,
    )
    .expect("frame parses");

    strategy.on_action_frame(&BreachReport::from_frame(&frame));

    assert_eq!(
        strategy.state().breaches(),
        &[Coordinate::new(13, 0), Coordinate::new(20, 6)]
    );
}

#[derive(Clone, Copy, Debug)]
struct CountingPolicy;

impl SidePolicy for CountingPolicy {
    fn choose<A>(&self, arena: &A) -> SideChoice
    where
        A: Arena,
    {
        if arena.turn_number() == 1 {
            SideChoice::opening(BoardSide::Left)
        } else {
            SideChoice::opening(BoardSide::Right)
        }
    }
}

#[test]
fn side_policy_is_consulted_once() {
    let config = fixtures::game_config();
    let mut strategy = Strategy::with_policy(StrategyConfig::default(), CountingPolicy, 30.0);

    for turn in 1..4 {
        let mut state = GameState::new(&config, turn, 30.0, 0.0, 0.0);
        let _ = strategy.on_turn(&mut state);
    }

    assert_eq!(
        strategy.state().sides(),
        Some(SideChoice {
            blocked: BoardSide::Right,
            open: BoardSide::Left,
        })
    );
}
