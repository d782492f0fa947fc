//! Build steps derived from the strategy constants and the frozen side choice.

use bastion_core::{BoardSide, BuildStep, Coordinate, StructureSpec, UnitKind, X_MAX, Y_MAX};

use crate::StrategyConfig;

fn on_side(kind: UnitKind, at: Coordinate, side: BoardSide) -> StructureSpec {
    StructureSpec::new(kind, at).mirrored(side.into())
}

fn offset(origin: Coordinate, dx: i32, dy: i32) -> Coordinate {
    Coordinate::new(origin.x() + dx, origin.y() + dy)
}

fn as_offset(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Static wall line along the top friendly row, from the outer edge inwards.
pub(crate) fn wall_line(config: &StrategyConfig, blocked: BoardSide) -> Vec<BuildStep> {
    (0..as_offset(config.wall_length))
        .map(|i| Coordinate::new(X_MAX - i, Y_MAX))
        .filter(|at| at.in_arena())
        .map(|at| BuildStep::spawn(on_side(UnitKind::Wall, at, blocked)))
        .collect()
}

/// Upgrades for the innermost walls of the wall line.
pub(crate) fn wall_upgrades(config: &StrategyConfig, blocked: BoardSide) -> Vec<BuildStep> {
    let innermost = as_offset(config.wall_length) - 1;
    (0..as_offset(config.wall_upgrade_count.min(config.wall_length)))
        .map(|k| Coordinate::new(X_MAX - (innermost - k), Y_MAX))
        .map(|at| BuildStep::spawn_upgraded(on_side(UnitKind::Wall, at, blocked)))
        .collect()
}

/// Diagonal turret line with its upgraded cap wall and edge walls.
pub(crate) fn turret_line(config: &StrategyConfig, open: BoardSide, slots: u32) -> Vec<BuildStep> {
    let mut steps: Vec<BuildStep> = (0..as_offset(slots))
        .map(|i| offset(config.turret_origin, -i, -i))
        .map(|at| BuildStep::spawn(on_side(UnitKind::Turret, at, open)))
        .collect();

    steps.push(BuildStep::spawn_upgraded(on_side(
        UnitKind::Wall,
        config.cap_wall,
        open,
    )));

    let edge_walls = slots.saturating_add(config.edge_wall_padding);
    steps.extend((0..edge_walls).map(|i| {
        let at = offset(config.edge_wall_origin, -as_offset(i), -as_offset(i));
        let spec = on_side(UnitKind::Wall, at, open);
        if i < slots {
            BuildStep::spawn_upgraded(spec)
        } else {
            BuildStep::spawn(spec)
        }
    }));
    steps
}

/// Support at the `index`-th position of the support row, cycling.
pub(crate) fn support(config: &StrategyConfig, open: BoardSide, index: u32) -> BuildStep {
    let column = index % config.support_row_length.max(1);
    let at = offset(config.support_origin, as_offset(column), 0);
    BuildStep::spawn_upgraded(on_side(UnitKind::Support, at, open))
}
