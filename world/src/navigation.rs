//! Static navigation field and edge-to-edge walk used for mobile unit paths.

use std::collections::VecDeque;

use bastion_core::{Coordinate, Edge, ARENA_SIZE};

/// Dense step-distance grid seeded from a set of goal cells.
///
/// Distances default to `u16::MAX` for unreachable cells so callers can
/// distinguish blocked cells from traversable ones.
#[derive(Clone, Debug)]
pub(crate) struct NavigationField {
    distances: Vec<u16>,
}

impl Default for NavigationField {
    fn default() -> Self {
        Self {
            distances: vec![u16::MAX; cell_count()],
        }
    }
}

impl NavigationField {
    /// Rebuilds the distances using a reverse breadth-first search from `seeds`.
    pub(crate) fn rebuild_with<F>(&mut self, seeds: &[Coordinate], mut is_blocked: F)
    where
        F: FnMut(Coordinate) -> bool,
    {
        self.distances.fill(u16::MAX);

        let mut queue = VecDeque::new();

        for &seed in seeds {
            if is_blocked(seed) {
                continue;
            }

            if let Some(index) = index(seed) {
                if self.distances[index] == 0 {
                    continue;
                }

                self.distances[index] = 0;
                queue.push_back(seed);
            }
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in neighbors(cell) {
                if is_blocked(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = index(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided cell, if it is reachable.
    #[must_use]
    pub(crate) fn distance(&self, cell: Coordinate) -> Option<u16> {
        index(cell)
            .and_then(|offset| self.distances.get(offset).copied())
            .filter(|distance| *distance != u16::MAX)
    }

    fn reachable(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..ARENA_SIZE)
            .flat_map(|y| (0..ARENA_SIZE).map(move |x| Coordinate::new(x, y)))
            .filter(|cell| self.distance(*cell).is_some())
    }
}

/// Walks a mobile unit from `start` toward the edge opposite its launch edge.
///
/// The returned path begins with `start`. When the far edge cannot be reached
/// the unit heads for the deepest reachable cell instead. A start cell that is
/// blocked or not on any edge yields a path holding only the start.
pub(crate) fn path_to_edge<F>(start: Coordinate, mut is_blocked: F) -> Vec<Coordinate>
where
    F: FnMut(Coordinate) -> bool,
{
    let Some(launch) = Edge::containing(start) else {
        return vec![start];
    };
    if is_blocked(start) {
        return vec![start];
    }
    let target = launch.opposite();

    let mut field = NavigationField::default();
    field.rebuild_with(&[start], &mut is_blocked);

    let mut goals: Vec<Coordinate> = target
        .cells()
        .into_iter()
        .filter(|cell| field.distance(*cell).is_some())
        .collect();
    if goals.is_empty() {
        goals = deepest_reachable(&field, target);
    }

    field.rebuild_with(&goals, &mut is_blocked);
    walk(&field, start, target)
}

fn deepest_reachable(field: &NavigationField, target: Edge) -> Vec<Coordinate> {
    let depth = |cell: &Coordinate| match target {
        Edge::TopRight => (cell.y(), cell.x()),
        Edge::TopLeft => (cell.y(), -cell.x()),
        Edge::BottomLeft => (-cell.y(), -cell.x()),
        Edge::BottomRight => (-cell.y(), cell.x()),
    };
    let Some(best) = field.reachable().map(|cell| depth(&cell)).max() else {
        return Vec::new();
    };
    field
        .reachable()
        .filter(|cell| depth(cell) == best)
        .collect()
}

fn walk(field: &NavigationField, start: Coordinate, target: Edge) -> Vec<Coordinate> {
    let mut path = vec![start];
    let mut current = start;
    let mut last_vertical: Option<bool> = None;

    let forward_y = match target {
        Edge::TopRight | Edge::TopLeft => 1,
        Edge::BottomLeft | Edge::BottomRight => -1,
    };
    let forward_x = match target {
        Edge::TopRight | Edge::BottomRight => 1,
        Edge::TopLeft | Edge::BottomLeft => -1,
    };

    while let Some(distance) = field.distance(current) {
        if distance == 0 {
            break;
        }

        let mut best: Option<(Coordinate, (bool, bool))> = None;
        for neighbor in neighbors(current) {
            if field.distance(neighbor) != Some(distance - 1) {
                continue;
            }
            let vertical = neighbor.x() == current.x();
            let zigzag = last_vertical.map_or(vertical, |previous| previous != vertical);
            let forward = if vertical {
                neighbor.y() - current.y() == forward_y
            } else {
                neighbor.x() - current.x() == forward_x
            };
            let preference = (zigzag, forward);
            if best.map_or(true, |(_, existing)| preference > existing) {
                best = Some((neighbor, preference));
            }
        }

        let Some((next, _)) = best else {
            break;
        };
        last_vertical = Some(next.x() == current.x());
        path.push(next);
        current = next;
    }

    path
}

fn neighbors(cell: Coordinate) -> impl Iterator<Item = Coordinate> {
    [
        Coordinate::new(cell.x(), cell.y() + 1),
        Coordinate::new(cell.x() + 1, cell.y()),
        Coordinate::new(cell.x(), cell.y() - 1),
        Coordinate::new(cell.x() - 1, cell.y()),
    ]
    .into_iter()
    .filter(|neighbor| neighbor.in_arena())
}

fn cell_count() -> usize {
    let side = usize::try_from(ARENA_SIZE).unwrap_or(0);
    side * side
}

fn index(cell: Coordinate) -> Option<usize> {
    if !cell.in_arena() {
        return None;
    }
    let column = usize::try_from(cell.x()).ok()?;
    let row = usize::try_from(cell.y()).ok()?;
    let width = usize::try_from(ARENA_SIZE).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
