#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bastion decision engine.
//!
//! This crate defines the vocabulary that connects the turn snapshot, the
//! pure decision systems and the engine adapter. Systems read the current
//! board through the [`Arena`] trait, attempt spends through the same trait,
//! and report every placement that succeeded as a [`Command`]. The adapter
//! serializes the resulting command batch back to the engine.

use serde::{Deserialize, Serialize};

mod config;

#[cfg(feature = "fixtures")]
pub mod fixtures;

pub use config::{ConfigError, Cost, GameConfig, UnitStats, UpgradeStats};

/// Number of cells along each axis of the diamond arena.
pub const ARENA_SIZE: i32 = 28;
/// Half of [`ARENA_SIZE`]; rows below it belong to the friendly player.
pub const HALF_ARENA: i32 = ARENA_SIZE / 2;
/// Largest valid column index.
pub const X_MAX: i32 = ARENA_SIZE - 1;
/// Topmost row of the friendly half.
pub const Y_MAX: i32 = HALF_ARENA - 1;

/// Location of a single arena cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Reflects the coordinate across the vertical midline of the arena.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        Self::new(X_MAX - self.x, self.y)
    }

    /// Reports whether the coordinate lies inside the diamond arena.
    #[must_use]
    pub const fn in_arena(self) -> bool {
        if self.y < 0 || self.y >= ARENA_SIZE {
            return false;
        }
        let row_size = if self.y < HALF_ARENA {
            self.y + 1
        } else {
            ARENA_SIZE - self.y
        };
        let start = HALF_ARENA - row_size;
        self.x >= start && self.x < start + 2 * row_size
    }

    /// Reports whether the coordinate lies on the friendly half of the arena.
    #[must_use]
    pub const fn on_friendly_half(self) -> bool {
        self.y <= Y_MAX
    }

    /// Euclidean distance between two cells.
    #[must_use]
    pub fn distance(self, other: Coordinate) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy)
    }
}

/// One of the four diagonal edges bounding the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Upper right edge on the enemy half.
    TopRight,
    /// Upper left edge on the enemy half.
    TopLeft,
    /// Lower left edge on the friendly half.
    BottomLeft,
    /// Lower right edge on the friendly half.
    BottomRight,
}

impl Edge {
    /// All edges in a fixed order.
    pub const ALL: [Edge; 4] = [
        Edge::TopRight,
        Edge::TopLeft,
        Edge::BottomLeft,
        Edge::BottomRight,
    ];

    /// Cells composing the edge, ordered from the midline outward.
    #[must_use]
    pub fn cells(self) -> Vec<Coordinate> {
        (0..HALF_ARENA)
            .map(|n| match self {
                Self::TopRight => Coordinate::new(HALF_ARENA + n, X_MAX - n),
                Self::TopLeft => Coordinate::new(HALF_ARENA - 1 - n, X_MAX - n),
                Self::BottomLeft => Coordinate::new(HALF_ARENA - 1 - n, n),
                Self::BottomRight => Coordinate::new(HALF_ARENA + n, n),
            })
            .collect()
    }

    /// Reports whether the provided cell belongs to this edge.
    #[must_use]
    pub const fn contains(self, cell: Coordinate) -> bool {
        let (x, y) = (cell.x(), cell.y());
        match self {
            Self::TopRight => y >= HALF_ARENA && y <= X_MAX && x == HALF_ARENA + X_MAX - y,
            Self::TopLeft => y >= HALF_ARENA && y <= X_MAX && x == y - HALF_ARENA,
            Self::BottomLeft => y >= 0 && y < HALF_ARENA && x == HALF_ARENA - 1 - y,
            Self::BottomRight => y >= 0 && y < HALF_ARENA && x == HALF_ARENA + y,
        }
    }

    /// Edge a mobile unit launched from this edge walks toward.
    #[must_use]
    pub const fn opposite(self) -> Edge {
        match self {
            Self::TopRight => Self::BottomLeft,
            Self::TopLeft => Self::BottomRight,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }

    /// Locates the edge containing the provided cell, if any.
    #[must_use]
    pub fn containing(cell: Coordinate) -> Option<Edge> {
        Self::ALL.into_iter().find(|edge| edge.contains(cell))
    }
}

/// Cells from which friendly mobile units may be launched.
#[must_use]
pub fn friendly_edge_cells() -> Vec<Coordinate> {
    let mut cells = Edge::BottomLeft.cells();
    cells.extend(Edge::BottomRight.cells());
    cells
}

/// Half of the board, split along the vertical midline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardSide {
    /// Columns below [`HALF_ARENA`].
    Left,
    /// Columns at or above [`HALF_ARENA`].
    Right,
}

impl BoardSide {
    /// The other half of the board.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Places a right-frame coordinate onto this side of the board.
    #[must_use]
    pub const fn place(self, at: Coordinate) -> Coordinate {
        match self {
            Self::Right => at,
            Self::Left => at.mirrored(),
        }
    }
}

/// Side(s) of the board a structure placement applies to.
///
/// Sided coordinates are written in the right-half frame; the left image of
/// `(x, y)` is `(X_MAX - x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorSide {
    /// The coordinate is absolute and used as written.
    #[default]
    None,
    /// Only the left image.
    Left,
    /// Only the right image.
    Right,
    /// Both images, as independent placements.
    Both,
}

impl From<BoardSide> for MirrorSide {
    fn from(side: BoardSide) -> Self {
        match side {
            BoardSide::Left => Self::Left,
            BoardSide::Right => Self::Right,
        }
    }
}

/// Participant owning a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// The side this engine plays for.
    Friendly,
    /// The opponent.
    Enemy,
}

/// Resource pools replenished by the engine between turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourcePool {
    /// Structural points, spent on stationary units.
    Structural,
    /// Mobility points, spent on mobile units.
    Mobility,
}

/// Every unit type known to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// Cheap blocking structure.
    Wall,
    /// Structure that shields friendly mobile units passing nearby.
    Support,
    /// Structure that fires at enemy mobile units in range.
    Turret,
    /// Fast, light mobile unit.
    Scout,
    /// Heavy, long-range mobile unit.
    Demolisher,
    /// Mobile unit that hunts enemy mobile units.
    Interceptor,
}

impl UnitKind {
    /// All unit kinds in configuration-document order.
    pub const ALL: [UnitKind; 6] = [
        UnitKind::Wall,
        UnitKind::Support,
        UnitKind::Turret,
        UnitKind::Scout,
        UnitKind::Demolisher,
        UnitKind::Interceptor,
    ];

    /// Whether units of this kind stay where they are placed.
    #[must_use]
    pub const fn is_stationary(self) -> bool {
        matches!(self, Self::Wall | Self::Support | Self::Turret)
    }

    /// Position of this kind within the configuration document.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Wall => 0,
            Self::Support => 1,
            Self::Turret => 2,
            Self::Scout => 3,
            Self::Demolisher => 4,
            Self::Interceptor => 5,
        }
    }
}

/// Placement intent for a stationary unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructureSpec {
    /// Kind of structure to place.
    pub kind: UnitKind,
    /// Target cell, in the right-half frame when mirrored.
    pub at: Coordinate,
    /// Side(s) the placement applies to.
    pub mirror: MirrorSide,
}

impl StructureSpec {
    /// Creates an unsided placement intent.
    #[must_use]
    pub const fn new(kind: UnitKind, at: Coordinate) -> Self {
        Self {
            kind,
            at,
            mirror: MirrorSide::None,
        }
    }

    /// Applies a mirror side to the placement intent.
    #[must_use]
    pub const fn mirrored(mut self, mirror: MirrorSide) -> Self {
        self.mirror = mirror;
        self
    }

    /// Expands the intent into the concrete cells it targets.
    ///
    /// Mirrored intents produce one independent cell per side, left first.
    #[must_use]
    pub fn expand(&self) -> Vec<Coordinate> {
        match self.mirror {
            MirrorSide::None => vec![self.at],
            MirrorSide::Left => vec![BoardSide::Left.place(self.at)],
            MirrorSide::Right => vec![BoardSide::Right.place(self.at)],
            MirrorSide::Both => vec![
                BoardSide::Left.place(self.at),
                BoardSide::Right.place(self.at),
            ],
        }
    }
}

/// Ordered planner instruction replayed every turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildStep {
    /// Structure the step ensures exists.
    pub spec: StructureSpec,
    /// Whether the step also ensures the structure is upgraded.
    pub upgrade: bool,
}

impl BuildStep {
    /// Step that only ensures the structure exists.
    #[must_use]
    pub const fn spawn(spec: StructureSpec) -> Self {
        Self {
            spec,
            upgrade: false,
        }
    }

    /// Step that ensures the structure exists and is upgraded.
    #[must_use]
    pub const fn spawn_upgraded(spec: StructureSpec) -> Self {
        Self {
            spec,
            upgrade: true,
        }
    }
}

/// Accepted placement, committed to the engine at the end of the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Places `count` units of `kind` at `at`.
    Spawn {
        /// Kind of unit placed.
        kind: UnitKind,
        /// Cell receiving the units.
        at: Coordinate,
        /// Number of units placed.
        count: u32,
    },
    /// Upgrades the friendly structure at `at`.
    Upgrade {
        /// Cell holding the upgraded structure.
        at: Coordinate,
    },
}

/// Immutable representation of a stationary unit used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StructureSnapshot {
    /// Owner of the structure.
    pub owner: Player,
    /// Kind of structure.
    pub kind: UnitKind,
    /// Cell the structure occupies.
    pub at: Coordinate,
    /// Remaining health.
    pub health: f64,
    /// Whether the structure has been upgraded.
    pub upgraded: bool,
}

/// Read-only listing of every stationary unit on the board.
#[derive(Clone, Debug, Default)]
pub struct StructureView {
    snapshots: Vec<StructureSnapshot>,
}

impl StructureView {
    /// Creates a new view, ordering snapshots by cell for deterministic scans.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<StructureSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.at);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &StructureSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view holds no structures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Narrow interface onto the engine-supplied turn snapshot.
///
/// Reads reflect every spend attempted earlier in the same turn, so callers
/// can bracket a sequence of attempts with two resource reads to learn what
/// the sequence actually consumed.
pub trait Arena {
    /// Configuration document loaded at match start.
    fn config(&self) -> &GameConfig;

    /// Zero-based turn number.
    fn turn_number(&self) -> u32;

    /// Current friendly health.
    fn my_health(&self) -> f64;

    /// Friendly amount available in the requested pool.
    fn resource(&self, pool: ResourcePool) -> f64;

    /// Whether any stationary unit occupies the cell.
    fn contains_stationary_unit(&self, at: Coordinate) -> bool;

    /// Every stationary unit on the board.
    fn structure_view(&self) -> StructureView;

    /// Cells a mobile unit launched at `start` walks through, starting cell first.
    fn find_path_to_edge(&self, start: Coordinate) -> Vec<Coordinate>;

    /// Structures hostile to `target` that can hit the cell right now.
    fn attackers_in_range(&self, at: Coordinate, target: Player) -> Vec<StructureSnapshot>;

    /// Attempts to place up to `count` friendly units, returning how many were placed.
    fn attempt_spawn(&mut self, kind: UnitKind, at: Coordinate, count: u32) -> u32;

    /// Attempts to upgrade the friendly structure at the cell.
    fn attempt_upgrade(&mut self, at: Coordinate) -> bool;
}
