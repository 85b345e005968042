//! Tile-level grid types
//!
//! Passive data: wall flags, target and robot occupancy, generation
//! markers. All behavior beyond accessors lives in the generator and the
//! movement resolver.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::consts::{BOARD_SIZE, QUADRANT_SIZE};

/// Symbols carried by the 16 quadrant targets
pub const TARGET_SYMBOLS: [char; 4] = ['&', '#', '%', '$'];
/// Symbol of the single multicolor target
pub const SPECIAL_SYMBOL: char = '*';

/// A board coordinate. `x` grows east, `y` grows south; (0, 0) is the
/// north-west corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Whether this coordinate lies on the board
    pub fn in_bounds(&self) -> bool {
        self.x < BOARD_SIZE && self.y < BOARD_SIZE
    }

    /// The neighboring coordinate one step toward `dir`, `None` at the edge
    pub fn step(&self, dir: Direction) -> Option<Pos> {
        let (x, y) = (self.x, self.y);
        let next = match dir {
            Direction::North if y > 0 => Pos::new(x, y - 1),
            Direction::South if y + 1 < BOARD_SIZE => Pos::new(x, y + 1),
            Direction::West if x > 0 => Pos::new(x - 1, y),
            Direction::East if x + 1 < BOARD_SIZE => Pos::new(x + 1, y),
            _ => return None,
        };
        Some(next)
    }

    /// Diagonal neighbor one step toward `a` and one toward `b`
    pub fn step2(&self, a: Direction, b: Direction) -> Option<Pos> {
        self.step(a).and_then(|p| p.step(b))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A cardinal sliding direction. North is toward row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// The two directions at a right angle to this one
    pub fn perpendicular(&self) -> [Direction; 2] {
        match self {
            Direction::North | Direction::South => [Direction::West, Direction::East],
            Direction::East | Direction::West => [Direction::North, Direction::South],
        }
    }
}

/// Robot colors, also the colors of the 16 quadrant targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl RobotColor {
    pub const ALL: [RobotColor; 4] = [
        RobotColor::Red,
        RobotColor::Blue,
        RobotColor::Green,
        RobotColor::Yellow,
    ];

    /// One-letter code used in logs and rendering
    pub fn code(&self) -> char {
        match self {
            RobotColor::Red => 'R',
            RobotColor::Blue => 'B',
            RobotColor::Green => 'G',
            RobotColor::Yellow => 'Y',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RobotColor::Red => "red",
            RobotColor::Blue => "blue",
            RobotColor::Green => "green",
            RobotColor::Yellow => "yellow",
        }
    }
}

/// A target's color: one of the robot colors, or multicolor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetColor {
    Red,
    Blue,
    Green,
    Yellow,
    Multi,
}

impl TargetColor {
    /// Whether a robot of `color` satisfies this target. The multicolor
    /// target accepts any robot.
    pub fn matches(&self, color: RobotColor) -> bool {
        match self {
            TargetColor::Multi => true,
            _ => *self == TargetColor::from(color),
        }
    }

    pub fn code(&self) -> char {
        match self {
            TargetColor::Red => 'R',
            TargetColor::Blue => 'B',
            TargetColor::Green => 'G',
            TargetColor::Yellow => 'Y',
            TargetColor::Multi => 'M',
        }
    }
}

impl From<RobotColor> for TargetColor {
    fn from(color: RobotColor) -> Self {
        match color {
            RobotColor::Red => TargetColor::Red,
            RobotColor::Blue => TargetColor::Blue,
            RobotColor::Green => TargetColor::Green,
            RobotColor::Yellow => TargetColor::Yellow,
        }
    }
}

/// A (symbol, color) pair identifying one target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub symbol: char,
    pub color: TargetColor,
}

impl Target {
    /// The one multicolor target, solvable by any robot
    pub fn special() -> Self {
        Self {
            symbol: SPECIAL_SYMBOL,
            color: TargetColor::Multi,
        }
    }

    pub fn is_special(&self) -> bool {
        self.color == TargetColor::Multi
    }
}

/// Per-side wall flags of one tile
///
/// Walls are always mirrored: a tile's east wall implies its east
/// neighbor's west wall. [`crate::Board::set_wall`] maintains both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walls {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl Walls {
    pub fn side(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    pub fn set(&mut self, dir: Direction) {
        match dir {
            Direction::North => self.north = true,
            Direction::East => self.east = true,
            Direction::South => self.south = true,
            Direction::West => self.west = true,
        }
    }

    /// Any wall at all on this tile
    pub fn any(&self) -> bool {
        self.north || self.east || self.south || self.west
    }
}

/// One cell of the 16x16 grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub walls: Walls,
    /// Target on this tile, if any
    pub target: Option<Target>,
    /// Color of the robot occupying this tile, if any
    pub robot: Option<RobotColor>,
    /// Marked during generation: eligible to receive an assigned target
    pub corner: bool,
    /// One of the four impassable center-block tiles
    pub central: bool,
}

impl Tile {
    pub fn has_robot(&self) -> bool {
        self.robot.is_some()
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    pub fn has_special_target(&self) -> bool {
        self.target.is_some_and(|t| t.is_special())
    }
}

/// One of the four 8x8 sub-regions of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrant {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// The quadrant containing `pos`
    pub fn of(pos: Pos) -> Quadrant {
        match (pos.x < QUADRANT_SIZE, pos.y < QUADRANT_SIZE) {
            (true, true) => Quadrant::NorthWest,
            (false, true) => Quadrant::NorthEast,
            (true, false) => Quadrant::SouthWest,
            (false, false) => Quadrant::SouthEast,
        }
    }

    fn origin(&self) -> (u8, u8) {
        match self {
            Quadrant::NorthWest => (0, 0),
            Quadrant::NorthEast => (QUADRANT_SIZE, 0),
            Quadrant::SouthWest => (0, QUADRANT_SIZE),
            Quadrant::SouthEast => (QUADRANT_SIZE, QUADRANT_SIZE),
        }
    }

    /// Inclusive x/y bounds for corner candidates: the quadrant interior,
    /// board-edge rows and columns excluded
    pub fn corner_bounds(&self) -> (RangeInclusive<u8>, RangeInclusive<u8>) {
        let (x0, y0) = self.origin();
        let xs = if x0 == 0 { 1..=7 } else { x0..=x0 + QUADRANT_SIZE - 2 };
        let ys = if y0 == 0 { 1..=7 } else { y0..=y0 + QUADRANT_SIZE - 2 };
        (xs, ys)
    }

    /// Row-major iteration over every tile of the quadrant
    pub fn tiles(&self) -> impl Iterator<Item = Pos> {
        let (x0, y0) = self.origin();
        (y0..y0 + QUADRANT_SIZE)
            .flat_map(move |y| (x0..x0 + QUADRANT_SIZE).map(move |x| Pos::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_stops_at_edges() {
        assert_eq!(Pos::new(0, 0).step(Direction::North), None);
        assert_eq!(Pos::new(0, 0).step(Direction::West), None);
        assert_eq!(Pos::new(15, 15).step(Direction::South), None);
        assert_eq!(Pos::new(15, 15).step(Direction::East), None);
        assert_eq!(Pos::new(3, 3).step(Direction::East), Some(Pos::new(4, 3)));
        assert_eq!(Pos::new(3, 3).step(Direction::North), Some(Pos::new(3, 2)));
    }

    #[test]
    fn test_perpendicular_excludes_self_and_opposite() {
        for dir in Direction::ALL {
            for perp in dir.perpendicular() {
                assert_ne!(perp, dir);
                assert_ne!(perp, dir.opposite());
            }
        }
    }

    #[test]
    fn test_target_color_matching() {
        assert!(TargetColor::Green.matches(RobotColor::Green));
        assert!(!TargetColor::Green.matches(RobotColor::Red));
        for color in RobotColor::ALL {
            assert!(TargetColor::Multi.matches(color));
        }
    }

    #[test]
    fn test_quadrant_of_corners() {
        assert_eq!(Quadrant::of(Pos::new(0, 0)), Quadrant::NorthWest);
        assert_eq!(Quadrant::of(Pos::new(7, 7)), Quadrant::NorthWest);
        assert_eq!(Quadrant::of(Pos::new(8, 7)), Quadrant::NorthEast);
        assert_eq!(Quadrant::of(Pos::new(7, 8)), Quadrant::SouthWest);
        assert_eq!(Quadrant::of(Pos::new(15, 15)), Quadrant::SouthEast);
    }

    #[test]
    fn test_quadrant_tiles_cover_sixty_four_cells() {
        for quadrant in Quadrant::ALL {
            let tiles: Vec<Pos> = quadrant.tiles().collect();
            assert_eq!(tiles.len(), 64);
            assert!(tiles.iter().all(|&p| Quadrant::of(p) == quadrant));
        }
    }
}
