//! Grid model and procedural board generation
//!
//! The board owns its 256 tiles by value in one contiguous allocation;
//! robots and the round machine hold [`Pos`] handles and resolve through
//! the accessors here instead of caching references into the grid.

mod generate;
mod tile;

pub use tile::{
    Direction, Pos, Quadrant, RobotColor, SPECIAL_SYMBOL, TARGET_SYMBOLS, Target, TargetColor,
    Tile, Walls,
};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::BOARD_SIZE;

/// The 16x16 playing field plus its ordered target list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Row-major tile storage, `BOARD_SIZE * BOARD_SIZE` entries
    tiles: Vec<Tile>,
    /// Positions of placed targets; the multicolor special comes first
    targets: Vec<Pos>,
}

impl Board {
    /// A blank board: no walls, no targets, no markers
    pub fn new() -> Self {
        Self {
            tiles: vec![Tile::default(); BOARD_SIZE as usize * BOARD_SIZE as usize],
            targets: Vec::new(),
        }
    }

    /// Generate a full board from `seed`: border and center walls, edge
    /// gaps, corners, and the assigned targets
    pub fn generate(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        Self::generate_with(&mut rng)
    }

    /// Generate with a caller-owned RNG, letting a session thread one
    /// random stream through board, robots and objectives
    pub fn generate_with(rng: &mut Pcg32) -> Self {
        let mut board = Board::new();
        generate::place_walls(&mut board, rng);
        generate::assign_targets(&mut board, rng);
        log::info!("board generated, {} targets placed", board.target_count());
        board
    }

    fn index(pos: Pos) -> usize {
        assert!(pos.in_bounds(), "position {pos} is off the board");
        pos.y as usize * BOARD_SIZE as usize + pos.x as usize
    }

    /// The tile at `pos`; panics if off the board (use [`Board::get`] to
    /// probe untrusted coordinates)
    pub fn tile(&self, pos: Pos) -> &Tile {
        &self.tiles[Self::index(pos)]
    }

    pub fn tile_mut(&mut self, pos: Pos) -> &mut Tile {
        &mut self.tiles[Self::index(pos)]
    }

    /// Checked tile lookup
    pub fn get(&self, pos: Pos) -> Option<&Tile> {
        pos.in_bounds().then(|| self.tile(pos))
    }

    /// Set a wall on `pos`'s `dir` side, mirrored onto the neighboring
    /// tile's opposite side so the two can never disagree
    pub fn set_wall(&mut self, pos: Pos, dir: Direction) {
        self.tile_mut(pos).walls.set(dir);
        if let Some(next) = pos.step(dir) {
            self.tile_mut(next).walls.set(dir.opposite());
        }
    }

    /// The `i`-th placed target, in placement order
    pub fn target(&self, i: usize) -> Option<Pos> {
        self.targets.get(i).copied()
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    pub fn targets(&self) -> &[Pos] {
        &self.targets
    }

    pub(crate) fn push_target(&mut self, pos: Pos) {
        self.targets.push(pos);
    }

    /// Row-major iteration over all 256 positions
    pub fn positions() -> impl Iterator<Item = Pos> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Pos::new(x, y)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_wall_mirrors_to_neighbor() {
        let mut board = Board::new();
        board.set_wall(Pos::new(4, 4), Direction::East);
        assert!(board.tile(Pos::new(4, 4)).walls.east);
        assert!(board.tile(Pos::new(5, 4)).walls.west);

        board.set_wall(Pos::new(4, 4), Direction::North);
        assert!(board.tile(Pos::new(4, 4)).walls.north);
        assert!(board.tile(Pos::new(4, 3)).walls.south);
    }

    #[test]
    fn test_set_wall_on_border_has_no_mirror_partner() {
        let mut board = Board::new();
        board.set_wall(Pos::new(0, 0), Direction::North);
        assert!(board.tile(Pos::new(0, 0)).walls.north);
    }

    #[test]
    fn test_get_rejects_out_of_bounds() {
        let board = Board::new();
        assert!(board.get(Pos::new(16, 0)).is_none());
        assert!(board.get(Pos::new(0, 16)).is_none());
        assert!(board.get(Pos::new(15, 15)).is_some());
    }
}
