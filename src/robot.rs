//! Robots: the sliding pieces
//!
//! A robot holds `Pos` handles (home and current) into the board; the tile
//! occupancy flags stay the single source of truth the resolver reads.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::board::{Board, Direction, Pos, RobotColor};
use crate::consts::{BOARD_SIZE, ROBOT_COUNT};
use crate::movement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub color: RobotColor,
    pub number: u8,
    home: Pos,
    pos: Pos,
}

impl Robot {
    pub fn new(color: RobotColor, number: u8, home: Pos) -> Self {
        Self {
            color,
            number,
            home,
            pos: home,
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn home(&self) -> Pos {
        self.home
    }

    /// Slide toward `dir`, keeping the stored position in sync with the
    /// board's occupancy flags
    pub fn slide(&mut self, board: &mut Board, dir: Direction) -> Result<Pos, Error> {
        self.pos = movement::resolve(board, self.pos, dir)?;
        Ok(self.pos)
    }
}

/// Drop the four robots onto uniformly drawn free, non-central tiles.
/// The landing tile becomes each robot's home position.
pub fn place_robots(board: &mut Board, rng: &mut Pcg32) -> [Robot; ROBOT_COUNT] {
    std::array::from_fn(|i| {
        let color = RobotColor::ALL[i];
        let pos = loop {
            let candidate = Pos::new(
                rng.random_range(0..BOARD_SIZE),
                rng.random_range(0..BOARD_SIZE),
            );
            let tile = board.tile(candidate);
            if !tile.has_robot() && !tile.central {
                break candidate;
            }
        };
        board.tile_mut(pos).robot = Some(color);
        log::debug!("robot {i} ({}) placed at {pos}", color.name());
        Robot::new(color, i as u8, pos)
    })
}

/// Return every robot to its home tile
///
/// All occupancies are cleared before any home is re-marked, so one
/// robot's reset can never erase another's fresh marker.
pub fn reset_robots(board: &mut Board, robots: &mut [Robot; ROBOT_COUNT]) {
    for robot in robots.iter() {
        board.tile_mut(robot.pos).robot = None;
    }
    for robot in robots.iter_mut() {
        robot.pos = robot.home;
        board.tile_mut(robot.home).robot = Some(robot.color);
    }
}
