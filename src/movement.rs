//! Sliding-collision movement resolver
//!
//! A robot slides until a wall on its side of travel, another robot ahead,
//! or the board edge stops it. Pure ray-cast over board state: identical
//! inputs always produce the identical destination, no randomness.

use crate::Error;
use crate::board::{Board, Direction, Pos};

/// Resolve one slide from `from` toward `dir`, mutating tile occupancy
///
/// Returns the destination, which equals `from` when the robot is blocked
/// where it stands: a wall on that side, the board edge, or an adjacent
/// robot.
pub fn resolve(board: &mut Board, from: Pos, dir: Direction) -> Result<Pos, Error> {
    if !from.in_bounds() {
        return Err(Error::OutOfBounds {
            x: from.x,
            y: from.y,
        });
    }
    let Some(color) = board.tile(from).robot else {
        return Err(Error::NoRobot {
            x: from.x,
            y: from.y,
        });
    };

    let mut pos = from;
    loop {
        if board.tile(pos).walls.side(dir) {
            break;
        }
        let Some(next) = pos.step(dir) else { break };
        if board.tile(next).has_robot() {
            break;
        }
        pos = next;
    }

    if pos != from {
        board.tile_mut(from).robot = None;
        board.tile_mut(pos).robot = Some(color);
        log::debug!("robot {} slid {dir:?} from {from} to {pos}", color.code());
    }
    Ok(pos)
}
