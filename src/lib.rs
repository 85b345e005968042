//! Rebound Robots - a sliding-robot puzzle board game
//!
//! Core modules:
//! - `board`: grid model and procedural board generation
//! - `movement`: deterministic sliding-collision resolver
//! - `round`: bidding window, move budgets and solve detection
//! - `game`: session orchestration tying board, robots and players together
//! - `render`: ANSI terminal view of the board
//! - `scores`: persisted score table
//!
//! All randomness flows through a single seeded `Pcg32`, so a board (and a
//! whole session) can be replayed from its seed.

pub mod board;
pub mod game;
pub mod movement;
pub mod player;
pub mod render;
pub mod robot;
pub mod round;
pub mod scores;

pub use board::{Board, Direction, Pos, Quadrant, RobotColor, Target, TargetColor, Tile, Walls};
pub use game::{Game, MoveOutcome};
pub use player::Player;
pub use robot::Robot;
pub use round::{Bid, BidTimer, Round, RoundPhase, is_solved};
pub use scores::ScoreBoard;

use thiserror::Error as ThisError;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Board edge length in tiles
    pub const BOARD_SIZE: u8 = 16;
    /// Edge length of one quadrant
    pub const QUADRANT_SIZE: u8 = 8;
    /// Robots on the board, one per color
    pub const ROBOT_COUNT: usize = 4;
    /// Standard corners placed per quadrant
    pub const CORNERS_PER_QUADRANT: usize = 4;
    /// 16 quadrant targets plus the multicolor special
    pub const TARGET_COUNT: usize = 17;
    /// Length of the bidding window
    pub const BID_DURATION: Duration = Duration::from_secs(60);
    /// Draws before one corner placement falls back to a relaxed pass
    pub const CORNER_RETRY_CAP: u32 = 512;
    /// Perturbation rounds before target assignment gives up
    pub const ASSIGN_ROUND_CAP: u32 = 1000;
}

/// Library error type
///
/// Invalid inputs fail descriptively instead of panicking; the input layer
/// is expected to validate first, these exist as a backstop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("position ({x}, {y}) is off the board")]
    OutOfBounds { x: u8, y: u8 },
    #[error("no robot occupies ({x}, {y})")]
    NoRobot { x: u8, y: u8 },
    #[error("board has no targets to draw an objective from")]
    NoTargets,
    #[error("robot index {0} out of range")]
    BadRobot(usize),
    #[error("player index {0} out of range")]
    BadPlayer(usize),
    #[error("move budget must be positive and beat the previous bid")]
    BadBudget,
    #[error("operation not allowed in the {0:?} phase")]
    Phase(round::RoundPhase),
}
