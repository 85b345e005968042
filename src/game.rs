//! Game session orchestration
//!
//! Ties board, robots, players and the round machine together. A session
//! exclusively owns its board; every mutation happens on the caller's
//! thread, in call order.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::Error;
use crate::board::{Board, Direction, Pos};
use crate::consts::ROBOT_COUNT;
use crate::player::Player;
use crate::robot::{self, Robot};
use crate::round::{Round, RoundPhase, is_solved};

/// Result of one solving move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Round continues with this many moves left in the budget
    Continue { remaining: u32 },
    /// Objective satisfied: score awarded, robots back home
    Solved,
    /// Budget spent without a solve: robots home, objective stands
    Exhausted,
}

/// A full game session
#[derive(Debug)]
pub struct Game {
    pub board: Board,
    pub robots: [Robot; ROBOT_COUNT],
    pub players: Vec<Player>,
    round: Round,
    rng: Pcg32,
}

impl Game {
    /// Start a session: generate the board from `seed`, create the players
    /// and drop the robots on their home tiles
    pub fn new(seed: u64, player_count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut board = Board::generate_with(&mut rng);
        let robots = robot::place_robots(&mut board, &mut rng);
        let players = (0..player_count).map(Player::new).collect();
        log::info!("game ready: seed {seed}, {player_count} player(s)");
        Self {
            board,
            robots,
            players,
            round: Round::new(),
            rng,
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Throw the current board away and start over on a fresh one,
    /// re-placing the robots; scores carry over
    pub fn regenerate_board(&mut self) {
        self.board = Board::generate_with(&mut self.rng);
        self.robots = robot::place_robots(&mut self.board, &mut self.rng);
        self.round = Round::new();
        log::info!("board regenerated");
    }

    /// Draw the next objective and open bidding. Legal when no round is in
    /// flight: at session start, after a solve, or when an exhausted
    /// objective is abandoned.
    pub fn begin_round(&mut self) -> Result<Pos, Error> {
        if matches!(self.round.phase, RoundPhase::Resolved | RoundPhase::Exhausted) {
            self.round = Round::new();
        }
        self.round.draw_objective(&self.board, &mut self.rng)
    }

    /// Forward a bid into the round
    pub fn bid(&mut self, player: usize, moves: u32) -> Result<bool, Error> {
        if player >= self.players.len() {
            return Err(Error::BadPlayer(player));
        }
        Ok(self.round.place_bid(player, moves))
    }

    /// Close the bidding window early
    pub fn lock_in(&mut self) {
        self.round.lock_in();
    }

    /// Select the solving player and their move budget
    pub fn start_solving(&mut self, player: usize, budget: u32) -> Result<(), Error> {
        if player >= self.players.len() {
            return Err(Error::BadPlayer(player));
        }
        self.round.begin_solving(player, budget)
    }

    /// Give the round up: robots home, objective discarded, no score
    pub fn abandon_round(&mut self) {
        robot::reset_robots(&mut self.board, &mut self.robots);
        self.round = Round::new();
        log::info!("round abandoned");
    }

    /// Execute one move of robot `robot` during `Solving`
    ///
    /// A blocked slide still consumes budget: a declared move is a move.
    /// Both a solve and an exhausted budget send the robots home; only the
    /// solve redraws the objective on the next round.
    pub fn move_robot(&mut self, robot: usize, dir: Direction) -> Result<MoveOutcome, Error> {
        if self.round.phase != RoundPhase::Solving {
            return Err(Error::Phase(self.round.phase));
        }
        if robot >= ROBOT_COUNT {
            return Err(Error::BadRobot(robot));
        }
        let Some(objective) = self.round.objective else {
            log::error!("solving phase reached without an objective");
            return Err(Error::NoTargets);
        };

        self.robots[robot].slide(&mut self.board, dir)?;
        self.round.moves_made += 1;

        if is_solved(&self.board, objective, &self.robots) {
            if let Some(bidder) = self.round.active_bidder {
                self.players[bidder].increment_score();
            }
            robot::reset_robots(&mut self.board, &mut self.robots);
            self.round.phase = RoundPhase::Resolved;
            log::info!("objective solved in {} move(s)", self.round.moves_made);
            return Ok(MoveOutcome::Solved);
        }

        if self.round.moves_made >= self.round.budget {
            robot::reset_robots(&mut self.board, &mut self.robots);
            self.round.phase = RoundPhase::Exhausted;
            log::info!("budget of {} spent, objective stands", self.round.budget);
            return Ok(MoveOutcome::Exhausted);
        }

        Ok(MoveOutcome::Continue {
            remaining: self.round.budget - self.round.moves_made,
        })
    }
}
