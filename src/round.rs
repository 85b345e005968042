//! Round/bidding state machine
//!
//! `AwaitingObjective -> Bidding -> Solving -> {Resolved | Exhausted}`.
//! The bid countdown is a plain deadline checked cooperatively; nothing
//! here spawns a thread or shares mutable state across tasks, and stopping
//! an already-ended window is harmless by construction.

use std::time::{Duration, Instant};

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::board::{Board, Pos};
use crate::consts::BID_DURATION;
use crate::robot::Robot;

/// Phase of the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No objective drawn yet
    AwaitingObjective,
    /// Objective drawn, window open, bids accumulating
    Bidding,
    /// The active bidder executes moves against the declared budget
    Solving,
    /// Solved within budget; score awarded, robots back home
    Resolved,
    /// Budget spent without a solve; a smaller bid may retry the objective
    Exhausted,
}

/// Cooperative bid countdown: a deadline plus an idempotent early stop
#[derive(Debug, Clone)]
pub struct BidTimer {
    deadline: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl BidTimer {
    pub fn new() -> Self {
        Self {
            deadline: None,
            stopped_at: None,
        }
    }

    /// Arm the countdown for `duration` from now
    pub fn start(&mut self, duration: Duration) {
        self.deadline = Some(Instant::now() + duration);
        self.stopped_at = None;
        log::info!("bidding timer started for {}s", duration.as_secs());
    }

    /// Stop early. Idempotent: the first stop records the end instant;
    /// repeats, and stops landing after natural expiry, change nothing
    /// observable.
    pub fn stop(&mut self) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(Instant::now());
        }
    }

    /// Whether the window is still open (armed, not stopped, not expired)
    pub fn is_running(&self) -> bool {
        self.stopped_at.is_none() && self.deadline.is_some_and(|d| Instant::now() < d)
    }

    /// Time left in the window; zero once stopped or expired
    pub fn remaining(&self) -> Duration {
        if self.stopped_at.is_some() {
            return Duration::ZERO;
        }
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => Duration::ZERO,
        }
    }
}

impl Default for BidTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// A declared (player, move budget) announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub player: usize,
    pub moves: u32,
}

/// One round's objective, bids and move budget
#[derive(Debug)]
pub struct Round {
    pub phase: RoundPhase,
    /// Objective tile drawn for this round
    pub objective: Option<Pos>,
    /// Best (lowest) announcement made while the window was open
    pub best_bid: Option<Bid>,
    /// Player currently solving
    pub active_bidder: Option<usize>,
    /// Declared move budget for the active bidder
    pub budget: u32,
    /// Moves consumed so far in `Solving`
    pub moves_made: u32,
    pub timer: BidTimer,
}

impl Round {
    pub fn new() -> Self {
        Self {
            phase: RoundPhase::AwaitingObjective,
            objective: None,
            best_bid: None,
            active_bidder: None,
            budget: 0,
            moves_made: 0,
            timer: BidTimer::new(),
        }
    }

    /// Draw the round's objective uniformly from the board's target list
    /// and open the bidding window
    pub fn draw_objective(&mut self, board: &Board, rng: &mut Pcg32) -> Result<Pos, Error> {
        if self.phase != RoundPhase::AwaitingObjective {
            return Err(Error::Phase(self.phase));
        }
        if board.target_count() == 0 {
            return Err(Error::NoTargets);
        }
        let i = rng.random_range(0..board.target_count());
        let pos = board.target(i).ok_or(Error::NoTargets)?;
        self.objective = Some(pos);
        self.best_bid = None;
        self.active_bidder = None;
        self.budget = 0;
        self.moves_made = 0;
        self.phase = RoundPhase::Bidding;
        self.timer.start(BID_DURATION);
        log::info!("objective drawn at {pos}");
        Ok(pos)
    }

    /// Whether announcements are still being accepted
    pub fn bidding_open(&self) -> bool {
        self.phase == RoundPhase::Bidding && self.timer.is_running()
    }

    pub fn remaining_time(&self) -> Duration {
        self.timer.remaining()
    }

    /// Record a move-budget announcement. Accepted only while the window
    /// is open and only if it beats the best known bid.
    pub fn place_bid(&mut self, player: usize, moves: u32) -> bool {
        if !self.bidding_open() || moves == 0 {
            return false;
        }
        if self.best_bid.is_some_and(|best| best.moves <= moves) {
            return false;
        }
        self.best_bid = Some(Bid { player, moves });
        log::info!("player {} bids {moves} move(s)", player + 1);
        true
    }

    /// Participant readiness signal: close the bidding window early
    pub fn lock_in(&mut self) {
        self.timer.stop();
    }

    /// Hand the round to `player` with their declared `budget`
    ///
    /// Legal from `Bidding` (whether or not the window already closed) and
    /// from `Exhausted`, where the new budget must undercut the spent one.
    pub fn begin_solving(&mut self, player: usize, budget: u32) -> Result<(), Error> {
        match self.phase {
            RoundPhase::Bidding => {}
            RoundPhase::Exhausted if budget < self.budget => {}
            RoundPhase::Exhausted => return Err(Error::BadBudget),
            phase => return Err(Error::Phase(phase)),
        }
        if budget == 0 {
            return Err(Error::BadBudget);
        }
        self.timer.stop();
        self.active_bidder = Some(player);
        self.budget = budget;
        self.moves_made = 0;
        self.phase = RoundPhase::Solving;
        log::info!("player {} sets out to solve in {budget} move(s)", player + 1);
        Ok(())
    }
}

impl Default for Round {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether some robot satisfies the objective: standing on the tile with a
/// matching color, or any robot at all for the multicolor target
pub fn is_solved(board: &Board, objective: Pos, robots: &[Robot]) -> bool {
    let Some(target) = board.get(objective).and_then(|tile| tile.target) else {
        return false;
    };
    robots
        .iter()
        .any(|robot| robot.pos() == objective && target.color.matches(robot.color))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::board::{RobotColor, Target, TargetColor};

    fn board_with_target(pos: Pos, target: Target) -> Board {
        let mut board = Board::new();
        board.tile_mut(pos).target = Some(target);
        board.push_target(pos);
        board
    }

    #[test]
    fn test_timer_with_zero_duration_is_expired() {
        let mut timer = BidTimer::new();
        assert!(!timer.is_running());
        timer.start(Duration::ZERO);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_timer_stop_is_idempotent() {
        let mut timer = BidTimer::new();
        timer.start(Duration::from_secs(60));
        assert!(timer.is_running());

        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), Duration::ZERO);
        let first_stop = timer.stopped_at;

        timer.stop();
        assert_eq!(timer.stopped_at, first_stop);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_draw_objective_opens_bidding() {
        let board = board_with_target(
            Pos::new(3, 3),
            Target {
                symbol: '&',
                color: TargetColor::Red,
            },
        );
        let mut rng = Pcg32::seed_from_u64(1);
        let mut round = Round::new();

        let pos = round.draw_objective(&board, &mut rng).unwrap();
        assert_eq!(pos, Pos::new(3, 3));
        assert_eq!(round.phase, RoundPhase::Bidding);
        assert!(round.bidding_open());

        // A second draw without resolution is a phase error
        assert_eq!(
            round.draw_objective(&board, &mut rng),
            Err(Error::Phase(RoundPhase::Bidding))
        );
    }

    #[test]
    fn test_draw_objective_needs_targets() {
        let board = Board::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut round = Round::new();
        assert_eq!(round.draw_objective(&board, &mut rng), Err(Error::NoTargets));
    }

    #[test]
    fn test_bids_must_undercut() {
        let board = board_with_target(
            Pos::new(3, 3),
            Target {
                symbol: '#',
                color: TargetColor::Blue,
            },
        );
        let mut rng = Pcg32::seed_from_u64(2);
        let mut round = Round::new();
        round.draw_objective(&board, &mut rng).unwrap();

        assert!(round.place_bid(0, 5));
        assert!(!round.place_bid(1, 7));
        assert!(!round.place_bid(1, 5));
        assert!(round.place_bid(1, 3));
        assert!(!round.place_bid(0, 0));
        assert_eq!(round.best_bid, Some(Bid { player: 1, moves: 3 }));
    }

    #[test]
    fn test_lock_in_closes_the_window() {
        let board = board_with_target(
            Pos::new(3, 3),
            Target {
                symbol: '%',
                color: TargetColor::Yellow,
            },
        );
        let mut rng = Pcg32::seed_from_u64(3);
        let mut round = Round::new();
        round.draw_objective(&board, &mut rng).unwrap();

        round.lock_in();
        assert!(!round.bidding_open());
        assert!(!round.place_bid(0, 4));

        // Solving still starts fine after the early close
        round.begin_solving(0, 4).unwrap();
        assert_eq!(round.phase, RoundPhase::Solving);
    }

    #[test]
    fn test_exhausted_retry_needs_smaller_budget() {
        let mut round = Round::new();
        round.phase = RoundPhase::Exhausted;
        round.budget = 4;

        assert_eq!(round.begin_solving(1, 4), Err(Error::BadBudget));
        assert_eq!(round.begin_solving(1, 0), Err(Error::BadBudget));
        round.begin_solving(1, 3).unwrap();
        assert_eq!(round.phase, RoundPhase::Solving);
        assert_eq!(round.moves_made, 0);
    }

    #[test]
    fn test_begin_solving_rejects_wrong_phase() {
        let mut round = Round::new();
        assert_eq!(
            round.begin_solving(0, 3),
            Err(Error::Phase(RoundPhase::AwaitingObjective))
        );
    }

    #[test]
    fn test_solve_detection_by_color() {
        let objective = Pos::new(6, 2);
        let mut board = board_with_target(
            objective,
            Target {
                symbol: '$',
                color: TargetColor::Red,
            },
        );
        let mut robots = [
            Robot::new(RobotColor::Red, 0, Pos::new(0, 0)),
            Robot::new(RobotColor::Blue, 1, Pos::new(1, 0)),
            Robot::new(RobotColor::Green, 2, Pos::new(2, 0)),
            Robot::new(RobotColor::Yellow, 3, Pos::new(3, 0)),
        ];
        assert!(!is_solved(&board, objective, &robots));

        // The wrong color on the tile does not count
        robots[1] = Robot::new(RobotColor::Blue, 1, objective);
        assert!(!is_solved(&board, objective, &robots));

        robots[1] = Robot::new(RobotColor::Blue, 1, Pos::new(1, 0));
        robots[0] = Robot::new(RobotColor::Red, 0, objective);
        assert!(is_solved(&board, objective, &robots));

        // Any color solves the multicolor target
        board.tile_mut(objective).target = Some(Target::special());
        robots[0] = Robot::new(RobotColor::Red, 0, Pos::new(0, 0));
        assert!(is_solved(&board, objective, &robots));
    }
}
