//! Terminal front end: wiring, prompts and the input loops
//!
//! All parsing and re-prompting lives here; the library only ever sees
//! validated player indices, budgets and directions.

use std::io::{self, BufRead};

use rebound_robots::consts::ROBOT_COUNT;
use rebound_robots::{Direction, Game, MoveOutcome, ScoreBoard, render};

/// How a solving attempt ended
enum SolveEnd {
    Solved,
    Exhausted,
    Abandoned,
}

/// Line-based stdin wrapper; `None` everywhere means the input closed
struct Input {
    lines: io::Lines<io::StdinLock<'static>>,
}

impl Input {
    fn new() -> Self {
        Self {
            lines: io::stdin().lock().lines(),
        }
    }

    fn line(&mut self) -> Option<String> {
        match self.lines.next() {
            Some(Ok(line)) => Some(line.trim().to_string()),
            _ => None,
        }
    }

    /// Prompt for a number at least `min`, re-asking on anything else
    fn number(&mut self, prompt: &str, min: u32) -> Option<u32> {
        loop {
            println!("{prompt}");
            match self.line()?.parse::<u32>() {
                Ok(n) if n >= min => return Some(n),
                _ => println!("Invalid number, try again."),
            }
        }
    }
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    log::info!("session seed: {seed}");

    let mut input = Input::new();
    let Some(player_count) = input.number("Enter the number of players:", 1) else {
        return;
    };
    let mut game = Game::new(seed, player_count as usize);

    run(&mut game, &mut input);

    let mut scores = ScoreBoard::load();
    for player in &game.players {
        scores.record(player.number, player.score, seed);
    }
    scores.save();
    println!("Final scores:");
    for player in &game.players {
        println!("  player {}: {} point(s)", player.number + 1, player.score);
    }
}

/// Top-level control loop: new round, new board, exit
fn run(game: &mut Game, input: &mut Input) {
    loop {
        println!("{}", render::draw(&game.board, None));
        println!("Controls: n = new round, b = new board, e = exit");
        let Some(command) = input.line() else { return };
        match command.as_str() {
            "n" => {
                if play_round(game, input).is_none() {
                    return;
                }
            }
            "b" => game.regenerate_board(),
            "e" => return,
            _ => println!("Unknown input."),
        }
    }
}

/// One full round: objective, bids, then solving attempts
fn play_round(game: &mut Game, input: &mut Input) -> Option<()> {
    let objective = match game.begin_round() {
        Ok(pos) => pos,
        Err(err) => {
            println!("Cannot start a round: {err}");
            return Some(());
        }
    };
    println!("{}", render::draw(&game.board, Some(objective)));
    println!(
        "Each player looks for the shortest way to bring the matching robot onto the objective."
    );
    println!("Bid with `<player> <moves>`; enter `s` to lock the bids in early.");

    while game.round().bidding_open() {
        println!("{}s left to bid...", game.round().remaining_time().as_secs());
        let line = input.line()?;
        if !game.round().bidding_open() {
            println!("Time is up.");
            break;
        }
        if line == "s" {
            game.lock_in();
            break;
        }
        match parse_bid(&line) {
            Some((player, moves)) if player >= 1 && player <= game.players.len() => {
                match game.bid(player - 1, moves) {
                    Ok(true) => println!("Player {player} bids {moves}."),
                    Ok(false) => println!("Bid not accepted."),
                    Err(err) => println!("{err}"),
                }
            }
            _ => println!("Unknown input."),
        }
    }

    // Solvers take turns until the objective falls or the round is given up
    loop {
        let player = input.number("Enter the number of the player with the best solution:", 1)?;
        if player as usize > game.players.len() {
            println!("Invalid player number, please enter a valid player number.");
            continue;
        }
        let moves = input.number("Enter the number of moves the player thinks it takes:", 1)?;
        if let Err(err) = game.start_solving(player as usize - 1, moves) {
            println!("{err}");
            continue;
        }
        match solve(game, input)? {
            SolveEnd::Solved => {
                println!("Board solved!");
                return Some(());
            }
            SolveEnd::Exhausted => {
                println!("Move count reached, next player with the best solution can play.");
            }
            SolveEnd::Abandoned => {
                game.abandon_round();
                return Some(());
            }
        }
    }
}

/// Drive robots until the round ends one way or the other
fn solve(game: &mut Game, input: &mut Input) -> Option<SolveEnd> {
    let mut selected = 0usize;
    loop {
        println!("Current robot: {}", game.robots[selected].color.name());
        println!("Controls: z = up, s = down, q = left, d = right, n = next robot, e = give up");
        let dir = match input.line()?.as_str() {
            "z" => Direction::North,
            "s" => Direction::South,
            "q" => Direction::West,
            "d" => Direction::East,
            "n" => {
                selected = (selected + 1) % ROBOT_COUNT;
                continue;
            }
            "e" => return Some(SolveEnd::Abandoned),
            _ => {
                println!("Unknown input.");
                continue;
            }
        };
        match game.move_robot(selected, dir) {
            Ok(MoveOutcome::Continue { remaining }) => {
                println!("{}", render::draw(&game.board, game.round().objective));
                println!("Moves remaining: {remaining}");
            }
            Ok(MoveOutcome::Solved) => return Some(SolveEnd::Solved),
            Ok(MoveOutcome::Exhausted) => return Some(SolveEnd::Exhausted),
            Err(err) => println!("{err}"),
        }
    }
}

/// Parse a `<player> <moves>` announcement
fn parse_bid(line: &str) -> Option<(usize, u32)> {
    let mut parts = line.split_whitespace();
    let player = parts.next()?.parse().ok()?;
    let moves = parts.next()?.parse().ok()?;
    parts.next().is_none().then_some((player, moves))
}
