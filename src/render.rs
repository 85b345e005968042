//! ANSI terminal view of the board
//!
//! Display only: reads tile state through the public queries, never
//! mutates. Each tile is drawn as a 3-wide cell; walls use doubled lines,
//! plain grid lines mark open tile boundaries.

use crate::board::{Board, Pos, RobotColor, Target, TargetColor};
use crate::consts::BOARD_SIZE;

const RED: &str = "\x1b[1;41m";
const GREEN: &str = "\x1b[1;42m";
const YELLOW: &str = "\x1b[1;43m";
const CYAN: &str = "\x1b[1;46m";
const MAGENTA: &str = "\x1b[1;45m";
const RESET: &str = "\x1b[0m";

fn target_paint(color: TargetColor) -> &'static str {
    match color {
        TargetColor::Red => RED,
        TargetColor::Green => GREEN,
        TargetColor::Blue => CYAN,
        TargetColor::Yellow => YELLOW,
        TargetColor::Multi => MAGENTA,
    }
}

fn robot_paint(color: RobotColor) -> &'static str {
    match color {
        RobotColor::Red => RED,
        RobotColor::Green => GREEN,
        RobotColor::Blue => CYAN,
        RobotColor::Yellow => YELLOW,
    }
}

fn paint_target(target: Target) -> String {
    format!(
        "{}{}{}{}",
        target_paint(target.color),
        target.symbol,
        target.symbol,
        RESET
    )
}

/// The 3-character body of one cell: robot beats target beats empty
fn cell_body(board: &Board, pos: Pos) -> String {
    let tile = board.tile(pos);
    if let Some(color) = tile.robot {
        format!("{} {} {}", robot_paint(color), color.code(), RESET)
    } else if let Some(target) = tile.target {
        format!(" {}", paint_target(target))
    } else {
        "   ".to_string()
    }
}

/// Render the whole board, with the current objective called out on top
pub fn draw(board: &Board, objective: Option<Pos>) -> String {
    let mut out = String::new();

    if let Some(pos) = objective {
        if let Some(target) = board.get(pos).and_then(|tile| tile.target) {
            out.push_str(&format!("objective: {} at {pos}\n", paint_target(target)));
        }
    }

    out.push_str("    ");
    for x in 0..BOARD_SIZE {
        out.push_str(&format!("{x:>3} "));
    }
    out.push('\n');

    for y in 0..BOARD_SIZE {
        // Line of north walls
        out.push_str("    ");
        for x in 0..BOARD_SIZE {
            let tile = board.tile(Pos::new(x, y));
            out.push('+');
            out.push_str(if tile.walls.north { "===" } else { "---" });
        }
        out.push_str("+\n");

        // Line of cells with their west walls
        out.push_str(&format!("{y:>3} "));
        for x in 0..BOARD_SIZE {
            let pos = Pos::new(x, y);
            let tile = board.tile(pos);
            out.push(if tile.walls.west { '\u{2551}' } else { '|' });
            out.push_str(&cell_body(board, pos));
        }
        let east = board.tile(Pos::new(BOARD_SIZE - 1, y)).walls.east;
        out.push(if east { '\u{2551}' } else { '|' });
        out.push('\n');
    }

    // Bottom border
    out.push_str("    ");
    for x in 0..BOARD_SIZE {
        let tile = board.tile(Pos::new(x, BOARD_SIZE - 1));
        out.push('+');
        out.push_str(if tile.walls.south { "===" } else { "---" });
    }
    out.push_str("+\n");

    out
}
