use serde::{Deserialize, Serialize};

use crate::config::PayMode;
use crate::symbols::{Cell, Grid, Symbol, MIN_PAYING_MATCH, REEL_COUNT};

pub const PAYLINE_COUNT: usize = 20;

/// A payline, given as the row it crosses on each reel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payline {
    pub index: u8,
    pub rows: [u8; REEL_COUNT],
}

impl Payline {
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(reel, &row)| Cell::new(reel as u8, row))
    }
}

const fn line(index: u8, rows: [u8; REEL_COUNT]) -> Payline {
    Payline { index, rows }
}

pub const PAYLINES: [Payline; PAYLINE_COUNT] = [
    // straight
    line(0, [0, 0, 0, 0, 0]),
    line(1, [1, 1, 1, 1, 1]),
    line(2, [2, 2, 2, 2, 2]),
    // V
    line(3, [0, 1, 2, 1, 0]),
    line(4, [2, 1, 0, 1, 2]),
    // zig-zag
    line(5, [0, 0, 1, 0, 0]),
    line(6, [2, 2, 1, 2, 2]),
    line(7, [1, 0, 0, 0, 1]),
    line(8, [1, 2, 2, 2, 1]),
    line(9, [0, 1, 1, 1, 0]),
    line(10, [2, 1, 1, 1, 2]),
    // diagonal steps
    line(11, [0, 0, 1, 2, 2]),
    line(12, [2, 2, 1, 0, 0]),
    // W
    line(13, [1, 0, 1, 0, 1]),
    line(14, [1, 2, 1, 2, 1]),
    line(15, [0, 1, 0, 1, 0]),
    line(16, [2, 1, 2, 1, 2]),
    line(17, [1, 1, 0, 1, 1]),
    line(18, [1, 1, 2, 1, 1]),
    line(19, [0, 2, 0, 2, 0]),
];

/// One credited payline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WinLine {
    /// Payline index
    pub line: u8,
    pub symbol: Symbol,
    /// Contiguous matches from reel 0
    pub count: u8,
    /// Only the matched run
    pub cells: Vec<Cell>,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub win_lines: Vec<WinLine>,
    pub total_win: f64,
}

impl Evaluation {
    pub fn is_win(&self) -> bool {
        !self.win_lines.is_empty()
    }

    /// Distinct winning cells across all lines, in first-seen order.
    pub fn winning_cells(&self) -> Vec<Cell> {
        let mut out: Vec<Cell> = Vec::new();
        for cell in self.win_lines.iter().flat_map(|w| w.cells.iter()) {
            if !out.contains(cell) {
                out.push(*cell);
            }
        }
        out
    }
}

/// Length of the run of `first`-matching symbols starting at reel 0, and the
/// symbol itself. Always in `1..=5`.
pub fn line_run(grid: &Grid, payline: &Payline) -> (Symbol, u8) {
    let first = grid.at(Cell::new(0, payline.rows[0]));
    let mut count = 1u8;
    for cell in payline.cells().skip(1) {
        if grid.at(cell) != first {
            break;
        }
        count += 1;
    }
    (first, count)
}

fn evaluate_line(grid: &Grid, payline: &Payline, bet_per_line: f64) -> Option<WinLine> {
    let (symbol, count) = line_run(grid, payline);
    if count < MIN_PAYING_MATCH {
        return None;
    }
    let multiplier = symbol.multiplier(count);
    if multiplier <= 0.0 {
        return None;
    }
    Some(WinLine {
        line: payline.index,
        symbol,
        count,
        cells: payline.cells().take(count as usize).collect(),
        amount: bet_per_line * multiplier,
    })
}

/// Evaluate all 20 paylines, crediting every winning line.
pub fn evaluate(grid: &Grid, bet: f64) -> Evaluation {
    evaluate_with(grid, bet, PayMode::AllLines)
}

/// Evaluate all 20 paylines. The bet is split evenly over the full set of
/// lines regardless of mode.
pub fn evaluate_with(grid: &Grid, bet: f64, mode: PayMode) -> Evaluation {
    let bet_per_line = bet / PAYLINE_COUNT as f64;
    let mut win_lines: Vec<WinLine> = PAYLINES
        .iter()
        .filter_map(|payline| evaluate_line(grid, payline, bet_per_line))
        .collect();

    if mode == PayMode::HighestLine && win_lines.len() > 1 {
        let mut best = 0;
        for (i, w) in win_lines.iter().enumerate() {
            if w.amount > win_lines[best].amount {
                best = i;
            }
        }
        win_lines = vec![win_lines.swap_remove(best)];
    }

    let total_win = win_lines.iter().map(|w| w.amount).sum();
    Evaluation {
        win_lines,
        total_win,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Symbol::*;

    #[test]
    fn paylines_cover_every_reel_in_order() {
        for (i, line) in PAYLINES.iter().enumerate() {
            assert_eq!(line.index as usize, i);
            let cells: Vec<Cell> = line.cells().collect();
            assert_eq!(cells.len(), REEL_COUNT);
            for (reel, cell) in cells.iter().enumerate() {
                assert_eq!(cell.reel as usize, reel);
                assert!(cell.row < 3);
            }
        }
    }

    #[test]
    fn paylines_are_distinct() {
        for (i, a) in PAYLINES.iter().enumerate() {
            for b in &PAYLINES[i + 1..] {
                assert_ne!(a.rows, b.rows, "lines {} and {}", a.index, b.index);
            }
        }
    }

    #[test]
    fn five_sharks_on_top_row() {
        let grid = Grid::from_rows([
            [Shark, Shark, Shark, Shark, Shark],
            [Shell, Starfish, Shell, Starfish, Shell],
            [Turtle, Jellyfish, Turtle, Jellyfish, Turtle],
        ]);
        let eval = evaluate(&grid, 100.0);
        let top: Vec<_> = eval.win_lines.iter().filter(|w| w.line == 0).collect();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].symbol, Shark);
        assert_eq!(top[0].count, 5);
        assert_eq!(top[0].amount, 10_000.0);
        assert_eq!(top[0].cells.len(), 5);
    }

    #[test]
    fn broken_run_does_not_pay() {
        let grid = Grid::from_rows([
            [Shark, Shark, Turtle, Shark, Shark],
            [Shell, Starfish, Shell, Starfish, Shell],
            [Jellyfish, Whale, Jellyfish, Whale, Jellyfish],
        ]);
        assert_eq!(line_run(&grid, &PAYLINES[0]), (Shark, 2));
        let eval = evaluate(&grid, 100.0);
        assert!(eval.win_lines.iter().all(|w| w.line != 0));
    }

    #[test]
    fn only_the_contiguous_cells_are_reported() {
        let grid = Grid::from_rows([
            [Whale, Whale, Whale, Shell, Whale],
            [Shell, Starfish, Shell, Starfish, Shell],
            [Jellyfish, Turtle, Jellyfish, Turtle, Jellyfish],
        ]);
        let eval = evaluate(&grid, 20.0);
        let w = eval.win_lines.iter().find(|w| w.line == 0).unwrap();
        assert_eq!(w.count, 3);
        assert_eq!(
            w.cells,
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]
        );
        assert_eq!(w.amount, 50.0);
    }

    #[test]
    fn all_lines_are_summed() {
        let grid = Grid::filled(Shell);
        let eval = evaluate(&grid, 20.0);
        assert_eq!(eval.win_lines.len(), PAYLINE_COUNT);
        assert_eq!(eval.total_win, 20.0 * 30.0);
        assert_eq!(eval.winning_cells().len(), 15);
    }

    #[test]
    fn highest_line_mode_keeps_one_line() {
        let grid = Grid::from_rows([
            [Shark, Shark, Shark, Shark, Shark],
            [Shell, Shell, Shell, Shell, Shell],
            [Turtle, Jellyfish, Turtle, Jellyfish, Turtle],
        ]);
        let all = evaluate(&grid, 100.0);
        assert!(all.win_lines.len() > 1);
        let best = evaluate_with(&grid, 100.0, PayMode::HighestLine);
        assert_eq!(best.win_lines.len(), 1);
        assert_eq!(best.win_lines[0].line, 0);
        assert_eq!(best.total_win, 10_000.0);
    }

    #[test]
    fn zero_bet_still_reports_lines() {
        let eval = evaluate(&Grid::filled(Turtle), 0.0);
        assert_eq!(eval.win_lines.len(), PAYLINE_COUNT);
        assert_eq!(eval.total_win, 0.0);
    }
}
