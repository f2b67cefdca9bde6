use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::{EngineConfig, BIG_WIN_MULTIPLIER},
    paytable::{evaluate_with, WinLine},
    rng::{RandSource, UniformSource},
    symbols::{Grid, Symbol, REEL_COUNT, ROW_COUNT},
    weights::{symbol_weights, Weights},
};

/// Presentation-level highlight for a finished spin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialEvent {
    /// Five sharks on a line
    SharkJackpot,
    /// Five whales on a line
    WhaleJackpot,
    /// Total win above `BIG_WIN_MULTIPLIER` bets
    BigWin,
}

impl SpecialEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            SpecialEvent::SharkJackpot => "SHARK_JACKPOT",
            SpecialEvent::WhaleJackpot => "WHALE_JACKPOT",
            SpecialEvent::BigWin => "BIG_WIN",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpinOutcome {
    pub grid: Grid,
    pub win_lines: Vec<WinLine>,
    pub total_win: f64,
    pub special_event: Option<SpecialEvent>,
}

/// Draw one symbol by walking the cumulative weights.
pub fn sample_symbol<S>(weights: &Weights, source: &mut S) -> Symbol
where
    S: UniformSource + ?Sized,
{
    let u = source.next_unit();
    let u = if u.is_finite() { u.clamp(0.0, 1.0) } else { 0.0 };
    let mut r = u * weights.total();
    for (symbol, weight) in weights.iter() {
        if r < weight {
            return symbol;
        }
        r -= weight;
    }
    // only reachable through rounding at u -> 1
    Symbol::Shell
}

/// Fill a fresh grid, sampling each cell independently. Weights are derived
/// from `rtp` and `volatility` on every call.
pub fn generate_grid_with<S>(rtp: f64, volatility: f64, source: &mut S) -> Grid
where
    S: UniformSource + ?Sized,
{
    let mut grid = Grid::filled(Symbol::Shell);
    for reel in 0..REEL_COUNT {
        for row in 0..ROW_COUNT {
            let weights = symbol_weights(rtp, volatility);
            grid.reels[reel][row] = sample_symbol(&weights, source);
        }
    }
    grid
}

/// `generate_grid_with` over the thread-local generator.
pub fn generate_grid(rtp: f64, volatility: f64) -> Grid {
    let mut source = RandSource::new(rand::thread_rng());
    generate_grid_with(rtp, volatility, &mut source)
}

/// Special event for an evaluated spin, by priority: five sharks, five
/// whales, then total win strictly above ten bets.
pub fn classify(win_lines: &[WinLine], total_win: f64, bet: f64) -> Option<SpecialEvent> {
    let five_of = |symbol: Symbol| {
        win_lines
            .iter()
            .any(|w| w.symbol == symbol && w.count as usize == REEL_COUNT)
    };
    if five_of(Symbol::Shark) {
        Some(SpecialEvent::SharkJackpot)
    } else if five_of(Symbol::Whale) {
        Some(SpecialEvent::WhaleJackpot)
    } else if total_win > bet * BIG_WIN_MULTIPLIER {
        Some(SpecialEvent::BigWin)
    } else {
        None
    }
}

/// Generate, evaluate and classify one spin.
pub fn spin<S>(config: &EngineConfig, bet: f64, source: &mut S) -> SpinOutcome
where
    S: UniformSource + ?Sized,
{
    let grid = generate_grid_with(config.rtp, config.volatility, source);
    let evaluation = evaluate_with(&grid, bet, config.pay_mode);
    let special_event = classify(&evaluation.win_lines, evaluation.total_win, bet);
    debug!(
        bet,
        total_win = evaluation.total_win,
        lines = evaluation.win_lines.len(),
        ?special_event,
        "spin evaluated"
    );
    SpinOutcome {
        grid,
        win_lines: evaluation.win_lines,
        total_win: evaluation.total_win,
        special_event,
    }
}

/// Spin from a logged seed. Same seed and config, same grid.
pub fn spin_with_seed(config: &EngineConfig, bet: f64, seed: u64) -> SpinOutcome {
    let mut source = RandSource::seeded(seed);
    spin(config, bet, &mut source)
}

/// Check that a stored grid is what `seed` produces under `config`.
pub fn verify_grid(config: &EngineConfig, seed: u64, expected: &[Vec<u8>]) -> bool {
    let mut source = RandSource::seeded(seed);
    let grid = generate_grid_with(config.rtp, config.volatility, &mut source);
    grid.to_indices() == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;
    use crate::symbols::Cell;

    // Cumulative baseline: Shark [0,1) Whale [1,4) Turtle [4,14)
    // Jellyfish [14,29) Starfish [29,54) Shell [54,109)
    fn unit(at: f64) -> f64 {
        at / 109.0
    }

    #[test]
    fn sampler_walks_cumulative_weights() {
        let w = Weights::baseline();
        let cases = [
            (0.0, Symbol::Shark),
            (0.9, Symbol::Shark),
            (1.1, Symbol::Whale),
            (3.5, Symbol::Whale),
            (4.5, Symbol::Turtle),
            (20.0, Symbol::Jellyfish),
            (53.5, Symbol::Starfish),
            (54.5, Symbol::Shell),
            (108.5, Symbol::Shell),
        ];
        for (at, expected) in cases {
            let mut src = ScriptedSource::new(vec![unit(at)]);
            assert_eq!(sample_symbol(&w, &mut src), expected, "at {at}");
        }
    }

    #[test]
    fn sampler_tolerates_edge_values() {
        let w = Weights::baseline();
        for u in [1.0, 1.5, -0.5, f64::NAN, f64::INFINITY] {
            let mut src = ScriptedSource::new(vec![u]);
            let _ = sample_symbol(&w, &mut src);
        }
        let mut src = ScriptedSource::new(vec![1.0]);
        assert_eq!(sample_symbol(&w, &mut src), Symbol::Shell);
        let mut src = ScriptedSource::new(vec![-0.5]);
        assert_eq!(sample_symbol(&w, &mut src), Symbol::Shark);
    }

    #[test]
    fn grid_uses_fifteen_draws_reel_by_reel() {
        let mut values = vec![unit(100.0); 15];
        values[0] = unit(0.5); // reel 0 row 0
        values[4] = unit(2.0); // reel 1 row 1
        let mut src = ScriptedSource::new(values);
        let grid = generate_grid_with(100.0, 5.0, &mut src);
        assert_eq!(src.consumed(), 15);
        assert_eq!(grid.at(Cell::new(0, 0)), Symbol::Shark);
        assert_eq!(grid.at(Cell::new(1, 1)), Symbol::Whale);
        assert_eq!(grid.at(Cell::new(4, 2)), Symbol::Shell);
    }

    #[test]
    fn classification_priority() {
        let line = |symbol, count| WinLine {
            line: 0,
            symbol,
            count,
            cells: Vec::new(),
            amount: 0.0,
        };
        let both = [line(Symbol::Whale, 5), line(Symbol::Shark, 5)];
        assert_eq!(classify(&both, 0.0, 100.0), Some(SpecialEvent::SharkJackpot));
        let whale = [line(Symbol::Whale, 5), line(Symbol::Shark, 4)];
        assert_eq!(
            classify(&whale, 5000.0, 100.0),
            Some(SpecialEvent::WhaleJackpot)
        );
        assert_eq!(classify(&[], 1000.01, 100.0), Some(SpecialEvent::BigWin));
        assert_eq!(classify(&[], 1000.0, 100.0), None);
        assert_eq!(classify(&[line(Symbol::Shark, 4)], 250.0, 100.0), None);
    }

    #[test]
    fn test_spin_deterministic() {
        let config = EngineConfig::default();
        let out1 = spin_with_seed(&config, 100.0, 1);
        let out2 = spin_with_seed(&config, 100.0, 1);
        assert_eq!(out1, out2);
        assert!(verify_grid(&config, 1, &out1.grid.to_indices()));
    }

    #[test]
    fn all_shark_script_is_a_shark_jackpot() {
        let mut src = ScriptedSource::new(vec![0.0]);
        let out = spin(&EngineConfig::default(), 100.0, &mut src);
        assert_eq!(out.grid, Grid::filled(Symbol::Shark));
        assert_eq!(out.win_lines.len(), 20);
        assert_eq!(out.total_win, 20.0 * 5.0 * 2000.0);
        assert_eq!(out.special_event, Some(SpecialEvent::SharkJackpot));
    }
}
