//! Per-symbol sampling weights derived from the RTP and volatility settings.
//!
//! Weights are relative; nothing here normalises them to sum to one. They are
//! recomputed on every draw, so a configuration change takes effect on the
//! very next cell.

use crate::symbols::Symbol;

/// Weights at 100% RTP and volatility 5, in `Symbol::ALL` order.
pub const BASE_WEIGHTS: [f64; 6] = [1.0, 3.0, 10.0, 15.0, 25.0, 55.0];

pub const NEUTRAL_RTP: f64 = 100.0;
pub const NEUTRAL_VOLATILITY: f64 = 5.0;

/// Lower clamp applied to every adjusted weight.
pub const MIN_WEIGHT: f64 = 1e-6;
/// Upper clamp, keeps the total finite for absurd RTP inputs.
pub const MAX_WEIGHT: f64 = 1e12;

/// Relative weight for each symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights([f64; 6]);

impl Weights {
    pub fn baseline() -> Self {
        Self(BASE_WEIGHTS)
    }

    pub fn get(&self, symbol: Symbol) -> f64 {
        self.0[symbol.to_index() as usize]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, f64)> + '_ {
        Symbol::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// Share of the total held by `symbol`.
    pub fn probability(&self, symbol: Symbol) -> f64 {
        self.get(symbol) / self.total()
    }

    fn slot(&mut self, symbol: Symbol) -> &mut f64 {
        &mut self.0[symbol.to_index() as usize]
    }
}

/// Weights for the given configuration.
///
/// RTP scales the two rarest symbols linearly. Volatility above 5 makes them
/// rarer and pads the most common symbol; below 5 it moves weight from the
/// common symbol to the rare ones. Results are clamped to
/// `[MIN_WEIGHT, MAX_WEIGHT]`.
pub fn symbol_weights(rtp: f64, volatility: f64) -> Weights {
    let mut w = Weights::baseline();

    let rtp_multiplier = rtp / NEUTRAL_RTP;
    *w.slot(Symbol::Shark) *= rtp_multiplier;
    *w.slot(Symbol::Whale) *= rtp_multiplier;

    if volatility > NEUTRAL_VOLATILITY {
        let rarity = 1.0 + (volatility - NEUTRAL_VOLATILITY) * 0.2;
        *w.slot(Symbol::Shark) /= rarity;
        *w.slot(Symbol::Whale) /= rarity * 0.8;
        *w.slot(Symbol::Shell) *= rarity;
    } else if volatility < NEUTRAL_VOLATILITY {
        let equalization = (NEUTRAL_VOLATILITY - volatility) * 2.0;
        *w.slot(Symbol::Shark) += equalization;
        *w.slot(Symbol::Whale) += equalization;
        *w.slot(Symbol::Shell) -= equalization * 2.0;
    }

    for v in w.0.iter_mut() {
        *v = clamp_weight(*v);
    }
    w
}

fn clamp_weight(v: f64) -> f64 {
    if v.is_nan() {
        MIN_WEIGHT
    } else {
        v.clamp(MIN_WEIGHT, MAX_WEIGHT)
    }
}
