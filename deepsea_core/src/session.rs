use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::{EngineConfig, BET_STEP, DEFAULT_BET, INITIAL_BALANCE, MIN_BET},
    engine::{spin, SpinOutcome},
    rng::UniformSource,
};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("balance {balance} cannot cover bet {bet}")]
    InsufficientBalance { balance: f64, bet: f64 },
    #[error("invalid bet: {0}")]
    InvalidBet(f64),
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),
}

/// One player's balance and table settings. Every round runs
/// deduct -> spin -> credit while holding `&mut self`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub balance: f64,
    pub bet: f64,
    pub config: EngineConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(INITIAL_BALANCE, EngineConfig::default())
    }
}

/// Why auto-play stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AutoplayStop {
    RoundLimit,
    InsufficientBalance,
    InvalidBet,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutoplayReport {
    pub rounds: u32,
    pub total_bet: f64,
    pub total_win: f64,
    /// Rounds that ended in a special event; play carries on after each.
    pub special_events: u32,
    pub stopped_by: AutoplayStop,
}

fn is_valid_bet(bet: f64) -> bool {
    bet.is_finite() && bet >= MIN_BET && bet % BET_STEP == 0.0
}

impl Session {
    pub fn new(balance: f64, config: EngineConfig) -> Self {
        Self {
            balance,
            bet: DEFAULT_BET,
            config,
        }
    }

    /// Any finite multiple of `BET_STEP` no smaller than `MIN_BET`.
    pub fn set_bet(&mut self, bet: f64) -> Result<(), SessionError> {
        if !is_valid_bet(bet) {
            return Err(SessionError::InvalidBet(bet));
        }
        self.bet = bet;
        Ok(())
    }

    /// Raise the bet by one step. There is no ceiling.
    pub fn bet_increment(&mut self) -> f64 {
        self.bet += BET_STEP;
        self.bet
    }

    /// Lower the bet by one step, stopping at `MIN_BET`.
    pub fn bet_decrement(&mut self) -> f64 {
        self.bet = (self.bet - BET_STEP).max(MIN_BET);
        self.bet
    }

    pub fn can_spin(&self) -> bool {
        self.bet.is_finite() && self.bet >= 0.0 && self.balance >= self.bet
    }

    /// Play one round. The balance is untouched when the round is refused.
    pub fn play<S>(&mut self, source: &mut S) -> Result<SpinOutcome, SessionError>
    where
        S: UniformSource + ?Sized,
    {
        if !self.bet.is_finite() || self.bet < 0.0 {
            return Err(SessionError::InvalidBet(self.bet));
        }
        if self.balance < self.bet {
            return Err(SessionError::InsufficientBalance {
                balance: self.balance,
                bet: self.bet,
            });
        }

        self.balance -= self.bet;
        let outcome = spin(&self.config, self.bet, source);
        self.balance += outcome.total_win;
        debug!(balance = self.balance, win = outcome.total_win, "round settled");
        Ok(outcome)
    }

    pub fn coin_in(&mut self, amount: f64) -> Result<(), SessionError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SessionError::InvalidAmount(amount));
        }
        self.balance += amount;
        Ok(())
    }

    /// Empty the balance, returning what was paid out.
    pub fn cash_out(&mut self) -> f64 {
        std::mem::take(&mut self.balance)
    }

    /// Play rounds back to back until `max_rounds` or a bet that cannot be
    /// played. Special events are counted and handed to `on_round` like any
    /// other round; they do not end the run.
    pub fn autoplay<S, F>(
        &mut self,
        source: &mut S,
        max_rounds: u32,
        mut on_round: F,
    ) -> AutoplayReport
    where
        S: UniformSource + ?Sized,
        F: FnMut(u32, &SpinOutcome, &Session),
    {
        let mut report = AutoplayReport {
            rounds: 0,
            total_bet: 0.0,
            total_win: 0.0,
            special_events: 0,
            stopped_by: AutoplayStop::RoundLimit,
        };
        while report.rounds < max_rounds {
            let outcome = match self.play(source) {
                Ok(outcome) => outcome,
                Err(SessionError::InsufficientBalance { .. }) => {
                    report.stopped_by = AutoplayStop::InsufficientBalance;
                    break;
                }
                Err(_) => {
                    report.stopped_by = AutoplayStop::InvalidBet;
                    break;
                }
            };
            report.rounds += 1;
            report.total_bet += self.bet;
            report.total_win += outcome.total_win;
            if outcome.special_event.is_some() {
                report.special_events += 1;
            }
            on_round(report.rounds, &outcome, self);
        }
        info!(
            rounds = report.rounds,
            total_bet = report.total_bet,
            total_win = report.total_win,
            special_events = report.special_events,
            stopped_by = ?report.stopped_by,
            "autoplay finished"
        );
        report
    }
}
