use serde::{Deserialize, Serialize};

use crate::weights::{NEUTRAL_RTP, NEUTRAL_VOLATILITY};

pub const RTP_MIN: f64 = 50.0;
pub const RTP_MAX: f64 = 200.0;
pub const VOLATILITY_MIN: f64 = 1.0;
pub const VOLATILITY_MAX: f64 = 10.0;

pub const INITIAL_BALANCE: f64 = 10_000.0;
pub const DEFAULT_BET: f64 = 100.0;
/// Quick-select presets; any multiple of `BET_STEP` from `MIN_BET` up is allowed.
pub const BET_OPTIONS: [f64; 3] = [100.0, 200.0, 1000.0];
pub const MIN_BET: f64 = 100.0;
pub const BET_STEP: f64 = 100.0;
pub const AUTO_SPIN_DELAY_MS: u64 = 800;
/// A spin paying more than this many bets counts as a big win.
pub const BIG_WIN_MULTIPLIER: f64 = 10.0;

/// How line wins combine into the spin total.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayMode {
    /// Every winning payline is credited.
    #[default]
    AllLines,
    /// Only the single best payline is credited.
    HighestLine,
}

impl PayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PayMode::AllLines => "all_lines",
            PayMode::HighestLine => "highest_line",
        }
    }
}

impl std::str::FromStr for PayMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all_lines" => Ok(PayMode::AllLines),
            "highest_line" => Ok(PayMode::HighestLine),
            other => Err(ConfigError::PayMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    pub rtp: f64,
    pub volatility: f64,
    #[serde(default)]
    pub pay_mode: PayMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rtp: NEUTRAL_RTP,
            volatility: NEUTRAL_VOLATILITY,
            pay_mode: PayMode::AllLines,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("rtp {0} outside [{RTP_MIN}, {RTP_MAX}]")]
    Rtp(f64),
    #[error("volatility {0} outside [{VOLATILITY_MIN}, {VOLATILITY_MAX}]")]
    Volatility(f64),
    #[error("unknown pay mode {0:?}")]
    PayMode(String),
}

impl EngineConfig {
    pub fn new(rtp: f64, volatility: f64) -> Self {
        Self {
            rtp,
            volatility,
            pay_mode: PayMode::default(),
        }
    }

    pub fn with_pay_mode(mut self, pay_mode: PayMode) -> Self {
        self.pay_mode = pay_mode;
        self
    }

    /// Range check for settings coming from users or storage. The engine
    /// accepts anything; this is for callers that want to refuse it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(RTP_MIN..=RTP_MAX).contains(&self.rtp) {
            return Err(ConfigError::Rtp(self.rtp));
        }
        if !(VOLATILITY_MIN..=VOLATILITY_MAX).contains(&self.volatility) {
            return Err(ConfigError::Volatility(self.volatility));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            EngineConfig::new(49.0, 5.0).validate(),
            Err(ConfigError::Rtp(49.0))
        );
        assert_eq!(
            EngineConfig::new(100.0, 11.0).validate(),
            Err(ConfigError::Volatility(11.0))
        );
        assert!(EngineConfig::new(f64::NAN, 5.0).validate().is_err());
    }

    #[test]
    fn pay_mode_names() {
        for mode in [PayMode::AllLines, PayMode::HighestLine] {
            assert_eq!(mode.as_str().parse::<PayMode>(), Ok(mode));
        }
        assert!("best".parse::<PayMode>().is_err());
    }

    #[test]
    fn pay_mode_defaults_when_missing() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"rtp":120,"volatility":7}"#).unwrap();
        assert_eq!(cfg.pay_mode, PayMode::AllLines);
        assert_eq!(cfg.rtp, 120.0);
    }
}
