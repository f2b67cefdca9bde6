pub mod config;
pub mod currency;
pub mod engine;
pub mod paytable;
pub mod rng;
pub mod session;
pub mod symbols;
pub mod weights;

pub use crate::config::{ConfigError, EngineConfig, PayMode};
pub use crate::currency::format_korean_currency;
pub use crate::engine::{
    classify, generate_grid, generate_grid_with, sample_symbol, spin, spin_with_seed, verify_grid,
    SpecialEvent, SpinOutcome,
};
pub use crate::paytable::{evaluate, evaluate_with, Evaluation, Payline, WinLine, PAYLINES};
pub use crate::rng::{fresh_seed, RandSource, ScriptedSource, UniformSource};
pub use crate::session::{AutoplayReport, AutoplayStop, Session, SessionError};
pub use crate::symbols::{Cell, Grid, Symbol, REEL_COUNT, ROW_COUNT};
pub use crate::weights::{symbol_weights, Weights};
