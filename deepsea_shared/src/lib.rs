use serde::{Deserialize, Serialize};

use deepsea_core::{Cell, PayMode, SpecialEvent, SpinOutcome, Symbol, WinLine};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpinRequest {
    pub bet: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WinLineDto {
    pub line: u8,
    pub symbol: u8,
    pub count: u8,
    /// Row-major cell indices (`row * 5 + reel`)
    pub indices: Vec<usize>,
    pub amount: f64,
}

impl From<&WinLine> for WinLineDto {
    fn from(w: &WinLine) -> Self {
        Self {
            line: w.line,
            symbol: w.symbol.to_index(),
            count: w.count,
            indices: w.cells.iter().map(|c: &Cell| c.flat_index()).collect(),
            amount: w.amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpinResponse {
    pub nonce: u64,
    pub seed: u64,
    pub reels: Vec<Vec<u8>>, // indices of symbols, reel by reel
    pub wins: Vec<WinLineDto>,
    pub total_win: f64,
    pub special_event: Option<SpecialEvent>,
}

impl SpinResponse {
    pub fn from_outcome(nonce: u64, seed: u64, outcome: &SpinOutcome) -> Self {
        Self {
            nonce,
            seed,
            reels: outcome.grid.to_indices(),
            wins: outcome.win_lines.iter().map(WinLineDto::from).collect(),
            total_win: outcome.total_win,
            special_event: outcome.special_event,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParamsResponse {
    pub rtp: f64,
    pub volatility: f64,
    pub pay_mode: PayMode,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminSetParamsRequest {
    pub rtp: f64,
    pub volatility: f64,
    #[serde(default)]
    pub pay_mode: PayMode,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SymbolInfo {
    pub index: u8,
    pub symbol: Symbol,
    pub label: String,
    pub payouts: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaytableResponse {
    pub symbols: Vec<SymbolInfo>,
    /// Row crossed on each reel, per payline
    pub paylines: Vec<Vec<u8>>,
}

impl PaytableResponse {
    pub fn current() -> Self {
        Self {
            symbols: Symbol::ALL
                .iter()
                .map(|&symbol| SymbolInfo {
                    index: symbol.to_index(),
                    symbol,
                    label: symbol.label().to_string(),
                    payouts: symbol.payouts().to_vec(),
                })
                .collect(),
            paylines: deepsea_core::PAYLINES
                .iter()
                .map(|p| p.rows.to_vec())
                .collect(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal server error")]
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepsea_core::Grid;

    #[test]
    fn spin_response_uses_flat_indices() {
        let outcome = SpinOutcome {
            grid: Grid::filled(Symbol::Turtle),
            win_lines: vec![WinLine {
                line: 1,
                symbol: Symbol::Turtle,
                count: 3,
                cells: vec![Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)],
                amount: 100.0,
            }],
            total_win: 100.0,
            special_event: None,
        };
        let resp = SpinResponse::from_outcome(3, 99, &outcome);
        assert_eq!(resp.wins[0].indices, vec![5, 6, 7]);
        assert_eq!(resp.wins[0].symbol, 2);
        assert_eq!(resp.reels, vec![vec![2, 2, 2]; 5]);
    }

    #[test]
    fn paytable_lists_everything() {
        let p = PaytableResponse::current();
        assert_eq!(p.symbols.len(), 6);
        assert_eq!(p.paylines.len(), 20);
        assert_eq!(p.symbols[0].payouts, vec![0.0, 0.0, 100.0, 500.0, 2000.0]);
    }

    #[test]
    fn special_event_wire_name() {
        let json = serde_json::to_string(&Some(SpecialEvent::SharkJackpot)).unwrap();
        assert_eq!(json, "\"SHARK_JACKPOT\"");
        let req: AdminSetParamsRequest =
            serde_json::from_str(r#"{"rtp":110,"volatility":3,"pay_mode":"highest_line"}"#)
                .unwrap();
        assert_eq!(req.pay_mode, PayMode::HighestLine);
    }
}
