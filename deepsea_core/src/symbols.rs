use serde::{Deserialize, Serialize};

pub const REEL_COUNT: usize = 5;
pub const ROW_COUNT: usize = 3;
/// Payout tables cover match counts 1..=5, indexed by `count - 1`.
pub const MAX_MATCH: usize = REEL_COUNT;
pub const MIN_PAYING_MATCH: u8 = 3;

/// Reel symbols, rarest (highest paying) first. The declaration order is the
/// sampling walk order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Symbol {
    Shark,
    Whale,
    Turtle,
    Jellyfish,
    Starfish,
    Shell,
}

impl Symbol {
    pub const ALL: [Symbol; 6] = [
        Symbol::Shark,
        Symbol::Whale,
        Symbol::Turtle,
        Symbol::Jellyfish,
        Symbol::Starfish,
        Symbol::Shell,
    ];

    pub fn from_index(i: u8) -> Option<Self> {
        Self::ALL.get(i as usize).copied()
    }

    pub fn to_index(self) -> u8 {
        match self {
            Symbol::Shark => 0,
            Symbol::Whale => 1,
            Symbol::Turtle => 2,
            Symbol::Jellyfish => 3,
            Symbol::Starfish => 4,
            Symbol::Shell => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Symbol::Shark => "상어",
            Symbol::Whale => "고래",
            Symbol::Turtle => "거북이",
            Symbol::Jellyfish => "해파리",
            Symbol::Starfish => "불가사리",
            Symbol::Shell => "조개",
        }
    }

    /// Multipliers for 1..=5 matches. The first two entries never pay.
    pub fn payouts(self) -> [f64; MAX_MATCH] {
        match self {
            Symbol::Shark => [0.0, 0.0, 100.0, 500.0, 2000.0],
            Symbol::Whale => [0.0, 0.0, 50.0, 200.0, 1000.0],
            Symbol::Turtle => [0.0, 0.0, 20.0, 80.0, 300.0],
            Symbol::Jellyfish => [0.0, 0.0, 10.0, 40.0, 150.0],
            Symbol::Starfish => [0.0, 0.0, 5.0, 15.0, 60.0],
            Symbol::Shell => [0.0, 0.0, 2.0, 8.0, 30.0],
        }
    }

    /// Multiplier for a contiguous run of `count` symbols; 0 below three or
    /// above the table.
    pub fn multiplier(self, count: u8) -> f64 {
        if count < MIN_PAYING_MATCH {
            return 0.0;
        }
        self.payouts()
            .get(count as usize - 1)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Grid coordinate. `reel` is the column, `row` counts from the top.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Cell {
    pub reel: u8,
    pub row: u8,
}

impl Cell {
    pub const fn new(reel: u8, row: u8) -> Self {
        Self { reel, row }
    }

    /// Row-major position used by presentation layers (`row * 5 + reel`).
    pub fn flat_index(self) -> usize {
        self.row as usize * REEL_COUNT + self.reel as usize
    }
}

/// A 5×3 window, stored reel by reel: `reels[reel][row]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Grid {
    pub reels: [[Symbol; ROW_COUNT]; REEL_COUNT],
}

impl Grid {
    pub fn new(reels: [[Symbol; ROW_COUNT]; REEL_COUNT]) -> Self {
        Self { reels }
    }

    /// Build a grid from rows, the way paytables are usually written down.
    pub fn from_rows(rows: [[Symbol; REEL_COUNT]; ROW_COUNT]) -> Self {
        let mut reels = [[Symbol::Shell; ROW_COUNT]; REEL_COUNT];
        for (row, symbols) in rows.iter().enumerate() {
            for (reel, &symbol) in symbols.iter().enumerate() {
                reels[reel][row] = symbol;
            }
        }
        Self { reels }
    }

    pub fn filled(symbol: Symbol) -> Self {
        Self {
            reels: [[symbol; ROW_COUNT]; REEL_COUNT],
        }
    }

    pub fn at(&self, cell: Cell) -> Symbol {
        self.reels[cell.reel as usize][cell.row as usize]
    }

    pub fn set(&mut self, cell: Cell, symbol: Symbol) {
        self.reels[cell.reel as usize][cell.row as usize] = symbol;
    }

    pub fn rows(&self) -> [[Symbol; REEL_COUNT]; ROW_COUNT] {
        let mut rows = [[Symbol::Shell; REEL_COUNT]; ROW_COUNT];
        for (reel, column) in self.reels.iter().enumerate() {
            for (row, &symbol) in column.iter().enumerate() {
                rows[row][reel] = symbol;
            }
        }
        rows
    }

    /// Symbol indices reel by reel, the shape stored in the spin log.
    pub fn to_indices(&self) -> Vec<Vec<u8>> {
        self.reels
            .iter()
            .map(|column| column.iter().map(|s| s.to_index()).collect())
            .collect()
    }

    pub fn from_indices(indices: &[Vec<u8>]) -> Option<Self> {
        if indices.len() != REEL_COUNT {
            return None;
        }
        let mut reels = [[Symbol::Shell; ROW_COUNT]; REEL_COUNT];
        for (reel, column) in indices.iter().enumerate() {
            if column.len() != ROW_COUNT {
                return None;
            }
            for (row, &i) in column.iter().enumerate() {
                reels[reel][row] = Symbol::from_index(i)?;
            }
        }
        Some(Self { reels })
    }
}
