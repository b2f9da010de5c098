use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CadenceError;

/// Outcome of a single round: one of the two sides or a tie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Symbol {
    SideA,
    SideB,
    Tie,
}

impl Symbol {
    pub const ALL: [Symbol; 3] = [Symbol::SideA, Symbol::SideB, Symbol::Tie];

    /// Get the opposite side. Ties have no opposite.
    pub fn opposite(&self) -> Option<Self> {
        match self {
            Symbol::SideA => Some(Symbol::SideB),
            Symbol::SideB => Some(Symbol::SideA),
            Symbol::Tie => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self, Symbol::Tie)
    }

    pub fn is_side(&self) -> bool {
        !self.is_tie()
    }

    /// Single-letter code used by the shell and compact sequences
    pub fn code(&self) -> char {
        match self {
            Symbol::SideA => 'A',
            Symbol::SideB => 'B',
            Symbol::Tie => 'T',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::SideA => "SIDE_A",
            Symbol::SideB => "SIDE_B",
            Symbol::Tie => "TIE",
        }
    }

    /// Index into per-symbol arrays (distributions, counters)
    pub(crate) fn index(&self) -> usize {
        match self {
            Symbol::SideA => 0,
            Symbol::SideB => 1,
            Symbol::Tie => 2,
        }
    }

    /// Parse a compact sequence such as `AABTB`. Whitespace and commas are ignored.
    pub fn parse_sequence(input: &str) -> Result<Vec<Symbol>, CadenceError> {
        input
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(|c| c.to_string().parse())
            .collect()
    }
}

impl FromStr for Symbol {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "side_a" | "sidea" => Ok(Symbol::SideA),
            "b" | "side_b" | "sideb" => Ok(Symbol::SideB),
            "t" | "tie" => Ok(Symbol::Tie),
            _ => Err(CadenceError::InvalidSymbol(s.to_string())),
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
