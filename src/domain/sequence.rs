use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::Symbol;

/// A recorded round outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub symbol: Symbol,
    pub recorded_at: DateTime<Utc>,
}

/// Bounded, insertion-ordered history of outcomes (oldest first).
///
/// Appending past capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct OutcomeSequence {
    outcomes: VecDeque<Outcome>,
    capacity: usize,
}

impl OutcomeSequence {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            outcomes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Append a symbol stamped with the current time. Returns the evicted outcome, if any.
    pub fn push(&mut self, symbol: Symbol) -> Option<Outcome> {
        self.outcomes.push_back(Outcome {
            symbol,
            recorded_at: Utc::now(),
        });
        if self.outcomes.len() > self.capacity {
            self.outcomes.pop_front()
        } else {
            None
        }
    }

    /// Remove the most recent outcome
    pub fn pop(&mut self) -> Option<Outcome> {
        self.outcomes.pop_back()
    }

    pub fn clear(&mut self) {
        self.outcomes.clear();
    }

    pub fn last(&self) -> Option<Symbol> {
        self.outcomes.back().map(|o| o.symbol)
    }

    pub fn outcomes(&self) -> impl DoubleEndedIterator<Item = &Outcome> + ExactSizeIterator {
        self.outcomes.iter()
    }

    /// All retained symbols, oldest first
    pub fn symbols(&self) -> Vec<Symbol> {
        self.outcomes.iter().map(|o| o.symbol).collect()
    }

    /// Compact `AABT` rendering, oldest first
    pub fn to_code_string(&self) -> String {
        self.outcomes.iter().map(|o| o.symbol.code()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut seq = OutcomeSequence::new(3);
        assert!(seq.push(SideA).is_none());
        seq.push(SideB);
        seq.push(Tie);
        let evicted = seq.push(SideB).expect("oldest evicted");
        assert_eq!(evicted.symbol, SideA);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.symbols(), vec![SideB, Tie, SideB]);
    }

    #[test]
    fn pop_removes_newest_and_is_noop_when_empty() {
        let mut seq = OutcomeSequence::new(5);
        assert!(seq.pop().is_none());
        seq.push(SideA);
        seq.push(Tie);
        assert_eq!(seq.pop().map(|o| o.symbol), Some(Tie));
        assert_eq!(seq.last(), Some(SideA));
    }

    #[test]
    fn code_string_is_oldest_first() {
        let mut seq = OutcomeSequence::new(10);
        for s in [SideA, SideB, SideB, Tie] {
            seq.push(s);
        }
        assert_eq!(seq.to_code_string(), "ABBT");
    }
}
