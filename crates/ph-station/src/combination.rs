//! Candidate pump-count combinations.
//!
//! Order: total running units ascending, then family A count descending. For max units
//! (2, 1) this yields `(1,0) (0,1) (2,0) (1,1) (2,1)`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Running units per family; never both zero when produced by [`Combinations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PumpCombination {
    pub family_a: u32,
    pub family_b: u32,
}

impl PumpCombination {
    pub fn new(family_a: u32, family_b: u32) -> Self {
        Self { family_a, family_b }
    }

    pub fn total_units(&self) -> u32 {
        self.family_a + self.family_b
    }
}

impl fmt::Display for PumpCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.family_a, self.family_b)
    }
}

/// Restartable enumeration of every non-empty combination; `clone()` to replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combinations {
    max_a: u32,
    max_b: u32,
    total: u32,
    cursor: Option<u32>,
    remaining: usize,
}

impl Combinations {
    /// `len()` saturates when the product of the counts does not fit in `usize`.
    pub fn new(max_a: u32, max_b: u32) -> Self {
        let per_family = |n: u32| (n as usize).saturating_add(1);
        let remaining = per_family(max_a).saturating_mul(per_family(max_b)) - 1;
        Self {
            max_a,
            max_b,
            total: 1,
            cursor: None,
            remaining,
        }
    }
}

impl Iterator for Combinations {
    type Item = PumpCombination;

    fn next(&mut self) -> Option<PumpCombination> {
        if self.total > self.max_a.saturating_add(self.max_b) {
            return None;
        }
        let lo = self.total.saturating_sub(self.max_b);
        let hi = self.total.min(self.max_a);
        let a = self.cursor.unwrap_or(hi);
        let combo = PumpCombination::new(a, self.total - a);

        if a > lo {
            self.cursor = Some(a - 1);
        } else {
            self.cursor = None;
            self.total += 1;
        }
        self.remaining = self.remaining.saturating_sub(1);
        Some(combo)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Combinations {}

impl std::iter::FusedIterator for Combinations {}

pub fn enumerate_combinations(max_a: u32, max_b: u32) -> Combinations {
    Combinations::new(max_a, max_b)
}
