//! Core data structures for line statistics.
//!
//! Every line falls into exactly one of two buckets:
//!
//! - **non_empty**: lines with at least one non-whitespace character
//! - **empty**: lines that are empty after trimming whitespace
//!
//! Whitespace is Unicode whitespace plus the ASCII separators `\x1c`..=`\x1f`.
//!
//! `total` is kept alongside as the precomputed sum of both.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Line counts for a file or an aggregated directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineCounts {
    /// Total line count
    pub total: u64,
    /// Lines containing something other than whitespace
    pub non_empty: u64,
    /// Whitespace-only lines
    pub empty: u64,
}

impl LineCounts {
    /// Create counts with all zeros.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build counts from the two buckets; `total` is derived.
    pub fn from_parts(non_empty: u64, empty: u64) -> Self {
        Self {
            total: non_empty + empty,
            non_empty,
            empty,
        }
    }

    /// Classify one line (without its terminator) and count it.
    pub fn record(&mut self, line: &str) {
        self.total += 1;
        if line.trim_matches(is_blank).is_empty() {
            self.empty += 1;
        } else {
            self.non_empty += 1;
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total == 0
    }
}

fn is_blank(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

impl Add for LineCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            non_empty: self.non_empty + other.non_empty,
            empty: self.empty + other.empty,
        }
    }
}

impl AddAssign for LineCounts {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.non_empty += other.non_empty;
        self.empty += other.empty;
    }
}

impl std::iter::Sum for LineCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), Add::add)
    }
}
