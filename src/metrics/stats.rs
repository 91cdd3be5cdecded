//! Hit/fault statistics.

use std::fmt;
use std::iter::Sum;

/// Aggregate hit/fault counts for a run.
///
/// Ratios are derived from the counts on demand, never stored, so two
/// reads with no request in between always agree.
///
/// # Example
/// ```
/// use pagesim::Stats;
///
/// let stats = Stats::new(3, 1);
/// assert_eq!(stats.total, 4);
/// assert_eq!(stats.hit_ratio(), 0.75);
/// assert_eq!(format!("{:.2}%", stats.miss_ratio() * 100.0), "25.00%");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: u64,
    pub hits: u64,
    pub faults: u64,
}

impl Stats {
    pub fn new(hits: u64, faults: u64) -> Self {
        Self {
            total: hits + faults,
            hits,
            faults,
        }
    }

    /// Fraction of requests that hit (0.0 to 1.0, 0.0 for an empty run).
    pub fn hit_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.hits as f64 / self.total as f64
        }
    }

    /// Fraction of requests that faulted (0.0 to 1.0, 0.0 for an empty run).
    pub fn miss_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.faults as f64 / self.total as f64
        }
    }

    /// Combine two runs by summing counts.
    ///
    /// The ratios of the result are recomputed from the sums rather than
    /// averaged per run.
    pub fn merge(self, other: Stats) -> Stats {
        Stats::new(self.hits + other.hits, self.faults + other.faults)
    }
}

impl Sum for Stats {
    fn sum<I: Iterator<Item = Stats>>(iter: I) -> Self {
        iter.fold(Stats::default(), Stats::merge)
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ requests: {}, hits: {}, faults: {}, hit_ratio: {:.2}%, miss_ratio: {:.2}% }}",
            self.total,
            self.hits,
            self.faults,
            self.hit_ratio() * 100.0,
            self.miss_ratio() * 100.0
        )
    }
}
