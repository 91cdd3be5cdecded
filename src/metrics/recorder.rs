//! Per-request timeline recording.

use std::fmt;

use crate::common::PageKey;
use crate::metrics::Stats;

/// Result of a single page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The page was already resident.
    Hit,
    /// The page had to be brought in, possibly evicting another.
    Fault,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Hit => write!(f, "Hit"),
            Outcome::Fault => write!(f, "Fault"),
        }
    }
}

/// One row of the run timeline.
///
/// `evicted` is `None` for hits and for faults that found a free frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry<K> {
    /// 1-based request number.
    pub step: u64,
    pub page: K,
    pub outcome: Outcome,
    /// Resident pages right after the request, in the policy's order.
    pub frames: Vec<K>,
    pub evicted: Option<K>,
}

/// MGLRU generation sizes right after a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSnapshot {
    pub step: u64,
    /// `sizes[i]` = pages in generation `i` (0 = youngest).
    pub sizes: Vec<usize>,
}

impl GenerationSnapshot {
    /// Pages resident across all generations.
    pub fn total(&self) -> usize {
        self.sizes.iter().sum()
    }
}

/// Accumulates hit/fault counters and the append-only timeline.
///
/// Every policy owns one. Each `record_*` call advances the step counter by
/// exactly one, so `hits + faults == timeline.len()` always holds.
#[derive(Debug, Clone)]
pub struct Recorder<K> {
    hits: u64,
    faults: u64,
    step: u64,
    timeline: Vec<TimelineEntry<K>>,
}

impl<K: PageKey> Recorder<K> {
    pub fn new() -> Self {
        Self {
            hits: 0,
            faults: 0,
            step: 0,
            timeline: Vec::new(),
        }
    }

    /// Record a hit on `page` with the frame state after the request.
    pub fn record_hit(&mut self, page: K, frames: Vec<K>) {
        self.hits += 1;
        self.push(page, Outcome::Hit, frames, None);
    }

    /// Record a fault on `page`, with the victim if one was evicted.
    pub fn record_fault(&mut self, page: K, frames: Vec<K>, evicted: Option<K>) {
        self.faults += 1;
        self.push(page, Outcome::Fault, frames, evicted);
    }

    fn push(&mut self, page: K, outcome: Outcome, frames: Vec<K>, evicted: Option<K>) {
        self.step += 1;
        self.timeline.push(TimelineEntry {
            step: self.step,
            page,
            outcome,
            frames,
            evicted,
        });
    }

    /// Step number of the most recent request (0 before any request).
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn stats(&self) -> Stats {
        Stats::new(self.hits, self.faults)
    }

    pub fn timeline(&self) -> &[TimelineEntry<K>] {
        &self.timeline
    }
}

impl<K: PageKey> Default for Recorder<K> {
    fn default() -> Self {
        Self::new()
    }
}
