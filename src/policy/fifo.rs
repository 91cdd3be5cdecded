//! FIFO (First-In-First-Out) replacement policy.

use std::collections::{HashSet, VecDeque};

use log::trace;

use crate::common::{PageKey, Result};
use crate::metrics::Recorder;
use crate::policy::{Access, Base, ReplacementPolicy};

/// Evicts pages in the order they were brought in.
///
/// Hits never reorder the queue: arrival order is immutable.
#[derive(Debug, Clone)]
pub struct FifoPolicy<K> {
    base: Base<K>,

    /// Resident pages in arrival order (front = oldest = next victim).
    queue: VecDeque<K>,

    /// Set for O(1) membership check.
    resident: HashSet<K>,
}

impl<K: PageKey> FifoPolicy<K> {
    /// Create a FIFO policy with `num_frames` frames.
    ///
    /// # Errors
    /// `Error::InvalidConfiguration` if `num_frames` is 0.
    pub fn new(num_frames: usize) -> Result<Self> {
        Ok(Self {
            base: Base::new(num_frames)?,
            queue: VecDeque::with_capacity(num_frames),
            resident: HashSet::with_capacity(num_frames),
        })
    }
}

impl<K: PageKey> ReplacementPolicy<K> for FifoPolicy<K> {
    fn process_request(&mut self, page: K, _future: &[K]) -> Result<Access<K>> {
        if self.resident.contains(&page) {
            let frames = self.frames();
            return Ok(self.base.hit(page, frames));
        }

        let mut evicted = None;
        if self.queue.len() == self.base.num_frames() {
            if let Some(victim) = self.queue.pop_front() {
                self.resident.remove(&victim);
                trace!("FIFO evicted {} for {}", victim, page);
                evicted = Some(victim);
            }
        }

        self.queue.push_back(page);
        self.resident.insert(page);

        let frames = self.frames();
        Ok(self.base.fault(page, frames, evicted))
    }

    fn num_frames(&self) -> usize {
        self.base.num_frames()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn contains(&self, page: &K) -> bool {
        self.resident.contains(page)
    }

    fn frames(&self) -> Vec<K> {
        self.queue.iter().copied().collect()
    }

    fn recorder(&self) -> &Recorder<K> {
        self.base.recorder()
    }
}
