//! LRU (Least Recently Used) replacement policy.

use std::collections::{HashSet, VecDeque};

use log::trace;

use crate::common::{PageKey, Result};
use crate::metrics::Recorder;
use crate::policy::{Access, Base, ReplacementPolicy};

/// Evicts the page that was touched least recently.
///
/// Both hits and insertions count as a touch. Moving a page to the back of
/// the recency list is O(n) in the frame count, which is fine for the frame
/// budgets a simulation uses.
#[derive(Debug, Clone)]
pub struct LruPolicy<K> {
    base: Base<K>,

    /// Resident pages, front = least recently used.
    recency: VecDeque<K>,

    resident: HashSet<K>,
}

impl<K: PageKey> LruPolicy<K> {
    /// Create an LRU policy with `num_frames` frames.
    ///
    /// # Errors
    /// `Error::InvalidConfiguration` if `num_frames` is 0.
    pub fn new(num_frames: usize) -> Result<Self> {
        Ok(Self {
            base: Base::new(num_frames)?,
            recency: VecDeque::with_capacity(num_frames),
            resident: HashSet::with_capacity(num_frames),
        })
    }

    fn touch(&mut self, page: K) {
        if let Some(pos) = self.recency.iter().position(|p| *p == page) {
            self.recency.remove(pos);
        }
        self.recency.push_back(page);
    }
}

impl<K: PageKey> ReplacementPolicy<K> for LruPolicy<K> {
    fn process_request(&mut self, page: K, _future: &[K]) -> Result<Access<K>> {
        if self.resident.contains(&page) {
            self.touch(page);
            let frames = self.frames();
            return Ok(self.base.hit(page, frames));
        }

        let mut evicted = None;
        if self.recency.len() == self.base.num_frames() {
            if let Some(victim) = self.recency.pop_front() {
                self.resident.remove(&victim);
                trace!("LRU evicted {} for {}", victim, page);
                evicted = Some(victim);
            }
        }

        self.recency.push_back(page);
        self.resident.insert(page);

        let frames = self.frames();
        Ok(self.base.fault(page, frames, evicted))
    }

    fn num_frames(&self) -> usize {
        self.base.num_frames()
    }

    fn len(&self) -> usize {
        self.recency.len()
    }

    fn contains(&self, page: &K) -> bool {
        self.resident.contains(page)
    }

    fn frames(&self) -> Vec<K> {
        self.recency.iter().copied().collect()
    }

    fn recorder(&self) -> &Recorder<K> {
        self.base.recorder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PageId;
    use crate::metrics::Outcome;

    fn pages(ids: &[u32]) -> Vec<PageId> {
        ids.iter().copied().map(PageId::new).collect()
    }

    #[test]
    fn test_lru_recency() {
        let mut policy = LruPolicy::new(2).unwrap();
        let trace = pages(&[1, 2, 1, 3]);
        for (i, &page) in trace.iter().enumerate() {
            policy.process_request(page, &trace[i + 1..]).unwrap();
        }

        let tl = policy.timeline();
        assert_eq!(tl[0].frames, pages(&[1]));
        assert_eq!(tl[1].frames, pages(&[1, 2]));
        assert_eq!(tl[2].outcome, Outcome::Hit);
        assert_eq!(tl[2].frames, pages(&[2, 1]));
        assert_eq!(tl[3].evicted, Some(PageId::new(2)));
        assert_eq!(tl[3].frames, pages(&[1, 3]));

        let stats = policy.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.faults, 3);
    }

    #[test]
    fn test_lru_hit_on_most_recent_is_stable() {
        let mut policy = LruPolicy::new(3).unwrap();
        for id in [1, 2, 3, 3, 3] {
            policy.process_request(PageId::new(id), &[]).unwrap();
        }
        assert_eq!(policy.frames(), pages(&[1, 2, 3]));
        assert_eq!(policy.stats().hits, 2);
    }

    #[test]
    fn test_lru_differs_from_fifo() {
        // FIFO would evict 1 here; LRU evicts 2 because 1 was just used
        let mut policy = LruPolicy::new(2).unwrap();
        for id in [1, 2, 1, 3] {
            policy.process_request(PageId::new(id), &[]).unwrap();
        }
        assert!(policy.contains(&PageId::new(1)));
        assert!(!policy.contains(&PageId::new(2)));
    }
}
