//! Optimal (Belady's MIN) replacement policy.
//!
//! Needs the rest of the trace, so it only works on recorded or
//! pre-generated workloads. It is the lower bound the other policies are
//! measured against.

use std::collections::{HashMap, HashSet};

use log::trace;

use crate::common::{Error, PageKey, Result};
use crate::metrics::Recorder;
use crate::policy::{Access, Base, ReplacementPolicy};

/// Evicts the resident page whose next use lies furthest in the future.
///
/// A resident page that never recurs is evicted first; if several never
/// recur, the earliest one in residency order goes.
#[derive(Debug, Clone)]
pub struct OptimalPolicy<K> {
    base: Base<K>,

    /// Resident pages in residency order. A victim's slot is removed and the
    /// incoming page appended.
    frames: Vec<K>,

    resident: HashSet<K>,
}

impl<K: PageKey> OptimalPolicy<K> {
    /// Create an Optimal policy with `num_frames` frames.
    ///
    /// # Errors
    /// `Error::InvalidConfiguration` if `num_frames` is 0.
    pub fn new(num_frames: usize) -> Result<Self> {
        Ok(Self {
            base: Base::new(num_frames)?,
            frames: Vec::with_capacity(num_frames),
            resident: HashSet::with_capacity(num_frames),
        })
    }

    /// Index into `frames` of the page to evict.
    ///
    /// One pass over `future` records the first occurrence of each resident
    /// page, stopping early once every resident page has been seen.
    fn furthest_used(&self, future: &[K]) -> Option<usize> {
        let mut next_use: HashMap<K, usize> = HashMap::with_capacity(self.frames.len());
        for (idx, page) in future.iter().enumerate() {
            if self.resident.contains(page) {
                next_use.entry(*page).or_insert(idx);
                if next_use.len() == self.frames.len() {
                    break;
                }
            }
        }

        if let Some(pos) = self.frames.iter().position(|p| !next_use.contains_key(p)) {
            return Some(pos);
        }

        self.frames
            .iter()
            .enumerate()
            .max_by_key(|(_, p)| next_use.get(*p))
            .map(|(pos, _)| pos)
    }
}

impl<K: PageKey> ReplacementPolicy<K> for OptimalPolicy<K> {
    fn process_request(&mut self, page: K, future: &[K]) -> Result<Access<K>> {
        if self.resident.contains(&page) {
            let frames = self.frames();
            return Ok(self.base.hit(page, frames));
        }

        let mut evicted = None;
        if self.frames.len() == self.base.num_frames() {
            let pos = self.furthest_used(future).ok_or_else(|| {
                Error::InternalConsistency(format!(
                    "no Optimal victim with {} resident pages",
                    self.frames.len()
                ))
            })?;
            let victim = self.frames.remove(pos);
            self.resident.remove(&victim);
            trace!("Optimal evicted {} for {}", victim, page);
            evicted = Some(victim);
        }

        self.frames.push(page);
        self.resident.insert(page);

        let frames = self.frames();
        Ok(self.base.fault(page, frames, evicted))
    }

    fn num_frames(&self) -> usize {
        self.base.num_frames()
    }

    fn len(&self) -> usize {
        self.frames.len()
    }

    fn contains(&self, page: &K) -> bool {
        self.resident.contains(page)
    }

    fn frames(&self) -> Vec<K> {
        self.frames.clone()
    }

    fn recorder(&self) -> &Recorder<K> {
        self.base.recorder()
    }
}
