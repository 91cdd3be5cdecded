//! MGLRU (Multi-Generational LRU) replacement policy.
//!
//! Resident pages live in a fixed number of generations:
//!
//! ```text
//!   gen 0 (youngest)   gen 1   ...   gen N-1 (oldest)
//!   [a, b, c]          [d]           [e, f]
//!    ^ head                           ^ next victim
//! ```
//!
//! - A fault inserts the page at the tail of generation 0.
//! - A hit in an older generation moves the page to the tail of
//!   generation 0. A hit in generation 0 changes nothing.
//! - Every `aging_threshold` requests, one page ages: the head of the
//!   oldest non-empty generation below N-1 moves to the tail of the next
//!   older generation.
//! - Eviction takes the head of the oldest non-empty generation.

use std::collections::{HashMap, VecDeque};

use log::trace;

use crate::common::{Error, PageKey, PolicyConfig, Result};
use crate::metrics::{GenerationSnapshot, Recorder};
use crate::policy::{Access, Base, ReplacementPolicy};

/// Multi-generational LRU with a periodic aging tick.
#[derive(Debug, Clone)]
pub struct MglruPolicy<K> {
    base: Base<K>,

    /// `generations[0]` is the youngest. Each deque's front is its oldest page.
    generations: Vec<VecDeque<K>>,

    /// Reverse map: resident page → generation index.
    page_map: HashMap<K, usize>,

    aging_threshold: usize,

    /// Requests since the last aging event.
    age_ticks: usize,

    generation_log: Vec<GenerationSnapshot>,
}

impl<K: PageKey> MglruPolicy<K> {
    /// Create an MGLRU policy from `config`.
    ///
    /// # Errors
    /// `Error::InvalidConfiguration` if frames, generations or the aging
    /// threshold is 0.
    pub fn new(config: &PolicyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            base: Base::new(config.num_frames)?,
            generations: (0..config.num_generations).map(|_| VecDeque::new()).collect(),
            page_map: HashMap::with_capacity(config.num_frames),
            aging_threshold: config.aging_threshold,
            age_ticks: 0,
            generation_log: Vec::new(),
        })
    }

    /// MGLRU with the default generation count and aging threshold.
    pub fn with_frames(num_frames: usize) -> Result<Self> {
        Self::new(&PolicyConfig::new(num_frames))
    }

    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    pub fn aging_threshold(&self) -> usize {
        self.aging_threshold
    }

    /// Generation currently holding `page`, if resident.
    pub fn generation_of(&self, page: &K) -> Option<usize> {
        self.page_map.get(page).copied()
    }

    /// Current number of pages in each generation.
    pub fn generation_sizes(&self) -> Vec<usize> {
        self.generations.iter().map(VecDeque::len).collect()
    }

    /// Generation sizes after every request so far, one entry per request.
    pub fn generation_log(&self) -> &[GenerationSnapshot] {
        &self.generation_log
    }

    fn tick(&mut self) {
        self.age_ticks += 1;
        if self.age_ticks >= self.aging_threshold {
            self.age_one();
            self.age_ticks = 0;
        }
    }

    /// Move a single page one generation older.
    ///
    /// Scans from the second-oldest generation toward the youngest and ages
    /// the head of the first non-empty one.
    fn age_one(&mut self) {
        let last = self.generations.len().saturating_sub(1);
        for gen in (0..last).rev() {
            if let Some(page) = self.generations[gen].pop_front() {
                self.generations[gen + 1].push_back(page);
                self.page_map.insert(page, gen + 1);
                trace!("MGLRU aged {} to generation {}", page, gen + 1);
                return;
            }
        }
    }

    fn promote(&mut self, page: K, gen: usize) -> Result<()> {
        let pos = self.generations[gen]
            .iter()
            .position(|p| *p == page)
            .ok_or_else(|| {
                Error::InternalConsistency(format!(
                    "page {} mapped to generation {} but not found there",
                    page, gen
                ))
            })?;
        self.generations[gen].remove(pos);
        self.generations[0].push_back(page);
        self.page_map.insert(page, 0);
        Ok(())
    }

    fn evict(&mut self) -> Result<K> {
        for gen in (0..self.generations.len()).rev() {
            if let Some(victim) = self.generations[gen].pop_front() {
                self.page_map.remove(&victim);
                return Ok(victim);
            }
        }
        Err(Error::InternalConsistency(format!(
            "frames full ({} of {}) but no generation holds a victim",
            self.page_map.len(),
            self.base.num_frames()
        )))
    }

    fn log_generations(&mut self) {
        self.generation_log.push(GenerationSnapshot {
            step: self.base.recorder().step(),
            sizes: self.generation_sizes(),
        });
    }
}

impl<K: PageKey> ReplacementPolicy<K> for MglruPolicy<K> {
    fn process_request(&mut self, page: K, _future: &[K]) -> Result<Access<K>> {
        self.tick();

        if let Some(gen) = self.generation_of(&page) {
            if gen != 0 {
                self.promote(page, gen)?;
            }
            let frames = self.frames();
            let access = self.base.hit(page, frames);
            self.log_generations();
            return Ok(access);
        }

        let mut evicted = None;
        if self.page_map.len() == self.base.num_frames() {
            let victim = self.evict()?;
            trace!("MGLRU evicted {} for {}", victim, page);
            evicted = Some(victim);
        }

        self.generations[0].push_back(page);
        self.page_map.insert(page, 0);

        let frames = self.frames();
        let access = self.base.fault(page, frames, evicted);
        self.log_generations();
        Ok(access)
    }

    fn num_frames(&self) -> usize {
        self.base.num_frames()
    }

    fn len(&self) -> usize {
        self.page_map.len()
    }

    fn contains(&self, page: &K) -> bool {
        self.page_map.contains_key(page)
    }

    /// Oldest generation first, each generation head first: the order pages
    /// would be evicted in if no further hits or aging happened.
    fn frames(&self) -> Vec<K> {
        self.generations
            .iter()
            .rev()
            .flat_map(|gen| gen.iter().copied())
            .collect()
    }

    fn recorder(&self) -> &Recorder<K> {
        self.base.recorder()
    }
}
