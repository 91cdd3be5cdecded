//! Page replacement policy implementations.
//!
//! Currently implements:
//! - [`FifoPolicy`] - First-In-First-Out, arrival order only
//! - [`LruPolicy`] - Least Recently Used
//! - [`OptimalPolicy`] - Belady's clairvoyant MIN, reads the future trace
//! - [`MglruPolicy`] - Multi-generational LRU with periodic aging
//!
//! All four share one request/response contract ([`ReplacementPolicy`]).
//! [`Policy`] is the closed set of variants, built from a [`PolicyKind`]
//! selector at runtime.

mod fifo;
mod lru;
mod mglru;
mod optimal;

use std::fmt;
use std::str::FromStr;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use mglru::MglruPolicy;
pub use optimal::OptimalPolicy;

use crate::common::{Error, PageKey, PolicyConfig, Result};
use crate::metrics::{GenerationSnapshot, Outcome, Recorder, Stats, TimelineEntry};

/// Response to a single page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access<K> {
    pub outcome: Outcome,
    /// Victim page, only ever set on a fault with full frames.
    pub evicted: Option<K>,
}

impl<K> Access<K> {
    pub fn is_hit(&self) -> bool {
        self.outcome == Outcome::Hit
    }
}

/// The request/response contract every replacement policy implements.
///
/// `future` must hold exactly the pages requested after `page`, in order
/// (empty for the last request). Only [`OptimalPolicy`] reads it.
pub trait ReplacementPolicy<K: PageKey> {
    /// Serve one page request, evicting a victim if the frames are full.
    ///
    /// # Errors
    /// `Error::InternalConsistency` if the policy's bookkeeping is broken.
    /// The run must be abandoned in that case.
    fn process_request(&mut self, page: K, future: &[K]) -> Result<Access<K>>;

    /// Frame budget fixed at construction.
    fn num_frames(&self) -> usize;

    /// Number of resident pages.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, page: &K) -> bool;

    /// Resident pages in the policy's native order.
    fn frames(&self) -> Vec<K>;

    fn recorder(&self) -> &Recorder<K>;

    fn stats(&self) -> Stats {
        self.recorder().stats()
    }

    fn timeline(&self) -> &[TimelineEntry<K>] {
        self.recorder().timeline()
    }
}

/// State every policy carries: the frame budget and the run recorder.
#[derive(Debug, Clone)]
pub(crate) struct Base<K> {
    num_frames: usize,
    recorder: Recorder<K>,
}

impl<K: PageKey> Base<K> {
    pub(crate) fn new(num_frames: usize) -> Result<Self> {
        if num_frames == 0 {
            return Err(Error::invalid("number of frames must be positive"));
        }
        Ok(Self {
            num_frames,
            recorder: Recorder::new(),
        })
    }

    pub(crate) fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub(crate) fn recorder(&self) -> &Recorder<K> {
        &self.recorder
    }

    pub(crate) fn hit(&mut self, page: K, frames: Vec<K>) -> Access<K> {
        self.recorder.record_hit(page, frames);
        Access {
            outcome: Outcome::Hit,
            evicted: None,
        }
    }

    pub(crate) fn fault(&mut self, page: K, frames: Vec<K>, evicted: Option<K>) -> Access<K> {
        self.recorder.record_fault(page, frames, evicted);
        Access {
            outcome: Outcome::Fault,
            evicted,
        }
    }
}

/// Runtime selector for a replacement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Fifo,
    Lru,
    Optimal,
    Mglru,
}

impl PolicyKind {
    /// Every policy, in the order comparison sweeps run them.
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::Fifo,
        PolicyKind::Lru,
        PolicyKind::Optimal,
        PolicyKind::Mglru,
    ];
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::Fifo => "FIFO",
            PolicyKind::Lru => "LRU",
            PolicyKind::Optimal => "Optimal",
            PolicyKind::Mglru => "MGLRU",
        };
        f.write_str(name)
    }
}

impl FromStr for PolicyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(PolicyKind::Fifo),
            "lru" => Ok(PolicyKind::Lru),
            "optimal" | "opt" | "min" => Ok(PolicyKind::Optimal),
            "mglru" => Ok(PolicyKind::Mglru),
            _ => Err(Error::UnknownPolicy(s.to_string())),
        }
    }
}

/// One of the four replacement policies.
///
/// # Example
/// ```
/// use pagesim::{PageId, Policy, PolicyConfig, PolicyKind, ReplacementPolicy};
///
/// let mut policy = Policy::build(PolicyKind::Lru, &PolicyConfig::new(2)).unwrap();
/// policy.process_request(PageId::new(1), &[]).unwrap();
/// assert!(policy.contains(&PageId::new(1)));
/// ```
#[derive(Debug, Clone)]
pub enum Policy<K> {
    Fifo(FifoPolicy<K>),
    Lru(LruPolicy<K>),
    Optimal(OptimalPolicy<K>),
    Mglru(MglruPolicy<K>),
}

impl<K: PageKey> Policy<K> {
    /// Construct a fresh policy of the given kind.
    ///
    /// Only MGLRU reads the generation count and aging threshold, so only
    /// MGLRU rejects them.
    ///
    /// # Errors
    /// `Error::InvalidConfiguration` if `num_frames` is 0, or for MGLRU if
    /// `config` fails validation.
    pub fn build(kind: PolicyKind, config: &PolicyConfig) -> Result<Self> {
        Ok(match kind {
            PolicyKind::Fifo => Policy::Fifo(FifoPolicy::new(config.num_frames)?),
            PolicyKind::Lru => Policy::Lru(LruPolicy::new(config.num_frames)?),
            PolicyKind::Optimal => Policy::Optimal(OptimalPolicy::new(config.num_frames)?),
            PolicyKind::Mglru => Policy::Mglru(MglruPolicy::new(config)?),
        })
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Fifo(_) => PolicyKind::Fifo,
            Policy::Lru(_) => PolicyKind::Lru,
            Policy::Optimal(_) => PolicyKind::Optimal,
            Policy::Mglru(_) => PolicyKind::Mglru,
        }
    }

    /// Per-request generation sizes, for MGLRU only.
    pub fn generation_log(&self) -> Option<&[GenerationSnapshot]> {
        match self {
            Policy::Mglru(p) => Some(p.generation_log()),
            _ => None,
        }
    }

    pub fn as_mglru(&self) -> Option<&MglruPolicy<K>> {
        match self {
            Policy::Mglru(p) => Some(p),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn ReplacementPolicy<K> {
        match self {
            Policy::Fifo(p) => p,
            Policy::Lru(p) => p,
            Policy::Optimal(p) => p,
            Policy::Mglru(p) => p,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ReplacementPolicy<K> {
        match self {
            Policy::Fifo(p) => p,
            Policy::Lru(p) => p,
            Policy::Optimal(p) => p,
            Policy::Mglru(p) => p,
        }
    }
}

impl<K: PageKey> ReplacementPolicy<K> for Policy<K> {
    fn process_request(&mut self, page: K, future: &[K]) -> Result<Access<K>> {
        self.inner_mut().process_request(page, future)
    }

    fn num_frames(&self) -> usize {
        self.inner().num_frames()
    }

    fn len(&self) -> usize {
        self.inner().len()
    }

    fn contains(&self, page: &K) -> bool {
        self.inner().contains(page)
    }

    fn frames(&self) -> Vec<K> {
        self.inner().frames()
    }

    fn recorder(&self) -> &Recorder<K> {
        self.inner().recorder()
    }
}
