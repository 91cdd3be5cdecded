//! Simulation driver.
//!
//! Feeds a trace to a policy one request at a time, handing each request
//! the exact suffix of the trace that follows it.

use std::ops::RangeInclusive;

use log::{debug, warn};

use crate::common::{Error, PageKey, PolicyConfig, Result};
use crate::metrics::Stats;
use crate::policy::{Policy, PolicyKind, ReplacementPolicy};

/// Run `trace` through `policy` and return the accumulated stats.
///
/// Request `i` sees `trace[i + 1..]` as its future. The slice is borrowed,
/// not copied, so only Optimal's own scan is linear per request.
///
/// # Errors
/// Propagates `Error::InternalConsistency` from the policy; the run stops
/// at the failing request.
///
/// # Example
/// ```
/// use pagesim::{simulation, FifoPolicy, PageId};
///
/// let trace: Vec<PageId> = [1, 2, 3, 1].into_iter().map(PageId::new).collect();
/// let mut fifo = FifoPolicy::new(2).unwrap();
/// let stats = simulation::run(&mut fifo, &trace).unwrap();
/// assert_eq!(stats.faults, 4);
/// ```
pub fn run<K, P>(policy: &mut P, trace: &[K]) -> Result<Stats>
where
    K: PageKey,
    P: ReplacementPolicy<K> + ?Sized,
{
    for (i, &page) in trace.iter().enumerate() {
        policy.process_request(page, &trace[i + 1..])?;
    }
    Ok(policy.stats())
}

/// Build a fresh policy of `kind` and run `trace` through it.
///
/// The policy is returned so callers can read its timeline afterwards.
pub fn run_kind<K: PageKey>(
    kind: PolicyKind,
    config: &PolicyConfig,
    trace: &[K],
) -> Result<(Policy<K>, Stats)> {
    let mut policy = Policy::build(kind, config)?;
    let stats = run(&mut policy, trace)?;
    debug!(
        "{} with {} frames over {} requests: {}",
        kind,
        config.num_frames,
        trace.len(),
        stats
    );
    Ok((policy, stats))
}

/// One cell of a comparison sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub policy: PolicyKind,
    pub frames: usize,
    pub stats: Stats,
}

/// Run every policy over `trace` for every frame count in `frames`.
///
/// Rows come out grouped by policy (in [`PolicyKind::ALL`] order), then by
/// ascending frame count. A combination that fails is logged and skipped;
/// the rest of the sweep still runs.
///
/// # Errors
/// `Error::InvalidConfiguration` if the range is empty or starts at 0, or
/// if `base` fails validation.
pub fn compare<K: PageKey>(
    trace: &[K],
    frames: RangeInclusive<usize>,
    base: &PolicyConfig,
) -> Result<Vec<ComparisonRow>> {
    if frames.is_empty() {
        return Err(Error::invalid(format!(
            "empty frame range {}..={}",
            frames.start(),
            frames.end()
        )));
    }
    if *frames.start() == 0 {
        return Err(Error::invalid("frame range must start at 1 or more"));
    }
    base.with_frames(*frames.start()).validate()?;

    let mut rows = Vec::with_capacity(PolicyKind::ALL.len() * frames.clone().count());
    for kind in PolicyKind::ALL {
        for num_frames in frames.clone() {
            let config = base.with_frames(num_frames);
            match run_kind(kind, &config, trace) {
                Ok((_, stats)) => rows.push(ComparisonRow {
                    policy: kind,
                    frames: num_frames,
                    stats,
                }),
                Err(e) => warn!("skipping {} @ {} frames: {}", kind, num_frames, e),
            }
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PageId;
    use crate::policy::{FifoPolicy, LruPolicy};

    fn pages(ids: &[u32]) -> Vec<PageId> {
        ids.iter().copied().map(PageId::new).collect()
    }

    #[test]
    fn test_run_empty_trace() {
        let mut policy = LruPolicy::<PageId>::new(3).unwrap();
        let trace: Vec<PageId> = Vec::new();
        let stats = run(&mut policy, &trace).unwrap();
        assert_eq!(stats, Stats::default());
        assert_eq!(stats.hit_ratio(), 0.0);
        assert_eq!(stats.miss_ratio(), 0.0);
    }

    #[test]
    fn test_run_counts_every_request() {
        let trace = pages(&[1, 2, 1, 3, 4, 1, 2]);
        let mut policy = FifoPolicy::new(2).unwrap();
        let stats = run(&mut policy, &trace).unwrap();
        assert_eq!(stats.total as usize, trace.len());
        assert_eq!(policy.timeline().len(), trace.len());
    }

    #[test]
    fn test_run_through_dyn_policy() {
        let trace = pages(&[1, 1]);
        let mut policy: Box<dyn ReplacementPolicy<PageId>> =
            Box::new(FifoPolicy::new(1).unwrap());
        let stats = run(policy.as_mut(), &trace).unwrap();
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_run_kind_returns_policy() {
        let trace = pages(&[1, 2, 3, 1, 2]);
        let (policy, stats) =
            run_kind(PolicyKind::Optimal, &PolicyConfig::new(2), &trace).unwrap();
        assert_eq!(policy.kind(), PolicyKind::Optimal);
        assert_eq!(policy.timeline()[2].evicted, Some(PageId::new(2)));
        // 1 hits; 2 was the victim and faults again at the end
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_compare_shape() {
        let trace = pages(&[1, 2, 3, 1, 2, 4, 1]);
        let rows = compare(&trace, 1..=3, &PolicyConfig::new(1)).unwrap();

        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].policy, PolicyKind::Fifo);
        assert_eq!(rows[0].frames, 1);
        assert_eq!(rows[11].policy, PolicyKind::Mglru);
        assert_eq!(rows[11].frames, 3);
        assert!(rows.iter().all(|r| r.stats.total == 7));
    }

    #[test]
    fn test_compare_optimal_is_lower_bound() {
        let trace = pages(&[7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1]);
        let rows = compare(&trace, 3..=3, &PolicyConfig::new(3)).unwrap();
        let faults = |kind: PolicyKind| {
            rows.iter()
                .find(|r| r.policy == kind)
                .map(|r| r.stats.faults)
                .unwrap()
        };

        // Textbook reference string: FIFO 15, LRU 12, OPT 9
        assert_eq!(faults(PolicyKind::Fifo), 15);
        assert_eq!(faults(PolicyKind::Lru), 12);
        assert_eq!(faults(PolicyKind::Optimal), 9);
        assert!(faults(PolicyKind::Mglru) >= 9);
    }

    #[test]
    fn test_compare_rejects_bad_range() {
        let trace = pages(&[1]);
        #[allow(clippy::reversed_empty_ranges)]
        let inverted = compare(&trace, 5..=2, &PolicyConfig::new(1));
        assert!(matches!(inverted, Err(Error::InvalidConfiguration(_))));
        assert!(compare(&trace, 0..=2, &PolicyConfig::new(1)).is_err());
    }

    #[test]
    fn test_compare_rejects_bad_mglru_knobs() {
        let trace = pages(&[1, 2, 3, 1]);
        let aging = compare(&trace, 1..=3, &PolicyConfig::new(1).with_aging_threshold(0));
        assert!(matches!(aging, Err(Error::InvalidConfiguration(_))));

        let gens = compare(&trace, 1..=3, &PolicyConfig::new(1).with_generations(0));
        assert!(matches!(gens, Err(Error::InvalidConfiguration(_))));
    }
}
