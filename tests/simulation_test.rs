//! Simulation scenario tests.
//!
//! Small hand-checked traces for each policy, run through the public API.

use pagesim::{
    simulation, Error, FifoPolicy, LruPolicy, MglruPolicy, OptimalPolicy, Outcome, PageId, Policy,
    PolicyConfig, PolicyKind, ReplacementPolicy, Stats,
};

fn pages(ids: &[u32]) -> Vec<PageId> {
    ids.iter().copied().map(PageId::new).collect()
}

// ============================================================================
// Per-policy scenarios
// ============================================================================

/// FIFO with 2 frames over [1, 2, 3, 1]: page 1 arrived first, so 3 evicts it.
#[test]
fn test_fifo_victim_order() {
    let trace = pages(&[1, 2, 3, 1]);
    let mut fifo = FifoPolicy::new(2).unwrap();
    let stats = simulation::run(&mut fifo, &trace).unwrap();

    assert_eq!(stats, Stats::new(0, 4));
    assert_eq!(fifo.timeline()[2].evicted, Some(PageId::new(1)));
    assert_eq!(fifo.frames(), pages(&[3, 1]));
}

/// LRU with 2 frames over [1, 2, 1, 3]: the hit on 1 makes 2 the victim.
#[test]
fn test_lru_recency() {
    let trace = pages(&[1, 2, 1, 3]);
    let mut lru = LruPolicy::new(2).unwrap();
    let stats = simulation::run(&mut lru, &trace).unwrap();

    let frames: Vec<Vec<PageId>> = lru.timeline().iter().map(|e| e.frames.clone()).collect();
    assert_eq!(
        frames,
        vec![pages(&[1]), pages(&[1, 2]), pages(&[2, 1]), pages(&[1, 3])]
    );
    assert_eq!(lru.timeline()[3].evicted, Some(PageId::new(2)));
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.faults, 3);
}

/// Optimal with 2 frames over [1, 2, 3, 1, 2]: at the fault for 3 the future
/// is [1, 2], so 2 (needed later) is evicted.
#[test]
fn test_optimal_foresight() {
    let trace = pages(&[1, 2, 3, 1, 2]);
    let mut opt = OptimalPolicy::new(2).unwrap();
    simulation::run(&mut opt, &trace).unwrap();

    let entry = &opt.timeline()[2];
    assert_eq!(entry.outcome, Outcome::Fault);
    assert_eq!(entry.evicted, Some(PageId::new(2)));
    assert_eq!(entry.frames, pages(&[1, 3]));
}

/// MGLRU generation sizes always add up to the resident count.
#[test]
fn test_mglru_generation_conservation() {
    let trace = pages(&[1, 2, 3, 1, 4, 5, 1, 2, 6, 1, 3, 3, 7, 2, 1, 8, 9, 1]);
    let config = PolicyConfig::new(3).with_aging_threshold(2);
    let mut mglru = MglruPolicy::new(&config).unwrap();
    simulation::run(&mut mglru, &trace).unwrap();

    let log = mglru.generation_log();
    assert_eq!(log.len(), trace.len());
    for (snap, entry) in log.iter().zip(mglru.timeline()) {
        assert_eq!(snap.step, entry.step);
        assert_eq!(snap.total(), entry.frames.len());
        assert!(snap.total() <= 3);
    }
}

/// Without an aging event every page stays in generation 0, where hits don't
/// reorder, so MGLRU evicts in arrival order like FIFO.
#[test]
fn test_mglru_without_aging_matches_fifo() {
    let mut trace = Vec::new();
    for cold in 100..140 {
        trace.push(PageId::new(1));
        trace.push(PageId::new(cold));
    }
    let config = PolicyConfig::new(2).with_aging_threshold(1000);
    let mut mglru = MglruPolicy::new(&config).unwrap();
    let mut fifo = FifoPolicy::new(2).unwrap();

    let mglru_stats = simulation::run(&mut mglru, &trace).unwrap();
    let fifo_stats = simulation::run(&mut fifo, &trace).unwrap();

    assert_eq!(mglru_stats, fifo_stats);
    assert_eq!(mglru_stats.hits, 20);
    assert!(mglru.generation_log().iter().all(|snap| snap.sizes[1..].iter().all(|&n| n == 0)));
}

// ============================================================================
// Cross-policy properties on fixed traces
// ============================================================================

#[test]
fn test_empty_trace_all_policies() {
    let trace: Vec<PageId> = Vec::new();
    for kind in PolicyKind::ALL {
        let (policy, stats) = simulation::run_kind(kind, &PolicyConfig::new(4), &trace).unwrap();
        assert_eq!(stats, Stats::default());
        assert_eq!(stats.hit_ratio(), 0.0);
        assert_eq!(stats.miss_ratio(), 0.0);
        assert!(policy.timeline().is_empty());
    }
}

#[test]
fn test_stats_read_is_idempotent() {
    let trace = pages(&[4, 4, 5, 6, 4]);
    for kind in PolicyKind::ALL {
        let (policy, _) = simulation::run_kind(kind, &PolicyConfig::new(2), &trace).unwrap();
        assert_eq!(policy.stats(), policy.stats());
        assert_eq!(policy.timeline().len(), trace.len());
    }
}

#[test]
fn test_eviction_only_on_full_fault() {
    let trace = pages(&[1, 2, 3, 2, 4, 1, 5, 3, 3]);
    for kind in PolicyKind::ALL {
        let (policy, _) = simulation::run_kind(kind, &PolicyConfig::new(3), &trace).unwrap();
        for (i, entry) in policy.timeline().iter().enumerate() {
            assert_eq!(entry.step, i as u64 + 1);
            match entry.outcome {
                Outcome::Hit => assert_eq!(entry.evicted, None, "{} step {}", kind, entry.step),
                Outcome::Fault if i < 3 => assert_eq!(entry.evicted, None),
                Outcome::Fault => {}
            }
        }
    }
}

#[test]
fn test_large_frame_budget_faults_once_per_page() {
    let trace = pages(&[3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5]);
    for kind in PolicyKind::ALL {
        let (_, stats) = simulation::run_kind(kind, &PolicyConfig::new(16), &trace).unwrap();
        // 7 distinct pages: only compulsory faults
        assert_eq!(stats.faults, 7, "{}", kind);
        assert_eq!(stats.hits, 4, "{}", kind);
    }
}

#[test]
fn test_unknown_policy_name() {
    let err = "ARC".parse::<PolicyKind>().unwrap_err();
    assert!(matches!(err, Error::UnknownPolicy(_)));
}

#[test]
fn test_zero_frames_fails_fast() {
    assert!(matches!(
        Policy::<PageId>::build(PolicyKind::Optimal, &PolicyConfig::new(0)),
        Err(Error::InvalidConfiguration(_))
    ));
    assert!(simulation::run_kind(PolicyKind::Fifo, &PolicyConfig::new(0), &pages(&[1])).is_err());
}

#[test]
fn test_comparison_sweep_monotone_for_optimal() {
    let trace = pages(&[1, 2, 3, 4, 1, 2, 5, 1, 2, 3, 4, 5]);
    let rows = simulation::compare(&trace, 1..=5, &PolicyConfig::new(1)).unwrap();

    let optimal: Vec<u64> = rows
        .iter()
        .filter(|r| r.policy == PolicyKind::Optimal)
        .map(|r| r.stats.faults)
        .collect();
    assert_eq!(optimal.len(), 5);
    // MIN is a stack algorithm: more frames never means more faults
    assert!(optimal.windows(2).all(|w| w[1] <= w[0]));

    // Belady's anomaly on this classic string: FIFO faults 9 with 3 frames, 10 with 4
    let fifo = |frames: usize| {
        rows.iter()
            .find(|r| r.policy == PolicyKind::Fifo && r.frames == frames)
            .map(|r| r.stats.faults)
            .unwrap()
    };
    assert_eq!(fifo(3), 9);
    assert_eq!(fifo(4), 10);
}
