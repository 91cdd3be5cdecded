//! Multi-process frame allocation.
//!
//! Two ways of sharing `total_frames` among tenants of an interleaved trace:
//!
//! ```text
//!  Global                             Fixed (local)
//!  ┌────────────────────────────┐     ┌────────┐ ┌────────┐ ┌────────┐
//!  │ one policy, total_frames   │     │ P1     │ │ P2     │ │ P3     │
//!  │ keys = (tenant, page)      │     │ total/n│ │ total/n│ │ total/n│
//!  └────────────────────────────┘     └────────┘ └────────┘ └────────┘
//! ```
//!
//! Global replacement must see the trace strictly in its original order.
//! Under fixed allocation each tenant only ever touches its own policy, so
//! tenants can run one after another or side by side with the same result.

use std::fmt;
use std::str::FromStr;
use std::thread;

use log::{debug, warn};
use parking_lot::Mutex;

use crate::common::{Error, PageId, PolicyConfig, Result, TenantId, TenantPage};
use crate::metrics::Stats;
use crate::policy::PolicyKind;
use crate::simulation;

/// How frames are divided between tenants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationStrategy {
    /// Each tenant gets `total / n` frames of its own.
    Fixed,
    /// All tenants compete for one shared pool.
    Global,
}

impl fmt::Display for AllocationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationStrategy::Fixed => f.write_str("fixed"),
            AllocationStrategy::Global => f.write_str("global"),
        }
    }
}

impl FromStr for AllocationStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "local" => Ok(AllocationStrategy::Fixed),
            "global" => Ok(AllocationStrategy::Global),
            _ => Err(Error::UnknownAllocationStrategy(s.to_string())),
        }
    }
}

/// Outcome of a multi-process run.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationReport {
    pub strategy: AllocationStrategy,
    pub policy: PolicyKind,

    /// Frames each policy instance was given.
    pub frames_per_instance: usize,

    /// Counts summed over all tenants.
    pub total: Stats,

    /// Per-tenant stats in tenant order. Empty under global allocation,
    /// where tenants share one instance.
    pub per_tenant: Vec<(TenantId, Stats)>,
}

/// Frames each tenant gets under fixed allocation.
///
/// Floor division; if there are fewer frames than tenants every tenant
/// still gets one frame and a warning is logged.
///
/// # Errors
/// `Error::InvalidConfiguration` if either count is 0.
pub fn frames_per_tenant(total_frames: usize, num_processes: usize) -> Result<usize> {
    if num_processes == 0 {
        return Err(Error::invalid("number of processes must be positive"));
    }
    if total_frames == 0 {
        return Err(Error::invalid("number of frames must be positive"));
    }
    if total_frames < num_processes {
        warn!(
            "total frames ({}) is less than the number of processes ({}), allocating 1 frame per process",
            total_frames, num_processes
        );
        return Ok(1);
    }
    Ok(total_frames / num_processes)
}

/// Run `trace` with the given strategy.
pub fn run(
    strategy: AllocationStrategy,
    kind: PolicyKind,
    config: &PolicyConfig,
    trace: &[TenantPage],
    total_frames: usize,
    num_processes: usize,
) -> Result<AllocationReport> {
    match strategy {
        AllocationStrategy::Global => run_global(kind, config, trace, total_frames),
        AllocationStrategy::Fixed => run_fixed(kind, config, trace, total_frames, num_processes),
    }
}

/// One shared policy of `total_frames` frames keyed on `(tenant, page)`.
///
/// Optimal sees the remaining interleaved trace as its future.
pub fn run_global(
    kind: PolicyKind,
    config: &PolicyConfig,
    trace: &[TenantPage],
    total_frames: usize,
) -> Result<AllocationReport> {
    let config = config.with_frames(total_frames);
    let (_, total) = simulation::run_kind(kind, &config, trace)?;
    debug!("global {} over {} requests: {}", kind, trace.len(), total);

    Ok(AllocationReport {
        strategy: AllocationStrategy::Global,
        policy: kind,
        frames_per_instance: total_frames,
        total,
        per_tenant: Vec::new(),
    })
}

/// One isolated policy per tenant, each fed only that tenant's pages.
///
/// Tenants are numbered `1..=num_processes`. Optimal sees the tenant's own
/// remaining sub-trace as its future.
///
/// # Errors
/// `Error::InvalidConfiguration` for zero counts or a tenant id outside
/// `1..=num_processes`.
pub fn run_fixed(
    kind: PolicyKind,
    config: &PolicyConfig,
    trace: &[TenantPage],
    total_frames: usize,
    num_processes: usize,
) -> Result<AllocationReport> {
    let frames = frames_per_tenant(total_frames, num_processes)?;
    let config = config.with_frames(frames);
    let sub_traces = split_by_tenant(trace, num_processes)?;

    let per_tenant = sub_traces
        .iter()
        .map(|(tenant, pages)| {
            simulation::run_kind(kind, &config, pages).map(|(_, stats)| (*tenant, stats))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(fixed_report(kind, frames, per_tenant))
}

/// Same as [`run_fixed`], with every tenant on its own thread.
pub fn run_fixed_parallel(
    kind: PolicyKind,
    config: &PolicyConfig,
    trace: &[TenantPage],
    total_frames: usize,
    num_processes: usize,
) -> Result<AllocationReport> {
    let frames = frames_per_tenant(total_frames, num_processes)?;
    let config = config.with_frames(frames);
    let sub_traces = split_by_tenant(trace, num_processes)?;

    let results: Mutex<Vec<(TenantId, Result<Stats>)>> =
        Mutex::new(Vec::with_capacity(sub_traces.len()));
    thread::scope(|s| {
        for (tenant, pages) in &sub_traces {
            let results = &results;
            let config = &config;
            s.spawn(move || {
                let stats = simulation::run_kind(kind, config, pages).map(|(_, stats)| stats);
                results.lock().push((*tenant, stats));
            });
        }
    });

    let mut results = results.into_inner();
    results.sort_by_key(|(tenant, _)| *tenant);
    let per_tenant = results
        .into_iter()
        .map(|(tenant, stats)| stats.map(|stats| (tenant, stats)))
        .collect::<Result<Vec<_>>>()?;

    Ok(fixed_report(kind, frames, per_tenant))
}

fn fixed_report(
    kind: PolicyKind,
    frames: usize,
    per_tenant: Vec<(TenantId, Stats)>,
) -> AllocationReport {
    let total: Stats = per_tenant.iter().map(|(_, stats)| *stats).sum();
    debug!(
        "fixed {} with {} frames/tenant over {} tenants: {}",
        kind,
        frames,
        per_tenant.len(),
        total
    );
    AllocationReport {
        strategy: AllocationStrategy::Fixed,
        policy: kind,
        frames_per_instance: frames,
        total,
        per_tenant,
    }
}

/// Split an interleaved trace into per-tenant page sequences.
///
/// Every tenant in `1..=num_processes` gets an entry, even with no
/// requests, and relative order within a tenant is preserved.
pub fn split_by_tenant(
    trace: &[TenantPage],
    num_processes: usize,
) -> Result<Vec<(TenantId, Vec<PageId>)>> {
    let mut sub_traces: Vec<(TenantId, Vec<PageId>)> = (1..=num_processes)
        .map(|id| (TenantId::new(id as u32), Vec::new()))
        .collect();

    for req in trace {
        let idx = (req.tenant.0 as usize)
            .checked_sub(1)
            .filter(|idx| *idx < num_processes)
            .ok_or_else(|| {
                Error::invalid(format!(
                    "tenant {} outside 1..={}",
                    req.tenant.0, num_processes
                ))
            })?;
        sub_traces[idx].1.push(req.page);
    }
    Ok(sub_traces)
}
