//! pagesim - A page replacement simulator with interchangeable eviction policies.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            pagesim                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Workload (workload.rs)                      │   │
//! │  │      trace file parser  |  random / sequential / locality│   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │   Allocation (allocation.rs)  [multi-process traces]    │   │
//! │  │     global: one shared pool  |  fixed: pool per tenant   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │           Simulation driver (simulation.rs)              │   │
//! │  │        request i + future trace[i+1..] → policy          │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │       Replacement policies (policy/)  [Runtime Swappable]│   │
//! │  │           FIFO | LRU | Optimal | MGLRU                   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │        Metrics (metrics/)  →  ReportSink (report.rs)     │   │
//! │  │       Stats + Timeline + MGLRU generation log            │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, TenantPage, Error, config)
//! - [`policy`] - Replacement policies
//! - [`metrics`] - Stats, timeline and generation log
//! - [`simulation`] - Single-trace driver and comparison sweeps
//! - [`allocation`] - Global and fixed multi-process allocation
//! - [`workload`] - Trace parsing and generation
//! - [`report`] - Report sinks
//!
//! # Quick Start
//! ```
//! use pagesim::{simulation, PageId, Policy, PolicyConfig, PolicyKind};
//!
//! let trace: Vec<PageId> = [1, 2, 1, 3].into_iter().map(PageId::new).collect();
//! let mut lru = Policy::build(PolicyKind::Lru, &PolicyConfig::new(2)).unwrap();
//! let stats = simulation::run(&mut lru, &trace).unwrap();
//!
//! assert_eq!(stats.hits, 1);
//! assert_eq!(stats.faults, 3);
//! ```

pub mod allocation;
pub mod common;
pub mod metrics;
pub mod policy;
pub mod report;
pub mod simulation;
pub mod workload;

// Re-export commonly used items at crate root for convenience
pub use common::{Error, PageId, PageKey, PolicyConfig, Result, TenantId, TenantPage};

pub use allocation::{AllocationReport, AllocationStrategy};
pub use metrics::{GenerationSnapshot, Outcome, Recorder, Stats, TimelineEntry};
pub use policy::{
    Access, FifoPolicy, LruPolicy, MglruPolicy, OptimalPolicy, Policy, PolicyKind,
    ReplacementPolicy,
};
pub use report::{FileReport, ReportSink};
pub use simulation::ComparisonRow;
pub use workload::WorkloadKind;
