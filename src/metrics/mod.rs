//! Run metrics.
//!
//! # Components
//! - [`Stats`] - Hit/fault counts with derived ratios
//! - [`Recorder`] - Per-policy counters plus the step-indexed timeline
//! - [`TimelineEntry`] / [`Outcome`] - One row of the timeline
//! - [`GenerationSnapshot`] - MGLRU generation sizes after a request

mod recorder;
mod stats;

pub use recorder::{GenerationSnapshot, Outcome, Recorder, TimelineEntry};
pub use stats::Stats;
