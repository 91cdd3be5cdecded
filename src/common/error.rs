//! Error types for pagesim.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in pagesim.
///
/// Configuration and lookup errors are raised before a simulation starts.
/// `InternalConsistency` aborts a run that is already in progress.
#[derive(Debug, Error)]
pub enum Error {
    /// A construction parameter is out of range (e.g. zero frames).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Unrecognized replacement policy selector.
    #[error("Unknown policy '{0}' (expected FIFO, LRU, Optimal or MGLRU)")]
    UnknownPolicy(String),

    /// Unrecognized workload generator selector.
    #[error("Unknown workload type '{0}' (expected random, sequential or locality)")]
    UnknownWorkloadType(String),

    /// Unrecognized frame allocation selector.
    #[error("Unknown allocation strategy '{0}' (expected fixed or global)")]
    UnknownAllocationStrategy(String),

    /// Policy bookkeeping no longer matches its resident set.
    ///
    /// This indicates a bug - it can't happen while the invariants hold.
    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),

    /// I/O error from reading a trace or writing a report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}
