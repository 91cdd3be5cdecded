//! Configuration constants and policy parameters for pagesim.

use crate::common::{Error, Result};

/// Number of MGLRU generations when none is given.
pub const DEFAULT_NUM_GENERATIONS: usize = 4;

/// Requests between two MGLRU aging events when none is given.
pub const DEFAULT_AGING_THRESHOLD: usize = 10;

/// Probability that a locality workload stays near the current page.
pub const LOCALITY_PROBABILITY: f64 = 0.8;

/// The locality window is `max_page / LOCALITY_DIVISOR` pages wide on
/// either side of the current page.
pub const LOCALITY_DIVISOR: u32 = 4;

/// Directory that file reports are written to by default.
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Construction parameters shared by every replacement policy.
///
/// Only MGLRU reads `num_generations` and `aging_threshold`; the other
/// policies ignore them.
///
/// # Example
/// ```
/// use pagesim::PolicyConfig;
///
/// let config = PolicyConfig::new(8).with_generations(3).with_aging_threshold(5);
/// assert!(config.validate().is_ok());
/// assert!(PolicyConfig::new(0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Number of frames the policy may keep resident.
    pub num_frames: usize,

    /// Number of MGLRU generations (index 0 = youngest).
    pub num_generations: usize,

    /// MGLRU aging period, in requests.
    pub aging_threshold: usize,
}

impl PolicyConfig {
    /// Config with `num_frames` frames and MGLRU defaults.
    pub fn new(num_frames: usize) -> Self {
        Self {
            num_frames,
            num_generations: DEFAULT_NUM_GENERATIONS,
            aging_threshold: DEFAULT_AGING_THRESHOLD,
        }
    }

    pub fn with_generations(mut self, num_generations: usize) -> Self {
        self.num_generations = num_generations;
        self
    }

    pub fn with_aging_threshold(mut self, aging_threshold: usize) -> Self {
        self.aging_threshold = aging_threshold;
        self
    }

    /// Same parameters with a different frame budget.
    pub fn with_frames(mut self, num_frames: usize) -> Self {
        self.num_frames = num_frames;
        self
    }

    /// Reject parameters no policy can run with.
    ///
    /// # Errors
    /// `Error::InvalidConfiguration` if any count is zero.
    pub fn validate(&self) -> Result<()> {
        if self.num_frames == 0 {
            return Err(Error::invalid("number of frames must be positive"));
        }
        if self.num_generations == 0 {
            return Err(Error::invalid("number of generations must be positive"));
        }
        if self.aging_threshold == 0 {
            return Err(Error::invalid("aging threshold must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PolicyConfig::new(3);
        assert_eq!(config.num_frames, 3);
        assert_eq!(config.num_generations, 4);
        assert_eq!(config.aging_threshold, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_counts_rejected() {
        assert!(matches!(
            PolicyConfig::new(0).validate(),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(PolicyConfig::new(2).with_generations(0).validate().is_err());
        assert!(PolicyConfig::new(2).with_aging_threshold(0).validate().is_err());
    }

    #[test]
    fn test_with_frames_keeps_mglru_knobs() {
        let config = PolicyConfig::new(2).with_generations(6).with_frames(9);
        assert_eq!(config.num_frames, 9);
        assert_eq!(config.num_generations, 6);
    }
}
