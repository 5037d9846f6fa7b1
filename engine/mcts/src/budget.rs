//! Search stopping conditions.

use std::time::{Duration, Instant};

use crate::config::MctsConfig;

/// Decides when a search stops.
///
/// Checked before every iteration with the number completed so far, so an
/// iteration that has started always runs to completion.
pub trait StopCondition {
    fn should_stop(&mut self, completed: u32) -> bool;
}

/// Stop once a wall-clock budget has elapsed.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    start: Instant,
    limit: Duration,
}

impl TimeBudget {
    /// Start the clock now.
    pub fn new(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl StopCondition for TimeBudget {
    #[inline]
    fn should_stop(&mut self, _completed: u32) -> bool {
        self.start.elapsed() >= self.limit
    }
}

/// Stop after a fixed number of iterations. Used for reproducible searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationBudget {
    iterations: u32,
}

impl IterationBudget {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }
}

impl StopCondition for IterationBudget {
    #[inline]
    fn should_stop(&mut self, completed: u32) -> bool {
        completed >= self.iterations
    }
}

/// Time budget with an optional iteration cap, whichever ends first.
#[derive(Debug, Clone, Copy)]
pub struct SearchBudget {
    time: TimeBudget,
    max_iterations: Option<u32>,
}

impl SearchBudget {
    pub fn new(time_limit: Duration, max_iterations: Option<u32>) -> Self {
        Self {
            time: TimeBudget::new(time_limit),
            max_iterations,
        }
    }

    /// Budget described by `config`, starting now.
    pub fn from_config(config: &MctsConfig) -> Self {
        Self::new(config.time_limit, config.max_iterations)
    }
}

impl StopCondition for SearchBudget {
    fn should_stop(&mut self, completed: u32) -> bool {
        if self.max_iterations.is_some_and(|max| completed >= max) {
            return true;
        }
        self.time.should_stop(completed)
    }
}
