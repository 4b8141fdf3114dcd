use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engine::core::read::context::ExecutionInterruptor;
use crate::engine::errors::SampleByError;

/// Allows a fixed number of interrupt checks, then reports cancellation.
#[derive(Debug)]
pub struct CountingInterruptor {
    allowed_checks: usize,
    checks: AtomicUsize,
}

impl CountingInterruptor {
    pub fn new(allowed_checks: usize) -> Self {
        Self {
            allowed_checks,
            checks: AtomicUsize::new(0),
        }
    }

    /// Never cancels; useful for counting checks only.
    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::Relaxed)
    }
}

impl ExecutionInterruptor for CountingInterruptor {
    fn check_interrupted(&self) -> Result<(), SampleByError> {
        let seen = self.checks.fetch_add(1, Ordering::Relaxed);
        if seen >= self.allowed_checks {
            Err(SampleByError::Cancelled)
        } else {
            Ok(())
        }
    }
}
