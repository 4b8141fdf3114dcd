use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::engine::errors::SampleByError;
use crate::shared::config::model::QueryConfig;

/// Cooperative interruption hook polled by long-running cursor loops.
///
/// Returning an error aborts the current operation; callers propagate it
/// without retrying.
pub trait ExecutionInterruptor: Send + Sync {
    fn check_interrupted(&self) -> Result<(), SampleByError>;
}

/// Never interrupts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInterruptor;

impl ExecutionInterruptor for NoopInterruptor {
    #[inline]
    fn check_interrupted(&self) -> Result<(), SampleByError> {
        Ok(())
    }
}

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Default, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl ExecutionInterruptor for CancellationToken {
    #[inline]
    fn check_interrupted(&self) -> Result<(), SampleByError> {
        if self.is_cancelled() {
            Err(SampleByError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Interrupts once a deadline has passed, or when the wrapped token is cancelled.
#[derive(Debug, Clone)]
pub struct TimeoutInterruptor {
    deadline: Instant,
    timeout: Duration,
    token: CancellationToken,
}

impl TimeoutInterruptor {
    pub fn new(timeout: Duration, token: CancellationToken) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            timeout,
            token,
        }
    }
}

impl ExecutionInterruptor for TimeoutInterruptor {
    fn check_interrupted(&self) -> Result<(), SampleByError> {
        self.token.check_interrupted()?;
        if Instant::now() >= self.deadline {
            return Err(SampleByError::QueryTimeout(self.timeout.as_millis() as u64));
        }
        Ok(())
    }
}

/// Per-query execution state handed to cursors when they are bound.
#[derive(Clone)]
pub struct ExecutionContext {
    interruptor: Arc<dyn ExecutionInterruptor>,
}

impl ExecutionContext {
    pub fn new(interruptor: Arc<dyn ExecutionInterruptor>) -> Self {
        Self { interruptor }
    }

    /// Cancellable context, with a deadline when the query config sets `timeout_ms`.
    pub fn from_config(config: &QueryConfig, token: CancellationToken) -> Self {
        match config.timeout_ms {
            Some(ms) => Self::new(Arc::new(TimeoutInterruptor::new(
                Duration::from_millis(ms),
                token,
            ))),
            None => Self::new(Arc::new(token)),
        }
    }

    pub fn interruptor(&self) -> &Arc<dyn ExecutionInterruptor> {
        &self.interruptor
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(Arc::new(NoopInterruptor))
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext").finish_non_exhaustive()
    }
}
