use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engine::core::read::cursor::{MemRecordCursor, Record, RecordCursor, SymbolTable};
use crate::engine::errors::SampleByError;

/// Counters shared between a `TrackingCursor` and the test observing it.
#[derive(Debug, Default)]
pub struct TrackingStats {
    pub fetches: AtomicUsize,
    pub rewinds: AtomicUsize,
    pub closes: AtomicUsize,
}

impl TrackingStats {
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn rewinds(&self) -> usize {
        self.rewinds.load(Ordering::Relaxed)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::Relaxed)
    }
}

/// Wraps a `MemRecordCursor`, counting calls and optionally failing a fetch.
pub struct TrackingCursor {
    inner: MemRecordCursor,
    stats: Arc<TrackingStats>,
    fail_on_fetch: Option<usize>,
}

impl TrackingCursor {
    pub fn new(inner: MemRecordCursor) -> (Self, Arc<TrackingStats>) {
        let stats = Arc::new(TrackingStats::default());
        (
            Self {
                inner,
                stats: Arc::clone(&stats),
                fail_on_fetch: None,
            },
            stats,
        )
    }

    /// Make the n-th `has_next` call (1-based) fail with an upstream error.
    pub fn failing_on_fetch(mut self, n: usize) -> Self {
        self.fail_on_fetch = Some(n);
        self
    }
}

impl RecordCursor for TrackingCursor {
    fn has_next(&mut self) -> Result<bool, SampleByError> {
        let n = self.stats.fetches.fetch_add(1, Ordering::Relaxed) + 1;
        if self.fail_on_fetch == Some(n) {
            return Err(SampleByError::Upstream(format!("fetch {n} failed")));
        }
        self.inner.has_next()
    }

    fn record(&self) -> &dyn Record {
        self.inner.record()
    }

    fn to_top(&mut self) -> Result<(), SampleByError> {
        self.stats.rewinds.fetch_add(1, Ordering::Relaxed);
        self.inner.to_top()
    }

    fn symbol_table(&self, col: usize) -> Option<&dyn SymbolTable> {
        self.inner.symbol_table(col)
    }

    fn size(&self) -> Option<u64> {
        self.inner.size()
    }

    fn close(&mut self) {
        self.stats.closes.fetch_add(1, Ordering::Relaxed);
        self.inner.close();
    }
}
