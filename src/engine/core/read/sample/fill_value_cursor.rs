use std::sync::Arc;

use tracing::{Level, debug, enabled, trace};

use super::record::{RecordFunction, RecordView, SharedTimestamp, SplitRecord};
use crate::engine::core::read::aggregate::{GroupByFunction, SimpleMapValue};
use crate::engine::core::read::context::{ExecutionContext, ExecutionInterruptor};
use crate::engine::core::read::cursor::{Record, RecordCursor, SymbolTable};
use crate::engine::errors::SampleByError;
use crate::shared::datetime::TimestampSampler;

#[derive(Debug, Default, Clone, Copy)]
struct CursorStats {
    real_buckets: u64,
    filler_buckets: u64,
    rows_folded: u64,
}

/// Non-keyed SAMPLE BY cursor that fills empty buckets with constant values.
///
/// The cursor keeps one input row of lookahead. Each `has_next` either emits
/// a filler bucket (the lookahead lies beyond the next boundary) or aggregates
/// every row of the lookahead's bucket into the state buffer, stopping on the
/// first row of a later bucket.
pub struct SampleByFillValueCursor {
    functions: Vec<GroupByFunction>,
    record: SplitRecord,
    timestamp: SharedTimestamp,
    timestamp_index: usize,
    sampler: Arc<dyn TimestampSampler>,
    symbol_skew: Vec<usize>,
    base: Option<Box<dyn RecordCursor>>,
    interruptor: Option<Arc<dyn ExecutionInterruptor>>,
    has_pending: bool,
    next_timestamp: i64,
    stats: CursorStats,
}

impl SampleByFillValueCursor {
    /// `record_functions` and `placeholder_functions` describe the real and
    /// filler view of each output column. Positions left as `None` in either
    /// list report the current bucket timestamp.
    pub fn new(
        functions: Vec<GroupByFunction>,
        record_functions: Vec<Option<RecordFunction>>,
        placeholder_functions: Vec<Option<RecordFunction>>,
        timestamp_index: usize,
        sampler: Arc<dyn TimestampSampler>,
        symbol_skew: Vec<usize>,
        map_value: SimpleMapValue,
    ) -> Self {
        let timestamp = SharedTimestamp::new();
        let inject = |list: Vec<Option<RecordFunction>>| -> Vec<RecordFunction> {
            list.into_iter()
                .map(|f| f.unwrap_or_else(|| RecordFunction::Timestamp(timestamp.clone())))
                .collect()
        };
        let real = inject(record_functions);
        let filler = inject(placeholder_functions);

        Self {
            functions,
            record: SplitRecord::new(real, filler, map_value),
            timestamp,
            timestamp_index,
            sampler,
            symbol_skew,
            base: None,
            interruptor: None,
            has_pending: false,
            next_timestamp: 0,
            stats: CursorStats::default(),
        }
    }

    /// Bind to an input ordered by its designated timestamp and prime the lookahead.
    pub fn of(
        &mut self,
        base: Box<dyn RecordCursor>,
        ctx: &ExecutionContext,
    ) -> Result<(), SampleByError> {
        if let Some(mut previous) = self.base.take() {
            previous.close();
        }
        self.interruptor = Some(Arc::clone(ctx.interruptor()));
        self.base = Some(base);
        self.prime()?;
        debug!(
            target: "sample_by::fill_value_cursor",
            functions = self.functions.len(),
            columns = self.record.column_count(),
            has_rows = self.has_pending,
            "Bound fill value cursor"
        );
        Ok(())
    }

    /// View backing the record returned by `record()`.
    pub fn active_view(&self) -> RecordView {
        self.record.active()
    }

    /// Fetch the first input row and point both boundaries at its bucket.
    fn prime(&mut self) -> Result<(), SampleByError> {
        let base = self.base.as_mut().ok_or(SampleByError::NotBound)?;
        self.stats = CursorStats::default();
        self.record.set_active(RecordView::Real);
        if base.has_next()? {
            let ts = base
                .record()
                .get_timestamp(self.timestamp_index)
                .ok_or(SampleByError::NullTimestamp)?;
            let bucket = self
                .sampler
                .round(ts)
                .ok_or(SampleByError::InvalidTimestamp(ts))?;
            self.timestamp.set(bucket);
            self.next_timestamp = bucket;
            self.has_pending = true;
        } else {
            self.has_pending = false;
        }
        Ok(())
    }

    fn emit_filler(&mut self, bucket: i64) -> bool {
        self.timestamp.set(bucket);
        self.record.set_active(RecordView::Filler);
        self.stats.filler_buckets += 1;
        if enabled!(Level::TRACE) {
            trace!(
                target: "sample_by::fill_value_cursor",
                bucket,
                pending = self.next_timestamp,
                "Emitting filler bucket"
            );
        }
        true
    }

    fn aggregate_bucket(&mut self) -> Result<bool, SampleByError> {
        let base = self.base.as_mut().ok_or(SampleByError::NotBound)?;
        let interruptor = self.interruptor.as_ref().ok_or(SampleByError::NotBound)?;

        let bucket = self.next_timestamp;
        self.timestamp.set(bucket);
        self.record.set_active(RecordView::Real);
        self.stats.real_buckets += 1;

        let value = self.record.value_mut();
        for function in &self.functions {
            interruptor.check_interrupted()?;
            function.compute_first(value, base.record());
        }
        let mut rows = 1u64;

        loop {
            if !base.has_next()? {
                self.has_pending = false;
                break;
            }
            let record = base.record();
            let ts = record
                .get_timestamp(self.timestamp_index)
                .ok_or(SampleByError::NullTimestamp)?;
            let row_bucket = self
                .sampler
                .round(ts)
                .ok_or(SampleByError::InvalidTimestamp(ts))?;
            if row_bucket == bucket {
                for function in &self.functions {
                    interruptor.check_interrupted()?;
                    function.compute_next(value, record);
                }
                rows += 1;
                continue;
            }
            if row_bucket < bucket {
                return Err(SampleByError::UnorderedTimestamp {
                    previous: bucket,
                    current: row_bucket,
                });
            }
            self.next_timestamp = row_bucket;
            break;
        }

        self.stats.rows_folded += rows;
        if enabled!(Level::TRACE) {
            trace!(
                target: "sample_by::fill_value_cursor",
                bucket,
                rows,
                last = !self.has_pending,
                "Emitting aggregated bucket"
            );
        }
        Ok(true)
    }
}

impl RecordCursor for SampleByFillValueCursor {
    fn has_next(&mut self) -> Result<bool, SampleByError> {
        if self.base.is_none() {
            return Err(SampleByError::NotBound);
        }
        if !self.has_pending {
            return Ok(false);
        }

        let next = self.sampler.next_timestamp(self.timestamp.get());
        if self.next_timestamp > next {
            return Ok(self.emit_filler(next));
        }
        self.aggregate_bucket()
    }

    fn record(&self) -> &dyn Record {
        &self.record
    }

    fn to_top(&mut self) -> Result<(), SampleByError> {
        let base = self.base.as_mut().ok_or(SampleByError::NotBound)?;
        base.to_top()?;
        self.record.value_mut().clear();
        debug!(
            target: "sample_by::fill_value_cursor",
            real_buckets = self.stats.real_buckets,
            filler_buckets = self.stats.filler_buckets,
            rows = self.stats.rows_folded,
            "Rewinding fill value cursor"
        );
        self.prime()
    }

    fn symbol_table(&self, col: usize) -> Option<&dyn SymbolTable> {
        let base = self.base.as_ref()?;
        base.symbol_table(*self.symbol_skew.get(col)?)
    }

    fn size(&self) -> Option<u64> {
        None
    }

    fn close(&mut self) {
        if let Some(mut base) = self.base.take() {
            base.close();
            debug!(
                target: "sample_by::fill_value_cursor",
                real_buckets = self.stats.real_buckets,
                filler_buckets = self.stats.filler_buckets,
                rows = self.stats.rows_folded,
                "Closed fill value cursor"
            );
        }
        self.interruptor = None;
        self.has_pending = false;
    }
}
