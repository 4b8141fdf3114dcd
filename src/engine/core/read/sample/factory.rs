use std::sync::Arc;

use tracing::{debug, info};

use super::fill::{default_fill_values, placeholder_functions};
use super::fill_value_cursor::SampleByFillValueCursor;
use super::record::RecordFunction;
use crate::engine::core::read::aggregate::{
    AggregateOpSpec, GroupByFunction, SimpleMapValue, ValueLayout,
};
use crate::engine::core::read::context::ExecutionContext;
use crate::engine::core::read::cursor::{RecordCursor, RecordMetadata};
use crate::engine::errors::SampleByError;
use crate::engine::types::ColumnType;
use crate::shared::config::CONFIG;
use crate::shared::datetime::{TimestampSampler, sampler_from_interval};

/// One output column of a sampling query.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputColumn {
    /// The bucket start, named after the input timestamp column.
    Timestamp,
    Aggregate(AggregateOpSpec),
}

/// Unvalidated description of a `SAMPLE BY ... FILL(...)` query.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleByPlan {
    pub interval: String,
    /// Input column to bucket on; the designated timestamp when `None`.
    pub timestamp_column: Option<String>,
    pub columns: Vec<OutputColumn>,
    /// Fill literals; empty means the configured default.
    pub fill_values: Vec<String>,
}

impl SampleByPlan {
    pub fn new(interval: impl Into<String>) -> Self {
        Self {
            interval: interval.into(),
            timestamp_column: None,
            columns: Vec::new(),
            fill_values: Vec::new(),
        }
    }

    pub fn with_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.timestamp_column = Some(column.into());
        self
    }

    pub fn with_timestamp(mut self) -> Self {
        self.columns.push(OutputColumn::Timestamp);
        self
    }

    pub fn with_aggregate(mut self, spec: AggregateOpSpec) -> Self {
        self.columns.push(OutputColumn::Aggregate(spec));
        self
    }

    pub fn with_fill(mut self, value: impl Into<String>) -> Self {
        self.fill_values.push(value.into());
        self
    }

    fn resolve_timestamp(&self, input: &RecordMetadata) -> Result<usize, SampleByError> {
        let index = match &self.timestamp_column {
            Some(name) => input
                .column_index(name)
                .ok_or_else(|| SampleByError::ColumnNotFound(name.clone()))?,
            None => input
                .timestamp_index()
                .ok_or_else(|| SampleByError::ColumnNotFound("designated timestamp".to_string()))?,
        };
        match input.column_type(index) {
            Some(ColumnType::Timestamp) => Ok(index),
            Some(found) => Err(SampleByError::NotATimestamp {
                column: input.column_name(index).unwrap_or_default().to_string(),
                found,
            }),
            None => Err(SampleByError::ColumnNotFound(index.to_string())),
        }
    }

    /// Validate the plan against the input columns.
    pub fn build(&self, input: &RecordMetadata) -> Result<SampleByFillValueFactory, SampleByError> {
        let sampler = sampler_from_interval(&self.interval)?;
        let timestamp_index = self.resolve_timestamp(input)?;
        let timestamp_name = input.column_name(timestamp_index).unwrap_or("timestamp");

        let mut columns = self.columns.clone();
        if !columns.contains(&OutputColumn::Timestamp) {
            columns.insert(0, OutputColumn::Timestamp);
        }
        if !columns.iter().any(|c| matches!(c, OutputColumn::Aggregate(_))) {
            return Err(SampleByError::InvalidAggregate(
                "at least one aggregate is required".to_string(),
            ));
        }

        let mut layout = ValueLayout::new();
        let mut metadata = RecordMetadata::new();
        let mut functions = Vec::new();
        let mut record_functions = Vec::with_capacity(columns.len());
        let mut symbol_skew = Vec::with_capacity(columns.len());
        let mut output_timestamp = None;

        for column in &columns {
            let (name, column_type) = match column {
                OutputColumn::Timestamp => {
                    record_functions.push(None);
                    symbol_skew.push(timestamp_index);
                    (timestamp_name.to_string(), ColumnType::Timestamp)
                }
                OutputColumn::Aggregate(spec) => {
                    let function = GroupByFunction::from_spec(spec, input, &mut layout)?;
                    symbol_skew.push(function.arg_column().unwrap_or(timestamp_index));
                    let column_type = function.output_type();
                    record_functions.push(Some(RecordFunction::Aggregate(function.clone())));
                    functions.push(function);
                    (spec.output_name(), column_type)
                }
            };
            if metadata.column_index(&name).is_some() {
                return Err(SampleByError::InvalidAggregate(format!(
                    "duplicate output column {name}"
                )));
            }
            let index = metadata.add_column(name, column_type);
            if matches!(column, OutputColumn::Timestamp) && output_timestamp.is_none() {
                output_timestamp = Some(index);
            }
        }
        if let Some(index) = output_timestamp {
            metadata = metadata.with_timestamp_index(index);
        }

        let output_types: Vec<ColumnType> = functions.iter().map(|f| f.output_type()).collect();
        let fill_values = if self.fill_values.is_empty() {
            default_fill_values(&CONFIG.query.default_fill, &output_types)
        } else {
            self.fill_values.clone()
        };
        let mut fillers = placeholder_functions(&fill_values, &output_types)?.into_iter();
        let placeholder_template = record_functions
            .iter()
            .map(|f| f.as_ref().and_then(|_| fillers.next()))
            .collect();

        info!(
            target: "sample_by::factory",
            interval = %self.interval,
            aggregates = ?functions.iter().map(GroupByFunction::name).collect::<Vec<_>>(),
            slots = layout.len(),
            "Built fill value sample by"
        );

        Ok(SampleByFillValueFactory {
            metadata,
            sampler,
            functions,
            layout,
            record_functions,
            placeholder_functions: placeholder_template,
            timestamp_index,
            symbol_skew,
        })
    }
}

/// Validated sampling query; produces bound cursors.
#[derive(Debug, Clone)]
pub struct SampleByFillValueFactory {
    metadata: RecordMetadata,
    sampler: Arc<dyn TimestampSampler>,
    functions: Vec<GroupByFunction>,
    layout: ValueLayout,
    record_functions: Vec<Option<RecordFunction>>,
    placeholder_functions: Vec<Option<RecordFunction>>,
    timestamp_index: usize,
    symbol_skew: Vec<usize>,
}

impl SampleByFillValueFactory {
    /// Layout of the rows produced by the cursors of this factory.
    pub fn metadata(&self) -> &RecordMetadata {
        &self.metadata
    }

    pub fn functions(&self) -> &[GroupByFunction] {
        &self.functions
    }

    /// Input column the buckets are computed from.
    pub fn timestamp_index(&self) -> usize {
        self.timestamp_index
    }

    pub fn cursor(
        &self,
        input: Box<dyn RecordCursor>,
        ctx: &ExecutionContext,
    ) -> Result<SampleByFillValueCursor, SampleByError> {
        debug!(
            target: "sample_by::factory",
            input_rows = ?input.size(),
            "Creating fill value cursor"
        );
        let mut cursor = SampleByFillValueCursor::new(
            self.functions.clone(),
            self.record_functions.clone(),
            self.placeholder_functions.clone(),
            self.timestamp_index,
            Arc::clone(&self.sampler),
            self.symbol_skew.clone(),
            SimpleMapValue::new(&self.layout),
        );
        cursor.of(input, ctx)?;
        Ok(cursor)
    }
}
