use crate::engine::core::read::aggregate::AggregateOpSpec;
use crate::engine::core::read::cursor::RecordMetadata;
use crate::engine::core::read::sample::{SampleByFillValueFactory, SampleByPlan};

/// Factory for `SampleByPlan` objects in tests.
///
/// Defaults to `SAMPLE BY 60U FILL(0)` with a single `count()`.
pub struct SampleByPlanFactory {
    interval: String,
    aggregates: Vec<String>,
    fill_values: Vec<String>,
}

impl SampleByPlanFactory {
    pub fn new() -> Self {
        Self {
            interval: "60U".to_string(),
            aggregates: Vec::new(),
            fill_values: vec!["0".to_string()],
        }
    }

    pub fn with_interval(mut self, interval: &str) -> Self {
        self.interval = interval.to_string();
        self
    }

    /// Add an aggregate expression such as `sum(price)`.
    pub fn with_aggregate(mut self, expr: &str) -> Self {
        self.aggregates.push(expr.to_string());
        self
    }

    /// Replace the fill values.
    pub fn with_fill(mut self, values: &[&str]) -> Self {
        self.fill_values = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn create(self) -> SampleByPlan {
        let exprs = if self.aggregates.is_empty() {
            vec!["count()".to_string()]
        } else {
            self.aggregates
        };
        let plan = exprs
            .iter()
            .map(|e| e.parse::<AggregateOpSpec>().unwrap())
            .fold(SampleByPlan::new(self.interval).with_timestamp(), |plan, spec| {
                plan.with_aggregate(spec)
            });
        self.fill_values
            .into_iter()
            .fold(plan, |plan, value| plan.with_fill(value))
    }

    /// Build the plan against `metadata`, panicking on planning errors.
    pub fn build(self, metadata: &RecordMetadata) -> SampleByFillValueFactory {
        self.create().build(metadata).unwrap()
    }
}
