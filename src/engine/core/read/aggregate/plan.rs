use std::fmt;
use std::str::FromStr;

use crate::engine::errors::SampleByError;

/// Describes a single aggregate operation requested by the query
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateOpSpec {
    /// COUNT of all rows in the bucket
    CountAll,
    /// COUNT of non-null values of a specific field
    CountField { field: String },
    /// SUM over a numeric field
    Sum { field: String },
    /// AVG over a numeric field
    Avg { field: String },
    /// MIN over a numeric field
    Min { field: String },
    /// MAX over a numeric field
    Max { field: String },
    /// Value of the first row in the bucket
    First { field: String },
    /// Value of the last row in the bucket
    Last { field: String },
}

impl AggregateOpSpec {
    pub fn function_name(&self) -> &'static str {
        match self {
            AggregateOpSpec::CountAll | AggregateOpSpec::CountField { .. } => "count",
            AggregateOpSpec::Sum { .. } => "sum",
            AggregateOpSpec::Avg { .. } => "avg",
            AggregateOpSpec::Min { .. } => "min",
            AggregateOpSpec::Max { .. } => "max",
            AggregateOpSpec::First { .. } => "first",
            AggregateOpSpec::Last { .. } => "last",
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            AggregateOpSpec::CountAll => None,
            AggregateOpSpec::CountField { field }
            | AggregateOpSpec::Sum { field }
            | AggregateOpSpec::Avg { field }
            | AggregateOpSpec::Min { field }
            | AggregateOpSpec::Max { field }
            | AggregateOpSpec::First { field }
            | AggregateOpSpec::Last { field } => Some(field),
        }
    }

    /// Default output column name, e.g. `count` or `sum_price`.
    pub fn output_name(&self) -> String {
        match self.field() {
            Some(field) => format!("{}_{}", self.function_name(), field),
            None => self.function_name().to_string(),
        }
    }
}

impl fmt::Display for AggregateOpSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function_name(), self.field().unwrap_or(""))
    }
}

impl FromStr for AggregateOpSpec {
    type Err = SampleByError;

    /// Parses `count()`, `count(*)`, `count(x)`, `sum(x)`, `avg(x)`, `min(x)`,
    /// `max(x)`, `first(x)` and `last(x)`; names are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SampleByError::InvalidAggregate(s.to_string());
        let expr = s.trim();
        let (name, rest) = expr.split_once('(').ok_or_else(invalid)?;
        let arg = rest.strip_suffix(')').ok_or_else(invalid)?.trim();
        let name = name.trim().to_ascii_lowercase();

        if name == "count" && (arg.is_empty() || arg == "*") {
            return Ok(AggregateOpSpec::CountAll);
        }
        if arg.is_empty() || !arg.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(invalid());
        }
        let field = arg.to_string();
        match name.as_str() {
            "count" => Ok(AggregateOpSpec::CountField { field }),
            "sum" => Ok(AggregateOpSpec::Sum { field }),
            "avg" => Ok(AggregateOpSpec::Avg { field }),
            "min" => Ok(AggregateOpSpec::Min { field }),
            "max" => Ok(AggregateOpSpec::Max { field }),
            "first" => Ok(AggregateOpSpec::First { field }),
            "last" => Ok(AggregateOpSpec::Last { field }),
            _ => Err(invalid()),
        }
    }
}
