use clap::Parser;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

use sample_by::engine::core::read::aggregate::AggregateOpSpec;
use sample_by::engine::core::read::context::{CancellationToken, ExecutionContext};
use sample_by::engine::core::read::cursor::{MemRecordCursor, RecordCursor, RecordMetadata};
use sample_by::engine::core::read::sample::{RecordView, SampleByPlan};
use sample_by::engine::errors::SampleByError;
use sample_by::engine::types::ScalarValue;
use sample_by::logging;
use sample_by::shared::config::CONFIG;
use sample_by::shared::time::TimeParser;

#[derive(Parser)]
#[command(name = "sample-by")]
#[command(about = "Bucket JSON rows by time and fill empty buckets", long_about = None)]
struct Args {
    /// Input file with one JSON object per line (stdin when omitted)
    input: Option<PathBuf>,

    /// Input columns, e.g. "ts:timestamp,price:double,sym:symbol"
    #[arg(short, long)]
    schema: String,

    /// Bucket width, e.g. 15m, 1h, 1M
    #[arg(short, long)]
    every: String,

    /// Aggregate expression; repeat for several columns
    #[arg(short, long = "agg", required = true)]
    aggs: Vec<String>,

    /// Fill value for empty buckets; one per aggregate or one for all
    /// Defaults to query.default_fill for numeric aggregates, null otherwise
    #[arg(short, long = "fill")]
    fills: Vec<String>,

    /// Bucket on this timestamp column instead of the first one
    #[arg(short, long)]
    timestamp: Option<String>,

    /// Sort input by the bucketing timestamp before sampling
    #[arg(long)]
    sort: bool,
}

fn read_input(
    args: &Args,
    metadata: RecordMetadata,
    timestamp_index: usize,
) -> Result<MemRecordCursor, SampleByError> {
    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };
    let mut cursor = MemRecordCursor::from_json_lines(metadata, reader)?;
    if args.sort {
        cursor.sort_by_column(timestamp_index);
    }
    Ok(cursor)
}

fn render(value: ScalarValue) -> Value {
    match value {
        ScalarValue::Timestamp(ts) => Value::String(TimeParser::format_micros(ts)),
        other => other.to_json(),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init()?;

    let metadata = RecordMetadata::parse_schema(&args.schema)?;
    let mut plan = SampleByPlan::new(&args.every).with_timestamp();
    if let Some(column) = &args.timestamp {
        plan = plan.with_timestamp_column(column);
    }
    for expr in &args.aggs {
        plan = plan.with_aggregate(expr.parse::<AggregateOpSpec>()?);
    }
    for fill in &args.fills {
        plan = plan.with_fill(fill);
    }

    let factory = plan.build(&metadata).inspect_err(SampleByError::log_error)?;
    let input = read_input(&args, metadata, factory.timestamp_index())
        .inspect_err(SampleByError::log_error)?;
    info!(rows = input.len(), interval = %args.every, "Sampling input");

    let ctx = ExecutionContext::from_config(&CONFIG.query, CancellationToken::new());
    let mut cursor = factory.cursor(Box::new(input), &ctx)?;
    let output = factory.metadata();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut emitted = 0usize;
    loop {
        match cursor.has_next() {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                e.log_error();
                cursor.close();
                return Err(e.into());
            }
        }
        let record = cursor.record();
        let mut object = Map::new();
        for (i, column) in output.columns().iter().enumerate() {
            let value = record.value(i, column.column_type);
            object.insert(column.name.clone(), render(value));
        }
        object.insert(
            "filled".to_string(),
            Value::Bool(cursor.active_view() == RecordView::Filler),
        );
        serde_json::to_writer(&mut out, &Value::Object(object))?;
        out.write_all(b"\n")?;
        emitted += 1;
    }
    out.flush()?;
    cursor.close();

    info!(buckets = emitted, "Sampling finished");
    Ok(())
}
