use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use super::stages::{Stage, StageName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Success,
    Error,
}

/// Timing, input and output of one stage execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub stage: StageName,
    pub status: StageStatus,
    pub duration_ms: f64,
    pub input: Value,
    pub output: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Append-only record of stage executions. Only [`TraceLog::clear`] removes entries.
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    records: Vec<TraceRecord>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TraceRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Records appended at or after `index`.
    pub fn since(&self, index: usize) -> &[TraceRecord] {
        self.records.get(index..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Runs `stage`, timing it and appending a [`TraceRecord`] to `log`.
///
/// A stage error is recorded and replaced by the output's `Default`, so the next stage
/// still receives an input.
pub fn traced<S>(log: &mut TraceLog, stage: &S, input: &S::Input) -> S::Output
where
    S: Stage + ?Sized,
{
    let name = stage.name();
    let input_snapshot = snapshot(input);
    debug!(stage = name.label(), "stage started");

    let started = Instant::now();
    let outcome = stage.execute(input);
    let duration_ms = round_two_decimals(started.elapsed().as_secs_f64() * 1000.0);

    let (output, record) = match outcome {
        Ok(output) => {
            debug!(stage = name.label(), duration_ms, "stage completed");
            let record = TraceRecord {
                stage: name,
                status: StageStatus::Success,
                duration_ms,
                input: input_snapshot,
                output: snapshot(&output),
                error: None,
            };
            (output, record)
        }
        Err(err) => {
            let message = err.to_string();
            error!(stage = name.label(), error = %message, "stage failed");
            let record = TraceRecord {
                stage: name,
                status: StageStatus::Error,
                duration_ms,
                input: input_snapshot,
                output: json!({ "error": message }),
                error: Some(message),
            };
            (S::Output::default(), record)
        }
    };

    log.push(record);
    output
}

fn snapshot<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value)
        .unwrap_or_else(|err| json!({ "snapshot_error": err.to_string() }))
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
