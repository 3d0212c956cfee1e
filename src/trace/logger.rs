use std::{
    fs::{File, OpenOptions},
    io::{LineWriter, Write},
    sync::{Mutex, PoisonError},
};

use serde::Serialize;
use tracing::{debug, warn};

use crate::{agent::error::AgentError, trace::trace::TraceEvent};

/// One JSONL record: the event tagged with the run it belongs to, so several
/// `run` invocations appended to the same file can be told apart.
#[derive(Serialize)]
struct TraceLine<'a> {
    run: u64,
    #[serde(flatten)]
    event: &'a TraceEvent,
}

struct TraceSink {
    path: String,
    writer: LineWriter<File>,
    run: u64,
    failed: bool,
}

/// Appends agent trace events to a JSONL file. Opening failures turn the
/// logger into a no-op; write failures are warned about once and then
/// dropped so tracing never fails a run.
pub struct TraceLogger {
    sink: Option<Mutex<TraceSink>>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                sink: Some(Mutex::new(TraceSink {
                    path: path.to_string(),
                    writer: LineWriter::new(file),
                    run: 0,
                    failed: false,
                })),
            },
            Err(e) => {
                warn!(path, error = %e, "could not open trace file; tracing disabled");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Start a new run: bumps the run number stamped on every following
    /// line and records the instruction being worked on.
    pub fn begin_run(&self, instruction: &str) {
        self.with_sink(|sink| {
            sink.run += 1;
            debug!(run = sink.run, path = %sink.path, "trace run started");
            let event = TraceEvent::now(0, "run").with_detail(instruction);
            sink.write(&event)
        });
    }

    pub fn log(&self, event: &TraceEvent) {
        self.with_sink(|sink| sink.write(event));
    }

    fn with_sink(&self, f: impl FnOnce(&mut TraceSink) -> Result<(), AgentError>) {
        let Some(sink) = &self.sink else {
            return;
        };
        // A panic mid-write leaves at worst a torn line; keep appending.
        let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);

        if let Err(e) = f(&mut *sink) {
            if !sink.failed {
                warn!(error = %e, "trace event dropped; further failures are silent");
                sink.failed = true;
            }
        }
    }
}

impl TraceSink {
    fn write(&mut self, event: &TraceEvent) -> Result<(), AgentError> {
        let line = TraceLine { run: self.run, event };
        serde_json::to_writer(&mut self.writer, &line).map_err(|source| {
            AgentError::JsonSerialize {
                context: format!("trace event '{}'", event.kind),
                source,
            }
        })?;
        self.writer.write_all(b"\n").map_err(|source| AgentError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
