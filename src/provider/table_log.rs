//! Console lines picked up by the external log collector.
//!
//! Each handler invocation writes one JSON line to stdout naming the table the
//! collector should store it in. These lines are separate from the `tracing`
//! diagnostics.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::event::LifecycleEvent;

#[derive(Debug, Serialize)]
struct TableLine<'a> {
    #[serde(rename = "Tablename")]
    table_name: &'a str,
    #[serde(rename = "logMessage")]
    log_message: String,
}

/// Writer for collector table lines.
#[derive(Debug, Clone)]
pub struct TableLog {
    table_name: String,
}

impl TableLog {
    /// Create a writer targeting `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
        }
    }

    /// Render the line for `event` occurring at `at`.
    pub fn line(&self, event: LifecycleEvent, at: DateTime<Utc>) -> serde_json::Result<String> {
        let line = TableLine {
            table_name: &self.table_name,
            log_message: format!(
                "{} called at {}",
                event.action(),
                at.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
        };
        serde_json::to_string(&line)
    }

    /// Write the line for `event` to stdout.
    pub fn emit(&self, event: LifecycleEvent, at: DateTime<Utc>) {
        let line = match self.line(event, at) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    action = event.action(),
                    "failed to render table log line"
                );
                return;
            }
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{line}") {
            tracing::warn!(error = %e, "failed to write table log line");
        }
    }
}
