use std::{
    fmt,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Log severity level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Informational events.
    Info,
    /// Recoverable anomaly (e.g. a skipped plan).
    Warn,
}

/// One line of the run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Timestamp in ISO8601.
    pub timestamp: DateTime<Utc>,
    /// Run the record belongs to.
    pub run_id: Uuid,
    /// Component emitting the record.
    pub module: String,
    /// Severity.
    pub level: LogLevel,
    /// Event name, e.g. `plan.sampled`.
    pub message: String,
    /// Event fields.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, Value>,
}

/// Append-only JSON-lines writer.
struct JsonLogger {
    path: PathBuf,
    writer: Mutex<File>,
}

impl JsonLogger {
    fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening run log {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(file),
        })
    }

    fn write(&self, record: &LogRecord) -> Result<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Builder for [`ObservationTelemetry`].
#[derive(Debug)]
pub struct ObservationTelemetryBuilder {
    module: String,
    run_id: Option<Uuid>,
    log_path: Option<PathBuf>,
}

impl ObservationTelemetryBuilder {
    /// Creates the builder.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            run_id: None,
            log_path: None,
        }
    }

    /// Pins the run id (a fresh v4 id is generated otherwise).
    #[must_use]
    pub const fn run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Enables the JSON-lines log at `path`.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Builds the telemetry handle, opening the log file if one was set.
    ///
    /// # Errors
    /// Fails when the log file or its directory cannot be created.
    pub fn build(self) -> Result<ObservationTelemetry> {
        let logger = self
            .log_path
            .as_deref()
            .map(JsonLogger::open)
            .transpose()?;
        Ok(ObservationTelemetry {
            module: self.module,
            run_id: self.run_id.unwrap_or_else(Uuid::new_v4),
            logger,
        })
    }
}

/// Run-scoped structured log. Without a log path every call is a no-op.
pub struct ObservationTelemetry {
    module: String,
    run_id: Uuid,
    logger: Option<JsonLogger>,
}

impl fmt::Debug for ObservationTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservationTelemetry")
            .field("module", &self.module)
            .field("run_id", &self.run_id)
            .field("log_path", &self.logger.as_ref().map(|l| &l.path))
            .finish()
    }
}

impl ObservationTelemetry {
    /// Returns a builder.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> ObservationTelemetryBuilder {
        ObservationTelemetryBuilder::new(module)
    }

    /// Identifier attached to every record of this run.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Appends a record carrying `metadata` (only object fields are kept).
    ///
    /// # Errors
    /// Fails when the record cannot be serialized or written.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        let Some(logger) = &self.logger else {
            return Ok(());
        };
        let record = LogRecord {
            timestamp: Utc::now(),
            run_id: self.run_id,
            module: self.module.clone(),
            level,
            message: message.into(),
            metadata: match metadata {
                Value::Object(map) => map,
                _ => serde_json::Map::new(),
            },
        };
        logger
            .write(&record)
            .with_context(|| format!("writing run log {}", logger.path.display()))
    }
}
