use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    config::ObservationConfig,
    error::ObservationError,
    parser::parse_plan,
    sampler::{PlanSampler, RemovalRate},
    telemetry::{LogLevel, ObservationTelemetry},
    writer::write_plan,
};

const MODULE: &str = "observations";

/// Per-file result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    /// File name shared by the solution and its observation.
    pub file_name: String,
    /// Actions parsed from the solution.
    pub original: usize,
    /// Actions kept in the observation.
    pub kept: usize,
    /// Actions removed.
    pub removed: usize,
    /// Whether the file was skipped for having no actions.
    pub skipped: bool,
}

/// Summary of a whole run, serializable as the JSON run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run identifier, shared with the run log.
    pub run_id: Uuid,
    /// Seed the sampler started from.
    pub seed: u64,
    /// Applied removal rate.
    pub removal_rate: RemovalRate,
    /// Directory scanned for solutions.
    pub source_dir: PathBuf,
    /// Directory receiving observations.
    pub output_dir: PathBuf,
    /// Whether output files were suppressed.
    pub dry_run: bool,
    /// Outcomes in processing order.
    pub files: Vec<FileOutcome>,
}

impl RunSummary {
    /// Files that produced an observation.
    #[must_use]
    pub fn generated(&self) -> usize {
        self.files.iter().filter(|f| !f.skipped).count()
    }

    /// Files skipped for having no actions.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.files.iter().filter(|f| f.skipped).count()
    }

    /// Actions removed across all files.
    #[must_use]
    pub fn total_removed(&self) -> usize {
        self.files.iter().map(|f| f.removed).sum()
    }

    /// Writes the summary as pretty JSON.
    ///
    /// # Errors
    /// Fails when the report cannot be serialized or written.
    pub fn write_report(&self, path: &Path) -> Result<(), ObservationError> {
        let body = serde_json::to_string_pretty(self).context("serializing run report")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ObservationError::io(parent, source))?;
        }
        fs::write(path, body + "\n").map_err(|source| ObservationError::io(path, source))
    }
}

/// Lists regular files in `dir` whose extension is `extension`, sorted by
/// file name.
///
/// # Errors
/// Returns [`ObservationError::SourceMissing`] when `dir` is not a directory
/// and [`ObservationError::Io`] when it cannot be listed.
pub fn discover_plan_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ObservationError> {
    if !dir.is_dir() {
        return Err(ObservationError::SourceMissing(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| ObservationError::io(dir, source))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| ObservationError::io(dir, source))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Runs parser, sampler and writer over every solution file of a directory.
///
/// One driver owns one seeded sampler, so the random draws of a run depend
/// only on the seed and the (sorted) file order.
#[derive(Debug)]
pub struct ObservationDriver {
    config: ObservationConfig,
    sampler: PlanSampler,
    telemetry: ObservationTelemetry,
}

impl ObservationDriver {
    /// Validates `config` and opens the run log if one is configured.
    ///
    /// # Errors
    /// Fails on invalid configuration or when the run log cannot be opened.
    pub fn new(mut config: ObservationConfig) -> Result<Self, ObservationError> {
        config.validate()?;
        let mut builder = ObservationTelemetry::builder(MODULE);
        if let Some(path) = &config.log_file {
            builder = builder.log_path(path);
        }
        let telemetry = builder.build()?;
        Ok(Self::with_telemetry(config, telemetry))
    }

    /// Builds a driver around an existing telemetry handle.
    #[must_use]
    pub fn with_telemetry(config: ObservationConfig, telemetry: ObservationTelemetry) -> Self {
        Self {
            sampler: PlanSampler::seeded(config.seed),
            config,
            telemetry,
        }
    }

    /// Processes every solution file, printing progress to `console`.
    ///
    /// Files with no actions are reported and skipped. The output directory is
    /// only created once at least one solution file has been found.
    ///
    /// # Errors
    /// Fails when the source directory is missing or empty of solutions, and
    /// on any I/O failure while reading or writing a plan.
    pub fn run<W: Write>(&mut self, console: &mut W) -> Result<RunSummary, ObservationError> {
        let files = discover_plan_files(&self.config.source_dir, &self.config.extension)?;
        if files.is_empty() {
            return Err(ObservationError::NoPlanFiles {
                dir: self.config.source_dir.clone(),
                extension: self.config.extension.clone(),
            });
        }
        if !self.config.dry_run {
            fs::create_dir_all(&self.config.output_dir)
                .map_err(|source| ObservationError::io(&self.config.output_dir, source))?;
        }

        self.print_header(console, files.len())?;
        self.telemetry.log(
            LogLevel::Info,
            "run.started",
            json!({
                "files": files.len(),
                "seed": self.config.seed,
                "removal_rate": self.config.removal_rate.value(),
                "source_dir": self.config.source_dir,
                "output_dir": self.config.output_dir,
                "dry_run": self.config.dry_run,
            }),
        )?;

        let mut outcomes = Vec::with_capacity(files.len());
        for path in &files {
            let outcome = self.process_file(path)?;
            if outcome.skipped {
                writeln!(
                    console,
                    "Warning: {} has no actions, skipping...",
                    outcome.file_name
                )
                .map_err(ObservationError::Console)?;
            } else {
                writeln!(
                    console,
                    "{}: {} actions -> {} actions (removed {})",
                    outcome.file_name, outcome.original, outcome.kept, outcome.removed
                )
                .map_err(ObservationError::Console)?;
            }
            outcomes.push(outcome);
        }

        let summary = RunSummary {
            run_id: self.telemetry.run_id(),
            seed: self.config.seed,
            removal_rate: self.config.removal_rate,
            source_dir: self.config.source_dir.clone(),
            output_dir: self.config.output_dir.clone(),
            dry_run: self.config.dry_run,
            files: outcomes,
        };
        self.print_footer(console, &summary)?;
        self.telemetry.log(
            LogLevel::Info,
            "run.completed",
            json!({
                "generated": summary.generated(),
                "skipped": summary.skipped(),
                "removed": summary.total_removed(),
            }),
        )?;
        if let Some(report) = &self.config.report_file {
            summary.write_report(report)?;
        }
        Ok(summary)
    }

    fn process_file(&mut self, path: &Path) -> Result<FileOutcome, ObservationError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content =
            fs::read_to_string(path).map_err(|source| ObservationError::io(path, source))?;
        let plan = parse_plan(&content);
        if plan.is_empty() {
            self.telemetry
                .log(LogLevel::Warn, "plan.skipped", json!({ "file": file_name }))?;
            return Ok(FileOutcome {
                file_name,
                original: 0,
                kept: 0,
                removed: 0,
                skipped: true,
            });
        }

        let partial = self.sampler.sample(&plan, self.config.removal_rate);
        if !self.config.dry_run {
            write_plan(self.config.output_dir.join(&file_name), &partial)?;
        }
        let outcome = FileOutcome {
            file_name,
            original: plan.len(),
            kept: partial.len(),
            removed: plan.len() - partial.len(),
            skipped: false,
        };
        self.telemetry.log(
            LogLevel::Info,
            "plan.sampled",
            json!({
                "file": outcome.file_name,
                "original": outcome.original,
                "kept": outcome.kept,
                "removed": outcome.removed,
            }),
        )?;
        Ok(outcome)
    }

    fn print_header<W: Write>(&self, console: &mut W, count: usize) -> Result<(), ObservationError> {
        let header = format!(
            "Processing {count} solution files...\n\
             Removing {}% of actions from each plan\n\
             Output directory: {}\n\n",
            self.config.removal_rate.as_percent(),
            self.config.output_dir.display()
        );
        console
            .write_all(header.as_bytes())
            .map_err(ObservationError::Console)
    }

    fn print_footer<W: Write>(
        &self,
        console: &mut W,
        summary: &RunSummary,
    ) -> Result<(), ObservationError> {
        let verb = if self.config.dry_run {
            "Would generate"
        } else {
            "Generated"
        };
        let skipped = match summary.skipped() {
            0 => String::new(),
            n => format!(" ({n} skipped)"),
        };
        writeln!(
            console,
            "\nDone! {verb} {} partial observation files.{skipped}",
            summary.files.len()
        )
        .map_err(ObservationError::Console)
    }
}
