use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::ObservationError,
    sampler::{RemovalRate, DEFAULT_SEED},
};

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObservationConfig {
    /// Directory holding the solved plans.
    pub source_dir: PathBuf,
    /// Directory receiving the partial observations (created if missing).
    pub output_dir: PathBuf,
    /// Plan file extension, without the leading dot.
    pub extension: String,
    /// Fraction of actions removed from each plan.
    pub removal_rate: RemovalRate,
    /// Seed for the run-wide generator.
    pub seed: u64,
    /// Optional JSON-lines run log.
    pub log_file: Option<PathBuf>,
    /// Optional JSON run report.
    pub report_file: Option<PathBuf>,
    /// Parse and sample without writing observation files.
    pub dry_run: bool,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("02-solutions"),
            output_dir: PathBuf::from("03-partial-solutions"),
            extension: "txt".into(),
            removal_rate: RemovalRate::default(),
            seed: DEFAULT_SEED,
            log_file: None,
            report_file: None,
            dry_run: false,
        }
    }
}

impl ObservationConfig {
    /// Loads configuration from a TOML file. Missing keys fall back to the
    /// defaults; relative paths resolve against the file's directory.
    ///
    /// # Errors
    /// Fails when the file cannot be read, does not parse, or does not validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ObservationError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ObservationError::io(path, source))?;
        let mut config: Self = toml::from_str(&raw).map_err(|err| ObservationError::Config {
            path: path.to_path_buf(),
            message: err.message().to_string(),
        })?;
        let base = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        config.source_dir = resolve(&base, &config.source_dir);
        config.output_dir = resolve(&base, &config.output_dir);
        config.log_file = config.log_file.map(|p| resolve(&base, &p));
        config.report_file = config.report_file.map(|p| resolve(&base, &p));
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants the deserializer cannot express and normalizes the
    /// extension (a leading dot is accepted and stripped).
    ///
    /// # Errors
    /// Returns [`ObservationError::InvalidExtension`] for an empty extension.
    pub fn validate(&mut self) -> Result<(), ObservationError> {
        let extension = self.extension.trim().trim_start_matches('.');
        if extension.is_empty() || extension.contains(&['/', '\\'][..]) {
            return Err(ObservationError::InvalidExtension(self.extension.clone()));
        }
        self.extension = extension.to_string();
        Ok(())
    }
}

fn resolve(base: &Path, candidate: &Path) -> PathBuf {
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}
