#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Partial observation generator: turns solved plans into observation traces
//! with a fixed fraction of their actions removed.

/// Plan and action data model.
#[path = "../plan.rs"]
pub mod plan;

/// Plan text parsing.
#[path = "../parser.rs"]
pub mod parser;

/// Seeded uniform action removal.
#[path = "../sampler.rs"]
pub mod sampler;

/// One-action-per-line plan serialization.
#[path = "../writer.rs"]
pub mod writer;

/// Run configuration (defaults, TOML loading, validation).
#[path = "../config.rs"]
pub mod config;

/// Error taxonomy shared by all components.
#[path = "../error.rs"]
pub mod error;

/// Structured JSON-lines run log.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// Directory driver wiring parser, sampler and writer together.
#[path = "../driver.rs"]
pub mod driver;

pub use config::ObservationConfig;
pub use driver::{discover_plan_files, FileOutcome, ObservationDriver, RunSummary};
pub use error::ObservationError;
pub use parser::parse_plan;
pub use plan::{Action, Plan};
pub use sampler::{PlanSampler, RemovalRate};
pub use telemetry::{ObservationTelemetry, ObservationTelemetryBuilder};
pub use writer::{render_plan, write_plan};
