//! Observability for pgl
//!
//! Structured JSON logging only. Every line is one event written to stderr:
//!
//! ```ignore
//! use pgl::observability::{Logger, ObservationScope};
//!
//! Logger::info("DATASET_CREATED", &[("dataset", "tpch")]);
//!
//! let scope = ObservationScope::new("DRAIN");
//! // ... do work ...
//! scope.complete();
//! ```

mod logger;
mod scope;

pub use logger::{min_severity, Logger, Severity, LOG_LEVEL_ENV};
pub use scope::{ObservationScope, Timer};
