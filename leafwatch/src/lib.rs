// THEORY:
// This file is the entry point of the `leafwatch` library crate. It exposes the
// `StressPipeline` and its data structures (`PipelineConfig`, `StressReport`,
// `GrowingConditions`) as the high-level interface, next to the two seams a
// caller may want to touch directly: configuration and the reasoning backends.
//
// The scoring core (`core_modules`) is deterministic and has no network
// dependency. Everything that talks to a remote model lives under `reasoning`.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod reasoning;
pub mod report;

pub use config::{BackendKind, LeafwatchConfig};
pub use error::{ConfigError, LeafwatchError, ReasoningError, Result};
pub use pipeline::{GrowingConditions, PipelineConfig, RemoteText, StressPipeline, StressReport};
pub use report::ReportFormat;
