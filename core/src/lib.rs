//! Growth-rate pipeline for daily case reports.
//!
//! Raw records for one location are validated and ordered, both the
//! cumulative and the new-case series are smoothed with the same window, and
//! the smoothed pairs become coordinates for a log-log growth chart.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod records;
pub mod telemetry;

pub use prelude::{PipelineConfig, PipelineError, Smoother};
pub use processing::GrowthPipeline;
