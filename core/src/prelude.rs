use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Window used when no configuration overrides it.
pub const DEFAULT_WINDOW: usize = 7;

/// Shared configuration for the normalization and smoothing stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub window: usize,
    pub strategy: SmoothingStrategy,
    pub malformed_policy: MalformedPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            strategy: SmoothingStrategy::Grouped,
            malformed_policy: MalformedPolicy::Skip,
        }
    }
}

/// What the normalizer does with a record it cannot validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Drop the record, log it and keep going.
    #[default]
    Skip,
    /// Fail the whole series on the first bad record.
    Abort,
}

/// Named windowing rules a [`Smoother`] can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmoothingStrategy {
    /// Last two pending values plus the arriving one, divided by the window.
    #[default]
    Grouped,
    /// Full mean of every complete window.
    WindowMean,
    /// Grouped collapse without clearing the values left in the queue.
    CarryOver,
}

impl SmoothingStrategy {
    /// Smallest window the strategy can collapse with.
    pub fn minimum_window(self) -> usize {
        match self {
            SmoothingStrategy::Grouped | SmoothingStrategy::CarryOver => 3,
            SmoothingStrategy::WindowMean => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SmoothingStrategy::Grouped => "grouped",
            SmoothingStrategy::WindowMean => "window-mean",
            SmoothingStrategy::CarryOver => "carry-over",
        }
    }
}

impl fmt::Display for SmoothingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SmoothingStrategy {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grouped" => Ok(SmoothingStrategy::Grouped),
            "window-mean" | "window_mean" => Ok(SmoothingStrategy::WindowMean),
            "carry-over" | "carry_over" => Ok(SmoothingStrategy::CarryOver),
            other => Err(PipelineError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Common error type for pipeline execution.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("no records available")]
    NoData,
    #[error("malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },
    #[error("window {window} is below the minimum of {minimum}")]
    InvalidWindow { window: usize, minimum: usize },
    #[error("unknown smoothing strategy: {0}")]
    UnknownStrategy(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// A windowing rule that turns a raw daily series into a shorter averaged one.
///
/// Both series feeding a growth chart must go through the same smoother so
/// their window boundaries line up.
pub trait Smoother: Send + Sync {
    fn window(&self) -> usize;
    fn strategy(&self) -> SmoothingStrategy;
    fn smooth(&self, series: &[f64]) -> Vec<f64>;
}
