use crate::prelude::SmoothingStrategy;
use serde::{Deserialize, Serialize};

/// One averaged point of a growth chart: cumulative total against new cases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthCoordinate {
    pub x: f64,
    pub y: f64,
}

impl GrowthCoordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Log axes cannot place zero or negative values.
    pub fn is_log_plottable(&self) -> bool {
        self.x > 0.0 && self.y > 0.0
    }
}

/// Everything the reply layer and the renderer need from one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthReport {
    pub location: String,
    pub current_positive: u64,
    pub coordinates: Vec<GrowthCoordinate>,
    pub window: usize,
    pub strategy: SmoothingStrategy,
    pub skipped_records: usize,
}

impl GrowthReport {
    pub fn has_plot(&self) -> bool {
        !self.coordinates.is_empty()
    }
}
