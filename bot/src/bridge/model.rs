use growthcore::records::{GrowthCoordinate, GrowthReport};
use serde::{Deserialize, Serialize};

/// Latest chart payload served to the visualizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GrowthModel {
    pub location: String,
    pub current_positive: u64,
    pub coordinates: Vec<GrowthCoordinate>,
    pub notes: Vec<String>,
}

impl From<&GrowthReport> for GrowthModel {
    fn from(report: &GrowthReport) -> Self {
        let mut notes = vec![format!("{} window {}", report.strategy, report.window)];
        if report.skipped_records > 0 {
            notes.push(format!("{} malformed records skipped", report.skipped_records));
        }
        if !report.has_plot() {
            notes.push("nothing to plot".to_string());
        }

        Self {
            location: report.location.clone(),
            current_positive: report.current_positive,
            coordinates: report.coordinates.clone(),
            notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub reply: String,
    pub points: usize,
}
