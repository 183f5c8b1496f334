use log::{debug, info, warn};

/// Stage-tagged logging for the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PipelineLog {
    stage: &'static str,
}

impl PipelineLog {
    pub fn new(stage: &'static str) -> Self {
        Self { stage }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.stage, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("[{}] {}", self.stage, message);
    }

    pub fn skipped(&self, index: usize, reason: &str) {
        warn!("[{}] skipping record {}: {}", self.stage, index, reason);
    }
}
