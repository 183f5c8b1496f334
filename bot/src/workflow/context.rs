use crate::source::RecordSource;
use crate::workflow::config::BotConfig;
use anyhow::Context;
use growthcore::telemetry::MetricsRecorder;
use growthcore::GrowthPipeline;
use std::path::PathBuf;

/// Everything a query handler needs, built once and passed in explicitly.
pub struct QueryContext {
    pub config: BotConfig,
    pub source: RecordSource,
    pub pipeline: GrowthPipeline,
    pub metrics: MetricsRecorder,
}

impl QueryContext {
    pub fn new(config: BotConfig, source: RecordSource) -> anyhow::Result<Self> {
        let pipeline = GrowthPipeline::new(&config.to_pipeline_config())
            .context("configuring growth pipeline")?;
        Ok(Self {
            config,
            source,
            pipeline,
            metrics: MetricsRecorder::new(),
        })
    }

    pub fn from_config(config: BotConfig, records: Option<PathBuf>) -> anyhow::Result<Self> {
        let source = RecordSource::from_config(&config, records)?;
        Self::new(config, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_rejects_unusable_window() {
        let config = BotConfig {
            window: 1,
            ..Default::default()
        };
        let source = RecordSource::Offline(PathBuf::from("records.json"));
        let err = QueryContext::new(config, source).err().unwrap();
        assert!(format!("{:#}", err).contains("configuring growth pipeline"));
    }
}
