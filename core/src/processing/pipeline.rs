use crate::prelude::{MalformedPolicy, PipelineConfig, PipelineResult, Smoother};
use crate::processing::coordinates::assemble;
use crate::processing::normalizer::{NormalizedSeries, Normalizer};
use crate::processing::smoother::build_smoother;
use crate::records::{DailyRecord, GrowthReport, RawDailyRecord};
use crate::telemetry::log::PipelineLog;

/// Normalizer, smoother and coordinate assembly wired together for one query.
///
/// Holds no per-query state, so a single instance can serve every request.
pub struct GrowthPipeline {
    normalizer: Normalizer,
    smoother: Box<dyn Smoother>,
    logger: PipelineLog,
}

impl GrowthPipeline {
    pub fn new(config: &PipelineConfig) -> PipelineResult<Self> {
        let smoother = build_smoother(config.strategy, config.window)?;
        Ok(Self::with_smoother(config.malformed_policy, smoother))
    }

    pub fn with_smoother(policy: MalformedPolicy, smoother: Box<dyn Smoother>) -> Self {
        Self {
            normalizer: Normalizer::new(policy),
            smoother,
            logger: PipelineLog::new("pipeline"),
        }
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            window: self.smoother.window(),
            strategy: self.smoother.strategy(),
            malformed_policy: self.normalizer.policy(),
        }
    }

    pub fn run(&self, location: &str, raw: &[RawDailyRecord]) -> PipelineResult<GrowthReport> {
        let series = self.normalizer.normalize_raw(raw)?;
        Ok(self.report(location, series))
    }

    pub fn run_records(
        &self,
        location: &str,
        records: &[DailyRecord],
    ) -> PipelineResult<GrowthReport> {
        let series = self.normalizer.normalize(records)?;
        Ok(self.report(location, series))
    }

    fn report(&self, location: &str, series: NormalizedSeries) -> GrowthReport {
        let cumulative = self.smoother.smooth(&series.cumulative);
        let new_cases = self.smoother.smooth(&series.new_cases);
        let coordinates = assemble(&cumulative, &new_cases);

        self.logger.record(&format!(
            "{}: {} days -> {} points ({} window {}, {} skipped)",
            location,
            series.cumulative.len(),
            coordinates.len(),
            self.smoother.strategy(),
            self.smoother.window(),
            series.skipped
        ));

        GrowthReport {
            location: location.to_string(),
            current_positive: series.latest_cumulative,
            coordinates,
            window: self.smoother.window(),
            strategy: self.smoother.strategy(),
            skipped_records: series.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{PipelineError, SmoothingStrategy};
    use crate::records::GrowthCoordinate;
    use serde_json::json;

    fn raw_days(count: u32) -> Vec<RawDailyRecord> {
        (1..=count)
            .rev()
            .map(|day| RawDailyRecord {
                date: Some(json!(20200300 + day)),
                positive: Some(json!(day * 10)),
                positive_increase: Some(json!(10)),
            })
            .collect()
    }

    #[test]
    fn pipeline_builds_report_from_unsorted_records() {
        let pipeline = GrowthPipeline::new(&PipelineConfig::default()).unwrap();
        let report = pipeline.run("CA", &raw_days(10)).unwrap();

        assert_eq!(report.current_positive, 100);
        assert_eq!(report.window, 7);
        assert_eq!(report.strategy, SmoothingStrategy::Grouped);
        assert_eq!(
            report.coordinates,
            vec![
                GrowthCoordinate::new(180.0 / 7.0, 30.0 / 7.0),
                GrowthCoordinate::new(90.0, 10.0),
            ]
        );
    }

    #[test]
    fn pipeline_is_idempotent() {
        let pipeline = GrowthPipeline::new(&PipelineConfig::default()).unwrap();
        let records = raw_days(23);
        let first = pipeline.run("US", &records).unwrap();
        let second = pipeline.run("US", &records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn pipeline_surfaces_no_data() {
        let pipeline = GrowthPipeline::new(&PipelineConfig::default()).unwrap();
        assert_eq!(pipeline.run("NY", &[]), Err(PipelineError::NoData));
    }

    #[test]
    fn pipeline_rejects_invalid_window_at_construction() {
        let config = PipelineConfig {
            window: 2,
            ..Default::default()
        };
        assert!(matches!(
            GrowthPipeline::new(&config),
            Err(PipelineError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn pipeline_reports_its_configuration() {
        let config = PipelineConfig {
            window: 5,
            strategy: SmoothingStrategy::WindowMean,
            malformed_policy: MalformedPolicy::Abort,
        };
        let pipeline = GrowthPipeline::new(&config).unwrap();
        assert_eq!(pipeline.config(), config);
    }
}
