use crate::prelude::{MalformedPolicy, PipelineError, PipelineResult};
use crate::records::{DailyRecord, RawDailyRecord};
use crate::telemetry::log::PipelineLog;

/// Two date-ordered series extracted from one location's records.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub cumulative: Vec<f64>,
    pub new_cases: Vec<f64>,
    /// Cumulative count of the most recent record.
    pub latest_cumulative: u64,
    pub skipped: usize,
}

/// Sorts one location's records chronologically and splits them into series.
pub struct Normalizer {
    policy: MalformedPolicy,
    logger: PipelineLog,
}

impl Normalizer {
    pub fn new(policy: MalformedPolicy) -> Self {
        Self {
            policy,
            logger: PipelineLog::new("normalizer"),
        }
    }

    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// Validates upstream records under the configured policy, then normalizes
    /// whatever survived.
    pub fn normalize_raw(&self, raw: &[RawDailyRecord]) -> PipelineResult<NormalizedSeries> {
        let mut records = Vec::with_capacity(raw.len());
        let mut skipped = 0;

        for (index, candidate) in raw.iter().enumerate() {
            match candidate.validate() {
                Ok(record) => records.push(record),
                Err(defect) => match self.policy {
                    MalformedPolicy::Skip => {
                        self.logger.skipped(index, &defect.to_string());
                        skipped += 1;
                    }
                    MalformedPolicy::Abort => {
                        return Err(PipelineError::MalformedRecord {
                            index,
                            reason: defect.to_string(),
                        });
                    }
                },
            }
        }

        let mut series = self.normalize(&records)?;
        series.skipped = skipped;
        Ok(series)
    }

    /// Records with equal dates keep their arrival order; nothing is deduplicated.
    pub fn normalize(&self, records: &[DailyRecord]) -> PipelineResult<NormalizedSeries> {
        if records.is_empty() {
            return Err(PipelineError::NoData);
        }

        let mut ordered: Vec<&DailyRecord> = records.iter().collect();
        ordered.sort_by_key(|record| record.date);

        let cumulative = ordered
            .iter()
            .map(|record| record.cumulative_positive as f64)
            .collect::<Vec<_>>();
        let new_cases = ordered
            .iter()
            .map(|record| record.new_positive as f64)
            .collect::<Vec<_>>();
        let latest_cumulative = ordered
            .last()
            .map(|record| record.cumulative_positive)
            .ok_or(PipelineError::NoData)?;

        self.logger.detail(&format!(
            "{} records ordered, latest cumulative {}",
            ordered.len(),
            latest_cumulative
        ));

        Ok(NormalizedSeries {
            cumulative,
            new_cases,
            latest_cumulative,
            skipped: 0,
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(MalformedPolicy::default())
    }
}
