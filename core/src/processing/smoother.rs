use crate::math::stats::StatsHelper;
use crate::prelude::{PipelineError, PipelineResult, Smoother, SmoothingStrategy};

fn check_window(strategy: SmoothingStrategy, window: usize) -> PipelineResult<usize> {
    let minimum = strategy.minimum_window();
    if window < minimum {
        return Err(PipelineError::InvalidWindow { window, minimum });
    }
    Ok(window)
}

/// Walks the series with a pending queue. Once `window - 1` values are
/// pending, the next value collapses the queue: the two newest pending values
/// plus the arriving one are summed and divided by `window`. Whatever is still
/// pending at the end is averaged by its own length.
fn collapse_walk(series: &[f64], window: usize, keep_remainder: bool) -> Vec<f64> {
    let mut averages = Vec::with_capacity(series.len() / window + 1);
    let mut pending: Vec<f64> = Vec::with_capacity(window - 1);

    for &value in series {
        if pending.len() == window - 1 {
            let newest = pending.len() - 2;
            let group = [pending[newest], pending[newest + 1], value];
            averages.push(StatsHelper::scaled_sum(&group, window));
            if keep_remainder {
                pending.truncate(newest);
            } else {
                pending.clear();
            }
        } else {
            pending.push(value);
        }
    }

    if let Some(rest) = StatsHelper::mean(&pending) {
        averages.push(rest);
    }
    averages
}

/// Grouped moving average: every full window emits one value built from its
/// last three samples over the window size; a short tail emits its plain mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupedAverage {
    window: usize,
}

impl GroupedAverage {
    pub fn new(window: usize) -> PipelineResult<Self> {
        let window = check_window(SmoothingStrategy::Grouped, window)?;
        Ok(Self { window })
    }
}

impl Smoother for GroupedAverage {
    fn window(&self) -> usize {
        self.window
    }

    fn strategy(&self) -> SmoothingStrategy {
        SmoothingStrategy::Grouped
    }

    fn smooth(&self, series: &[f64]) -> Vec<f64> {
        collapse_walk(series, self.window, false)
    }
}

/// Non-overlapping windows, each averaged over all of its samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowMean {
    window: usize,
}

impl WindowMean {
    pub fn new(window: usize) -> PipelineResult<Self> {
        let window = check_window(SmoothingStrategy::WindowMean, window)?;
        Ok(Self { window })
    }
}

impl Smoother for WindowMean {
    fn window(&self) -> usize {
        self.window
    }

    fn strategy(&self) -> SmoothingStrategy {
        SmoothingStrategy::WindowMean
    }

    fn smooth(&self, series: &[f64]) -> Vec<f64> {
        series
            .chunks(self.window)
            .filter_map(|chunk| {
                if chunk.len() == self.window {
                    Some(StatsHelper::scaled_sum(chunk, self.window))
                } else {
                    StatsHelper::mean(chunk)
                }
            })
            .collect()
    }
}

/// Same collapse as [`GroupedAverage`], but the `window - 3` older pending
/// values survive each collapse and count toward the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarryOverAverage {
    window: usize,
}

impl CarryOverAverage {
    pub fn new(window: usize) -> PipelineResult<Self> {
        let window = check_window(SmoothingStrategy::CarryOver, window)?;
        Ok(Self { window })
    }
}

impl Smoother for CarryOverAverage {
    fn window(&self) -> usize {
        self.window
    }

    fn strategy(&self) -> SmoothingStrategy {
        SmoothingStrategy::CarryOver
    }

    fn smooth(&self, series: &[f64]) -> Vec<f64> {
        collapse_walk(series, self.window, true)
    }
}

pub fn build_smoother(
    strategy: SmoothingStrategy,
    window: usize,
) -> PipelineResult<Box<dyn Smoother>> {
    Ok(match strategy {
        SmoothingStrategy::Grouped => Box::new(GroupedAverage::new(window)?),
        SmoothingStrategy::WindowMean => Box::new(WindowMean::new(window)?),
        SmoothingStrategy::CarryOver => Box::new(CarryOverAverage::new(window)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f64> {
        (1..=len).map(|v| v as f64).collect()
    }

    #[test]
    fn grouped_full_window_uses_last_three_values() {
        let smoother = GroupedAverage::new(7).unwrap();
        assert_eq!(smoother.smooth(&ramp(7)), vec![2.5714285714285716]);
    }

    #[test]
    fn grouped_short_series_is_plain_mean() {
        let smoother = GroupedAverage::new(7).unwrap();
        assert_eq!(smoother.smooth(&[1.0, 2.0, 3.0]), vec![2.0]);
    }

    #[test]
    fn grouped_restarts_after_each_collapse() {
        let smoother = GroupedAverage::new(7).unwrap();
        let output = smoother.smooth(&ramp(16));
        assert_eq!(
            output,
            vec![18.0 / 7.0, (12.0 + 13.0 + 14.0) / 7.0, (15.0 + 16.0) / 2.0]
        );
    }

    #[test]
    fn every_strategy_returns_empty_for_empty_input() {
        for strategy in [
            SmoothingStrategy::Grouped,
            SmoothingStrategy::WindowMean,
            SmoothingStrategy::CarryOver,
        ] {
            for window in 3..10 {
                let smoother = build_smoother(strategy, window).unwrap();
                assert!(smoother.smooth(&[]).is_empty());
            }
        }
    }

    #[test]
    fn grouped_output_length_matches_window_count() {
        for window in 3..12 {
            let smoother = GroupedAverage::new(window).unwrap();
            for len in 1..60 {
                let expected = len / window + usize::from(len % window != 0);
                assert_eq!(
                    smoother.smooth(&ramp(len)).len(),
                    expected,
                    "len {} window {}",
                    len,
                    window
                );
            }
        }
    }

    #[test]
    fn window_mean_averages_whole_window() {
        let smoother = WindowMean::new(7).unwrap();
        assert_eq!(smoother.smooth(&ramp(7)), vec![4.0]);
        assert_eq!(smoother.smooth(&ramp(9)), vec![4.0, 8.5]);
    }

    #[test]
    fn window_mean_of_one_is_identity() {
        let smoother = WindowMean::new(1).unwrap();
        assert_eq!(smoother.smooth(&[3.0, -1.0]), vec![3.0, -1.0]);
    }

    #[test]
    fn carry_over_keeps_older_pending_values() {
        let smoother = CarryOverAverage::new(7).unwrap();
        assert_eq!(
            smoother.smooth(&ramp(14)),
            vec![18.0 / 7.0, 27.0 / 7.0, 36.0 / 7.0, 4.8]
        );
    }

    #[test]
    fn collapse_strategies_reject_small_windows() {
        assert_eq!(
            GroupedAverage::new(2),
            Err(PipelineError::InvalidWindow {
                window: 2,
                minimum: 3
            })
        );
        assert!(CarryOverAverage::new(0).is_err());
        assert!(WindowMean::new(0).is_err());
    }

    #[test]
    fn build_smoother_reports_strategy_and_window() {
        let smoother = build_smoother(SmoothingStrategy::CarryOver, 5).unwrap();
        assert_eq!(smoother.strategy(), SmoothingStrategy::CarryOver);
        assert_eq!(smoother.window(), 5);
    }
}
