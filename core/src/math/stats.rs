pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }

    /// Sum of `samples` divided by a fixed `divisor` instead of the sample count.
    pub fn scaled_sum(samples: &[f64], divisor: usize) -> f64 {
        samples.iter().sum::<f64>() / divisor as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_slice_is_none() {
        assert_eq!(StatsHelper::mean(&[]), None);
    }

    #[test]
    fn mean_handles_single_value() {
        assert_eq!(StatsHelper::mean(&[4.0]), Some(4.0));
        assert_eq!(StatsHelper::mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn scaled_sum_ignores_sample_count() {
        assert_eq!(StatsHelper::scaled_sum(&[5.0, 6.0, 7.0], 7), 18.0 / 7.0);
    }
}
