use crate::records::GrowthCoordinate;

/// Pairs the smoothed series index by index. The longer series is cut to the
/// shorter one's length.
pub fn assemble(cumulative: &[f64], new_cases: &[f64]) -> Vec<GrowthCoordinate> {
    cumulative
        .iter()
        .zip(new_cases)
        .map(|(&x, &y)| GrowthCoordinate::new(x, y))
        .collect()
}
