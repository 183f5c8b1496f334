pub mod coordinates;
pub mod normalizer;
pub mod pipeline;
pub mod smoother;

pub use coordinates::assemble;
pub use normalizer::{NormalizedSeries, Normalizer};
pub use pipeline::GrowthPipeline;
pub use smoother::{build_smoother, CarryOverAverage, GroupedAverage, WindowMean};
