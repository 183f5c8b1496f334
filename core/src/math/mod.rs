pub mod stats;

pub use stats::StatsHelper;
