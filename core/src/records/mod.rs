pub mod daily;
pub mod growth;

pub use daily::{DailyRecord, RawDailyRecord, RecordDefect};
pub use growth::{GrowthCoordinate, GrowthReport};
