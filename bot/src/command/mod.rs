pub mod query;
pub mod region;

pub use query::{parse_tokens, resolve_target, Location};
