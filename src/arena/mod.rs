//! Headless agent-vs-agent matches and result tallies.

pub mod episode;
pub mod metrics;

pub use episode::{play_match, MatchResult};
pub use metrics::MatchMetrics;
