//! Computer opponents: the `Agent` trait, the one-ply reflex move selector,
//! and a uniform random baseline.

mod agent;
mod random;
mod reflex;

pub use agent::Agent;
pub use random::RandomAgent;
pub use reflex::{ColumnProbe, MoveSelector};
