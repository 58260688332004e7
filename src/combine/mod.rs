//! Tree combination: splice linked snapshots and renumber their nodes

mod combiner;
mod config;
mod id_map;

pub use combiner::TreeCombiner;
pub use config::CombinerConfig;
pub use id_map::{IdMap, NodeOrigin};
