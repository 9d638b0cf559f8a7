//! World snapshot model and obstacle queries

pub mod snapshot;
pub mod obstacle_index;

pub use snapshot::*;
pub use obstacle_index::*;
