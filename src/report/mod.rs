//! Report module - result records and run summaries

pub mod sink;
pub mod summary;

pub use sink::*;
pub use summary::*;
