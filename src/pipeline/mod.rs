//! Pipeline module - loading, preparation, and the subset-variance core

pub mod discretize;
pub mod error;
pub mod loader;
pub mod rewrite;
pub mod subsets;
pub mod table;
pub mod variance;

pub use discretize::*;
pub use error::PipelineError;
pub use loader::*;
pub use rewrite::*;
pub use subsets::*;
pub use table::*;
pub use variance::*;
