//! # Data Module
//!
//! In-memory representations of the things the planner reasons about:
//! datasets discovered on disk, work units handed to the dispatch engine,
//! and the fixed directory tree of one pipeline run.

pub mod dataset;
pub mod layout;
pub mod work_unit;

// Re-export commonly used types
pub use dataset::{discover_datasets, Dataset};
pub use layout::RunLayout;
pub use work_unit::WorkUnit;
