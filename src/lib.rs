//! # Multiraxml Library
//!
//! Plans and sequences RAxML-NG runs over many alignments. Inference itself is
//! delegated to an external library driven by an MPI dispatch engine; this
//! crate sizes the work, writes the engine's descriptor files, and merges
//! replicate outputs between phases.
//!
//! ## Modules
//! - `config`: CLI argument parsing, validation and sizing policy
//! - `data`: Datasets, work units and the run's directory layout
//! - `error`: Error types and result aliases
//! - `io`: Analysis reports, descriptor files, directory helpers
//! - `model`: Core-count estimation and replicate chunking
//! - `pipelines`: Phase builders, aggregation, dispatch and the driver

pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod model;
pub mod pipelines;

// Re-export commonly used types
pub use config::{Config, PlanPolicy, SchedulerKind};
pub use data::{Dataset, RunLayout, WorkUnit};
pub use error::{MultiRaxmlError, Result};
pub use model::{chunk_replicates, cores_for, Allocation, ReplicateBatch};
pub use pipelines::{
    aggregate_replicates, DescriptorBuilder, Dispatcher, MpiDispatcher, Phase, PipelineDriver,
    PipelineState,
};
