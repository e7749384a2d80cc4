//! # Model Module
//!
//! Sizing decisions: how many workers a dataset gets and how replicate
//! resampling is split into work units.

pub mod chunker;
pub mod resources;

pub use chunker::{chunk_replicates, chunk_size_for, ReplicateBatch};
pub use resources::{cores_for, Allocation};
