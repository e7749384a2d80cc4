//! # Pipeline Module
//!
//! High-level orchestration: builds one descriptor per phase, hands it to the
//! dispatch engine, concatenates replicate trees between phases 2 and 3.

pub mod aggregate;
pub mod dispatch;
pub mod driver;
pub mod phases;
pub mod replay;

use std::fmt;

pub use aggregate::{aggregate_replicates, AggregationSummary};
pub use dispatch::{Dispatcher, MpiDispatcher};
pub use driver::{PipelineDriver, PipelineState, RunSummary};
pub use phases::{DescriptorBuilder, PhaseDescriptor};

/// One dispatched stage of the pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Parse alignments, write reports and binary alignments
    Parse,
    /// Main ML inference plus replicate resampling
    Inference,
    /// Support values on the best tree
    Support,
}

impl Phase {
    pub fn number(self) -> u8 {
        match self {
            Phase::Parse => 1,
            Phase::Inference => 2,
            Phase::Support => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Parse => "parse",
            Phase::Inference => "inference",
            Phase::Support => "support",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase {} ({})", self.number(), self.as_str())
    }
}
