//! # Replicate Chunker
//!
//! Splits `B` replicates into batches of at most `C`, where `C` is the large
//! chunk size when `B` exceeds the threshold and 1 otherwise. Small requests
//! stay one replicate per unit; large ones amortize per-unit overhead.
//!
//! Batch `k` covers `[k*C, min((k+1)*C, B))` and uses seed `k`, so the same
//! `B` and `C` always reproduce the same boundaries and seeds.

use crate::config::{PlanPolicy, SMALL_CHUNK};

/// One contiguous range of replicate indices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplicateBatch {
    /// Batch index, also used in the work-unit name
    pub index: u32,
    /// First replicate index covered
    pub start: u32,
    /// Number of replicates in this batch
    pub len: u32,
}

impl ReplicateBatch {
    /// Deterministic seed for this batch
    pub fn seed(&self) -> u32 {
        self.index
    }

    /// One past the last replicate index covered
    pub fn end(&self) -> u32 {
        self.start + self.len
    }
}

/// Chunk bound for a request of `replicates`
pub fn chunk_size_for(replicates: u32, policy: &PlanPolicy) -> u32 {
    if replicates > policy.chunk_threshold {
        policy.large_chunk.max(1)
    } else {
        SMALL_CHUNK
    }
}

/// Partition `[0, replicates)` into `ceil(replicates / C)` batches
pub fn chunk_replicates(replicates: u32, policy: &PlanPolicy) -> Vec<ReplicateBatch> {
    let chunk = chunk_size_for(replicates, policy);
    let n_batches = replicates.div_ceil(chunk);

    (0..n_batches)
        .map(|index| {
            let start = index * chunk;
            ReplicateBatch {
                index,
                start,
                len: chunk.min(replicates - start),
            }
        })
        .collect()
}
