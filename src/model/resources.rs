//! # Resource Estimator
//!
//! Core count doubles each time `sites / step` gains a bit:
//!
//! ```text
//! cores = 0                                  if sites == 0
//! cores = 2 ^ bit_length(sites / step)       otherwise
//! ```
//!
//! With the default step of 1000: 1..=999 -> 1, 1000..=1999 -> 2,
//! 2000..=3999 -> 4, 4000..=7999 -> 8. Powers of two match the dispatch
//! engine's worker binning.

use std::path::Path;

use crate::config::PlanPolicy;
use crate::io::report::{read_report, ReportStats};

/// Cores for a dataset with `unique_sites` patterns, using the default step
pub fn cores_for(unique_sites: u64) -> u64 {
    cores_for_step(unique_sites, PlanPolicy::default().sites_per_step)
}

/// Cores for a dataset with `unique_sites` patterns and a custom step
pub fn cores_for_step(unique_sites: u64, sites_per_step: u64) -> u64 {
    if unique_sites == 0 {
        return 0;
    }
    let steps = unique_sites / sites_per_step.max(1);
    // 2^64 does not fit; saturate at the largest power of two
    1u64.checked_shl(bit_length(steps)).unwrap_or(1 << 63)
}

fn bit_length(n: u64) -> u32 {
    u64::BITS - n.leading_zeros()
}

/// Per-dataset allocation for the inference phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Workers per unit; always zero or a power of two
    pub cores: u64,
    /// Taxon count echoed from the report; used as the size tier
    pub taxa: u64,
}

impl Allocation {
    pub fn from_stats(stats: ReportStats, policy: &PlanPolicy) -> Self {
        Self {
            cores: cores_for_step(stats.unique_sites, policy.sites_per_step),
            taxa: stats.taxa,
        }
    }

    /// Read the phase-1 report at `path`; unreadable reports give a zero allocation
    pub fn from_report(path: &Path, policy: &PlanPolicy) -> Self {
        Self::from_stats(read_report(path), policy)
    }

    /// A dataset is scheduled only when both dimensions are non-zero
    pub fn is_usable(&self) -> bool {
        self.cores != 0 && self.taxa != 0
    }
}
