//! # Analysis Report Parser
//!
//! Extracts sizing facts from the free-text log the inference engine writes
//! during the parse phase. Two marker lines are recognized:
//!
//! ```text
//! Alignment comprises 1 partitions and 1287 patterns   -> 6th token: unique sites
//! [00:00:00] Loaded alignment with 48 taxa and ...     -> 5th token: taxa
//! ```
//!
//! Parsing never fails. A missing report, missing markers, or tokens that are
//! not integers all degrade to zero, which downstream means "skip dataset".

use std::fs;
use std::path::Path;

pub const SITES_MARKER: &str = "Alignment comprises";
pub const SITES_TOKEN: usize = 5;

pub const TAXA_MARKER: &str = "taxa";
pub const TAXA_TOKEN: usize = 4;

/// Raw statistics read from one report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub unique_sites: u64,
    pub taxa: u64,
}

/// Parse report text. Later marker lines override earlier ones.
pub fn parse_report(text: &str) -> ReportStats {
    let mut stats = ReportStats::default();
    for line in text.lines() {
        if line.contains(SITES_MARKER) {
            if let Some(sites) = token_as_count(line, SITES_TOKEN) {
                stats.unique_sites = sites;
            }
        }
        if line.contains(TAXA_MARKER) {
            if let Some(taxa) = token_as_count(line, TAXA_TOKEN) {
                stats.taxa = taxa;
            }
        }
    }
    stats
}

/// Read and parse a report file; unreadable files yield zeros
pub fn read_report(path: &Path) -> ReportStats {
    match fs::read_to_string(path) {
        Ok(text) => parse_report(&text),
        Err(e) => {
            eprintln!("Cannot read report {}: {}", path.display(), e);
            tracing::debug!(path = %path.display(), error = %e, "report unreadable");
            ReportStats::default()
        }
    }
}

fn token_as_count(line: &str, index: usize) -> Option<u64> {
    line.split_whitespace().nth(index)?.parse().ok()
}
