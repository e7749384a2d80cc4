//! # Replicate Aggregation
//!
//! Concatenates, byte for byte, every replicate-tree file of a dataset into
//! `concatenated_bootstraps/<id>.bs`. Files are taken in name-sorted listing
//! order. Tree contents are never parsed.
//!
//! Every dataset directory under the bootstrap root is aggregated, including
//! directories left by an earlier run into the same output directory.
//!
//! A failed copy aborts the whole step. The partially written target is left
//! on disk; rerunning the pipeline truncates and rewrites it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use tracing::info_span;

use crate::data::layout::REPLICATE_SUFFIX;
use crate::data::RunLayout;
use crate::error::{MultiRaxmlError, Result};
use crate::io::fs::{ensure_dir, list_files, list_subdirs};

/// Totals of one aggregation step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    pub datasets: usize,
    pub files: usize,
    pub bytes: u64,
}

/// Concatenate replicate trees for every dataset under the bootstrap directory
pub fn aggregate_replicates(layout: &RunLayout) -> Result<AggregationSummary> {
    let _span = info_span!("aggregate_replicates").entered();
    let start = Instant::now();

    ensure_dir(&layout.concatenated())?;
    let mut summary = AggregationSummary::default();

    for id in list_subdirs(&layout.bootstraps())? {
        let target = layout.concatenated_file(&id);
        let (files, bytes) = concatenate_dataset(&layout.bootstrap_dataset_dir(&id), &target)?;
        tracing::debug!(dataset = %id, files, bytes, "replicates concatenated");
        summary.datasets += 1;
        summary.files += files;
        summary.bytes += bytes;
    }

    eprintln!(
        "Concatenated {} replicate files for {} datasets in {:.2}s",
        summary.files,
        summary.datasets,
        start.elapsed().as_secs_f64()
    );
    Ok(summary)
}

/// Append every replicate file of `dataset_dir` to `target`; returns (files, bytes)
fn concatenate_dataset(dataset_dir: &Path, target: &Path) -> Result<(usize, u64)> {
    let mut writer = BufWriter::new(File::create(target)?);
    let mut files = 0;
    let mut bytes = 0;

    for source in list_files(dataset_dir)? {
        let is_replicate = source
            .file_name()
            .map(|n| n.to_string_lossy().ends_with(REPLICATE_SUFFIX))
            .unwrap_or(false);
        if !is_replicate {
            continue;
        }

        let copy_error = |e: io::Error| MultiRaxmlError::Aggregation {
            source_path: source.clone(),
            target_path: target.to_path_buf(),
            source: e,
        };
        let mut reader = File::open(&source).map_err(copy_error)?;
        bytes += io::copy(&mut reader, &mut writer).map_err(copy_error)?;
        files += 1;
    }

    writer.flush().map_err(|e| MultiRaxmlError::Aggregation {
        source_path: dataset_dir.to_path_buf(),
        target_path: target.to_path_buf(),
        source: e,
    })?;
    Ok((files, bytes))
}
