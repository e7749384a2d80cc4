//! # Work-Descriptor Builder
//!
//! One builder operation per dispatched phase. Each plans its work units,
//! creates the output directories the engine will write into, and writes the
//! phase's descriptor file.
//!
//! ## Phases
//! 1. **Parse**: `first_<id> 1 1 --parse --msa <alignment> <opts> --prefix .. --threads 1`
//! 2. **Inference**: per usable dataset, one main unit on the binary alignment
//!    from phase 1 plus one unit per replicate batch on the original alignment,
//!    all sized `<cores> <taxa>`. Datasets with a zero allocation are skipped.
//! 3. **Support**: `support_<id> 1 1 --support --tree <best> --bs-trees <concat> ..`
//!    for every dataset directory present under phase 2's results. On a rerun
//!    into the same output directory this includes datasets an earlier run
//!    scheduled; the driver reports those as stale.
//!
//! Directory creation tolerates a previous run's tree and descriptors are
//! rewritten in full, so rebuilding against the same inputs gives
//! byte-identical files.

use std::path::PathBuf;

use tracing::info_span;

use crate::config::PlanPolicy;
use crate::data::layout::batch_name;
use crate::data::{Dataset, RunLayout, WorkUnit};
use crate::error::Result;
use crate::io::descriptor::write_descriptor;
use crate::io::fs::{ensure_dir, list_subdirs};
use crate::model::{chunk_replicates, Allocation};

/// Outcome of building one phase's descriptor
#[derive(Clone, Debug)]
pub struct PhaseDescriptor {
    /// Descriptor file handed to the dispatch engine
    pub path: PathBuf,
    /// Units written, in file order
    pub units: Vec<WorkUnit>,
    /// Datasets left out of this phase
    pub skipped: Vec<String>,
}

impl PhaseDescriptor {
    pub fn n_units(&self) -> usize {
        self.units.len()
    }
}

/// Builds the three phase descriptors of one run
pub struct DescriptorBuilder<'a> {
    layout: &'a RunLayout,
    options: &'a [String],
    policy: PlanPolicy,
    replicates: u32,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(layout: &'a RunLayout, options: &'a [String], policy: PlanPolicy, replicates: u32) -> Self {
        Self {
            layout,
            options,
            policy,
            replicates,
        }
    }

    // === Phase 1 ===

    /// Parse-only unit for one dataset
    pub fn parse_unit(&self, dataset: &Dataset) -> WorkUnit {
        WorkUnit::new(format!("first_{}", dataset.id), 1, 1)
            .arg("--parse")
            .path_arg("--msa", &dataset.path)
            .args(self.options.iter().cloned())
            .prefix(&self.layout.first_prefix(&dataset.id))
            .args(["--threads", "1"])
    }

    pub fn build_parse_phase(&self, datasets: &[Dataset]) -> Result<PhaseDescriptor> {
        let _span = info_span!("build_parse_phase", n_datasets = datasets.len()).entered();

        ensure_dir(&self.layout.first_results())?;
        let mut units = Vec::with_capacity(datasets.len());
        for dataset in datasets {
            ensure_dir(&self.layout.first_dataset_dir(&dataset.id))?;
            units.push(self.parse_unit(dataset));
        }

        let path = self.layout.first_descriptor();
        write_descriptor(&path, &units)?;
        Ok(PhaseDescriptor {
            path,
            units,
            skipped: Vec::new(),
        })
    }

    // === Phase 2 ===

    /// Main inference unit, run on the binary alignment from phase 1
    pub fn inference_unit(&self, dataset: &Dataset, alloc: Allocation) -> WorkUnit {
        let id = &dataset.id;
        WorkUnit::new(format!("second_{}", id), alloc.cores, alloc.taxa)
            .path_arg("--msa", &self.layout.compressed_alignment(id))
            .args(self.options.iter().cloned())
            .prefix(&self.layout.second_prefix(id))
            .args(["--threads", "1"])
    }

    /// Replicate-batch units, run on the original alignment
    pub fn replicate_units(&self, dataset: &Dataset, alloc: Allocation) -> Vec<WorkUnit> {
        let id = &dataset.id;
        chunk_replicates(self.replicates, &self.policy)
            .into_iter()
            .map(|batch| {
                WorkUnit::new(batch_name(id, batch.index), alloc.cores, alloc.taxa)
                    .arg("--bootstrap")
                    .path_arg("--msa", &dataset.path)
                    .args(self.options.iter().cloned())
                    .prefix(&self.layout.bootstrap_prefix(id, batch.index))
                    .args(["--threads", "1"])
                    .args(["--seed".to_string(), batch.seed().to_string()])
                    .args(["--bs-trees".to_string(), batch.len.to_string()])
            })
            .collect()
    }

    pub fn build_inference_phase(&self, datasets: &[Dataset]) -> Result<PhaseDescriptor> {
        let _span = info_span!("build_inference_phase", n_datasets = datasets.len()).entered();

        ensure_dir(&self.layout.second_results())?;
        ensure_dir(&self.layout.bootstraps())?;

        let mut units = Vec::new();
        let mut skipped = Vec::new();
        for dataset in datasets {
            let alloc = Allocation::from_report(&self.layout.report(&dataset.id), &self.policy);
            if !alloc.is_usable() {
                eprintln!(
                    "Warning: no usable allocation for {} (cores {}, taxa {}), skipping",
                    dataset.path.display(),
                    alloc.cores,
                    alloc.taxa
                );
                tracing::warn!(dataset = %dataset.id, "skipped: zero allocation");
                skipped.push(dataset.id.clone());
                continue;
            }
            tracing::debug!(dataset = %dataset.id, cores = alloc.cores, taxa = alloc.taxa, "allocated");

            // Only scheduled datasets get result directories; phase 3 enumerates them.
            ensure_dir(&self.layout.second_dataset_dir(&dataset.id))?;
            ensure_dir(&self.layout.bootstrap_dataset_dir(&dataset.id))?;

            units.push(self.inference_unit(dataset, alloc));
            units.extend(self.replicate_units(dataset, alloc));
        }

        let path = self.layout.second_descriptor();
        write_descriptor(&path, &units)?;
        Ok(PhaseDescriptor { path, units, skipped })
    }

    // === Phase 3 ===

    pub fn support_unit(&self, id: &str) -> WorkUnit {
        WorkUnit::new(format!("support_{}", id), 1, 1)
            .arg("--support")
            .path_arg("--tree", &self.layout.best_tree(id))
            .path_arg("--bs-trees", &self.layout.concatenated_file(id))
            .args(["--threads", "1"])
            .prefix(&self.layout.support_prefix(id))
    }

    pub fn build_support_phase(&self) -> Result<PhaseDescriptor> {
        let _span = info_span!("build_support_phase").entered();

        ensure_dir(&self.layout.supports_run())?;
        let units: Vec<WorkUnit> = list_subdirs(&self.layout.second_results())?
            .iter()
            .map(|id| self.support_unit(id))
            .collect();

        let path = self.layout.supports_descriptor();
        eprintln!("Writing support commands in {}", path.display());
        write_descriptor(&path, &units)?;
        Ok(PhaseDescriptor {
            path,
            units,
            skipped: Vec::new(),
        })
    }
}
