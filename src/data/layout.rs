//! # Run Layout
//!
//! Fixed directory tree of one pipeline run. Each phase owns one subtree
//! which it writes once; later phases only read from it.
//!
//! ```text
//! <output_dir>
//! ├── first_command.txt
//! ├── first_run/results/<id>/<id>.raxml.{log,rba}
//! ├── second_command.txt
//! ├── second_run/results/<id>/<id>.raxml.bestTree
//! ├── second_run/bootstraps/<id>/<id>_bs<k>.raxml.bootstraps
//! ├── concatenated_bootstraps/<id>.bs
//! ├── supports_commands.txt
//! └── supports_run/<id>.support.raxml.support
//! ```

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::io::fs::ensure_dir;

pub const FIRST_RUN_DIR: &str = "first_run";
pub const SECOND_RUN_DIR: &str = "second_run";
pub const CONCATENATED_DIR: &str = "concatenated_bootstraps";
pub const SUPPORTS_RUN_DIR: &str = "supports_run";
pub const RESULTS_DIR: &str = "results";
pub const BOOTSTRAPS_DIR: &str = "bootstraps";

pub const FIRST_DESCRIPTOR: &str = "first_command.txt";
pub const SECOND_DESCRIPTOR: &str = "second_command.txt";
pub const SUPPORTS_DESCRIPTOR: &str = "supports_commands.txt";

/// Suffix of the per-batch replicate-tree files written by the engine
pub const REPLICATE_SUFFIX: &str = "bootstraps";

/// Paths of one pipeline run rooted at the output directory
#[derive(Clone, Debug)]
pub struct RunLayout {
    root: PathBuf,
}

impl RunLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the output root, tolerating a previous run's tree
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let layout = Self::new(root);
        ensure_dir(&layout.root)?;
        Ok(layout)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // === Phase 1 ===

    pub fn first_run(&self) -> PathBuf {
        self.root.join(FIRST_RUN_DIR)
    }

    pub fn first_results(&self) -> PathBuf {
        self.first_run().join(RESULTS_DIR)
    }

    pub fn first_descriptor(&self) -> PathBuf {
        self.root.join(FIRST_DESCRIPTOR)
    }

    /// Directory holding the phase-1 outputs of one dataset
    pub fn first_dataset_dir(&self, id: &str) -> PathBuf {
        self.first_results().join(id)
    }

    /// Output prefix of the parse run for one dataset
    pub fn first_prefix(&self, id: &str) -> PathBuf {
        self.first_dataset_dir(id).join(id)
    }

    /// Analysis report written by the parse run
    pub fn report(&self, id: &str) -> PathBuf {
        self.first_dataset_dir(id).join(format!("{}.raxml.log", id))
    }

    /// Binary alignment written by the parse run
    pub fn compressed_alignment(&self, id: &str) -> PathBuf {
        self.first_dataset_dir(id).join(format!("{}.raxml.rba", id))
    }

    // === Phase 2 ===

    pub fn second_run(&self) -> PathBuf {
        self.root.join(SECOND_RUN_DIR)
    }

    pub fn second_results(&self) -> PathBuf {
        self.second_run().join(RESULTS_DIR)
    }

    pub fn bootstraps(&self) -> PathBuf {
        self.second_run().join(BOOTSTRAPS_DIR)
    }

    pub fn second_descriptor(&self) -> PathBuf {
        self.root.join(SECOND_DESCRIPTOR)
    }

    pub fn second_dataset_dir(&self, id: &str) -> PathBuf {
        self.second_results().join(id)
    }

    pub fn second_prefix(&self, id: &str) -> PathBuf {
        self.second_dataset_dir(id).join(id)
    }

    pub fn bootstrap_dataset_dir(&self, id: &str) -> PathBuf {
        self.bootstraps().join(id)
    }

    /// Output prefix of replicate batch `index` for one dataset
    pub fn bootstrap_prefix(&self, id: &str, index: u32) -> PathBuf {
        self.bootstrap_dataset_dir(id).join(batch_name(id, index))
    }

    /// Best ML tree written by the main inference run
    pub fn best_tree(&self, id: &str) -> PathBuf {
        self.second_dataset_dir(id).join(format!("{}.raxml.bestTree", id))
    }

    // === Aggregation ===

    pub fn concatenated(&self) -> PathBuf {
        self.root.join(CONCATENATED_DIR)
    }

    /// All replicate trees of one dataset, concatenated
    pub fn concatenated_file(&self, id: &str) -> PathBuf {
        self.concatenated().join(format!("{}.bs", id))
    }

    // === Phase 3 ===

    pub fn supports_run(&self) -> PathBuf {
        self.root.join(SUPPORTS_RUN_DIR)
    }

    pub fn supports_descriptor(&self) -> PathBuf {
        self.root.join(SUPPORTS_DESCRIPTOR)
    }

    pub fn support_prefix(&self, id: &str) -> PathBuf {
        self.supports_run().join(format!("{}.support", id))
    }
}

/// Work-unit name of replicate batch `index`; also its file prefix
pub fn batch_name(id: &str, index: u32) -> String {
    format!("{}_bs{}", id, index)
}
