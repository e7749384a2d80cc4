//! # Configuration Logic
//!
//! ## Role
//! CLI argument parsing and validation. The `Config` is built once in `main`
//! and handed by reference to the driver and the descriptor builders.
//!
//! ## Example CLI
//! ```bash
//! multiraxml split alignments/ out/ options.txt 100 64
//! multiraxml --split-scheduler alignments/ out/ options.txt 100 64
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::{MultiRaxmlError, Result};

/// Replicate counts strictly above this are batched with `DEFAULT_LARGE_CHUNK`
pub const DEFAULT_CHUNK_THRESHOLD: u32 = 30;

/// Replicates per work unit once the threshold is exceeded
pub const DEFAULT_LARGE_CHUNK: u32 = 10;

/// Replicates per work unit at or below the threshold
pub const SMALL_CHUNK: u32 = 1;

/// Unique-site step used by the core-count doubling rule
pub const DEFAULT_SITES_PER_STEP: u64 = 1000;

/// Scheduling strategy selected inside the dispatch engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchedulerKind {
    /// Split ranks between concurrently running work units
    Split,
    /// One core per work unit
    Onecore,
    /// Spawn a fresh process group per work unit
    Spawn,
}

impl SchedulerKind {
    /// Flag forwarded to the dispatch engine
    pub fn as_flag(self) -> &'static str {
        match self {
            SchedulerKind::Split => "--split-scheduler",
            SchedulerKind::Onecore => "--onecore-scheduler",
            SchedulerKind::Spawn => "--spawn-scheduler",
        }
    }

    /// Kind named by its engine flag, e.g. `--split-scheduler`
    pub fn from_flag(flag: &str) -> Option<Self> {
        Self::value_variants().iter().copied().find(|k| k.as_flag() == flag)
    }

    fn as_value(self) -> &'static str {
        match self {
            SchedulerKind::Split => "split",
            SchedulerKind::Onecore => "onecore",
            SchedulerKind::Spawn => "spawn",
        }
    }
}

/// Rewrite an engine-flag first positional (`--split-scheduler`) to its value name.
///
/// Clap would otherwise read it as an unknown option. Only the argument right
/// after the program name is considered.
pub fn normalize_legacy_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(i, arg)| {
            let legacy = if i == 1 {
                arg.to_str().and_then(SchedulerKind::from_flag)
            } else {
                None
            };
            match legacy {
                Some(kind) => OsString::from(kind.as_value()),
                None => arg,
            }
        })
        .collect()
}

/// Numeric sizing policy. Both rules are tunables, not invariants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanPolicy {
    pub chunk_threshold: u32,
    pub large_chunk: u32,
    pub sites_per_step: u64,
}

impl Default for PlanPolicy {
    fn default() -> Self {
        Self {
            chunk_threshold: DEFAULT_CHUNK_THRESHOLD,
            large_chunk: DEFAULT_LARGE_CHUNK,
            sites_per_step: DEFAULT_SITES_PER_STEP,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "multiraxml")]
#[command(about = "Plan and sequence RAxML-NG runs over a directory of alignments")]
pub struct Config {
    /// Scheduling strategy of the dispatch engine
    #[arg(value_enum)]
    pub implementation: SchedulerKind,

    /// Directory containing one alignment file per dataset
    pub input_dir: PathBuf,

    /// Output directory (created if absent, reused if present)
    pub output_dir: PathBuf,

    /// File whose first line holds extra options for the inference engine
    pub options_file: PathBuf,

    /// Number of bootstrap replicates per dataset
    pub replicates: u32,

    /// Number of ranks handed to the parallel launcher
    pub ranks: u32,

    /// Parallel launcher wrapping the dispatch engine
    #[arg(long, default_value = "mpirun")]
    pub launcher: String,

    /// Dispatch engine executable
    #[arg(long, default_value = "mpi-scheduler/build/mpi-scheduler")]
    pub scheduler: PathBuf,

    /// Inference library loaded by the dispatch engine
    #[arg(long, default_value = "raxml-ng/bin/raxml-ng-mpi.so")]
    pub library: PathBuf,

    /// Replicate count above which replicates are batched
    #[arg(long, default_value_t = DEFAULT_CHUNK_THRESHOLD)]
    pub chunk_threshold: u32,

    /// Replicates per batch once batching applies
    #[arg(long, default_value_t = DEFAULT_LARGE_CHUNK)]
    pub chunk_size: u32,

    /// Unique-site step of the core-count doubling rule
    #[arg(long, default_value_t = DEFAULT_SITES_PER_STEP)]
    pub sites_per_step: u64,

    /// Leave dispatch-engine output on the terminal instead of logs.txt
    #[arg(long)]
    pub no_log_redirect: bool,

    /// Enable span profiling output
    #[arg(long)]
    pub profile: bool,
}

impl Config {
    /// Parse from the process arguments and validate
    pub fn parse_and_validate() -> Result<Self> {
        let config = Self::parse_from(normalize_legacy_args(std::env::args_os()));
        config.validate()?;
        Ok(config)
    }

    /// Validate values that clap cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if !self.input_dir.is_dir() {
            return Err(MultiRaxmlError::config(format!(
                "Input directory not found: {}",
                self.input_dir.display()
            )));
        }
        if !self.options_file.is_file() {
            return Err(MultiRaxmlError::config(format!(
                "Options file not found: {}",
                self.options_file.display()
            )));
        }
        if self.ranks == 0 {
            return Err(MultiRaxmlError::config("ranks must be at least 1"));
        }
        if self.replicates == 0 {
            return Err(MultiRaxmlError::config("replicates must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(MultiRaxmlError::config("chunk-size must be at least 1"));
        }
        if self.sites_per_step == 0 {
            return Err(MultiRaxmlError::config("sites-per-step must be at least 1"));
        }
        Ok(())
    }

    pub fn policy(&self) -> PlanPolicy {
        PlanPolicy {
            chunk_threshold: self.chunk_threshold,
            large_chunk: self.chunk_size,
            sites_per_step: self.sites_per_step,
        }
    }

    /// Extra inference options: first line of the options file, split on whitespace
    pub fn load_extra_options(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.options_file)?;
        Ok(content
            .lines()
            .next()
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default())
    }
}
