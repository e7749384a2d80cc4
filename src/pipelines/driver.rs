//! # Pipeline Driver
//!
//! Strictly sequential state machine:
//!
//! ```text
//! Init -> Phase1Built -> Phase1Dispatched -> Phase2Built -> Phase2Dispatched
//!      -> Aggregated -> Phase3Built -> Phase3Dispatched -> Done
//! ```
//!
//! Each `*Dispatched` transition blocks on the dispatch engine. Any error
//! leaves the driver in the last state it reached; nothing later runs and
//! nothing already on disk is cleaned up. Recovery is rerunning the whole
//! pipeline, which rebuilds descriptors over the existing tree.
//!
//! Aggregation and the support phase enumerate phase-2 directories, so a
//! dataset scheduled by an earlier run into the same output directory but
//! skipped now still gets a support unit. Such datasets are reported as
//! stale in the summary and in a warning; nothing is removed.

use std::fmt;
use std::time::Instant;

use tracing::info_span;

use crate::config::Config;
use crate::data::{discover_datasets, Dataset, RunLayout};
use crate::error::Result;
use crate::io::fs::list_subdirs;
use crate::pipelines::aggregate::{aggregate_replicates, AggregationSummary};
use crate::pipelines::dispatch::Dispatcher;
use crate::pipelines::phases::DescriptorBuilder;
use crate::pipelines::Phase;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    Phase1Built,
    Phase1Dispatched,
    Phase2Built,
    Phase2Dispatched,
    Aggregated,
    Phase3Built,
    Phase3Dispatched,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What one run planned and produced
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub datasets: usize,
    pub parse_units: usize,
    pub inference_units: usize,
    pub support_units: usize,
    /// Datasets excluded after phase 1
    pub skipped: Vec<String>,
    /// Phase-2 results left by an earlier run for datasets not scheduled in this one
    pub stale: Vec<String>,
    pub aggregation: AggregationSummary,
}

/// Sequences the phases of one run
pub struct PipelineDriver<'a, D: Dispatcher> {
    config: &'a Config,
    dispatcher: D,
    layout: RunLayout,
    state: PipelineState,
    datasets: Vec<Dataset>,
    options: Vec<String>,
    /// Datasets given phase-2 units in this run
    scheduled: Vec<String>,
    summary: RunSummary,
}

impl<'a, D: Dispatcher> PipelineDriver<'a, D> {
    pub fn new(config: &'a Config, dispatcher: D) -> Self {
        Self {
            config,
            dispatcher,
            layout: RunLayout::new(&config.output_dir),
            state: PipelineState::Init,
            datasets: Vec::new(),
            options: Vec::new(),
            scheduled: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn layout(&self) -> &RunLayout {
        &self.layout
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Run every remaining transition
    pub fn run(&mut self) -> Result<&RunSummary> {
        let start = Instant::now();
        eprintln!("Results in {}", self.layout.root().display());

        while self.state != PipelineState::Done {
            self.step()?;
        }

        eprintln!("Pipeline finished in {:.2}s", start.elapsed().as_secs_f64());
        Ok(&self.summary)
    }

    /// Perform the transition out of the current state
    pub fn step(&mut self) -> Result<PipelineState> {
        use PipelineState::*;

        let next = match self.state {
            Init => {
                self.init()?;
                let desc = self.builder().build_parse_phase(&self.datasets)?;
                self.summary.parse_units = desc.n_units();
                Phase1Built
            }
            Phase1Built => {
                self.dispatch(Phase::Parse)?;
                Phase1Dispatched
            }
            Phase1Dispatched => {
                let desc = self.builder().build_inference_phase(&self.datasets)?;
                self.summary.inference_units = desc.n_units();
                self.scheduled = self
                    .datasets
                    .iter()
                    .filter(|d| !desc.skipped.contains(&d.id))
                    .map(|d| d.id.clone())
                    .collect();
                self.summary.skipped = desc.skipped;
                Phase2Built
            }
            Phase2Built => {
                self.dispatch(Phase::Inference)?;
                Phase2Dispatched
            }
            Phase2Dispatched => {
                self.summary.aggregation = aggregate_replicates(&self.layout)?;
                Aggregated
            }
            Aggregated => {
                let desc = self.builder().build_support_phase()?;
                self.summary.support_units = desc.n_units();
                self.summary.stale = self.stale_results()?;
                Phase3Built
            }
            Phase3Built => {
                self.dispatch(Phase::Support)?;
                Phase3Dispatched
            }
            Phase3Dispatched | Done => Done,
        };

        tracing::debug!(from = %self.state, to = %next, "transition");
        eprintln!("### {} -> {}", self.state, next);
        self.state = next;
        Ok(next)
    }

    fn init(&mut self) -> Result<()> {
        self.layout = RunLayout::create(&self.config.output_dir)?;
        self.datasets = discover_datasets(&self.config.input_dir)?;
        self.options = self.config.load_extra_options()?;
        self.summary.datasets = self.datasets.len();
        eprintln!(
            "Found {} datasets in {}",
            self.datasets.len(),
            self.config.input_dir.display()
        );
        Ok(())
    }

    fn stale_results(&self) -> Result<Vec<String>> {
        let stale: Vec<String> = list_subdirs(&self.layout.second_results())?
            .into_iter()
            .filter(|id| !self.scheduled.contains(id))
            .collect();
        for id in &stale {
            tracing::warn!(dataset = %id, "support unit built from an earlier run's results");
            eprintln!("Warning: {} was not scheduled in this run but has earlier results", id);
        }
        Ok(stale)
    }

    fn builder(&self) -> DescriptorBuilder<'_> {
        DescriptorBuilder::new(
            &self.layout,
            &self.options,
            self.config.policy(),
            self.config.replicates,
        )
    }

    fn dispatch(&mut self, phase: Phase) -> Result<()> {
        let _span = info_span!("phase", n = phase.number()).entered();
        let (descriptor, output_dir) = match phase {
            Phase::Parse => (self.layout.first_descriptor(), self.layout.first_run()),
            Phase::Inference => (self.layout.second_descriptor(), self.layout.second_run()),
            Phase::Support => (self.layout.supports_descriptor(), self.layout.supports_run()),
        };
        self.dispatcher.dispatch(phase, &descriptor, &output_dir)
    }
}
