//! End-to-end runs of the pipeline driver against a simulated dispatch engine.
//!
//! The fake engine reads each descriptor it is given and writes the files the
//! real inference library would: reports in phase 1, best trees and replicate
//! trees in phase 2, support trees in phase 3.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use multiraxml::io::descriptor::read_descriptor;
use multiraxml::{Config, Dispatcher, MultiRaxmlError, Phase, PipelineDriver, PipelineState};

/// Simulated dispatch engine
struct FakeEngine {
    /// (unique sites, taxa) reported per dataset id
    stats: HashMap<String, (u64, u64)>,
    /// Phase at which to return a non-zero status
    fail_on: Option<Phase>,
    /// Descriptor text seen per phase, in dispatch order
    seen: Vec<(Phase, String)>,
}

impl FakeEngine {
    fn new(stats: &[(&str, u64, u64)]) -> Self {
        Self {
            stats: stats
                .iter()
                .map(|(id, sites, taxa)| (id.to_string(), (*sites, *taxa)))
                .collect(),
            fail_on: None,
            seen: Vec::new(),
        }
    }

    fn descriptor_for(&self, phase: Phase) -> &str {
        &self.seen.iter().find(|(p, _)| *p == phase).unwrap().1
    }
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", prefix.display(), suffix))
}

fn arg_after<'a>(args: &'a [String], flag: &str) -> &'a str {
    let i = args.iter().position(|a| a == flag).unwrap();
    &args[i + 1]
}

impl Dispatcher for FakeEngine {
    fn dispatch(&mut self, phase: Phase, descriptor: &Path, output_dir: &Path) -> multiraxml::Result<()> {
        assert!(output_dir.is_dir(), "engine output dir missing: {}", output_dir.display());
        self.seen.push((phase, fs::read_to_string(descriptor)?));
        if self.fail_on == Some(phase) {
            return Err(MultiRaxmlError::Dispatch { phase, code: Some(134) });
        }

        for unit in read_descriptor(descriptor)? {
            let prefix = unit.prefix.clone().unwrap();
            match phase {
                Phase::Parse => {
                    let id = unit.name.strip_prefix("first_").unwrap();
                    let (sites, taxa) = self.stats[id];
                    fs::write(
                        with_suffix(&prefix, ".raxml.log"),
                        format!(
                            "[00:00:00] Loaded alignment with {} taxa and {} sites\n\n\
                             Alignment comprises 1 partitions and {} patterns\n",
                            taxa,
                            sites + 17,
                            sites
                        ),
                    )?;
                    fs::write(with_suffix(&prefix, ".raxml.rba"), b"RBA")?;
                }
                Phase::Inference => {
                    if unit.args.iter().any(|a| a == "--bootstrap") {
                        let n: usize = arg_after(&unit.args, "--bs-trees").parse().unwrap();
                        let trees = "((A,B),C);\n".repeat(n);
                        fs::write(with_suffix(&prefix, ".raxml.bootstraps"), trees)?;
                    } else {
                        fs::write(with_suffix(&prefix, ".raxml.bestTree"), "((A,B),C);\n")?;
                    }
                }
                Phase::Support => {
                    let bs = arg_after(&unit.args, "--bs-trees");
                    assert!(Path::new(bs).is_file(), "missing concatenated file {}", bs);
                    fs::write(with_suffix(&prefix, ".raxml.support"), "((A,B)100,C);\n")?;
                }
            }
        }
        Ok(())
    }
}

/// Input directory with one alignment per id, options file, and a config
fn setup(root: &Path, ids: &[&str], replicates: u32) -> Config {
    let input = root.join("msa");
    fs::create_dir_all(&input).unwrap();
    for id in ids {
        fs::write(input.join(format!("{}.fasta", id)), ">A\nACGT\n>B\nACGA\n>C\nACTT\n").unwrap();
    }
    let opts = root.join("options.txt");
    fs::write(&opts, "--model GTR+G --blopt nr_safe\n").unwrap();

    let config = Config::parse_from([
        "multiraxml",
        "split",
        input.to_str().unwrap(),
        root.join("out").to_str().unwrap(),
        opts.to_str().unwrap(),
        &replicates.to_string(),
        "8",
    ]);
    config.validate().unwrap();
    config
}

fn line_names(text: &str) -> Vec<&str> {
    text.lines().map(|l| l.split_whitespace().next().unwrap()).collect()
}

#[test]
fn test_two_datasets_thirty_five_replicates() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), &["big", "small"], 35);
    let engine = FakeEngine::new(&[("big", 1000, 24), ("small", 50, 6)]);

    let mut driver = PipelineDriver::new(&config, engine);
    let summary = driver.run().unwrap().clone();
    assert_eq!(driver.state(), PipelineState::Done);

    let engine = driver.dispatcher();
    let first = engine.descriptor_for(Phase::Parse);
    let second = engine.descriptor_for(Phase::Inference);
    let third = engine.descriptor_for(Phase::Support);

    assert_eq!(first.lines().count(), 2);
    assert_eq!(second.lines().count(), 2 + 2 * 4);
    assert_eq!(third.lines().count(), 2);

    assert_eq!(
        line_names(second),
        vec![
            "second_big", "big_bs0", "big_bs1", "big_bs2", "big_bs3",
            "second_small", "small_bs0", "small_bs1", "small_bs2", "small_bs3",
        ]
    );

    // 1000 sites -> 2 cores, 50 sites -> 1 core; taxa become the size tier
    assert!(second.lines().next().unwrap().starts_with("second_big 2 24 --msa "));
    assert!(second.contains("small_bs3 1 6 --bootstrap"));
    assert!(second.contains("--seed 3 --bs-trees 5"));
    assert!(second.contains("--model GTR+G --blopt nr_safe"));

    let layout = driver.layout();
    for id in ["big", "small"] {
        // 10 + 10 + 10 + 5 trees of 11 bytes each
        let merged = fs::read(layout.concatenated_file(id)).unwrap();
        assert_eq!(merged.len(), 35 * 11);
        assert!(third.contains(&format!("--bs-trees {}", layout.concatenated_file(id).display())));
    }
    assert_eq!(summary.aggregation.files, 8);
    assert!(summary.skipped.is_empty());
}

#[test]
fn test_skipped_dataset_excluded_downstream() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), &["good", "broken"], 5);
    let engine = FakeEngine::new(&[("good", 2500, 10), ("broken", 0, 0)]);

    let mut driver = PipelineDriver::new(&config, engine);
    driver.run().unwrap();

    let engine = driver.dispatcher();
    assert_eq!(
        line_names(engine.descriptor_for(Phase::Parse)),
        vec!["first_broken", "first_good"]
    );
    let second = engine.descriptor_for(Phase::Inference);
    assert!(!second.contains("broken"));
    // 5 replicates stay one per unit
    assert_eq!(second.lines().count(), 1 + 5);
    assert!(second.starts_with("second_good 4 10 "));

    assert_eq!(line_names(engine.descriptor_for(Phase::Support)), vec!["support_good"]);
    assert_eq!(driver.summary().skipped, vec!["broken"]);
}

#[test]
fn test_rerun_reuses_tree_and_reproduces_descriptors() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), &["a", "b", "c"], 40);
    let stats = [("a", 3999, 12), ("b", 4000, 12), ("c", 120, 3)];

    let mut first_run = PipelineDriver::new(&config, FakeEngine::new(&stats));
    first_run.run().unwrap();
    let before = fs::read(first_run.layout().second_descriptor()).unwrap();

    let mut second_run = PipelineDriver::new(&config, FakeEngine::new(&stats));
    second_run.run().unwrap();
    let after = fs::read(second_run.layout().second_descriptor()).unwrap();

    assert_eq!(before, after);
    let text = String::from_utf8(after).unwrap();
    assert!(text.contains("second_a 4 12 "));
    assert!(text.contains("second_b 8 12 "));
}

#[test]
fn test_dispatch_failure_stops_before_aggregation() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), &["g1"], 35);
    let mut engine = FakeEngine::new(&[("g1", 1200, 8)]);
    engine.fail_on = Some(Phase::Inference);

    let mut driver = PipelineDriver::new(&config, engine);
    let err = driver.run().unwrap_err();

    assert!(matches!(
        err,
        MultiRaxmlError::Dispatch {
            phase: Phase::Inference,
            code: Some(134)
        }
    ));
    assert!(err.to_string().contains("phase 2"));
    assert_eq!(driver.state(), PipelineState::Phase2Built);

    let layout = driver.layout();
    assert!(layout.first_descriptor().exists());
    assert!(layout.second_descriptor().exists());
    assert!(!layout.concatenated().exists());
    assert!(!layout.supports_descriptor().exists());
}
