//! # Replay of Incomplete Work Units
//!
//! After an interrupted dispatch, the engine log tells which units started
//! but never finished:
//!
//! ```text
//! ## Started g1_bs4 on ranks [8-11]
//! End of g1_bs4 after 3210ms
//! ```
//!
//! The last event seen for a name decides its state. Incomplete units are
//! re-emitted from the original descriptor, in descriptor order, with
//! `--redo` appended so the engine overwrites their partial output.

use std::collections::{BTreeSet, HashMap};

use crate::data::WorkUnit;

pub const START_PREFIX: &str = "## Started";
pub const END_PREFIX: &str = "End of";
pub const REDO_FLAG: &str = "--redo";

/// Names of units whose last logged event is a start
pub fn incomplete_units(log: &str) -> BTreeSet<String> {
    let mut running: HashMap<&str, bool> = HashMap::new();
    for line in log.lines() {
        let started = if line.starts_with(START_PREFIX) {
            true
        } else if line.starts_with(END_PREFIX) {
            false
        } else {
            continue;
        };
        if let Some(name) = line.split_whitespace().nth(2) {
            running.insert(name, started);
        }
    }

    running
        .into_iter()
        .filter(|&(_, started)| started)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Units of `descriptor` named in `incomplete`, each with `--redo` appended
pub fn replay_units(descriptor: &[WorkUnit], incomplete: &BTreeSet<String>) -> Vec<WorkUnit> {
    descriptor
        .iter()
        .filter(|unit| incomplete.contains(&unit.name))
        .map(|unit| unit.clone().arg(REDO_FLAG))
        .collect()
}
