//! # Multiraxml Replay
//!
//! Rebuilds a descriptor holding only the units an interrupted dispatch left
//! unfinished, and prints the command that re-dispatches it.
//!
//! ```bash
//! multiraxml-replay out/second_run/logs.txt out/second_command.txt replay.txt \
//!     --output-dir replay_output --ranks 16
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use multiraxml::config::SchedulerKind;
use multiraxml::io::descriptor::{read_descriptor, write_descriptor};
use multiraxml::io::fs::ensure_dir;
use multiraxml::pipelines::replay::{incomplete_units, replay_units};
use multiraxml::pipelines::MpiDispatcher;

#[derive(Parser, Debug)]
#[command(name = "multiraxml-replay")]
#[command(about = "Re-emit unfinished work units of an interrupted dispatch")]
struct ReplayConfig {
    /// Dispatch engine log of the interrupted run
    log: PathBuf,

    /// Descriptor that was being dispatched
    descriptor: PathBuf,

    /// Where to write the replay descriptor
    out: PathBuf,

    /// Output directory for the replayed dispatch (created if absent)
    #[arg(long, default_value = "replay_output")]
    output_dir: PathBuf,

    #[arg(long, default_value_t = 1)]
    ranks: u32,

    #[arg(long, value_enum, default_value = "spawn")]
    implementation: SchedulerKind,

    #[arg(long, default_value = "mpirun")]
    launcher: String,

    #[arg(long, default_value = "mpi-scheduler/build/mpi-scheduler")]
    scheduler: PathBuf,

    #[arg(long, default_value = "raxml-ng/bin/raxml-ng-mpi.so")]
    library: PathBuf,
}

fn main() -> Result<()> {
    let config = ReplayConfig::parse();

    let log = fs::read_to_string(&config.log)
        .with_context(|| format!("Failed to read dispatch log {}", config.log.display()))?;
    let units = read_descriptor(&config.descriptor)
        .with_context(|| format!("Failed to read descriptor {}", config.descriptor.display()))?;

    let incomplete = incomplete_units(&log);
    let replay = replay_units(&units, &incomplete);
    eprintln!(
        "{} of {} work units did not finish",
        replay.len(),
        units.len()
    );

    write_descriptor(&config.out, &replay)
        .with_context(|| format!("Failed to write {}", config.out.display()))?;
    ensure_dir(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let dispatcher = MpiDispatcher {
        launcher: config.launcher,
        ranks: config.ranks,
        scheduler: config.scheduler,
        kind: config.implementation,
        library: config.library,
        redirect_logs: true,
    };
    println!("{}", dispatcher.describe(&config.out, &config.output_dir));
    Ok(())
}
