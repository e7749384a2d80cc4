//! # Dispatch Engine Invocation
//!
//! The dispatch engine is a black box launched under a parallel launcher:
//!
//! ```text
//! <launcher> -np <ranks> <scheduler> <--kind-scheduler> <library> <descriptor> <output_dir>
//! ```
//!
//! The call blocks until the engine exits. Exit status 0 is success; anything
//! else, including termination by signal, fails the current phase.

use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::info_span;

use crate::config::{Config, SchedulerKind};
use crate::error::{MultiRaxmlError, Result};
use crate::pipelines::Phase;

/// Engine output is redirected here, inside the phase output directory
pub const DISPATCH_LOG: &str = "logs.txt";

/// Hands one descriptor to something that executes its work units
pub trait Dispatcher {
    /// Run every unit of `descriptor`, writing engine state under `output_dir`
    fn dispatch(&mut self, phase: Phase, descriptor: &Path, output_dir: &Path) -> Result<()>;
}

/// Launches the MPI dispatch engine as a child process
#[derive(Clone, Debug)]
pub struct MpiDispatcher {
    pub launcher: String,
    pub ranks: u32,
    pub scheduler: PathBuf,
    pub kind: SchedulerKind,
    pub library: PathBuf,
    pub redirect_logs: bool,
}

impl MpiDispatcher {
    pub fn from_config(config: &Config) -> Self {
        Self {
            launcher: config.launcher.clone(),
            ranks: config.ranks,
            scheduler: config.scheduler.clone(),
            kind: config.implementation,
            library: config.library.clone(),
            redirect_logs: !config.no_log_redirect,
        }
    }

    /// Arguments passed to the launcher
    pub fn launcher_args(&self, descriptor: &Path, output_dir: &Path) -> Vec<OsString> {
        vec![
            "-np".into(),
            self.ranks.to_string().into(),
            self.scheduler.clone().into_os_string(),
            self.kind.as_flag().into(),
            self.library.clone().into_os_string(),
            descriptor.as_os_str().to_owned(),
            output_dir.as_os_str().to_owned(),
        ]
    }

    /// Full command line, for display
    pub fn describe(&self, descriptor: &Path, output_dir: &Path) -> String {
        let mut parts = vec![self.launcher.clone()];
        parts.extend(
            self.launcher_args(descriptor, output_dir)
                .iter()
                .map(|a| a.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }
}

impl Dispatcher for MpiDispatcher {
    fn dispatch(&mut self, phase: Phase, descriptor: &Path, output_dir: &Path) -> Result<()> {
        let _span = info_span!("dispatch", phase = phase.as_str()).entered();

        let mut cmd = Command::new(&self.launcher);
        cmd.args(self.launcher_args(descriptor, output_dir));

        eprintln!("Calling dispatch engine: {}", self.describe(descriptor, output_dir));
        std::io::stderr().flush()?;

        if self.redirect_logs {
            let log_path = output_dir.join(DISPATCH_LOG);
            let out = File::create(&log_path)?;
            let err = out.try_clone()?;
            cmd.stdout(Stdio::from(out)).stderr(Stdio::from(err));
            eprintln!("Logs will be redirected to {}", log_path.display());
        }

        let status = cmd.status()?;
        if !status.success() {
            eprintln!("{} failed: dispatch engine returned {:?}", phase, status.code());
            return Err(MultiRaxmlError::Dispatch {
                phase,
                code: status.code(),
            });
        }
        Ok(())
    }
}
