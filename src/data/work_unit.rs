//! # Work Units
//!
//! One schedulable request for the dispatch engine. Serialized as one line:
//!
//! ```text
//! name workerCount sizeTier <forwarded arguments...>
//! ```
//!
//! The field order never varies; the engine identifies completion and replay
//! by `name`, so names must be unique within one descriptor.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{MultiRaxmlError, Result};

/// Flag introducing the output prefix in an argument list
pub const PREFIX_FLAG: &str = "--prefix";

/// One named, sized work request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkUnit {
    /// Unique name within its descriptor
    pub name: String,
    /// Number of workers the unit needs
    pub workers: u64,
    /// Minimum dataset-size tier, used by the engine for bin-packing
    pub size_tier: u64,
    /// Arguments forwarded verbatim to the inference engine
    pub args: Vec<String>,
    /// Output prefix, also present in `args` after `--prefix`
    pub prefix: Option<PathBuf>,
}

impl WorkUnit {
    pub fn new(name: impl Into<String>, workers: u64, size_tier: u64) -> Self {
        Self {
            name: name.into(),
            workers,
            size_tier,
            args: Vec::new(),
            prefix: None,
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a flag followed by a path value
    pub fn path_arg(self, flag: &str, path: &Path) -> Self {
        self.arg(flag).arg(path.to_string_lossy().into_owned())
    }

    /// Append `--prefix <path>` and record it as the unit's output prefix
    pub fn prefix(mut self, path: &Path) -> Self {
        self = self.path_arg(PREFIX_FLAG, path);
        self.prefix = Some(path.to_path_buf());
        self
    }

    /// Check that the unit survives whitespace-separated serialization
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.name.contains(char::is_whitespace) {
            return Err(MultiRaxmlError::invalid_data(format!(
                "Invalid work unit name: {:?}",
                self.name
            )));
        }
        if let Some(bad) = self
            .args
            .iter()
            .find(|a| a.is_empty() || a.contains(char::is_whitespace))
        {
            return Err(MultiRaxmlError::invalid_data(format!(
                "Work unit {} has an argument that cannot be serialized: {:?}",
                self.name, bad
            )));
        }
        Ok(())
    }

    /// Parse one descriptor line (comments already stripped)
    pub fn from_line(line: &str, line_num: usize) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let name = fields
            .next()
            .ok_or_else(|| MultiRaxmlError::parse(line_num, "Empty work unit line"))?;
        let workers = parse_count(fields.next(), "worker count", line_num)?;
        let size_tier = parse_count(fields.next(), "size tier", line_num)?;
        let args: Vec<String> = fields.map(str::to_string).collect();

        let prefix = args
            .iter()
            .position(|a| a == PREFIX_FLAG)
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from);

        Ok(Self {
            name: name.to_string(),
            workers,
            size_tier,
            args,
            prefix,
        })
    }
}

fn parse_count(field: Option<&str>, what: &str, line_num: usize) -> Result<u64> {
    let field = field.ok_or_else(|| MultiRaxmlError::parse(line_num, format!("Missing {}", what)))?;
    field
        .parse()
        .map_err(|_| MultiRaxmlError::parse(line_num, format!("Invalid {}: {:?}", what, field)))
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.workers, self.size_tier)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let unit = WorkUnit::new("first_g1", 1, 1)
            .arg("--parse")
            .path_arg("--msa", Path::new("/in/g1.fasta"))
            .args(["--model", "GTR+G"])
            .prefix(Path::new("/out/first_run/results/g1/g1"))
            .args(["--threads", "1"]);

        assert_eq!(
            unit.to_string(),
            "first_g1 1 1 --parse --msa /in/g1.fasta --model GTR+G \
             --prefix /out/first_run/results/g1/g1 --threads 1"
        );
        assert_eq!(unit.prefix.as_deref(), Some(Path::new("/out/first_run/results/g1/g1")));
    }

    #[test]
    fn test_from_line_recovers_fields() {
        let unit = WorkUnit::from_line("g1_bs2 4 12 --bootstrap --prefix /o/g1_bs2 --seed 2", 7).unwrap();
        assert_eq!(unit.name, "g1_bs2");
        assert_eq!(unit.workers, 4);
        assert_eq!(unit.size_tier, 12);
        assert_eq!(unit.args.len(), 5);
        assert_eq!(unit.prefix, Some(PathBuf::from("/o/g1_bs2")));
    }

    #[test]
    fn test_from_line_errors_carry_line_number() {
        match WorkUnit::from_line("g1 four 1", 9) {
            Err(MultiRaxmlError::Parse { line, .. }) => assert_eq!(line, 9),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(WorkUnit::from_line("g1 4", 1).is_err());
    }

    #[test]
    fn test_validate_rejects_whitespace_arguments() {
        let unit = WorkUnit::new("g1", 1, 1).path_arg("--msa", Path::new("/my data/g1.fasta"));
        assert!(unit.validate().is_err());
        assert!(WorkUnit::new("g1", 1, 1).arg("--parse").validate().is_ok());
    }
}
