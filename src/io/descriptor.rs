//! # Descriptor Files
//!
//! Flat text files listing the work units of one phase, one per line. Line
//! order is not meaningful to the dispatch engine but is preserved so logs can
//! be correlated with the file.
//!
//! When reading, `#` starts a comment and blank lines are skipped.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::data::WorkUnit;
use crate::error::{MultiRaxmlError, Result};

/// Fail on the first repeated name
pub fn check_unique_names(units: &[WorkUnit]) -> Result<()> {
    let mut seen = HashSet::with_capacity(units.len());
    for unit in units {
        if !seen.insert(unit.name.as_str()) {
            return Err(MultiRaxmlError::DuplicateWorkUnit {
                name: unit.name.clone(),
            });
        }
    }
    Ok(())
}

/// Serialize units into descriptor text
pub fn render_descriptor(units: &[WorkUnit]) -> Result<String> {
    check_unique_names(units)?;
    let mut out = String::new();
    for unit in units {
        unit.validate()?;
        out.push_str(&unit.to_string());
        out.push('\n');
    }
    Ok(out)
}

/// Write units to `path`, replacing any previous descriptor
pub fn write_descriptor(path: &Path, units: &[WorkUnit]) -> Result<()> {
    let text = render_descriptor(units)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), units = units.len(), "descriptor written");
    Ok(())
}

/// Parse descriptor text back into units
pub fn parse_descriptor(text: &str) -> Result<Vec<WorkUnit>> {
    let mut units = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = match raw.find('#') {
            Some(end) => &raw[..end],
            None => raw,
        };
        let line = line.trim_end();
        if line.trim_start().is_empty() {
            continue;
        }
        units.push(WorkUnit::from_line(line, idx + 1)?);
    }
    check_unique_names(&units)?;
    Ok(units)
}

/// Read and parse a descriptor file
pub fn read_descriptor(path: &Path) -> Result<Vec<WorkUnit>> {
    let text = fs::read_to_string(path)?;
    parse_descriptor(&text)
}
