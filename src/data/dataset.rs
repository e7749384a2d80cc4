//! # Dataset Discovery
//!
//! One dataset per alignment file in the input directory. The identifier is
//! the file stem and names the dataset's subdirectory in every phase.

use std::path::{Path, PathBuf};

use crate::error::{MultiRaxmlError, Result};
use crate::io::fs::list_files;

/// One named sequence-alignment input
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    /// Identifier derived from the file name (extension stripped)
    pub id: String,
    /// Path to the original alignment
    pub path: PathBuf,
}

impl Dataset {
    /// Build a dataset from an alignment path
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                MultiRaxmlError::invalid_data(format!(
                    "Cannot derive dataset identifier from {}",
                    path.display()
                ))
            })?
            .to_string();
        if id.chars().any(char::is_whitespace) {
            return Err(MultiRaxmlError::invalid_data(format!(
                "Dataset identifier contains whitespace: {:?}",
                id
            )));
        }
        Ok(Self { id, path })
    }
}

/// List regular files of `input_dir` (symlinks followed) as datasets, sorted by file name
pub fn discover_datasets(input_dir: &Path) -> Result<Vec<Dataset>> {
    list_files(input_dir)?
        .into_iter()
        .map(Dataset::from_path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_id_is_file_stem() {
        let ds = Dataset::from_path("/data/msa/gene_12.fasta").unwrap();
        assert_eq!(ds.id, "gene_12");
        assert_eq!(ds.path, PathBuf::from("/data/msa/gene_12.fasta"));

        let no_ext = Dataset::from_path("/data/msa/gene_7").unwrap();
        assert_eq!(no_ext.id, "gene_7");
    }

    #[test]
    fn test_whitespace_id_rejected() {
        assert!(Dataset::from_path("/data/my gene.fasta").is_err());
    }

    #[test]
    fn test_discover_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.fasta"), ">t1\nACGT\n").unwrap();
        fs::write(dir.path().join("a.phy"), "2 4\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let datasets = discover_datasets(dir.path()).unwrap();
        let ids: Vec<&str> = datasets.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_includes_symlinked_alignment() {
        let store = tempfile::tempdir().unwrap();
        fs::write(store.path().join("g1.fasta"), ">t1\nACGT\n").unwrap();

        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(store.path().join("g1.fasta"), dir.path().join("g1.fasta")).unwrap();
        fs::write(dir.path().join("g2.fasta"), ">t1\nACGT\n").unwrap();

        let datasets = discover_datasets(dir.path()).unwrap();
        let ids: Vec<&str> = datasets.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["g1", "g2"]);
    }
}
