//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

use crate::pipelines::Phase;

/// Main error type for multiraxml operations
#[derive(Error, Debug)]
pub enum MultiRaxmlError {
    /// I/O errors (file missing, permission denied, read/write failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (invalid CLI arguments)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid data errors (argument that cannot be serialized, bad dataset name)
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Descriptor parse errors
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The dispatch engine returned a non-zero status
    #[error("{phase}: dispatch engine failed with {}", describe_code(.code))]
    Dispatch { phase: Phase, code: Option<i32> },

    /// Copy failure while concatenating replicate trees
    #[error("Aggregation failed copying {} to {}: {source}", .source_path.display(), .target_path.display())]
    Aggregation {
        source_path: PathBuf,
        target_path: PathBuf,
        source: std::io::Error,
    },

    /// Two work units in one descriptor share a name
    #[error("Duplicate work unit name: {name}")]
    DuplicateWorkUnit { name: String },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "termination by signal".to_string(),
    }
}

/// Type alias for Results using MultiRaxmlError
pub type Result<T> = std::result::Result<T, MultiRaxmlError>;

impl MultiRaxmlError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Whether this error came from a dispatch-engine invocation
    pub fn is_dispatch_failure(&self) -> bool {
        matches!(self, Self::Dispatch { .. })
    }
}
