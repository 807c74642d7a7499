// This module defines the error types for oclfeat using the thiserror crate. FeatureError
// covers everything that can stop an extraction: an IR file that cannot be read (Load), a
// buffer that is not valid IR (Parse), plain I/O failures while writing reports, a kernel
// that clang refused to compile in batch mode (Compile) and directory walking failures
// (Walk). An unrecognized address space is deliberately not an error: it is counted in the
// feature snapshot and logged as a warning. FeatureResult<T> is the usual alias.

//! Error types for feature extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for loading, parsing and reporting.
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("ERROR loading IR file: {} -- {reason}", .path.display())]
    Load {
        path: PathBuf,
        reason: String,
    },

    #[error("ERROR parsing IR from {source_name}: {reason}")]
    Parse {
        source_name: String,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to compile kernel {}: {reason}", .kernel.display())]
    Compile {
        kernel: PathBuf,
        reason: String,
    },

    #[error("Failed to walk kernel directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl FeatureError {
    /// Whether the error happened before any traversal could start.
    pub fn is_input_error(&self) -> bool {
        matches!(self, FeatureError::Load { .. } | FeatureError::Parse { .. })
    }
}

/// Result type alias for feature extraction.
pub type FeatureResult<T> = Result<T, FeatureError>;
