//! Error types for the command-line front end.

use std::fmt;
use std::path::PathBuf;

/// Errors surfaced to the user by a CLI command.
#[derive(Debug)]
pub enum CliError {
    /// A file could not be read.
    ReadFailed { path: PathBuf, details: String },
    /// A file could not be written.
    WriteFailed { path: PathBuf, details: String },
    /// The graph file is not a valid snapshot.
    InvalidGraph { path: PathBuf, details: String },
    /// Heuristics configuration could not be loaded.
    Config { details: String },
    /// Analysis of the graph failed.
    AnalysisFailed { details: String },
    /// The graph failed its structural check.
    ValidationFailed { details: String },
    /// Output could not be encoded.
    EncodeFailed { details: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed { path, details } => {
                write!(f, "failed to read '{}': {}", path.display(), details)
            }
            Self::WriteFailed { path, details } => {
                write!(f, "failed to write '{}': {}", path.display(), details)
            }
            Self::InvalidGraph { path, details } => {
                write!(f, "invalid graph in '{}': {}", path.display(), details)
            }
            Self::Config { details } => write!(f, "configuration error: {details}"),
            Self::AnalysisFailed { details } => write!(f, "analysis failed: {details}"),
            Self::ValidationFailed { details } => write!(f, "graph is invalid: {details}"),
            Self::EncodeFailed { details } => write!(f, "failed to encode output: {details}"),
        }
    }
}

impl std::error::Error for CliError {}
