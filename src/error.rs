//! Error and warning types shared by the generator and the orchestrator.
//!
//! Errors abort a whole run and nothing is written. Warnings are collected per
//! field or per artifact and travel with the [`GenerationReport`](crate::component::GenerationReport).

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Fatal errors: the run is aborted and prior artifacts remain untouched.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The field schema is not valid JSON or does not match the expected shape
    #[error("invalid field schema: {0}")]
    InvalidSchema(#[source] serde_json::Error),

    /// The existing block.json could not be parsed
    #[error("invalid metadata document {path}: {message}")]
    InvalidMetadata { path: PathBuf, message: String },

    /// The schema failed validation (duplicate or malformed keys)
    #[error("schema rejected: {}", .issues.join("; "))]
    Rejected { issues: Vec<String> },

    /// A field references a type tag outside the closed set
    #[error("unknown field type '{type_tag}' for field '{key}'")]
    UnknownFieldType { key: String, type_tag: String },

    /// Slug is empty or could escape the blocks directory
    #[error("invalid component slug '{0}'")]
    InvalidSlug(String),

    /// No component directory exists for this slug
    #[error("component '{0}' not found")]
    NotFound(String),

    /// Scaffolding refused to overwrite an existing component
    #[error("component '{0}' already exists")]
    AlreadyExists(String),

    /// Another generation for the same component is in flight
    #[error("component '{0}' is already being generated")]
    Busy(String),

    /// Askama template rendering failed
    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),

    /// IO error while reading inputs
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Recoverable, per-field problems. Generation continues without the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateWarning {
    /// The field's type tag is not in the registry; the field was skipped
    UnknownFieldType { key: String, type_tag: String },
    /// A repeater sub-field is itself a repeater; only one level is supported
    NestedRepeater { repeater: String, key: String },
    /// A repeater declares no sub-fields
    EmptyRepeater { key: String },
    /// The cheat sheet could not be written; informational only
    CheatSheet { message: String },
}

impl fmt::Display for GenerateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateWarning::UnknownFieldType { key, type_tag } => {
                write!(f, "unknown field type '{type_tag}' for '{key}', field skipped")
            }
            GenerateWarning::NestedRepeater { repeater, key } => write!(
                f,
                "repeater '{repeater}' cannot contain repeater '{key}', sub-field skipped"
            ),
            GenerateWarning::EmptyRepeater { key } => {
                write!(f, "repeater '{key}' has no sub-fields")
            }
            GenerateWarning::CheatSheet { message } => {
                write!(f, "field reference not written: {message}")
            }
        }
    }
}
