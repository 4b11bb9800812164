//! Error taxonomy for the certificate pipeline.
//!
//! Every variant is fatal to the whole run: nothing is retried and a batch
//! never continues past the first error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CertError {
    /// The HTML template could not be read. Raised before any output exists.
    #[error("cannot read template '{}': {source}", .path.display())]
    TemplateMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A required CSV header is absent. Raised before any record is emitted.
    #[error("CSV input is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    /// The CSV file is unreadable or structurally malformed.
    #[error("cannot read CSV '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The external renderer exited with a nonzero status.
    #[error("renderer exited with {}: {}", describe_code(.code), .stderr.trim_end())]
    RendererInvocation { code: Option<i32>, stderr: String },

    /// The external renderer could not be started at all.
    #[error("cannot launch renderer '{program}': {source}")]
    RendererLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Output directory creation or temporary file write failed.
    #[error("filesystem error at '{}': {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is unreadable or not valid JSON.
    #[error("invalid configuration '{}': {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CertError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CertError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match *code {
        Some(c) => format!("status {c}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, CertError>;
