use std::path::PathBuf;

use ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("input not found: {}: {reason}", .path.display())]
    InputNotFound { path: PathBuf, reason: String },
    #[error("{0}")]
    SchemaViolation(String),
    #[error("write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("table error: {0}")]
    Table(#[from] csv::Error),
    #[error("{0}")]
    InvalidConfig(String),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Read { path, source } => Self::InputNotFound {
                path,
                reason: source.to_string(),
            },
            schema @ IngestError::Schema { .. } => Self::SchemaViolation(schema.to_string()),
        }
    }
}

impl AppError {
    /// Process exit status reported by the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidConfig(_) => 2,
            Self::InputNotFound { .. } => 3,
            Self::SchemaViolation(_) => 4,
            Self::OutputWrite { .. } => 5,
            Self::Table(_) => 6,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
