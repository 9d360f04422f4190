use std::io;
use std::path::PathBuf;

/// Errors emitted while loading a metrics export.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("schema violation at {location}: {message}")]
    Schema { location: String, message: String },
}

impl IngestError {
    pub(crate) fn schema(location: impl Into<String>, message: impl ToString) -> Self {
        Self::Schema {
            location: location.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
