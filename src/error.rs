use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a report run.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("File {} does not exist", path.display())]
    MissingFile { path: PathBuf },

    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing JSON in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A reaction names an actor that has no accumulator yet.
    #[error("Reaction by unknown participant '{actor}' on message from '{sender}' at {timestamp_ms}")]
    UnknownActor {
        actor: String,
        sender: String,
        timestamp_ms: i64,
    },
}
