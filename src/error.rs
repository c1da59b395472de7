use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SawmillError {
    /// The ingestion target does not exist. Fatal to the run; no partial
    /// results are returned.
    #[error("log path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Propagated I/O error from reading a log file. A failed read aborts
    /// the whole run rather than producing a silently incomplete snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A worker thread panicked. Internal problem, not expected in practice.
    #[error("worker failure: {0}")]
    Worker(String),
}

impl SawmillError {
    /// Attach path context to a bare I/O error.
    pub fn io_at(path: &std::path::Path, err: std::io::Error) -> Self {
        SawmillError::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {}", path.display(), err),
        ))
    }
}
