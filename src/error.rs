//! Errors for the fallible list operations and the script driver.

/// Error type for the rungs crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The key is already in the list. Duplicate keys are not supported.
    #[error("key already exists in the skip list")]
    DuplicateKey,

    /// The key to delete is not in the list.
    #[error("key not found in the skip list")]
    KeyNotFound,

    /// A node may not be taller than the sentinels.
    #[error("toplevel {toplevel} exceeds max level {max_level}")]
    LevelOutOfRange { toplevel: usize, max_level: usize },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A trace-file command failed.
    #[error("line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
