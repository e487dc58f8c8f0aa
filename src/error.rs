use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while maintaining the `.hidden` control file.
///
/// Each I/O variant names the step that failed and keeps the underlying error.
#[derive(Debug, Error)]
pub enum HiddenError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("invalid entry name {0:?}")]
    InvalidEntry(String),

    #[error("failed to stat .hidden file {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create .hidden file {path:?}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read .hidden file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open .hidden file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write to .hidden file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, HiddenError>;
