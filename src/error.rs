use std::{io, path::PathBuf, str::Utf8Error, time::Duration};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("input is not valid UTF-8: {0}")]
    Decode(#[from] Utf8Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reading {} timed out after {}s", path.display(), timeout.as_secs())]
    Timeout { path: PathBuf, timeout: Duration },
}

impl ProcessError {
    /// Whether retrying the same read could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Io { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
            Self::Decode(_) | Self::Timeout { .. } => false,
        }
    }
}
