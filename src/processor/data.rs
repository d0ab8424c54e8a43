use log::debug;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{config::DEFAULT_TIMEOUT_SECS, error::ProcessError};

/// Processes data files.
///
/// Every successfully processed input is kept in `results`, in call order.
/// Entries are never removed or reordered.
#[derive(Debug, Clone)]
pub struct Processor {
    pub(super) path: PathBuf,
    pub(super) timeout: Duration,
    results: Vec<String>,
}

impl Processor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            results: Vec::new(),
        }
    }

    /// Override the timeout applied to each file read attempt.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    /// Process raw data into a string.
    ///
    /// The bytes are decoded as UTF-8, trimmed and upper-cased. On a decoding
    /// error nothing is recorded.
    pub fn process(&mut self, data: &[u8]) -> Result<String, ProcessError> {
        let decoded = std::str::from_utf8(data)?;
        let result = decoded.trim().to_uppercase();

        debug!(
            "Processed {} bytes into {} chars",
            data.len(),
            result.chars().count()
        );
        self.results.push(result.clone());
        Ok(result)
    }
}
