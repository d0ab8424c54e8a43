use log::{debug, warn};
use std::{future::Future, time::Duration};
use tokio::time::{sleep, timeout};

use crate::{
    config::{MAX_RETRIES, RETRY_DELAY_MILLIS},
    error::ProcessError,
};

use super::data::Processor;

impl Processor {
    /// Read the file at `path` and process its contents.
    ///
    /// Transient read errors are retried up to `MAX_RETRIES` times. Results are
    /// left untouched when reading or decoding fails.
    pub async fn process_file(&mut self) -> Result<String, ProcessError> {
        let this = &*self;
        let data = with_retries(move || this.read_once()).await?;
        self.process(&data)
    }

    async fn read_once(&self) -> Result<Vec<u8>, ProcessError> {
        debug!("Reading {}", self.path.display());
        match timeout(self.timeout, tokio::fs::read(&self.path)).await {
            Ok(Ok(data)) => Ok(data),
            Ok(Err(source)) => Err(ProcessError::Io {
                path: self.path.clone(),
                source,
            }),
            Err(_) => Err(ProcessError::Timeout {
                path: self.path.clone(),
                timeout: self.timeout,
            }),
        }
    }
}

/// Run `attempt` until it succeeds, fails permanently, or `MAX_RETRIES` retries are spent.
async fn with_retries<F, Fut>(mut attempt: F) -> Result<Vec<u8>, ProcessError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<u8>, ProcessError>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Ok(data) => return Ok(data),
            Err(e) if e.is_transient() && retries < MAX_RETRIES => {
                retries += 1;
                warn!(
                    "Read attempt {} of {} failed: {}",
                    retries,
                    MAX_RETRIES + 1,
                    e
                );
                sleep(Duration::from_millis(RETRY_DELAY_MILLIS)).await;
            }
            Err(e) => return Err(e),
        }
    }
}
