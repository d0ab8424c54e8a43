use std::time::Duration;

use crate::is_ci;

/// Timeout for a file read in tests that expect it to succeed.
pub const FILE_READ_SECS: u64 = 5;
pub const FILE_READ_CI_SECS: u64 = 20;

/// Timeout for a whole binary run.
pub const BINARY_RUN_SECS: u64 = 10;
pub const BINARY_RUN_CI_SECS: u64 = 45;

/// Get file read timeout based on environment.
pub fn file_read() -> Duration {
    if is_ci() {
        Duration::from_secs(FILE_READ_CI_SECS)
    } else {
        Duration::from_secs(FILE_READ_SECS)
    }
}

/// Get binary run timeout based on environment.
pub fn binary_run() -> Duration {
    if is_ci() {
        Duration::from_secs(BINARY_RUN_CI_SECS)
    } else {
        Duration::from_secs(BINARY_RUN_SECS)
    }
}
