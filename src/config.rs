/// Maximum number of re-attempts after a transient I/O error while reading a file.
pub const MAX_RETRIES: u32 = 3;

/// Timeout for a single file read attempt in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Delay between file read attempts.
pub const RETRY_DELAY_MILLIS: u64 = 100;

/// Longest request line the server accepts, newline excluded.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;
