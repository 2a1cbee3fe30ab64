//! Built-in defaults shared by the configuration and the downloader

/// Default byte cap applied to each of the two fetched streams (1 MiB)
pub const DEFAULT_MAX_BYTES: u64 = 1_048_576;

/// Default deadline for a whole download, fetch and verification included
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 90;
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Suffix appended to a content URL to locate its detached signature
pub const SIGNATURE_SUFFIX: &str = ".asc";
