//! Decoding limits.
//!
//! Save strings come from untrusted sources (clipboard, web). These bounds
//! keep a hostile string from forcing unbounded allocation.

/// Maximum save string length in bytes (16 MiB).
pub const MAX_INPUT_LEN: usize = 16 * 1024 * 1024;

/// Maximum number of block records.
pub const MAX_BLOCKS: usize = 1_000_000;

/// Maximum number of connection records.
pub const MAX_CONNECTIONS: usize = 4_000_000;

/// Maximum number of properties on a single block.
pub const MAX_PROPERTIES: usize = 1024;
