//! Error types for register decoding, mutation, and validation.

use thiserror::Error;

use crate::model::{BlockId, ConnectionId};

/// Coarse error categories shared by every error type in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong segment count, unparseable number, or wrong field count.
    MalformedInput,
    /// Numeric block code not present in the block type table.
    UnknownBlockCode,
    /// Block id out of range or no longer live.
    InvalidBlockId,
    /// Connection id out of range or no longer live.
    InvalidConnectionId,
}

impl ErrorKind {
    /// Returns a short stable name for this kind (e.g., "malformed_input").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::UnknownBlockCode => "unknown_block_code",
            ErrorKind::InvalidBlockId => "invalid_block_id",
            ErrorKind::InvalidConnectionId => "invalid_connection_id",
        }
    }
}

/// Error while parsing a register save string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === MalformedInput ===
    #[error("missing {section} section (found {found} `?`-separated segments)")]
    MissingSection { section: &'static str, found: usize },

    #[error("{section} record {record}: expected {expected} fields, found {found}")]
    FieldCount {
        section: &'static str,
        record: usize,
        expected: usize,
        found: usize,
    },

    #[error("{section} record {record}: invalid integer in {field}: {value:?}")]
    InvalidInteger {
        section: &'static str,
        record: usize,
        field: &'static str,
        value: String,
    },

    #[error("{section} record {record}: invalid number in {field}: {value:?}")]
    InvalidFloat {
        section: &'static str,
        record: usize,
        field: &'static str,
        value: String,
    },

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    // === UnknownBlockCode ===
    #[error("unknown block code {code}")]
    UnknownBlockCode { code: i64 },

    // === InvalidBlockId ===
    #[error("connection record {record}: {field} index {index} out of bounds (blocks: {size})")]
    IndexOutOfBounds {
        record: usize,
        field: &'static str,
        index: i64,
        size: usize,
    },

    /// Rejected while applying a decoded record to the register.
    #[error(transparent)]
    Register(#[from] RegisterError),
}

impl DecodeError {
    /// Returns the error kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::UnknownBlockCode { .. } => ErrorKind::UnknownBlockCode,
            DecodeError::Register(err) => err.kind(),
            DecodeError::IndexOutOfBounds { .. } => ErrorKind::InvalidBlockId,
            _ => ErrorKind::MalformedInput,
        }
    }
}

/// Error from a register accessor or mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("invalid block id {id}")]
    InvalidBlockId { id: BlockId },

    #[error("invalid connection id {id}")]
    InvalidConnectionId { id: ConnectionId },

    /// Positional index used by the builder does not name a block.
    #[error("block position {position} out of bounds (blocks: {size})")]
    PositionOutOfBounds { position: usize, size: usize },
}

impl RegisterError {
    /// Returns the error kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegisterError::InvalidBlockId { .. } | RegisterError::PositionOutOfBounds { .. } => {
                ErrorKind::InvalidBlockId
            }
            RegisterError::InvalidConnectionId { .. } => ErrorKind::InvalidConnectionId,
        }
    }
}

/// Advisory consistency problem found by [`crate::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("connection {connection} connects block to itself")]
    SelfLoop { connection: ConnectionId },

    #[error("connection {duplicate} duplicates connection {first}")]
    DuplicateConnection {
        first: ConnectionId,
        duplicate: ConnectionId,
    },

    #[error("block {block} does not list connection {connection}")]
    MissingBackReference {
        block: BlockId,
        connection: ConnectionId,
    },

    #[error("block {block} lists connection {connection}, which does not touch it")]
    StaleBackReference {
        block: BlockId,
        connection: ConnectionId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_kinds() {
        let err = DecodeError::MissingSection {
            section: "connection-data",
            found: 1,
        };
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        let err = DecodeError::UnknownBlockCode { code: 99 };
        assert_eq!(err.kind(), ErrorKind::UnknownBlockCode);
        assert!(err.to_string().contains("99"));

        let err = DecodeError::IndexOutOfBounds {
            record: 0,
            field: "to",
            index: 2,
            size: 1,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidBlockId);
    }

    #[test]
    fn test_register_error_kinds() {
        let err = RegisterError::InvalidBlockId {
            id: BlockId::new(4, 0),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidBlockId);
        assert_eq!(err.to_string(), "invalid block id #4");

        let err = RegisterError::InvalidConnectionId {
            id: ConnectionId::new(1, 2),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidConnectionId);
        assert_eq!(err.to_string(), "invalid connection id #1v2");
    }
}
