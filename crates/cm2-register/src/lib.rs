//! Data model and save-string codec for Circuit Maker 2 registers.
//!
//! A register is a collection of logic blocks and the wires between them.
//! This crate provides an in-memory model for registers and converts them
//! to and from the game's flat text format.
//!
//! # Quick Start
//!
//! ```rust
//! use cm2_register::{BlockKind, Register};
//! use cm2_register::codec::{parse_register, serialize_register};
//!
//! let mut register = Register::new();
//! let input = register.add_block(BlockKind::Button, (0.0, 0.0, 0.0), None, vec![]);
//! let gate = register.add_block(BlockKind::Nor, (1.5, 2.0, -3.0), None, vec![]);
//! register.add_connection(input, gate).unwrap();
//!
//! let text = serialize_register(&register);
//! assert_eq!(text, "4,0,0,0,0,;0,1,1.5,2,-3,?1,2??");
//!
//! let decoded = parse_register(&text).unwrap();
//! assert_eq!(decoded, register);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Core data types (BlockKind, Block, Connection, Register)
//! - [`codec`]: Save-string parsing and serialization
//! - [`validate`]: Advisory consistency checks
//! - [`error`]: Error types
//! - [`limits`]: Limits for decoding
//!
//! # Wire Format
//!
//! Four `?`-separated sections: block data, connection data, building data,
//! and text data. Building and text data are accepted on input and always
//! written back empty.
//!
//! # Handles
//!
//! [`BlockId`] and [`ConnectionId`] are generation-tagged. Removing an
//! element never renumbers the survivors; positions are assigned only when
//! serializing.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{parse_register, parse_register_with_options, serialize_register, DecodeOptions};
pub use error::{DecodeError, ErrorKind, RegisterError, ValidationError};
pub use model::{
    Block, BlockBuilder, BlockId, BlockKind, Connection, ConnectionId, Position, Register,
    RegisterBuilder, SoundInstrument,
};
pub use validate::{collect_issues, validate_register};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
