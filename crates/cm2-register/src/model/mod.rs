//! Data model types for registers.
//!
//! This module contains the in-memory representation of a register:
//! - Block kinds and sound instruments
//! - Stable handles for blocks and connections
//! - Blocks, positions, and connections
//! - The register itself
//! - Builders (ergonomic construction)

pub(crate) mod arena;
pub mod block;
pub mod builder;
pub mod id;
pub mod kind;
pub mod register;

pub use block::{Block, Connection, Position};
pub use builder::{BlockBuilder, RegisterBuilder};
pub use id::{BlockId, ConnectionId};
pub use kind::{BlockKind, SoundInstrument};
pub use register::Register;
