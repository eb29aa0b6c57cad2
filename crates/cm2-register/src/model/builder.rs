//! Builder API for ergonomic Register construction.
//!
//! # Example
//!
//! ```rust
//! use cm2_register::{BlockKind, RegisterBuilder, SoundInstrument};
//!
//! let register = RegisterBuilder::new()
//!     .block(BlockKind::Button, (0.0, 0.0, 0.0), |b| b)
//!     .block(BlockKind::Sound, (1.0, 0.0, 0.0), |b| b
//!         .properties([440.0, SoundInstrument::Square.as_property()])
//!     )
//!     .connect(0, 1)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(register.block_count(), 2);
//! assert_eq!(register.connection_count(), 1);
//! ```

use crate::error::RegisterError;
use crate::model::{BlockKind, Position, Register};

/// Builder for constructing a Register.
///
/// Connections refer to blocks by their 0-based position in the order they
/// were added to the builder.
#[derive(Debug, Clone, Default)]
pub struct RegisterBuilder {
    blocks: Vec<BlockBuilder>,
    connections: Vec<(usize, usize)>,
}

impl RegisterBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a block configured by `f`.
    pub fn block<F>(mut self, kind: BlockKind, position: impl Into<Position>, f: F) -> Self
    where
        F: FnOnce(BlockBuilder) -> BlockBuilder,
    {
        self.blocks.push(f(BlockBuilder::new(kind, position.into())));
        self
    }

    /// Adds a connection between two block positions.
    pub fn connect(mut self, from: usize, to: usize) -> Self {
        self.connections.push((from, to));
        self
    }

    /// Builds the register.
    ///
    /// Fails if a connection names a block position that was never added.
    pub fn build(self) -> Result<Register, RegisterError> {
        let mut register = Register::with_capacity(self.blocks.len(), self.connections.len());
        let ids: Vec<_> = self
            .blocks
            .into_iter()
            .map(|b| register.add_block(b.kind, b.position, b.powered, b.properties))
            .collect();

        let size = ids.len();
        let lookup = |position: usize| {
            ids.get(position)
                .copied()
                .ok_or(RegisterError::PositionOutOfBounds { position, size })
        };
        for (from, to) in self.connections {
            register.add_connection(lookup(from)?, lookup(to)?)?;
        }
        Ok(register)
    }
}

/// Builder for a single block's optional settings.
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    kind: BlockKind,
    position: Position,
    powered: Option<bool>,
    properties: Vec<f64>,
}

impl BlockBuilder {
    fn new(kind: BlockKind, position: Position) -> Self {
        Self {
            kind,
            position,
            powered: None,
            properties: Vec::new(),
        }
    }

    /// Sets the initial powered state instead of the kind's default.
    pub fn powered(mut self, powered: bool) -> Self {
        self.powered = Some(powered);
        self
    }

    /// Sets the property list.
    pub fn properties(mut self, properties: impl IntoIterator<Item = f64>) -> Self {
        self.properties = properties.into_iter().collect();
        self
    }

    /// Appends one property.
    pub fn property(mut self, value: f64) -> Self {
        self.properties.push(value);
        self
    }
}
