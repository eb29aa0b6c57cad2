//! Blocks, positions, and connections.

use crate::model::{BlockId, BlockKind, ConnectionId};

/// Block position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// Creates a position from its coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin.
    pub const ORIGIN: Position = Position::new(0.0, 0.0, 0.0);
}

impl From<(f64, f64, f64)> for Position {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// A logic block.
///
/// The connection list is maintained by the owning [`crate::Register`] and
/// cannot be set from outside the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    kind: BlockKind,
    powered: bool,
    position: Position,
    properties: Vec<f64>,
    connection_ids: Vec<ConnectionId>,
}

impl Block {
    /// Creates a detached block.
    ///
    /// `powered` defaults to the kind's power-on state. Flip-flops replace
    /// `properties` with their fixed configuration.
    pub fn new(
        kind: BlockKind,
        position: impl Into<Position>,
        powered: Option<bool>,
        properties: Vec<f64>,
    ) -> Self {
        let mut block = Self {
            kind,
            powered: false,
            position: Position::ORIGIN,
            properties: Vec::new(),
            connection_ids: Vec::new(),
        };
        block.reconfigure(kind, position.into(), powered, properties);
        block
    }

    /// Replaces everything except the connection list.
    pub(crate) fn reconfigure(
        &mut self,
        kind: BlockKind,
        position: Position,
        powered: Option<bool>,
        properties: Vec<f64>,
    ) {
        self.kind = kind;
        self.powered = powered.unwrap_or_else(|| kind.default_powered());
        self.position = position;
        self.properties = match kind.forced_properties() {
            Some(forced) => forced.to_vec(),
            None => properties,
        };
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn powered(&self) -> bool {
        self.powered
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn properties(&self) -> &[f64] {
        &self.properties
    }

    /// Connections attached to this block, in the order they were added.
    pub fn connection_ids(&self) -> &[ConnectionId] {
        &self.connection_ids
    }

    pub(crate) fn attach(&mut self, connection: ConnectionId) {
        self.connection_ids.push(connection);
    }

    pub(crate) fn detach(&mut self, connection: ConnectionId) {
        self.connection_ids.retain(|id| *id != connection);
    }
}

/// A directed wire between two blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub from: BlockId,
    pub to: BlockId,
}

impl Connection {
    pub const fn new(from: BlockId, to: BlockId) -> Self {
        Self { from, to }
    }

    /// Returns true if `block` is either endpoint.
    pub fn touches(&self, block: BlockId) -> bool {
        self.from == block || self.to == block
    }
}
