//! The register: an owned collection of blocks and the wires between them.

use log::trace;
use rustc_hash::FxHashMap;

use crate::error::RegisterError;
use crate::model::arena::Arena;
use crate::model::{Block, BlockId, BlockKind, Connection, ConnectionId, Position};

/// A mutable collection of blocks and connections.
///
/// Handles returned by the register stay valid until the element they name
/// is removed. Iteration and serialization follow positional order, which is
/// insertion order with removed elements skipped. New elements are always
/// appended; in a register that never saw a removal, handle `#n` is position
/// `n`.
#[derive(Debug, Clone, Default)]
pub struct Register {
    blocks: Arena<BlockId, Block>,
    connections: Arena<ConnectionId, Connection>,
}

impl Register {
    /// Creates an empty register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty register with pre-allocated capacity.
    pub fn with_capacity(blocks: usize, connections: usize) -> Self {
        Self {
            blocks: Arena::with_capacity(blocks),
            connections: Arena::with_capacity(connections),
        }
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    /// Adds a block and returns its handle.
    ///
    /// When `powered` is `None` the kind's default state is used.
    /// Flip-flops ignore `properties`.
    pub fn add_block(
        &mut self,
        kind: BlockKind,
        position: impl Into<Position>,
        powered: Option<bool>,
        properties: Vec<f64>,
    ) -> BlockId {
        self.blocks
            .insert(Block::new(kind, position, powered, properties))
    }

    /// Returns the block for `id`.
    pub fn get_block(&self, id: BlockId) -> Result<&Block, RegisterError> {
        self.blocks.get(id).ok_or(RegisterError::InvalidBlockId { id })
    }

    /// Replaces kind, position, powered state, and properties of a block.
    ///
    /// The block's connection list is left untouched.
    pub fn transmogrify_block(
        &mut self,
        id: BlockId,
        kind: BlockKind,
        position: impl Into<Position>,
        powered: Option<bool>,
        properties: Vec<f64>,
    ) -> Result<(), RegisterError> {
        let block = self
            .blocks
            .get_mut(id)
            .ok_or(RegisterError::InvalidBlockId { id })?;
        block.reconfigure(kind, position.into(), powered, properties);
        Ok(())
    }

    /// Removes a block together with every connection attached to it.
    ///
    /// The returned block has an empty connection list. All other handles
    /// remain valid.
    pub fn remove_block(&mut self, id: BlockId) -> Result<Block, RegisterError> {
        if !self.blocks.contains(id) {
            return Err(RegisterError::InvalidBlockId { id });
        }
        let attached: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|(_, conn)| conn.touches(id))
            .map(|(conn_id, _)| conn_id)
            .collect();
        for conn_id in attached {
            self.remove_connection(conn_id)?;
        }
        trace!("removing block {id}");
        self.blocks
            .remove(id)
            .ok_or(RegisterError::InvalidBlockId { id })
    }

    /// Returns true if `id` names a live block.
    pub fn contains_block(&self, id: BlockId) -> bool {
        self.blocks.contains(id)
    }

    /// Returns the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the handle of the block at `position` (0-based).
    pub fn block_id_at(&self, position: usize) -> Option<BlockId> {
        self.blocks.key_at(position)
    }

    /// Returns the 0-based position of a block.
    pub fn position_of_block(&self, id: BlockId) -> Option<usize> {
        self.blocks.position_of(id)
    }

    /// Iterates blocks in positional order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> + '_ {
        self.blocks.iter()
    }

    // =========================================================================
    // Connections
    // =========================================================================

    /// Connects two blocks and records the connection on both of them.
    pub fn add_connection(
        &mut self,
        from: BlockId,
        to: BlockId,
    ) -> Result<ConnectionId, RegisterError> {
        self.check_block(from)?;
        self.check_block(to)?;

        let id = self.connections.insert(Connection::new(from, to));
        if let Some(block) = self.blocks.get_mut(from) {
            block.attach(id);
        }
        if let Some(block) = self.blocks.get_mut(to) {
            block.attach(id);
        }
        Ok(id)
    }

    /// Returns the connection for `id`.
    pub fn get_connection(&self, id: ConnectionId) -> Result<&Connection, RegisterError> {
        self.connections
            .get(id)
            .ok_or(RegisterError::InvalidConnectionId { id })
    }

    /// Points an existing connection at new endpoints.
    ///
    /// Both endpoints must be live blocks. The connection lists of the old
    /// and new endpoint blocks are not updated; see
    /// [`crate::validate::collect_issues`] for detecting the resulting
    /// stale entries.
    pub fn transmogrify_connection(
        &mut self,
        id: ConnectionId,
        from: BlockId,
        to: BlockId,
    ) -> Result<(), RegisterError> {
        if !self.connections.contains(id) {
            return Err(RegisterError::InvalidConnectionId { id });
        }
        self.check_block(from)?;
        self.check_block(to)?;

        let conn = self
            .connections
            .get_mut(id)
            .ok_or(RegisterError::InvalidConnectionId { id })?;
        conn.from = from;
        conn.to = to;
        Ok(())
    }

    /// Removes a connection and drops it from every block's connection list.
    pub fn remove_connection(&mut self, id: ConnectionId) -> Result<Connection, RegisterError> {
        let conn = self
            .connections
            .remove(id)
            .ok_or(RegisterError::InvalidConnectionId { id })?;
        trace!("removing connection {id} ({} -> {})", conn.from, conn.to);
        for (_, block) in self.blocks.iter_mut() {
            block.detach(id);
        }
        Ok(conn)
    }

    /// Returns true if `id` names a live connection.
    pub fn contains_connection(&self, id: ConnectionId) -> bool {
        self.connections.contains(id)
    }

    /// Returns the number of connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Returns the handle of the connection at `position` (0-based).
    pub fn connection_id_at(&self, position: usize) -> Option<ConnectionId> {
        self.connections.key_at(position)
    }

    /// Returns the 0-based position of a connection.
    pub fn position_of_connection(&self, id: ConnectionId) -> Option<usize> {
        self.connections.position_of(id)
    }

    /// Iterates connections in positional order.
    pub fn connections(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> + '_ {
        self.connections.iter()
    }

    // =========================================================================
    // Whole register
    // =========================================================================

    /// Returns true if the register holds no blocks and no connections.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.connections.is_empty()
    }

    /// Removes everything. All outstanding handles are retired.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.connections.clear();
    }

    /// Builds handle-to-position lookup tables for both collections.
    pub(crate) fn positions(&self) -> Positions {
        Positions {
            blocks: self
                .blocks
                .keys()
                .enumerate()
                .map(|(pos, id)| (id, pos))
                .collect(),
            connections: self
                .connections
                .keys()
                .enumerate()
                .map(|(pos, id)| (id, pos))
                .collect(),
        }
    }

    fn check_block(&self, id: BlockId) -> Result<(), RegisterError> {
        if self.blocks.contains(id) {
            Ok(())
        } else {
            Err(RegisterError::InvalidBlockId { id })
        }
    }
}

/// Handle-to-position tables for one snapshot of a register.
#[derive(Debug, Default)]
pub(crate) struct Positions {
    pub blocks: FxHashMap<BlockId, usize>,
    pub connections: FxHashMap<ConnectionId, usize>,
}

/// Registers are equal when their positional views match: same blocks in the
/// same order, same connections by endpoint position, and same connection
/// lists by position. Handle generations do not take part.
impl PartialEq for Register {
    fn eq(&self, other: &Self) -> bool {
        if self.block_count() != other.block_count()
            || self.connection_count() != other.connection_count()
        {
            return false;
        }
        let lhs = self.positions();
        let rhs = other.positions();

        let blocks_eq = self.blocks().zip(other.blocks()).all(|((_, a), (_, b))| {
            a.kind() == b.kind()
                && a.powered() == b.powered()
                && a.position() == b.position()
                && a.properties() == b.properties()
                && a.connection_ids().len() == b.connection_ids().len()
                && a
                    .connection_ids()
                    .iter()
                    .zip(b.connection_ids())
                    .all(|(x, y)| lhs.connections.get(x) == rhs.connections.get(y))
        });

        blocks_eq
            && self
                .connections()
                .zip(other.connections())
                .all(|((_, a), (_, b))| {
                    lhs.blocks.get(&a.from) == rhs.blocks.get(&b.from)
                        && lhs.blocks.get(&a.to) == rhs.blocks.get(&b.to)
                })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nors() -> (Register, BlockId, BlockId) {
        let mut reg = Register::new();
        let a = reg.add_block(BlockKind::Nor, Position::ORIGIN, None, vec![]);
        let b = reg.add_block(BlockKind::Nor, (1.0, 0.0, 0.0), None, vec![]);
        (reg, a, b)
    }

    #[test]
    fn test_add_block_returns_sequential_ids() {
        let mut reg = Register::new();
        let a = reg.add_block(BlockKind::And, Position::ORIGIN, None, vec![]);
        let b = reg.add_block(BlockKind::Or, Position::ORIGIN, None, vec![]);
        assert_eq!(a, BlockId::new(0, 0));
        assert_eq!(b, BlockId::new(1, 0));
        assert_eq!(reg.block_count(), 2);
    }

    #[test]
    fn test_add_connection_records_back_references() {
        let (mut reg, a, b) = two_nors();
        let conn = reg.add_connection(a, b).unwrap();

        assert_eq!(reg.connection_count(), 1);
        assert_eq!(reg.get_block(a).unwrap().connection_ids(), &[conn]);
        assert_eq!(reg.get_block(b).unwrap().connection_ids(), &[conn]);
        assert_eq!(reg.get_connection(conn).unwrap(), &Connection::new(a, b));
    }

    #[test]
    fn test_self_loop_listed_twice() {
        let (mut reg, a, _) = two_nors();
        let conn = reg.add_connection(a, a).unwrap();
        assert_eq!(reg.get_block(a).unwrap().connection_ids(), &[conn, conn]);
    }

    #[test]
    fn test_add_connection_invalid_endpoint() {
        let (mut reg, a, _) = two_nors();
        let missing = BlockId::new(5, 0);
        assert_eq!(
            reg.add_connection(a, missing),
            Err(RegisterError::InvalidBlockId { id: missing })
        );
        assert_eq!(reg.connection_count(), 0);
        assert!(reg.get_block(a).unwrap().connection_ids().is_empty());
    }

    #[test]
    fn test_accessors_reject_unknown_ids() {
        let (reg, _, _) = two_nors();
        assert!(matches!(
            reg.get_block(BlockId::new(2, 0)),
            Err(RegisterError::InvalidBlockId { .. })
        ));
        assert!(matches!(
            reg.get_connection(ConnectionId::new(0, 0)),
            Err(RegisterError::InvalidConnectionId { .. })
        ));
    }

    #[test]
    fn test_transmogrify_block_keeps_connections() {
        let (mut reg, a, b) = two_nors();
        let conn = reg.add_connection(a, b).unwrap();

        reg.transmogrify_block(a, BlockKind::FlipFlopOff, (4.0, 5.0, 6.0), None, vec![9.0])
            .unwrap();
        let block = reg.get_block(a).unwrap();
        assert_eq!(block.kind(), BlockKind::FlipFlopOff);
        assert!(!block.powered());
        assert_eq!(block.position(), Position::new(4.0, 5.0, 6.0));
        assert_eq!(block.properties(), &[0.0, 0.0]);
        assert_eq!(block.connection_ids(), &[conn]);
    }

    #[test]
    fn test_transmogrify_block_invalid_id() {
        let mut reg = Register::new();
        let id = BlockId::new(0, 0);
        assert_eq!(
            reg.transmogrify_block(id, BlockKind::Nor, Position::ORIGIN, None, vec![]),
            Err(RegisterError::InvalidBlockId { id })
        );
    }

    #[test]
    fn test_transmogrify_connection_leaves_back_references() {
        let (mut reg, a, b) = two_nors();
        let c = reg.add_block(BlockKind::Led, Position::ORIGIN, None, vec![]);
        let conn = reg.add_connection(a, b).unwrap();

        reg.transmogrify_connection(conn, c, a).unwrap();
        assert_eq!(reg.get_connection(conn).unwrap(), &Connection::new(c, a));
        // Back-references are not rewritten.
        assert_eq!(reg.get_block(b).unwrap().connection_ids(), &[conn]);
        assert!(reg.get_block(c).unwrap().connection_ids().is_empty());
    }

    #[test]
    fn test_transmogrify_connection_invalid_ids() {
        let (mut reg, a, b) = two_nors();
        let missing = ConnectionId::new(0, 0);
        assert_eq!(
            reg.transmogrify_connection(missing, a, b),
            Err(RegisterError::InvalidConnectionId { id: missing })
        );

        let conn = reg.add_connection(a, b).unwrap();
        let ghost = BlockId::new(9, 0);
        assert_eq!(
            reg.transmogrify_connection(conn, a, ghost),
            Err(RegisterError::InvalidBlockId { id: ghost })
        );
        assert_eq!(reg.get_connection(conn).unwrap(), &Connection::new(a, b));
    }

    #[test]
    fn test_remove_block_cascades() {
        let (mut reg, a, b) = two_nors();
        let c = reg.add_block(BlockKind::Led, Position::ORIGIN, None, vec![]);
        let ab = reg.add_connection(a, b).unwrap();
        let bc = reg.add_connection(b, c).unwrap();
        let ca = reg.add_connection(c, a).unwrap();

        let removed = reg.remove_block(b).unwrap();
        assert_eq!(removed.kind(), BlockKind::Nor);
        assert!(removed.connection_ids().is_empty());

        assert_eq!(reg.block_count(), 2);
        assert_eq!(reg.connection_count(), 1);
        assert!(!reg.contains_connection(ab));
        assert!(!reg.contains_connection(bc));
        assert_eq!(reg.get_block(a).unwrap().connection_ids(), &[ca]);
        assert_eq!(reg.get_block(c).unwrap().connection_ids(), &[ca]);
        assert_eq!(reg.get_connection(ca).unwrap(), &Connection::new(c, a));
    }

    #[test]
    fn test_removal_keeps_survivor_ids() {
        let mut reg = Register::new();
        let ids: Vec<BlockId> = (0..4)
            .map(|i| reg.add_block(BlockKind::Tile, (f64::from(i), 0.0, 0.0), None, vec![]))
            .collect();

        reg.remove_block(ids[1]).unwrap();
        assert!(matches!(
            reg.get_block(ids[1]),
            Err(RegisterError::InvalidBlockId { .. })
        ));
        assert_eq!(reg.get_block(ids[2]).unwrap().position().x, 2.0);
        assert_eq!(reg.get_block(ids[3]).unwrap().position().x, 3.0);
        assert_eq!(reg.position_of_block(ids[3]), Some(2));
        assert_eq!(reg.block_id_at(1), Some(ids[2]));

        // A later block is appended; the freed slot stays empty.
        let fresh = reg.add_block(BlockKind::Node, Position::ORIGIN, None, vec![]);
        assert_ne!(fresh.index(), ids[1].index());
        assert_eq!(reg.position_of_block(fresh), Some(reg.block_count() - 1));
        assert!(!reg.contains_block(ids[1]));
    }

    #[test]
    fn test_add_after_remove_appends() {
        let mut reg = Register::new();
        let and = reg.add_block(BlockKind::And, Position::ORIGIN, None, vec![]);
        let or = reg.add_block(BlockKind::Or, Position::ORIGIN, None, vec![]);
        reg.remove_block(and).unwrap();
        let xor = reg.add_block(BlockKind::Xor, Position::ORIGIN, None, vec![]);

        assert_eq!(reg.position_of_block(or), Some(0));
        assert_eq!(reg.position_of_block(xor), Some(1));
        assert_eq!(reg.block_id_at(1), Some(xor));

        let (a, b) = (or, xor);
        let first = reg.add_connection(a, b).unwrap();
        reg.remove_connection(first).unwrap();
        let second = reg.add_connection(b, a).unwrap();
        assert_eq!(reg.position_of_connection(second), Some(reg.connection_count() - 1));
    }

    #[test]
    fn test_back_references_follow_positional_order() {
        let (mut reg, a, b) = two_nors();
        let c1 = reg.add_connection(a, b).unwrap();
        let c2 = reg.add_connection(b, a).unwrap();
        reg.remove_connection(c1).unwrap();
        let c3 = reg.add_connection(a, b).unwrap();

        assert_eq!(reg.get_block(a).unwrap().connection_ids(), &[c2, c3]);
        let positions: Vec<_> = reg
            .get_block(a)
            .unwrap()
            .connection_ids()
            .iter()
            .map(|&id| reg.position_of_connection(id))
            .collect();
        assert_eq!(positions, [Some(0), Some(1)]);
    }

    #[test]
    fn test_serialize_skips_dangling_wire() {
        let (mut reg, a, b) = two_nors();
        reg.add_connection(a, b).unwrap();
        let broken = reg.add_connection(b, a).unwrap();
        // Only reachable by writing the field directly.
        reg.connections.get_mut(broken).unwrap().to = BlockId::new(7, 0);

        assert_eq!(
            crate::codec::serialize_register(&reg),
            "0,1,0,0,0,;0,1,1,0,0,?1,2??"
        );
    }

    #[test]
    fn test_clear_retires_handles() {
        let (mut reg, a, _) = two_nors();
        reg.clear();
        let fresh = reg.add_block(BlockKind::Nor, Position::ORIGIN, None, vec![]);
        assert_eq!(fresh.index(), a.index());
        assert!(!reg.contains_block(a));
        assert!(reg.contains_block(fresh));
    }

    #[test]
    fn test_remove_connection() {
        let (mut reg, a, b) = two_nors();
        let first = reg.add_connection(a, b).unwrap();
        let second = reg.add_connection(b, a).unwrap();

        assert_eq!(reg.remove_connection(first), Ok(Connection::new(a, b)));
        assert_eq!(reg.get_block(a).unwrap().connection_ids(), &[second]);
        assert_eq!(reg.get_block(b).unwrap().connection_ids(), &[second]);
        assert_eq!(
            reg.remove_connection(first),
            Err(RegisterError::InvalidConnectionId { id: first })
        );
    }

    #[test]
    fn test_clear() {
        let (mut reg, a, b) = two_nors();
        reg.add_connection(a, b).unwrap();
        reg.clear();
        assert!(reg.is_empty());
        assert!(!reg.contains_block(a));
    }

    #[test]
    fn test_instances_are_independent() {
        let mut first = Register::new();
        first.add_block(BlockKind::Nor, Position::ORIGIN, None, vec![]);
        let second = Register::new();
        assert_eq!(first.block_count(), 1);
        assert_eq!(second.block_count(), 0);
    }

    #[test]
    fn test_positional_equality_ignores_generations() {
        let mut lhs = Register::new();
        let scratch = lhs.add_block(BlockKind::Button, Position::ORIGIN, None, vec![]);
        lhs.remove_block(scratch).unwrap();
        let a = lhs.add_block(BlockKind::And, Position::ORIGIN, None, vec![]);
        let b = lhs.add_block(BlockKind::Or, Position::ORIGIN, None, vec![]);
        lhs.add_connection(a, b).unwrap();

        let mut rhs = Register::new();
        let a = rhs.add_block(BlockKind::And, Position::ORIGIN, None, vec![]);
        let b = rhs.add_block(BlockKind::Or, Position::ORIGIN, None, vec![]);
        rhs.add_connection(a, b).unwrap();

        assert_eq!(lhs, rhs);

        rhs.transmogrify_block(b, BlockKind::Xor, Position::ORIGIN, None, vec![])
            .unwrap();
        assert_ne!(lhs, rhs);
    }
}
