//! Advisory consistency checks for registers.
//!
//! The register itself allows self-loops and duplicate wires, and
//! `transmogrify_connection` leaves connection lists as they were. These
//! checks report such states without rejecting them; whether they matter is
//! up to the caller.

use rustc_hash::FxHashMap;

use crate::error::ValidationError;
use crate::model::{BlockId, ConnectionId, Register};

/// Validates a register, returning the first problem found.
pub fn validate_register(register: &Register) -> Result<(), ValidationError> {
    match collect_issues(register).into_iter().next() {
        Some(issue) => Err(issue),
        None => Ok(()),
    }
}

/// Collects every problem in the register.
///
/// Connection problems come first in connection order, followed by
/// connection-list problems in block order.
pub fn collect_issues(register: &Register) -> Vec<ValidationError> {
    let mut issues = Vec::new();
    let mut seen: FxHashMap<(BlockId, BlockId), ConnectionId> = FxHashMap::default();

    for (id, conn) in register.connections() {
        if conn.from == conn.to {
            issues.push(ValidationError::SelfLoop { connection: id });
        }
        match seen.get(&(conn.from, conn.to)) {
            Some(&first) => issues.push(ValidationError::DuplicateConnection {
                first,
                duplicate: id,
            }),
            None => {
                seen.insert((conn.from, conn.to), id);
            }
        }
        let endpoints = if conn.from == conn.to {
            vec![conn.from]
        } else {
            vec![conn.from, conn.to]
        };
        for block_id in endpoints {
            let listed = register
                .get_block(block_id)
                .map(|block| block.connection_ids().contains(&id))
                .unwrap_or(false);
            if !listed {
                issues.push(ValidationError::MissingBackReference {
                    block: block_id,
                    connection: id,
                });
            }
        }
    }

    for (block_id, block) in register.blocks() {
        for &conn_id in block.connection_ids() {
            let touches = register
                .get_connection(conn_id)
                .map(|conn| conn.touches(block_id))
                .unwrap_or(false);
            if !touches {
                issues.push(ValidationError::StaleBackReference {
                    block: block_id,
                    connection: conn_id,
                });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockKind, Position};

    fn register_with_blocks(n: usize) -> (Register, Vec<BlockId>) {
        let mut reg = Register::new();
        let ids = (0..n)
            .map(|_| reg.add_block(BlockKind::Node, Position::ORIGIN, None, vec![]))
            .collect();
        (reg, ids)
    }

    #[test]
    fn test_clean_register() {
        let (mut reg, ids) = register_with_blocks(3);
        reg.add_connection(ids[0], ids[1]).unwrap();
        reg.add_connection(ids[1], ids[2]).unwrap();
        assert_eq!(validate_register(&reg), Ok(()));
    }

    #[test]
    fn test_self_loop() {
        let (mut reg, ids) = register_with_blocks(1);
        let conn = reg.add_connection(ids[0], ids[0]).unwrap();
        assert_eq!(
            collect_issues(&reg),
            vec![ValidationError::SelfLoop { connection: conn }]
        );
    }

    #[test]
    fn test_duplicate_connection() {
        let (mut reg, ids) = register_with_blocks(2);
        let first = reg.add_connection(ids[0], ids[1]).unwrap();
        let duplicate = reg.add_connection(ids[0], ids[1]).unwrap();
        // Reverse direction is a different wire.
        reg.add_connection(ids[1], ids[0]).unwrap();

        assert_eq!(
            validate_register(&reg),
            Err(ValidationError::DuplicateConnection { first, duplicate })
        );
    }

    #[test]
    fn test_transmogrified_connection_leaves_stale_entries() {
        let (mut reg, ids) = register_with_blocks(3);
        let conn = reg.add_connection(ids[0], ids[1]).unwrap();
        reg.transmogrify_connection(conn, ids[0], ids[2]).unwrap();

        assert_eq!(
            collect_issues(&reg),
            vec![
                ValidationError::MissingBackReference {
                    block: ids[2],
                    connection: conn,
                },
                ValidationError::StaleBackReference {
                    block: ids[1],
                    connection: conn,
                },
            ]
        );
    }
}
