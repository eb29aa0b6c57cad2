//! Register encoding/decoding for the save-string format.
//!
//! ```text
//! <block data>?<connection data>?<building data>?<text data>
//!
//! block      = code,powered,x,y,z,prop+prop+...   (records joined by `;`)
//! connection = from,to                            (1-based block positions)
//! ```
//!
//! Building and text data are accepted on input and written back empty.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};

use crate::codec::primitives::{count_records, split_records, Record, Writer};
use crate::error::DecodeError;
use crate::limits::{MAX_BLOCKS, MAX_CONNECTIONS, MAX_INPUT_LEN, MAX_PROPERTIES};
use crate::model::{BlockId, BlockKind, Position, Register};

const BLOCK_SECTION: &str = "block-data";
const CONNECTION_SECTION: &str = "connection-data";
const BLOCK_FIELDS: usize = 6;
const CONNECTION_FIELDS: usize = 2;

// =============================================================================
// DECODING
// =============================================================================

/// Limits applied while decoding.
///
/// Defaults come from [`crate::limits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum input length in bytes.
    pub max_input_len: usize,
    /// Maximum number of block records.
    pub max_blocks: usize,
    /// Maximum number of connection records.
    pub max_connections: usize,
    /// Maximum number of properties per block.
    pub max_properties: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_input_len: MAX_INPUT_LEN,
            max_blocks: MAX_BLOCKS,
            max_connections: MAX_CONNECTIONS,
            max_properties: MAX_PROPERTIES,
        }
    }
}

impl DecodeOptions {
    /// Creates options with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the maximum input length.
    pub fn max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = len;
        self
    }

    /// Overrides the maximum block count.
    pub fn max_blocks(mut self, count: usize) -> Self {
        self.max_blocks = count;
        self
    }

    /// Overrides the maximum connection count.
    pub fn max_connections(mut self, count: usize) -> Self {
        self.max_connections = count;
        self
    }

    /// Overrides the maximum property count per block.
    pub fn max_properties(mut self, count: usize) -> Self {
        self.max_properties = count;
        self
    }
}

/// Parses a save string into a Register using the default limits.
///
/// Parsing is all-or-nothing: on error no register is produced.
pub fn parse_register(input: &str) -> Result<Register, DecodeError> {
    parse_register_with_options(input, DecodeOptions::default())
}

/// Parses a save string into a Register with the given limits.
pub fn parse_register_with_options(
    input: &str,
    options: DecodeOptions,
) -> Result<Register, DecodeError> {
    check_limit("input", input.len(), options.max_input_len)?;

    let mut segments = input.split('?');
    let block_section = segments.next().unwrap_or_default();
    let Some(connection_section) = segments.next() else {
        return Err(DecodeError::MissingSection {
            section: CONNECTION_SECTION,
            found: 1,
        });
    };
    // Building and text data are not interpreted.

    let block_count = count_records(block_section);
    let connection_count = count_records(connection_section);
    check_limit("blocks", block_count, options.max_blocks)?;
    check_limit("connections", connection_count, options.max_connections)?;

    let mut register = Register::with_capacity(block_count, connection_count);
    let mut ids = Vec::with_capacity(block_count);
    for (index, text) in split_records(block_section).enumerate() {
        let (kind, position, powered, properties) = decode_block(index, text, &options)?;
        ids.push(register.add_block(kind, position, Some(powered), properties));
    }

    for (index, text) in split_records(connection_section).enumerate() {
        let record = Record::parse(CONNECTION_SECTION, index, text, CONNECTION_FIELDS)?;
        let from = resolve_position(&record, 0, "from", &ids)?;
        let to = resolve_position(&record, 1, "to", &ids)?;
        register.add_connection(from, to)?;
    }

    debug!(
        "parsed register: {} blocks, {} connections",
        register.block_count(),
        register.connection_count()
    );
    Ok(register)
}

type BlockRecord = (BlockKind, Position, bool, Vec<f64>);

fn decode_block(
    index: usize,
    text: &str,
    options: &DecodeOptions,
) -> Result<BlockRecord, DecodeError> {
    let record = Record::parse(BLOCK_SECTION, index, text, BLOCK_FIELDS)?;

    let code = record.read_int(0, "code")?;
    let powered = record.read_int(1, "powered")? != 0;
    let kind = BlockKind::from_code(code, powered)?;

    let position = Position::new(
        record.read_float(2, "x")?,
        record.read_float(3, "y")?,
        record.read_float(4, "z")?,
    );
    let properties = record.read_float_list(5, "properties", options.max_properties)?;

    Ok((kind, position, powered, properties))
}

/// Maps a 1-based wire position to the handle of an already decoded block.
fn resolve_position(
    record: &Record<'_>,
    pos: usize,
    field: &'static str,
    ids: &[BlockId],
) -> Result<BlockId, DecodeError> {
    let index = record.read_int(pos, field)?;
    usize::try_from(index)
        .ok()
        .and_then(|one_based| one_based.checked_sub(1))
        .and_then(|zero_based| ids.get(zero_based).copied())
        .ok_or(DecodeError::IndexOutOfBounds {
            record: record.index(),
            field,
            index,
            size: ids.len(),
        })
}

fn check_limit(field: &'static str, len: usize, max: usize) -> Result<(), DecodeError> {
    if len > max {
        return Err(DecodeError::LengthExceedsLimit { field, len, max });
    }
    Ok(())
}

impl FromStr for Register {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_register(s)
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Serializes a Register to a save string.
///
/// The output always has four `?`-separated segments; building and text
/// data are empty.
pub fn serialize_register(register: &Register) -> String {
    let mut out = String::new();
    serialize_register_into(register, &mut out);
    out
}

/// Serializes a Register, appending to `out`.
pub fn serialize_register_into(register: &Register, out: &mut String) {
    let positions = register.positions();
    let mut writer = Writer::from_string(std::mem::take(out));

    for (i, (_, block)) in register.blocks().enumerate() {
        if i > 0 {
            writer.write_sep(';');
        }
        let position = block.position();
        writer.write_uint(u64::from(block.kind().code()));
        writer.write_sep(',');
        writer.write_uint(u64::from(block.powered()));
        writer.write_sep(',');
        writer.write_float(position.x);
        writer.write_sep(',');
        writer.write_float(position.y);
        writer.write_sep(',');
        writer.write_float(position.z);
        writer.write_sep(',');
        writer.write_float_list(block.properties());
    }
    writer.write_sep('?');

    let mut first = true;
    for (id, conn) in register.connections() {
        // Endpoints are checked on every mutation, so both always resolve.
        let (Some(&from), Some(&to)) =
            (positions.blocks.get(&conn.from), positions.blocks.get(&conn.to))
        else {
            warn!("skipping connection {id}: endpoint is not a live block");
            continue;
        };
        if !first {
            writer.write_sep(';');
        }
        first = false;
        writer.write_uint(from as u64 + 1);
        writer.write_sep(',');
        writer.write_uint(to as u64 + 1);
    }

    // Building data, text data.
    writer.write_sep('?');
    writer.write_sep('?');

    debug!(
        "serialized register: {} blocks, {} connections",
        register.block_count(),
        register.connection_count()
    );
    *out = writer.into_string();
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize_register(self))
    }
}
