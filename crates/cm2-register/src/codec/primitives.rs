//! Field-level reading and writing for the save-string format.
//!
//! Records are flat: fields separated by `,`, lists inside a field separated
//! by `+`. Numbers use Rust's standard textual forms, so every `f64` written
//! here parses back to the same bits.

use std::fmt::Write as _;

use crate::error::DecodeError;

/// Splits a section into records. An empty section has no records.
pub fn split_records(section: &str) -> impl Iterator<Item = &str> {
    let records = if section.is_empty() { None } else { Some(section.split(';')) };
    records.into_iter().flatten()
}

/// Counts the records [`split_records`] would yield.
pub fn count_records(section: &str) -> usize {
    if section.is_empty() {
        0
    } else {
        section.bytes().filter(|b| *b == b';').count() + 1
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// One record split into its comma-separated fields.
///
/// Carries its section name and record index so every error it produces
/// points back at the offending record.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    section: &'static str,
    index: usize,
    fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    /// Splits `text` and checks that it has exactly `expected` fields.
    pub fn parse(
        section: &'static str,
        index: usize,
        text: &'a str,
        expected: usize,
    ) -> Result<Self, DecodeError> {
        let fields: Vec<&str> = text.split(',').collect();
        if fields.len() != expected {
            return Err(DecodeError::FieldCount {
                section,
                record: index,
                expected,
                found: fields.len(),
            });
        }
        Ok(Self {
            section,
            index,
            fields,
        })
    }

    /// Returns the record's index within its section.
    pub fn index(&self) -> usize {
        self.index
    }

    fn field(&self, pos: usize) -> &'a str {
        self.fields.get(pos).copied().unwrap_or_default()
    }

    /// Reads field `pos` as a signed integer.
    pub fn read_int(&self, pos: usize, name: &'static str) -> Result<i64, DecodeError> {
        let raw = self.field(pos);
        raw.parse().map_err(|_| DecodeError::InvalidInteger {
            section: self.section,
            record: self.index,
            field: name,
            value: raw.to_string(),
        })
    }

    /// Reads field `pos` as a float.
    pub fn read_float(&self, pos: usize, name: &'static str) -> Result<f64, DecodeError> {
        self.parse_float(self.field(pos), name)
    }

    /// Reads field `pos` as a `+`-separated float list, empty meaning none.
    pub fn read_float_list(
        &self,
        pos: usize,
        name: &'static str,
        max_len: usize,
    ) -> Result<Vec<f64>, DecodeError> {
        let raw = self.field(pos);
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let len = raw.bytes().filter(|b| *b == b'+').count() + 1;
        if len > max_len {
            return Err(DecodeError::LengthExceedsLimit {
                field: name,
                len,
                max: max_len,
            });
        }
        raw.split('+')
            .map(|item| self.parse_float(item, name))
            .collect()
    }

    fn parse_float(&self, raw: &str, name: &'static str) -> Result<f64, DecodeError> {
        raw.parse().map_err(|_| DecodeError::InvalidFloat {
            section: self.section,
            record: self.index,
            field: name,
            value: raw.to_string(),
        })
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for building a save string.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: String,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Creates a writer that appends to an existing buffer.
    pub fn from_string(buf: String) -> Self {
        Self { buf }
    }

    /// Returns the written text.
    pub fn into_string(self) -> String {
        self.buf
    }

    /// Returns a reference to the written text.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Writes a separator character.
    #[inline]
    pub fn write_sep(&mut self, sep: char) {
        self.buf.push(sep);
    }

    /// Writes an unsigned integer.
    #[inline]
    pub fn write_uint(&mut self, value: u64) {
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{value}");
    }

    /// Writes a float in its shortest round-trip form (`2`, `1.5`, `-3`).
    #[inline]
    pub fn write_float(&mut self, value: f64) {
        let _ = write!(self.buf, "{value}");
    }

    /// Writes floats separated by `+`.
    pub fn write_float_list(&mut self, values: &[f64]) {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.write_sep('+');
            }
            self.write_float(*value);
        }
    }
}
