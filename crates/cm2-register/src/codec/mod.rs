//! Text encoding/decoding for register save strings.

pub mod primitives;
pub mod register;

pub use primitives::{Record, Writer};
pub use register::{
    parse_register, parse_register_with_options, serialize_register, serialize_register_into,
    DecodeOptions,
};
