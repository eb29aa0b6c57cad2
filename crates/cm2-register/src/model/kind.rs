//! Block type registry.
//!
//! Every block kind has a numeric wire code and a power-on default state.
//! The two flip-flop variants share code 5 and differ only in their default
//! state, so decoding code 5 needs the record's powered flag as a hint.

use crate::error::DecodeError;

/// Logic block kinds understood by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Nor,
    And,
    Or,
    Xor,
    Button,
    FlipFlopOff,
    FlipFlopOn,
    Led,
    Sound,
    Conductor,
    MysteriousOr,
    Nand,
    Xnor,
    Random,
    Text,
    Tile,
    Node,
    Delay,
    Antenna,
    ConductorV2,
    LedMixer,
}

impl BlockKind {
    /// All kinds, in wire-code order.
    pub const ALL: [BlockKind; 21] = [
        BlockKind::Nor,
        BlockKind::And,
        BlockKind::Or,
        BlockKind::Xor,
        BlockKind::Button,
        BlockKind::FlipFlopOff,
        BlockKind::FlipFlopOn,
        BlockKind::Led,
        BlockKind::Sound,
        BlockKind::Conductor,
        BlockKind::MysteriousOr,
        BlockKind::Nand,
        BlockKind::Xnor,
        BlockKind::Random,
        BlockKind::Text,
        BlockKind::Tile,
        BlockKind::Node,
        BlockKind::Delay,
        BlockKind::Antenna,
        BlockKind::ConductorV2,
        BlockKind::LedMixer,
    ];

    /// Returns the wire code for this kind.
    pub const fn code(self) -> u8 {
        match self {
            BlockKind::Nor => 0,
            BlockKind::And => 1,
            BlockKind::Or => 2,
            BlockKind::Xor => 3,
            BlockKind::Button => 4,
            BlockKind::FlipFlopOff | BlockKind::FlipFlopOn => 5,
            BlockKind::Led => 6,
            BlockKind::Sound => 7,
            BlockKind::Conductor => 8,
            BlockKind::MysteriousOr => 9,
            BlockKind::Nand => 10,
            BlockKind::Xnor => 11,
            BlockKind::Random => 12,
            BlockKind::Text => 13,
            BlockKind::Tile => 14,
            BlockKind::Node => 15,
            BlockKind::Delay => 16,
            BlockKind::Antenna => 17,
            BlockKind::ConductorV2 => 18,
            BlockKind::LedMixer => 19,
        }
    }

    /// Returns whether a freshly placed block of this kind is powered.
    pub const fn default_powered(self) -> bool {
        matches!(
            self,
            BlockKind::Nor
                | BlockKind::FlipFlopOn
                | BlockKind::Nand
                | BlockKind::Xnor
                | BlockKind::Random
        )
    }

    /// Resolves a wire code to a kind.
    ///
    /// With a powered hint the powered table entry is tried first, falling
    /// back to the unpowered one (and the reverse without the hint). Only
    /// code 5 has both entries, so every other code ignores the hint.
    pub fn from_code(code: i64, powered_hint: bool) -> Result<BlockKind, DecodeError> {
        let lookup = |powered: bool| {
            BlockKind::ALL
                .iter()
                .copied()
                .find(|kind| i64::from(kind.code()) == code && kind.default_powered() == powered)
        };
        lookup(powered_hint)
            .or_else(|| lookup(!powered_hint))
            .ok_or(DecodeError::UnknownBlockCode { code })
    }

    /// Returns true for either flip-flop variant.
    pub const fn is_flip_flop(self) -> bool {
        matches!(self, BlockKind::FlipFlopOff | BlockKind::FlipFlopOn)
    }

    /// Returns the property list this kind always carries, if any.
    ///
    /// Flip-flops ignore caller-supplied properties.
    pub const fn forced_properties(self) -> Option<[f64; 2]> {
        match self {
            BlockKind::FlipFlopOff => Some([0.0, 0.0]),
            BlockKind::FlipFlopOn => Some([2.0, 0.0]),
            _ => None,
        }
    }

    /// Returns a human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            BlockKind::Nor => "NOR",
            BlockKind::And => "AND",
            BlockKind::Or => "OR",
            BlockKind::Xor => "XOR",
            BlockKind::Button => "Button",
            BlockKind::FlipFlopOff => "Flip-flop (off)",
            BlockKind::FlipFlopOn => "Flip-flop (on)",
            BlockKind::Led => "LED",
            BlockKind::Sound => "Sound",
            BlockKind::Conductor => "Conductor",
            BlockKind::MysteriousOr => "Mysterious OR",
            BlockKind::Nand => "NAND",
            BlockKind::Xnor => "XNOR",
            BlockKind::Random => "Random",
            BlockKind::Text => "Text",
            BlockKind::Tile => "Tile",
            BlockKind::Node => "Node",
            BlockKind::Delay => "Delay",
            BlockKind::Antenna => "Antenna",
            BlockKind::ConductorV2 => "Conductor V2",
            BlockKind::LedMixer => "LED Mixer",
        }
    }
}

/// Instrument numbers used in a sound block's property list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SoundInstrument {
    Sine = 0,
    Square = 1,
    Triangle = 2,
    Sawtooth = 3,
}

impl SoundInstrument {
    /// Returns the instrument number.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Creates an instrument from its number.
    pub fn from_code(v: u8) -> Option<SoundInstrument> {
        match v {
            0 => Some(SoundInstrument::Sine),
            1 => Some(SoundInstrument::Square),
            2 => Some(SoundInstrument::Triangle),
            3 => Some(SoundInstrument::Sawtooth),
            _ => None,
        }
    }

    /// Returns the instrument as a block property value.
    pub fn as_property(self) -> f64 {
        f64::from(self.code())
    }
}
