use std::fmt;

use crate::error::{CellError, ShapeError};

/// Native kind of one slot. Closed set: everything the cell converter
/// handles natively, plus `Text` for kinds that bring their own conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Signed integer of the given bit width.
    Int { bits: u32 },
    /// Unsigned integer of the given bit width.
    UInt { bits: u32 },
    /// Floating point, 32 or 64 bits.
    Float { bits: u32 },
    Str,
    /// Kind with a text capability (`TextCodec`).
    Text,
    /// Kind the converter cannot handle; every conversion fails.
    Unsupported(&'static str),
}

impl Kind {
    pub fn is_text(&self) -> bool {
        matches!(self, Kind::Text)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Int { bits } => write!(f, "i{bits}"),
            Kind::UInt { bits } => write!(f, "u{bits}"),
            Kind::Float { bits } => write!(f, "f{bits}"),
            Kind::Str => f.write_str("string"),
            Kind::Text => f.write_str("text"),
            Kind::Unsupported(name) => f.write_str(name),
        }
    }
}

/// One field of a record shape.
///
/// `ordinal` is the column position and never changes for the lifetime of
/// the shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub ordinal: usize,
    pub name: String,
    pub kind: Kind,
}

impl Slot {
    pub fn new(ordinal: usize, name: impl Into<String>, kind: Kind) -> Self {
        Self { ordinal, name: name.into(), kind }
    }

    /// The slot's kind overrides the built-in scalar rules.
    pub fn text_capable(&self) -> bool {
        self.kind.is_text()
    }
}

/// Ordered slot list of a record shape, computed once per decoder/encoder.
///
/// Position in `slots` equals `Slot.ordinal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    slots: Vec<Slot>,
}

impl Shape {
    /// Validate and freeze a descriptor.
    pub fn new(slots: Vec<Slot>) -> Result<Self, ShapeError> {
        for (expected, slot) in slots.iter().enumerate() {
            if slot.ordinal != expected {
                return Err(ShapeError::OrdinalGap { expected, found: slot.ordinal });
            }
            if slot.name.is_empty() {
                return Err(ShapeError::EmptyName { ordinal: slot.ordinal });
            }
        }
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, ordinal: usize) -> Option<&Slot> {
        self.slots.get(ordinal)
    }
}

/// A fixed-shape record: a product of scalar fields with a statically known
/// order.
///
/// Usually derived with `#[derive(Record)]`. Manual implementations must keep
/// `shape()` and the per-slot methods in agreement: ordinal `i` of the shape
/// is the field touched by `decode_slot(i, ..)`, `clear_slot(i)` and
/// `encode_slot(i)`.
pub trait Record: Default {
    fn shape() -> Result<Shape, ShapeError>;

    /// Decode `text` into the field at `ordinal`.
    fn decode_slot(&mut self, ordinal: usize, text: &str) -> Result<(), CellError>;

    /// Reset the field at `ordinal` to its zero value.
    fn clear_slot(&mut self, ordinal: usize);

    /// Encode the field at `ordinal` to one cell.
    fn encode_slot(&self, ordinal: usize) -> Result<String, CellError>;
}
