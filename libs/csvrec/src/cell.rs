//! Cell converter: one text cell <-> one native slot value.
//!
//! Kinds that implement [`TextCodec`] always go through their own
//! conversion; everything else dispatches on [`Kind`] to the built-in
//! scalar rules in [`decode`] and [`encode`].

use std::borrow::Cow;

use crate::error::{BoxError, CellError, ParseCause};
use crate::shape::Kind;

/// Native value of a built-in scalar kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(Cow<'a, str>),
}

// ═══════════════════════════════════════════════════════════════
//  Built-in scalar rules
// ═══════════════════════════════════════════════════════════════

/// Parse one cell as `kind`. Strings are taken verbatim, no trimming.
pub fn decode(text: &str, kind: Kind) -> Result<Scalar<'_>, CellError> {
    let parse_err = |cause: ParseCause| CellError::Parse {
        text: text.to_string(),
        kind,
        cause,
    };

    match kind {
        Kind::Int { bits } if (1..=64).contains(&bits) => {
            parse_int(text, bits).map(Scalar::Int).map_err(parse_err)
        }
        Kind::UInt { bits } if (1..=64).contains(&bits) => {
            parse_uint(text, bits).map(Scalar::UInt).map_err(parse_err)
        }
        Kind::Float { bits: 32 } => {
            let value: f32 = text.parse().map_err(|e| parse_err(ParseCause::Float(e)))?;
            if value.is_infinite() && !names_infinity(text) {
                return Err(parse_err(ParseCause::OutOfRange { bits: 32 }));
            }
            Ok(Scalar::Float(f64::from(value)))
        }
        Kind::Float { bits: 64 } => {
            let value: f64 = text.parse().map_err(|e| parse_err(ParseCause::Float(e)))?;
            if value.is_infinite() && !names_infinity(text) {
                return Err(parse_err(ParseCause::OutOfRange { bits: 64 }));
            }
            Ok(Scalar::Float(value))
        }
        Kind::Str => Ok(Scalar::Str(Cow::Borrowed(text))),
        _ => Err(CellError::Unsupported { kind }),
    }
}

/// Format one value of `kind`.
///
/// Floats use the shortest representation that parses back to the same
/// value at the kind's width, without exponent or padding.
pub fn encode(value: &Scalar<'_>, kind: Kind) -> Result<String, CellError> {
    match (kind, value) {
        (Kind::Int { .. }, Scalar::Int(v)) => Ok(v.to_string()),
        (Kind::UInt { .. }, Scalar::UInt(v)) => Ok(v.to_string()),
        (Kind::Float { bits: 32 }, Scalar::Float(v)) => Ok((*v as f32).to_string()),
        (Kind::Float { bits: 64 }, Scalar::Float(v)) => Ok(v.to_string()),
        (Kind::Str, Scalar::Str(s)) => Ok(s.to_string()),
        _ => Err(CellError::Unsupported { kind }),
    }
}

fn parse_int(text: &str, bits: u32) -> Result<i64, ParseCause> {
    let value: i64 = text.parse()?;
    if bits < 64 {
        let max = (1i64 << (bits - 1)) - 1;
        let min = -max - 1;
        if value < min || value > max {
            return Err(ParseCause::OutOfRange { bits });
        }
    }
    Ok(value)
}

fn parse_uint(text: &str, bits: u32) -> Result<u64, ParseCause> {
    // `u64::from_str` takes a leading `+`; unsigned columns carry no sign.
    if text.starts_with('+') {
        return Err(ParseCause::Signed);
    }
    let value: u64 = text.parse()?;
    if bits < 64 && value >> bits != 0 {
        return Err(ParseCause::OutOfRange { bits });
    }
    Ok(value)
}

/// `inf` parses to infinity legitimately; `1e999` does not.
fn names_infinity(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

// ═══════════════════════════════════════════════════════════════
//  Field: per-type binding of a kind to its conversions
// ═══════════════════════════════════════════════════════════════

/// A type usable as a record field.
///
/// Implemented for the built-in scalars and, through a blanket impl, for
/// every [`TextCodec`] type. Which conversion a field uses is fixed when the
/// impl is selected, not probed per cell.
pub trait Field: Default {
    const KIND: Kind;

    fn decode_cell(text: &str) -> Result<Self, CellError>;

    fn encode_cell(&self) -> Result<String, CellError>;
}

/// Text capability: a type with its own textual representation.
///
/// Takes precedence over the built-in rules, so a newtype over an integer
/// or a string can define its column format freely.
pub trait TextCodec: Sized {
    type Error: Into<BoxError>;

    fn encode_text(&self) -> Result<String, Self::Error>;

    fn decode_text(text: &str) -> Result<Self, Self::Error>;
}

impl<T: TextCodec + Default> Field for T {
    const KIND: Kind = Kind::Text;

    fn decode_cell(text: &str) -> Result<Self, CellError> {
        T::decode_text(text).map_err(|e| CellError::TextDecode {
            text: text.to_string(),
            source: e.into(),
        })
    }

    fn encode_cell(&self) -> Result<String, CellError> {
        self.encode_text().map_err(|e| CellError::TextEncode(e.into()))
    }
}

macro_rules! int_field {
    ($($ty:ty),* $(,)?) => {$(
        impl Field for $ty {
            const KIND: Kind = Kind::Int { bits: <$ty>::BITS };

            fn decode_cell(text: &str) -> Result<Self, CellError> {
                match decode(text, Self::KIND)? {
                    // In range: decode() checked the bit width.
                    Scalar::Int(v) => Ok(v as $ty),
                    _ => Err(CellError::Unsupported { kind: Self::KIND }),
                }
            }

            fn encode_cell(&self) -> Result<String, CellError> {
                encode(&Scalar::Int(*self as i64), Self::KIND)
            }
        }
    )*};
}

macro_rules! uint_field {
    ($($ty:ty),* $(,)?) => {$(
        impl Field for $ty {
            const KIND: Kind = Kind::UInt { bits: <$ty>::BITS };

            fn decode_cell(text: &str) -> Result<Self, CellError> {
                match decode(text, Self::KIND)? {
                    Scalar::UInt(v) => Ok(v as $ty),
                    _ => Err(CellError::Unsupported { kind: Self::KIND }),
                }
            }

            fn encode_cell(&self) -> Result<String, CellError> {
                encode(&Scalar::UInt(*self as u64), Self::KIND)
            }
        }
    )*};
}

macro_rules! unsupported_field {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Field for $ty {
            const KIND: Kind = Kind::Unsupported($name);

            fn decode_cell(_text: &str) -> Result<Self, CellError> {
                Err(CellError::Unsupported { kind: Self::KIND })
            }

            fn encode_cell(&self) -> Result<String, CellError> {
                Err(CellError::Unsupported { kind: Self::KIND })
            }
        }
    )*};
}

int_field!(i8, i16, i32, i64, isize);
uint_field!(u8, u16, u32, u64, usize);
unsupported_field!(bool => "bool", char => "char");

impl Field for f32 {
    const KIND: Kind = Kind::Float { bits: 32 };

    fn decode_cell(text: &str) -> Result<Self, CellError> {
        match decode(text, Self::KIND)? {
            Scalar::Float(v) => Ok(v as f32),
            _ => Err(CellError::Unsupported { kind: Self::KIND }),
        }
    }

    fn encode_cell(&self) -> Result<String, CellError> {
        encode(&Scalar::Float(f64::from(*self)), Self::KIND)
    }
}

impl Field for f64 {
    const KIND: Kind = Kind::Float { bits: 64 };

    fn decode_cell(text: &str) -> Result<Self, CellError> {
        match decode(text, Self::KIND)? {
            Scalar::Float(v) => Ok(v),
            _ => Err(CellError::Unsupported { kind: Self::KIND }),
        }
    }

    fn encode_cell(&self) -> Result<String, CellError> {
        encode(&Scalar::Float(*self), Self::KIND)
    }
}

impl Field for String {
    const KIND: Kind = Kind::Str;

    fn decode_cell(text: &str) -> Result<Self, CellError> {
        match decode(text, Self::KIND)? {
            Scalar::Str(s) => Ok(s.into_owned()),
            _ => Err(CellError::Unsupported { kind: Self::KIND }),
        }
    }

    fn encode_cell(&self) -> Result<String, CellError> {
        encode(&Scalar::Str(Cow::Borrowed(self)), Self::KIND)
    }
}
