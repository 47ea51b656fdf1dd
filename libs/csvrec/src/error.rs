use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

use crate::shape::Kind;

/// Boxed cause from a collaborator or a text capability.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ═══════════════════════════════════════════════════════════════
//  Shape errors (construction time, fatal)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("slot ordinals must be contiguous: expected {expected}, found {found}")]
    OrdinalGap { expected: usize, found: usize },

    #[error("slot {ordinal} has an empty column name")]
    EmptyName { ordinal: usize },
}

// ═══════════════════════════════════════════════════════════════
//  Cell errors (one text <-> native conversion)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CellError {
    #[error("cannot parse {text:?} as {kind}: {cause}")]
    Parse {
        text: String,
        kind: Kind,
        #[source]
        cause: ParseCause,
    },

    #[error("kind {kind} not supported")]
    Unsupported { kind: Kind },

    #[error("cannot decode {text:?} from text: {source}")]
    TextDecode {
        text: String,
        #[source]
        source: BoxError,
    },

    #[error("cannot encode to text: {0}")]
    TextEncode(#[source] BoxError),

    #[error("no slot at ordinal {0}")]
    NoSlot(usize),
}

/// Why a built-in scalar parse rejected its input.
#[derive(Debug, thiserror::Error)]
pub enum ParseCause {
    #[error(transparent)]
    Int(#[from] ParseIntError),

    #[error(transparent)]
    Float(#[from] ParseFloatError),

    #[error("value out of range for {bits}-bit kind")]
    OutOfRange { bits: u32 },

    #[error("unsigned value must not carry a sign")]
    Signed,
}

// ═══════════════════════════════════════════════════════════════
//  Row errors (decode)
// ═══════════════════════════════════════════════════════════════

/// A row that could not be decoded. Keeps the raw cells untouched so the
/// caller can log or recover them.
#[derive(Debug, thiserror::Error, serde::Serialize)]
#[error("error at record {line} {record:?}: {cause}")]
pub struct RowError {
    pub record: Vec<String>,
    pub line: usize,
    #[serde(skip)]
    #[source]
    pub cause: RowCause,
}

#[derive(Debug, thiserror::Error)]
pub enum RowCause {
    #[error("wanted exactly {expected} columns but record had {actual}")]
    ColumnCount { expected: usize, actual: usize },

    #[error("failed to decode field {ordinal}: {source}")]
    Field {
        ordinal: usize,
        #[source]
        source: CellError,
    },
}

impl RowError {
    /// Ordinal of the failing slot, if the failure was field-level.
    pub fn ordinal(&self) -> Option<usize> {
        match &self.cause {
            RowCause::Field { ordinal, .. } => Some(*ordinal),
            RowCause::ColumnCount { .. } => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to read CSV record {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Row(#[from] RowError),
}

impl DecodeError {
    /// Zero-based position of the step in the input stream.
    pub fn line(&self) -> usize {
        match self {
            DecodeError::Read { line, .. } => *line,
            DecodeError::Row(e) => e.line,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Encode errors
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("shape: {0}")]
    Shape(#[from] ShapeError),

    #[error("field {ordinal} ({name:?}): {source}")]
    Field {
        ordinal: usize,
        name: String,
        #[source]
        source: CellError,
    },

    #[error("failed to write CSV record {line}: {source}")]
    Write {
        line: usize,
        #[source]
        source: BoxError,
    },

    #[error("failed to flush output: {0}")]
    Flush(#[source] BoxError),
}

// ═══════════════════════════════════════════════════════════════
//  File wrapper errors
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create {path:?}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shape: {0}")]
    Shape(#[from] ShapeError),

    #[error("failed to encode: {0}")]
    Encode(#[from] EncodeError),
}
