//! Typed records over delimited text.
//!
//! Declare a record shape once with `#[derive(Record)]`, then decode rows
//! into it with [`decode`] or encode it back with [`encode`].
//!
//! ```ignore
//! #[derive(Debug, Default, Clone, csvrec::Record)]
//! struct Pair {
//!     a: i64,
//!     b: i64,
//! }
//!
//! let reader = csvrec::io::csv_reader("1,2\n3,4\n".as_bytes());
//! for step in csvrec::decode::<Pair, _>(reader, Default::default())? {
//!     let pair = step?;
//! }
//! ```

extern crate self as csvrec;

pub mod cell;
pub mod columns;
pub mod decode;
pub mod encode;
pub mod error;
pub mod file;
pub mod io;
pub mod shape;

pub use csvrec_derive::Record;

pub use cell::{Field, Scalar, TextCodec};
pub use columns::column_names;
pub use decode::{decode, DecodeOptions, Decoder};
pub use encode::{encode, record_cells, Encoder};
pub use error::{
    BoxError, CellError, DecodeError, EncodeError, Error, ParseCause, RowCause, RowError,
    ShapeError,
};
pub use file::{decode_file, encode_file, encode_file_with_header};
pub use io::{RowReader, RowWriter, Rows};
pub use shape::{Kind, Record, Shape, Slot};
