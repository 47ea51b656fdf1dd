//! Row-oriented collaborators.
//!
//! The engine sees rows as ordered cells only. Delimiters, quoting and
//! escaping belong to the collaborator (the `csv` crate by default).

use std::convert::Infallible;

// ═══════════════════════════════════════════════════════════════
//  Traits
// ═══════════════════════════════════════════════════════════════

/// Source of rows. `Ok(None)` is end of input and never an error.
pub trait RowReader {
    type Error: std::error::Error + Send + Sync + 'static;

    fn read_row(&mut self) -> Result<Option<Vec<String>>, Self::Error>;
}

/// Sink of rows with an explicit flush.
pub trait RowWriter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn write_row(&mut self, row: &[String]) -> Result<(), Self::Error>;

    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<T: RowReader + ?Sized> RowReader for &mut T {
    type Error = T::Error;

    fn read_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        (**self).read_row()
    }
}

impl<T: RowWriter + ?Sized> RowWriter for &mut T {
    type Error = T::Error;

    fn write_row(&mut self, row: &[String]) -> Result<(), Self::Error> {
        (**self).write_row(row)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

// ═══════════════════════════════════════════════════════════════
//  csv crate
// ═══════════════════════════════════════════════════════════════

/// CSV reader as the engine expects it: every line is data (header
/// detection is the decoder's job) and rows may differ in length.
///
/// The `csv` crate strips a UTF-8 byte-order mark at the very start of the
/// input, so a string cell in the first column of the first row that
/// begins with U+FEFF loses it. Every other cell is passed through as is.
pub fn csv_reader<R: std::io::Read>(inner: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(inner)
}

pub fn csv_writer<W: std::io::Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(inner)
}

impl<R: std::io::Read> RowReader for csv::Reader<R> {
    type Error = csv::Error;

    fn read_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        let mut record = csv::StringRecord::new();
        if !self.read_record(&mut record)? {
            return Ok(None);
        }
        Ok(Some(record.iter().map(str::to_string).collect()))
    }
}

impl<W: std::io::Write> RowWriter for csv::Writer<W> {
    type Error = csv::Error;

    fn write_row(&mut self, row: &[String]) -> Result<(), Self::Error> {
        self.write_record(row)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        csv::Writer::flush(self)?;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════
//  In-memory
// ═══════════════════════════════════════════════════════════════

/// In-memory reader over any iterator of rows.
pub struct Rows<I> {
    rows: I,
}

impl<I> Rows<I>
where
    I: Iterator<Item = Vec<String>>,
{
    pub fn new(rows: impl IntoIterator<IntoIter = I, Item = Vec<String>>) -> Self {
        Self { rows: rows.into_iter() }
    }
}

impl<I> RowReader for Rows<I>
where
    I: Iterator<Item = Vec<String>>,
{
    type Error = Infallible;

    fn read_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        Ok(self.rows.next())
    }
}

impl RowWriter for Vec<Vec<String>> {
    type Error = Infallible;

    fn write_row(&mut self, row: &[String]) -> Result<(), Self::Error> {
        self.push(row.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
