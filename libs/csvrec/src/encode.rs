use std::marker::PhantomData;

use crate::error::{CellError, EncodeError};
use crate::io::RowWriter;
use crate::shape::{Record, Shape};

/// Writes records of type `R` as rows, column order = slot order.
///
/// There is no tolerant mode: the first conversion or write failure is
/// returned and the encoder should not be used further, since rows already
/// handed to the writer cannot be taken back.
pub struct Encoder<R, W> {
    writer: W,
    shape: Shape,
    rows: usize,
    _record: PhantomData<fn(&R)>,
}

impl<R, W> Encoder<R, W>
where
    R: Record,
    W: RowWriter,
{
    pub fn new(writer: W) -> Result<Self, EncodeError> {
        Ok(Self {
            writer,
            shape: R::shape()?,
            rows: 0,
            _record: PhantomData,
        })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Write the column names as one row.
    pub fn write_header(&mut self) -> Result<(), EncodeError> {
        let header = self.shape.column_names();
        self.write(&header)
    }

    pub fn encode(&mut self, record: &R) -> Result<(), EncodeError> {
        let row = cells(&self.shape, record)?;
        self.write(&row)
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> Result<W, EncodeError> {
        self.writer
            .flush()
            .map_err(|e| EncodeError::Flush(Box::new(e)))?;
        tracing::debug!(rows = self.rows, "encoder finished");
        Ok(self.writer)
    }

    fn write(&mut self, row: &[String]) -> Result<(), EncodeError> {
        self.writer.write_row(row).map_err(|e| EncodeError::Write {
            line: self.rows,
            source: Box::new(e),
        })?;
        self.rows += 1;
        Ok(())
    }
}

/// Encode every record and flush. Stops at the first failure.
pub fn encode<R, W, I>(writer: W, records: I) -> Result<(), EncodeError>
where
    R: Record,
    W: RowWriter,
    I: IntoIterator<Item = R>,
{
    let mut encoder = Encoder::<R, W>::new(writer)?;
    for record in records {
        encoder.encode(&record)?;
    }
    encoder.finish()?;
    Ok(())
}

/// One record as one row of cells, without a writer.
pub fn record_cells<R: Record>(record: &R) -> Result<Vec<String>, EncodeError> {
    let shape = R::shape()?;
    cells(&shape, record)
}

fn cells<R: Record>(shape: &Shape, record: &R) -> Result<Vec<String>, EncodeError> {
    shape
        .slots()
        .iter()
        .map(|slot| {
            record
                .encode_slot(slot.ordinal)
                .map_err(|source: CellError| EncodeError::Field {
                    ordinal: slot.ordinal,
                    name: slot.name.clone(),
                    source,
                })
        })
        .collect()
}
