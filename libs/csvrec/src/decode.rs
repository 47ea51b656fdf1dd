use std::iter::FusedIterator;

use crate::error::{DecodeError, RowCause, RowError, ShapeError};
use crate::io::RowReader;
use crate::shape::{Record, Shape};

// ═══════════════════════════════════════════════════════════════
//  Options
// ═══════════════════════════════════════════════════════════════

/// Tolerance switches for decoding. All off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    /// Rows may have fewer cells than the record has slots; missing
    /// trailing slots get their zero value.
    ///
    /// Rows with *more* cells than slots are always accepted, the extra
    /// cells are ignored.
    pub allow_missing_trailing_fields: bool,
    /// End the sequence right after the first error step.
    pub stop_on_first_error: bool,
    /// Drop the first row if it equals the column names.
    pub skip_matching_header_row: bool,
}

impl DecodeOptions {
    pub fn allow_missing_trailing_fields(mut self, on: bool) -> Self {
        self.allow_missing_trailing_fields = on;
        self
    }

    pub fn stop_on_first_error(mut self, on: bool) -> Self {
        self.stop_on_first_error = on;
        self
    }

    pub fn skip_matching_header_row(mut self, on: bool) -> Self {
        self.skip_matching_header_row = on;
        self
    }
}

// ═══════════════════════════════════════════════════════════════
//  Decoder
// ═══════════════════════════════════════════════════════════════

/// Lazy, single-pass sequence of decoded records.
///
/// Each `next()` reads at most until one step is produced: a record, a
/// row-level error, or a read error. Malformed rows do not end the
/// sequence unless `stop_on_first_error` is set. Dropping the decoder (or
/// not calling `next()`) stops all further reads.
pub struct Decoder<R, S> {
    reader: S,
    shape: Shape,
    options: DecodeOptions,
    /// Reused for every row; callers receive clones.
    staging: R,
    line: usize,
    finished: bool,
}

enum Step<R> {
    Skip,
    Record(R),
    Error(RowError),
}

impl<R, S> Decoder<R, S>
where
    R: Record + Clone,
    S: RowReader,
{
    pub fn new(reader: S, options: DecodeOptions) -> Result<Self, ShapeError> {
        let shape = R::shape()?;
        Ok(Self {
            reader,
            shape,
            options,
            staging: R::default(),
            line: 0,
            finished: false,
        })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Rows pulled from the reader so far, including skipped and failed ones.
    pub fn rows_read(&self) -> usize {
        self.line
    }

    pub fn into_inner(self) -> S {
        self.reader
    }

    fn decode_row(&mut self, line: usize, record: Vec<String>) -> Step<R> {
        let expected = self.shape.len();
        let actual = record.len();

        if !self.options.allow_missing_trailing_fields && actual < expected {
            return Step::Error(RowError {
                record,
                line,
                cause: RowCause::ColumnCount { expected, actual },
            });
        }

        // Same as `expected` unless missing fields are allowed.
        let columns = expected.min(actual);

        if line == 0 && self.options.skip_matching_header_row {
            let names = self.shape.slots()[..columns].iter().map(|slot| slot.name.as_str());
            if names.eq(record[..columns].iter().map(String::as_str)) {
                tracing::debug!(columns, "skipping header row");
                return Step::Skip;
            }
            // Not the header, so treat it as a normal record.
        }

        for ordinal in 0..columns {
            if let Err(source) = self.staging.decode_slot(ordinal, &record[ordinal]) {
                return Step::Error(RowError {
                    record,
                    line,
                    cause: RowCause::Field { ordinal, source },
                });
            }
        }
        for ordinal in columns..expected {
            self.staging.clear_slot(ordinal);
        }

        Step::Record(self.staging.clone())
    }

    fn fail(&mut self, err: DecodeError) -> DecodeError {
        tracing::debug!(line = err.line(), error = %err, "row rejected");
        if self.options.stop_on_first_error {
            tracing::debug!(line = err.line(), "stopping at first error");
            self.finished = true;
        }
        err
    }
}

impl<R, S> Iterator for Decoder<R, S>
where
    R: Record + Clone,
    S: RowReader,
{
    type Item = Result<R, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            let line = self.line;
            self.line += 1;

            let record = match self.reader.read_row() {
                Ok(Some(record)) => record,
                Ok(None) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    let err = DecodeError::Read { line, source: Box::new(e) };
                    return Some(Err(self.fail(err)));
                }
            };

            match self.decode_row(line, record) {
                Step::Skip => continue,
                Step::Record(value) => return Some(Ok(value)),
                Step::Error(e) => return Some(Err(self.fail(e.into()))),
            }
        }
    }
}

impl<R, S> FusedIterator for Decoder<R, S>
where
    R: Record + Clone,
    S: RowReader,
{
}

/// Decode records of type `R` from `reader`.
pub fn decode<R, S>(reader: S, options: DecodeOptions) -> Result<Decoder<R, S>, ShapeError>
where
    R: Record + Clone,
    S: RowReader,
{
    Decoder::new(reader, options)
}
