use std::fs::File;
use std::path::Path;

use crate::decode::{DecodeOptions, Decoder};
use crate::encode::Encoder;
use crate::error::Error;
use crate::io::{csv_reader, csv_writer};
use crate::shape::Record;

/// Open `path` and decode it as CSV. The returned decoder owns the file.
pub fn decode_file<R>(
    path: impl AsRef<Path>,
    options: DecodeOptions,
) -> Result<Decoder<R, csv::Reader<File>>, Error>
where
    R: Record + Clone,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "decoding file");
    Ok(Decoder::new(csv_reader(file), options)?)
}

/// Create (or truncate) `path` and write `records` to it as CSV.
pub fn encode_file<R, I>(path: impl AsRef<Path>, records: I) -> Result<(), Error>
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    write_file(path.as_ref(), records, false)
}

/// Like [`encode_file`], preceded by a header row of column names.
pub fn encode_file_with_header<R, I>(path: impl AsRef<Path>, records: I) -> Result<(), Error>
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    write_file(path.as_ref(), records, true)
}

fn write_file<R, I>(path: &Path, records: I, header: bool) -> Result<(), Error>
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    let file = File::create(path).map_err(|source| Error::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let mut encoder = Encoder::<R, _>::new(csv_writer(file))?;
    if header {
        encoder.write_header()?;
    }
    for record in records {
        encoder.encode(&record)?;
    }
    encoder.finish()?;

    tracing::debug!(path = %path.display(), "file written");
    Ok(())
}
