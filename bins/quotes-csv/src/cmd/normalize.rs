use std::io::Write;

use csvrec::io::csv_writer;
use csvrec::Encoder;

use super::config::Effective;
use super::error::QuotesCsvError;
use super::quote::Quote;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub decoded: usize,
    pub failed: usize,
    pub crossed: usize,
}

/// Decode `eff.input`, log rejected rows, write the valid quotes back out.
pub fn run(eff: &Effective) -> Result<Summary, QuotesCsvError> {
    let decoder = csvrec::decode_file::<Quote>(&eff.input, eff.decode)?;

    let out: Box<dyn Write> = match &eff.output {
        Some(path) => Box::new(std::fs::File::create(path).map_err(|source| {
            QuotesCsvError::Output { path: path.clone(), source }
        })?),
        None => Box::new(std::io::stdout().lock()),
    };

    let mut encoder = Encoder::<Quote, _>::new(csv_writer(out))?;
    if eff.header {
        encoder.write_header()?;
    }

    let mut summary = Summary::default();
    for step in decoder {
        match step {
            Ok(quote) => {
                if quote.is_crossed() {
                    tracing::warn!(
                        symbol = quote.symbol.as_str(),
                        bid = quote.bid,
                        ask = quote.ask,
                        "crossed quote"
                    );
                    summary.crossed += 1;
                }
                encoder.encode(&quote)?;
                summary.decoded += 1;
            }
            Err(e) => {
                tracing::warn!(line = e.line(), error = %e, "rejected row");
                summary.failed += 1;
            }
        }
    }
    encoder.finish()?;

    tracing::info!(
        input = %eff.input,
        decoded = summary.decoded,
        failed = summary.failed,
        crossed = summary.crossed,
        "normalize complete"
    );
    Ok(summary)
}
