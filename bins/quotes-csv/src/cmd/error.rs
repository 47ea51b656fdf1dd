#[derive(Debug, thiserror::Error)]
pub enum QuotesCsvError {
    #[error("{0}")]
    Config(String),

    #[error("output {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Csv(#[from] csvrec::Error),

    #[error("{0}")]
    Encode(#[from] csvrec::EncodeError),
}
