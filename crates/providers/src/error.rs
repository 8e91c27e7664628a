use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CandleSourceError {
    #[error("No candle data for symbol: {0}")]
    UnknownSymbol(String),

    #[error("No candle data for timeframe: {0}")]
    UnknownTimeframe(String),

    #[error("Failed to read candle file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse candle file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Candle history is not ordered ascending at index {0}")]
    OutOfOrder(usize),
}

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("Unsupported window length: {0}")]
    UnsupportedWindowLen(usize),

    #[error("No candle data for symbol: {0}")]
    UnknownSymbol(String),

    #[error("Matcher backend failure: {0}")]
    Backend(String),
}
