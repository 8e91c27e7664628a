use providers::CandleSourceError;
use thiserror::Error;

/// The pipeline's error taxonomy.
///
/// `BtcOnly` is a validation error raised before the pipeline starts;
/// `InsufficientData` aborts a build outright. Horizon parsing happens at
/// the request edge (a `HorizonKey` is already typed here), and matcher
/// failures are deliberately absent: they degrade the sample instead of
/// failing the request.
#[derive(Error, Debug)]
pub enum FocusError {
    #[error("only BTC is supported, got {0}")]
    BtcOnly(String),

    #[error("need {required}, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("candle source error: {0}")]
    Candles(#[from] CandleSourceError),
}
