use crate::error::CandleSourceError;
use crate::CandleSource;
use async_trait::async_trait;
use core_types::Candle;
use std::path::Path;

/// A candle source backed by a fixture loaded once at startup.
///
/// The store holds exactly one symbol/timeframe series. Reads are cheap
/// clones; nothing mutates the series after construction, so concurrent
/// builds can share one instance behind an `Arc`.
#[derive(Debug, Clone)]
pub struct InMemoryCandleSource {
    symbol: String,
    timeframe: String,
    candles: Vec<Candle>,
}

impl InMemoryCandleSource {
    /// Wraps an already-loaded series. Fails if the series is not ordered
    /// ascending by timestamp.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: impl Into<String>,
        candles: Vec<Candle>,
    ) -> Result<Self, CandleSourceError> {
        for (i, pair) in candles.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(CandleSourceError::OutOfOrder(i + 1));
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            timeframe: timeframe.into(),
            candles,
        })
    }

    /// Loads a JSON candle fixture (an array of `{ts,o,h,l,c,v}` objects).
    pub fn from_json_file(
        symbol: impl Into<String>,
        timeframe: impl Into<String>,
        path: &Path,
    ) -> Result<Self, CandleSourceError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CandleSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let candles: Vec<Candle> =
            serde_json::from_str(&raw).map_err(|source| CandleSourceError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(
            candles = candles.len(),
            path = %path.display(),
            "Loaded candle fixture."
        );
        Self::new(symbol, timeframe, candles)
    }

    /// Read-only view of the full series, for collaborators (like the
    /// built-in matcher) constructed from the same history.
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }
}

#[async_trait]
impl CandleSource for InMemoryCandleSource {
    async fn fetch(
        &self,
        symbol: &str,
        timeframe: &str,
        min_count: usize,
    ) -> Result<Vec<Candle>, CandleSourceError> {
        if !symbol.eq_ignore_ascii_case(&self.symbol) {
            return Err(CandleSourceError::UnknownSymbol(symbol.to_string()));
        }
        if timeframe != self.timeframe {
            return Err(CandleSourceError::UnknownTimeframe(timeframe.to_string()));
        }
        if self.candles.len() < min_count {
            tracing::debug!(
                have = self.candles.len(),
                want = min_count,
                "Candle store holds less history than requested."
            );
        }
        Ok(self.candles.clone())
    }
}
