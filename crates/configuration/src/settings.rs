use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub matcher: MatcherSettings,
}

/// Where the HTTP server binds.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Where candle history comes from.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// The only supported symbol today is "BTC"; kept configurable so the
    /// gate lives in one place.
    pub symbol: String,
    /// The timeframe interval of the stored candles (e.g., "1d").
    pub timeframe: String,
    /// Path to the JSON candle fixture loaded at startup.
    pub candles_path: PathBuf,
}

/// Tuning for the analog matcher call.
#[derive(Debug, Clone, Deserialize)]
pub struct MatcherSettings {
    /// How many candidates to request per surviving slot. Oversampling
    /// compensates for candidates later discarded for missing trailing
    /// history.
    pub oversample_factor: usize,
}

impl Settings {
    /// Checks constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matcher.oversample_factor == 0 {
            return Err(ConfigError::InvalidOversample(
                self.matcher.oversample_factor,
            ));
        }
        if self.data.symbol.is_empty() {
            return Err(ConfigError::MissingSymbol);
        }
        Ok(())
    }
}
