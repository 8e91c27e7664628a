//! # Fractal Data Providers
//!
//! This crate defines the seams between the focus-pack pipeline and the
//! outside world: where candles come from and how historical analogs are
//! found. Both are abstract traits so the pipeline can be driven by the
//! bundled implementations, or by mocks in tests.
//!
//! ## Public API
//!
//! - `CandleSource`: async trait returning ordered OHLCV history.
//! - `AnalogMatcher`: async trait returning ranked candidate windows.
//! - `InMemoryCandleSource`: candle store backed by a JSON fixture.
//! - `PatternMatcher`: built-in normalized-shape analog scanner.

use async_trait::async_trait;
use core_types::{Candle, RawMatch};
use serde::{Deserialize, Serialize};

pub mod candle_store;
pub mod error;
pub mod pattern_matcher;

// Re-export the key components to create a clean, public-facing API.
pub use candle_store::InMemoryCandleSource;
pub use error::{CandleSourceError, MatcherError};
pub use pattern_matcher::PatternMatcher;

/// The abstract interface for candle history retrieval.
///
/// Implementations must return candles ordered ascending by timestamp.
/// `min_count` is a hint for how much history the caller needs; a source may
/// return fewer candles than that, and the caller decides whether that is
/// fatal.
#[async_trait]
pub trait CandleSource: Send + Sync {
    async fn fetch(
        &self,
        symbol: &str,
        timeframe: &str,
        min_count: usize,
    ) -> Result<Vec<Candle>, CandleSourceError>;
}

/// Parameters for one analog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuery {
    pub symbol: String,
    pub timeframe: String,
    /// Pattern window length, already snapped to a supported value.
    pub window_len: usize,
    /// How many ranked candidates to return at most.
    pub candidate_count: usize,
    /// How many forward candles the caller intends to read after each
    /// window. Advisory; candidates without that much trailing history may
    /// still be returned and are discarded downstream.
    pub forward_horizon: usize,
}

/// The explicit, tagged result of an analog search.
///
/// Matcher backends tend to produce loosely-shaped output; this type is the
/// boundary where that is normalized into plain `RawMatch` values before any
/// pipeline logic touches it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    /// Ranked candidates, best first.
    pub matches: Vec<RawMatch>,
    /// Matcher-reported effective sample size, when the backend can tell
    /// how many of its candidates are mutually independent.
    pub effective_sample_size: Option<usize>,
}

/// The abstract interface for the historical-analog search engine.
///
/// Treated as a black box by the pipeline: it may fail outright or return
/// fewer candidates than requested, and the pipeline degrades rather than
/// aborts in both cases.
#[async_trait]
pub trait AnalogMatcher: Send + Sync {
    /// The window lengths this matcher can search for, in canonical order.
    /// Requested lengths are snapped to the nearest entry.
    fn supported_window_lens(&self) -> &[usize];

    async fn find_matches(&self, query: &MatchQuery) -> Result<MatchResponse, MatcherError>;
}
