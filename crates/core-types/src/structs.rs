use crate::enums::{Direction, HorizonKey, HorizonTier, MarketPhase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV candle. Supplied externally, ordered ascending by time.
///
/// The wire names (`ts`/`o`/`h`/`l`/`c`/`v`) match the terminal's chart
/// contract; timestamps travel as epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(rename = "ts", with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
}

/// The immutable configuration row for one horizon. Frozen at compile time,
/// never mutated; see [`HorizonKey::config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonConfig {
    /// The requested pattern-window length, in candles.
    pub window_len: usize,
    /// How many forward candles form the aftermath sample.
    pub aftermath_days: usize,
    /// Maximum number of enriched matches that survive into the pack.
    pub top_k: usize,
    /// Minimum candle history required before the pipeline may run.
    pub min_history: usize,
}

/// A raw candidate from the analog matcher: where a similar window started
/// and how similar it scored. Everything else is derived downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatch {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_timestamp: DateTime<Utc>,
    pub similarity: f64,
}

/// Per-match forward returns at the canonical day offsets. An offset is only
/// present when it falls inside the extracted aftermath.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutcomeReturns {
    #[serde(rename = "ret7d", skip_serializing_if = "Option::is_none")]
    pub ret_7d: Option<f64>,
    #[serde(rename = "ret14d", skip_serializing_if = "Option::is_none")]
    pub ret_14d: Option<f64>,
    #[serde(rename = "ret30d", skip_serializing_if = "Option::is_none")]
    pub ret_30d: Option<f64>,
    #[serde(rename = "ret90d", skip_serializing_if = "Option::is_none")]
    pub ret_90d: Option<f64>,
    #[serde(rename = "ret180d", skip_serializing_if = "Option::is_none")]
    pub ret_180d: Option<f64>,
    #[serde(rename = "ret365d", skip_serializing_if = "Option::is_none")]
    pub ret_365d: Option<f64>,
}

impl OutcomeReturns {
    /// Stores the return for one canonical offset, ignoring anything else.
    pub fn set(&mut self, days: usize, ret: f64) {
        match days {
            7 => self.ret_7d = Some(ret),
            14 => self.ret_14d = Some(ret),
            30 => self.ret_30d = Some(ret),
            90 => self.ret_90d = Some(ret),
            180 => self.ret_180d = Some(ret),
            365 => self.ret_365d = Some(ret),
            _ => {}
        }
    }
}

/// One historical analog after enrichment: normalized shapes, similarity
/// sub-scores, market phase and forward outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayMatch {
    /// Position in the matcher's ranking (0-based). Order is preserved.
    pub id: usize,
    pub similarity: f64,
    pub phase: MarketPhase,
    /// Ratio of window return volatilities, in [0, 1].
    pub volatility_match: f64,
    /// Ratio of window drawdown magnitudes, in [0, 1].
    pub drawdown_shape: f64,
    /// Pluggable heuristic score; non-deterministic by default.
    pub stability: f64,
    /// Window closes rescaled to base 100.
    pub window_normalized: Vec<f64>,
    /// Aftermath closes as fractional change against the window's last close.
    pub aftermath_normalized: Vec<f64>,
    /// Fractional return over the full aftermath.
    #[serde(rename = "return")]
    pub ret: f64,
    /// Worst running-peak drawdown over the aftermath (fraction, >= 0).
    pub max_drawdown: f64,
    /// Best running-trough advance over the aftermath (fraction, >= 0).
    pub max_excursion: f64,
    pub outcomes: OutcomeReturns,
}

/// Day-indexed percentile bands over the aftermath period.
///
/// All five sequences are exactly `aftermath_days` long regardless of sample
/// size; downstream consumers rely on that fixed-length contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSeries {
    pub p10: Vec<f64>,
    pub p25: Vec<f64>,
    pub p50: Vec<f64>,
    pub p75: Vec<f64>,
    pub p90: Vec<f64>,
}

impl DistributionSeries {
    /// An all-zero series of the given length (the zero-sample case).
    pub fn zeroed(len: usize) -> Self {
        Self {
            p10: vec![0.0; len],
            p25: vec![0.0; len],
            p50: vec![0.0; len],
            p75: vec![0.0; len],
            p90: vec![0.0; len],
        }
    }
}

/// Aggregate statistics over the surviving matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStats {
    pub median_return: f64,
    pub p10_return: f64,
    pub p90_return: f64,
    pub avg_max_drawdown: f64,
    /// Fraction of matches whose full-aftermath return was positive.
    pub hit_rate: f64,
    pub sample_size: usize,
    pub direction: Direction,
}

/// The historical-analog overlay for one horizon: the current window, the
/// enriched matches and their outcome distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayPack {
    pub focus: HorizonKey,
    /// The originally requested window length. Internal snapping to the
    /// matcher's supported lengths never leaks into this field.
    pub window_len: usize,
    pub aftermath_days: usize,
    /// The current pattern window, rescaled to base 100.
    pub current_window: Vec<f64>,
    pub matches: Vec<OverlayMatch>,
    pub distribution_series: DistributionSeries,
    pub stats: OverlayStats,
}

/// A discrete forecast marker at one canonical horizon inside the path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastMarker {
    pub horizon: HorizonKey,
    pub days: usize,
    pub day_index: usize,
    pub expected_return: f64,
    pub price: f64,
}

/// The absolute-price forecast derived from the percentile distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPack {
    /// Median path, in price terms. Length equals `aftermath_days`.
    pub path: Vec<f64>,
    pub upper_band: Vec<f64>,
    pub lower_band: Vec<f64>,
    /// Linear fade from 1.0 at day 0; never negative.
    pub confidence_decay: Vec<f64>,
    pub markers: Vec<ForecastMarker>,
    /// Single scalar worst-case floor, not day-indexed.
    pub tail_floor: f64,
    pub current_price: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_ts: DateTime<Utc>,
}

/// Data-quality diagnostics for one pack. Every scalar is bounded and
/// rounded to three decimals on output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusPackDiagnostics {
    pub sample_size: usize,
    pub effective_n: usize,
    /// Symmetric uncertainty in [0, 1]; peaks when the hit rate is 50/50.
    pub entropy: f64,
    pub reliability: f64,
    pub coverage_years: f64,
    pub quality_score: f64,
}

/// Identifying metadata stamped on every pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusPackMeta {
    pub symbol: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub asof: DateTime<Utc>,
    pub focus: HorizonKey,
    pub tier: HorizonTier,
    pub window_len: usize,
    pub aftermath_days: usize,
    pub contract_version: String,
}

/// The complete artifact for one `(symbol, horizon)` request. Immutable once
/// assembled; request-scoped, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusPack {
    pub meta: FocusPackMeta,
    pub overlay: OverlayPack,
    pub forecast: ForecastPack,
    pub diagnostics: FocusPackDiagnostics,
}
