use crate::diagnostics::build_diagnostics;
use crate::distribution::{build_distribution, build_stats};
use crate::enrich::{enrich_matches, normalize_base100, EnrichParams};
use crate::error::FocusError;
use crate::forecast::build_forecast;
use crate::resolver::resolve_window_len;
use crate::stability::StabilityScorer;
use chrono::Utc;
use core_types::{FocusPack, FocusPackMeta, HorizonKey, OverlayPack, CONTRACT_VERSION};
use futures::future::join_all;
use providers::{AnalogMatcher, CandleSource, MatchQuery, MatchResponse};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The only symbol the terminal serves today.
const SUPPORTED_SYMBOL: &str = "BTC";

/// Per-deployment tuning for the assembler.
#[derive(Debug, Clone)]
pub struct BuilderSettings {
    /// The timeframe interval of the stored candles (e.g., "1d").
    pub timeframe: String,
    /// Candidates requested per surviving slot; compensates for candidates
    /// later discarded for insufficient trailing history.
    pub oversample_factor: usize,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            timeframe: "1d".to_string(),
            oversample_factor: 2,
        }
    }
}

/// The aggregate result of building every horizon at once.
///
/// `ok` is true only when the error list is empty; a single failed horizon
/// degrades the whole flag while the successful packs are still returned.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllHorizonsResult {
    pub ok: bool,
    /// Horizons that built successfully, ascending.
    pub horizons: Vec<HorizonKey>,
    pub packs: BTreeMap<String, FocusPack>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// One row of the length-contract validation report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonValidation {
    pub horizon: HorizonKey,
    pub aftermath_days: usize,
    pub p50_len: usize,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub ok: bool,
    pub message: String,
    pub validations: Vec<HorizonValidation>,
}

/// Orchestrates one focus-pack build per `(symbol, horizon)` request.
///
/// Stateless between requests; the shared providers are read-only during a
/// build, so concurrent builds can share one instance.
pub struct FocusPackBuilder {
    candle_source: Arc<dyn CandleSource>,
    matcher: Arc<dyn AnalogMatcher>,
    stability: Arc<dyn StabilityScorer>,
    settings: BuilderSettings,
}

impl FocusPackBuilder {
    pub fn new(
        candle_source: Arc<dyn CandleSource>,
        matcher: Arc<dyn AnalogMatcher>,
        stability: Arc<dyn StabilityScorer>,
        settings: BuilderSettings,
    ) -> Self {
        Self {
            candle_source,
            matcher,
            stability,
            settings,
        }
    }

    /// Builds the complete focus pack for one horizon.
    ///
    /// Pipeline-level failures (bad symbol, missing history) abort before
    /// any output; a matcher failure degrades to an empty candidate set and
    /// the build still answers.
    pub async fn build(&self, symbol: &str, focus: HorizonKey) -> Result<FocusPack, FocusError> {
        if symbol != SUPPORTED_SYMBOL {
            return Err(FocusError::BtcOnly(symbol.to_string()));
        }

        let cfg = focus.config();
        let candles = self
            .candle_source
            .fetch(symbol, &self.settings.timeframe, cfg.min_history)
            .await?;
        if candles.len() < cfg.min_history {
            return Err(FocusError::InsufficientData {
                required: cfg.min_history,
                actual: candles.len(),
            });
        }

        let resolved_window_len =
            resolve_window_len(cfg.window_len, self.matcher.supported_window_lens());

        let query = MatchQuery {
            symbol: symbol.to_string(),
            timeframe: self.settings.timeframe.clone(),
            window_len: resolved_window_len,
            candidate_count: cfg.top_k * self.settings.oversample_factor,
            forward_horizon: cfg.aftermath_days,
        };
        let response = match self.matcher.find_matches(&query).await {
            Ok(response) => response,
            Err(err) => {
                // Deliberate resilience: the terminal always answers, and
                // callers read diagnostics.sample_size to detect degradation.
                tracing::warn!(
                    error = %err,
                    focus = %focus,
                    "Analog matcher failed; continuing with an empty candidate set."
                );
                MatchResponse::default()
            }
        };

        let current_window_raw: Vec<f64> = candles[candles.len() - resolved_window_len..]
            .iter()
            .map(|c| c.close)
            .collect();

        let params = EnrichParams {
            candles: &candles,
            current_window: &current_window_raw,
            resolved_window_len,
            aftermath_days: cfg.aftermath_days,
            top_k: cfg.top_k,
        };
        let matches = enrich_matches(&params, &response.matches, self.stability.as_ref());

        let distribution_series = build_distribution(&matches, cfg.aftermath_days);
        let stats = build_stats(&matches);

        // The last candle anchors both the forecast start and the price all
        // percentile returns are projected from.
        let last = &candles[candles.len() - 1];
        let forecast = build_forecast(
            last.close,
            last.timestamp,
            &distribution_series,
            focus,
            stats.avg_max_drawdown,
        );
        let diagnostics =
            build_diagnostics(&matches, response.effective_sample_size, candles.len());

        tracing::debug!(
            focus = %focus,
            sample_size = stats.sample_size,
            quality = diagnostics.quality_score,
            "Focus pack assembled."
        );

        Ok(FocusPack {
            meta: FocusPackMeta {
                symbol: symbol.to_string(),
                asof: Utc::now(),
                focus,
                tier: focus.tier(),
                window_len: cfg.window_len,
                aftermath_days: cfg.aftermath_days,
                contract_version: CONTRACT_VERSION.to_string(),
            },
            overlay: OverlayPack {
                focus,
                window_len: cfg.window_len,
                aftermath_days: cfg.aftermath_days,
                current_window: normalize_base100(&current_window_raw),
                matches,
                distribution_series,
                stats,
            },
            forecast,
            diagnostics,
        })
    }

    /// Builds every horizon concurrently and joins the results.
    pub async fn build_all(&self, symbol: &str) -> Result<AllHorizonsResult, FocusError> {
        if symbol != SUPPORTED_SYMBOL {
            return Err(FocusError::BtcOnly(symbol.to_string()));
        }

        let results = join_all(
            HorizonKey::ALL
                .iter()
                .map(|focus| async move { (*focus, self.build(symbol, *focus).await) }),
        )
        .await;

        let mut horizons = Vec::new();
        let mut packs = BTreeMap::new();
        let mut errors = Vec::new();
        for (focus, result) in results {
            match result {
                Ok(pack) => {
                    horizons.push(focus);
                    packs.insert(focus.as_str().to_string(), pack);
                }
                Err(err) => errors.push(format!("{focus}: {err}")),
            }
        }

        Ok(AllHorizonsResult {
            ok: errors.is_empty(),
            horizons,
            packs,
            errors,
        })
    }

    /// Checks the fixed-length distribution contract for every horizon.
    pub async fn validate(&self, symbol: &str) -> Result<ValidationReport, FocusError> {
        let all = self.build_all(symbol).await?;

        let mut validations = Vec::with_capacity(HorizonKey::ALL.len());
        for focus in HorizonKey::ALL {
            let aftermath_days = focus.config().aftermath_days;
            let p50_len = all
                .packs
                .get(focus.as_str())
                .map(|pack| pack.overlay.distribution_series.p50.len())
                .unwrap_or(0);
            validations.push(HorizonValidation {
                horizon: focus,
                aftermath_days,
                p50_len,
                valid: p50_len == aftermath_days,
            });
        }

        let failed = validations.iter().filter(|v| !v.valid).count();
        Ok(ValidationReport {
            ok: failed == 0,
            message: if failed == 0 {
                "all horizons satisfy the distribution length contract".to_string()
            } else {
                format!("{failed} horizon(s) failed validation")
            },
            validations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stability::FixedStability;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use core_types::{Candle, RawMatch};
    use providers::{CandleSourceError, MatcherError};

    struct StaticCandles(Vec<Candle>);

    #[async_trait]
    impl CandleSource for StaticCandles {
        async fn fetch(
            &self,
            _symbol: &str,
            _timeframe: &str,
            _min_count: usize,
        ) -> Result<Vec<Candle>, CandleSourceError> {
            Ok(self.0.clone())
        }
    }

    /// A matcher returning fixed start offsets (in days from series start).
    struct StaticMatcher {
        start_days: Vec<i64>,
        effective: Option<usize>,
    }

    #[async_trait]
    impl AnalogMatcher for StaticMatcher {
        fn supported_window_lens(&self) -> &[usize] {
            &[30, 60, 90]
        }

        async fn find_matches(&self, _query: &MatchQuery) -> Result<MatchResponse, MatcherError> {
            let base = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
            Ok(MatchResponse {
                matches: self
                    .start_days
                    .iter()
                    .map(|d| RawMatch {
                        start_timestamp: base + Duration::days(*d),
                        similarity: 0.9,
                    })
                    .collect(),
                effective_sample_size: self.effective,
            })
        }
    }

    struct FailingMatcher;

    #[async_trait]
    impl AnalogMatcher for FailingMatcher {
        fn supported_window_lens(&self) -> &[usize] {
            &[30, 60, 90]
        }

        async fn find_matches(&self, _query: &MatchQuery) -> Result<MatchResponse, MatcherError> {
            Err(MatcherError::Backend("engine offline".to_string()))
        }
    }

    fn flat_candles(count: usize, close: f64) -> Vec<Candle> {
        let base = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
        (0..count)
            .map(|i| Candle {
                timestamp: base + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1.0,
            })
            .collect()
    }

    fn builder_with(
        candles: Vec<Candle>,
        matcher: Arc<dyn AnalogMatcher>,
    ) -> FocusPackBuilder {
        FocusPackBuilder::new(
            Arc::new(StaticCandles(candles)),
            matcher,
            Arc::new(FixedStability(0.9)),
            BuilderSettings::default(),
        )
    }

    #[tokio::test]
    async fn non_btc_symbol_is_rejected_before_any_data_access() {
        let builder = builder_with(
            vec![],
            Arc::new(StaticMatcher {
                start_days: vec![],
                effective: None,
            }),
        );
        let err = builder.build("ETH", HorizonKey::D30).await.unwrap_err();
        assert!(matches!(err, FocusError::BtcOnly(ref s) if s == "ETH"));
        // Lowercase is not the supported symbol either.
        let err = builder.build("btc", HorizonKey::D7).await.unwrap_err();
        assert!(matches!(err, FocusError::BtcOnly(_)));
    }

    #[tokio::test]
    async fn short_history_aborts_with_required_and_actual_counts() {
        let builder = builder_with(
            flat_candles(120, 100.0),
            Arc::new(StaticMatcher {
                start_days: vec![],
                effective: None,
            }),
        );
        let err = builder.build("BTC", HorizonKey::D30).await.unwrap_err();
        assert_eq!(err.to_string(), "need 400, got 120");
    }

    #[tokio::test]
    async fn matcher_failure_degrades_to_an_empty_sample() {
        let builder = builder_with(flat_candles(500, 100.0), Arc::new(FailingMatcher));
        let pack = builder.build("BTC", HorizonKey::D30).await.unwrap();
        assert_eq!(pack.overlay.stats.sample_size, 0);
        assert_eq!(pack.diagnostics.sample_size, 0);
        assert!(pack.diagnostics.quality_score.is_finite());
        assert!(pack.diagnostics.quality_score < 0.2);
        // Distribution arrays keep their fixed length and stay all-zero.
        assert_eq!(pack.overlay.distribution_series.p50.len(), 30);
        assert!(pack
            .overlay
            .distribution_series
            .p50
            .iter()
            .all(|v| *v == 0.0));
    }

    #[tokio::test]
    async fn flat_series_regression_forecast_is_a_zero_move() {
        let builder = builder_with(
            flat_candles(500, 40_000.0),
            Arc::new(StaticMatcher {
                start_days: vec![0, 60, 120, 180],
                effective: Some(4),
            }),
        );
        let pack = builder.build("BTC", HorizonKey::D30).await.unwrap();

        assert_eq!(pack.overlay.stats.sample_size, 4);
        for m in &pack.overlay.matches {
            // Zero variance on both sides of the comparison.
            assert_eq!(m.volatility_match, 1.0);
        }
        assert_eq!(pack.forecast.path.len(), 30);
        for price in &pack.forecast.path {
            assert_eq!(*price, 40_000.0);
        }
        assert_eq!(pack.forecast.current_price, 40_000.0);
    }

    #[tokio::test]
    async fn meta_reports_the_requested_window_length() {
        let builder = builder_with(
            flat_candles(500, 100.0),
            Arc::new(StaticMatcher {
                start_days: vec![0],
                effective: None,
            }),
        );
        let pack = builder.build("BTC", HorizonKey::D30).await.unwrap();
        // 30d requests a 45-candle window; the matcher only supports 30/60/90
        // and resolution must not leak into the contract.
        assert_eq!(pack.meta.window_len, 45);
        assert_eq!(pack.overlay.window_len, 45);
        assert_eq!(pack.meta.contract_version, CONTRACT_VERSION);
        assert_eq!(pack.meta.aftermath_days, 30);
        // The matching itself used the resolved length.
        assert_eq!(pack.overlay.current_window.len(), 30);
        assert_eq!(pack.overlay.current_window[0], 100.0);
    }

    #[tokio::test]
    async fn build_all_is_ok_only_with_zero_errors() {
        // 1300 candles clear min_history for every horizon.
        let builder = builder_with(
            flat_candles(1300, 100.0),
            Arc::new(StaticMatcher {
                start_days: vec![0, 100],
                effective: None,
            }),
        );
        let all = builder.build_all("BTC").await.unwrap();
        assert!(all.ok);
        assert_eq!(all.horizons.len(), 6);
        assert_eq!(all.packs.len(), 6);
        assert!(all.errors.is_empty());

        // 700 candles satisfy only the first four horizons; the aggregate
        // flag degrades but the successes are still returned.
        let builder = builder_with(
            flat_candles(700, 100.0),
            Arc::new(StaticMatcher {
                start_days: vec![0, 100],
                effective: None,
            }),
        );
        let partial = builder.build_all("BTC").await.unwrap();
        assert!(!partial.ok);
        assert_eq!(partial.horizons.len(), 4);
        assert_eq!(partial.errors.len(), 2);
        assert!(partial.errors.iter().any(|e| e.contains("need 900")));
    }

    #[tokio::test]
    async fn build_all_rejects_non_btc_outright() {
        let builder = builder_with(
            flat_candles(1300, 100.0),
            Arc::new(StaticMatcher {
                start_days: vec![0],
                effective: None,
            }),
        );
        assert!(matches!(
            builder.build_all("DOGE").await,
            Err(FocusError::BtcOnly(_))
        ));
    }

    #[tokio::test]
    async fn validation_report_confirms_length_contract() {
        let builder = builder_with(
            flat_candles(1300, 100.0),
            Arc::new(StaticMatcher {
                start_days: vec![0, 100],
                effective: None,
            }),
        );
        let report = builder.validate("BTC").await.unwrap();
        assert!(report.ok);
        assert_eq!(report.validations.len(), 6);
        for v in &report.validations {
            assert!(v.valid);
            assert_eq!(v.p50_len, v.aftermath_days);
        }
    }
}
