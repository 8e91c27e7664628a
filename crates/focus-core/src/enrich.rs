use crate::stability::StabilityScorer;
use core_types::{Candle, HorizonKey, MarketPhase, OutcomeReturns, OverlayMatch, RawMatch};

/// Inputs shared by every candidate during one enrichment pass.
pub struct EnrichParams<'a> {
    /// Full ascending candle history.
    pub candles: &'a [Candle],
    /// Raw closes of the current pattern window (resolved length).
    pub current_window: &'a [f64],
    /// The matcher-supported window length the search actually used.
    pub resolved_window_len: usize,
    pub aftermath_days: usize,
    /// Cap on surviving matches.
    pub top_k: usize,
}

/// Turns raw matcher candidates into fully enriched overlay matches.
///
/// Candidates are processed in the matcher's ranking order and that order is
/// preserved; at most `top_k` survive. A candidate whose window-plus-aftermath
/// span does not fit inside the available history is dropped silently: that
/// reduces sample size, it is not an error.
pub fn enrich_matches(
    params: &EnrichParams<'_>,
    raw_matches: &[RawMatch],
    stability: &dyn StabilityScorer,
) -> Vec<OverlayMatch> {
    let w = params.resolved_window_len;
    let span = w + params.aftermath_days;
    let sigma_current = return_volatility(params.current_window);
    let dd_current = max_drawdown_magnitude(params.current_window);

    let mut survivors = Vec::with_capacity(params.top_k);
    for raw in raw_matches {
        if survivors.len() == params.top_k {
            break;
        }

        // First candle at or after the candidate's start timestamp.
        let start = params
            .candles
            .partition_point(|c| c.timestamp < raw.start_timestamp);
        if start >= params.candles.len() || start + span > params.candles.len() {
            continue;
        }

        let window: Vec<f64> = params.candles[start..start + w]
            .iter()
            .map(|c| c.close)
            .collect();
        let aftermath: Vec<f64> = params.candles[start + w..start + span]
            .iter()
            .map(|c| c.close)
            .collect();

        let window_normalized = normalize_base100(&window);
        // The aftermath is anchored to the window's last close so the two
        // series join continuously, not to the aftermath's own first value.
        let anchor = window.last().copied().unwrap_or(0.0);
        let aftermath_normalized = pct_change_series(&aftermath, anchor);

        let mut outcomes = OutcomeReturns::default();
        for days in HorizonKey::OUTCOME_DAYS {
            if days <= aftermath_normalized.len() {
                outcomes.set(days, aftermath_normalized[days - 1]);
            }
        }

        let stability_score = stability.score(&window_normalized, &aftermath_normalized);
        let ret = aftermath_normalized.last().copied().unwrap_or(0.0);

        survivors.push(OverlayMatch {
            id: survivors.len(),
            similarity: raw.similarity,
            phase: classify_phase(params.candles, start + w - 1),
            volatility_match: bounded_ratio(
                sigma_current,
                return_volatility(&window),
                0.0,
            ),
            drawdown_shape: bounded_ratio(dd_current, max_drawdown_magnitude(&window), 0.5),
            stability: stability_score,
            window_normalized,
            aftermath_normalized,
            ret,
            max_drawdown: max_drawdown_magnitude(&aftermath),
            max_excursion: max_excursion_magnitude(&aftermath),
            outcomes,
        });
    }

    survivors
}

/// Rescales a price slice so its first value equals exactly 100.
///
/// A zero first value would divide by zero; the whole series degenerates to
/// a flat line at 100 instead.
pub fn normalize_base100(slice: &[f64]) -> Vec<f64> {
    let first = slice.first().copied().unwrap_or(0.0);
    if first == 0.0 {
        return vec![100.0; slice.len()];
    }
    slice.iter().map(|v| v / first * 100.0).collect()
}

/// Fractional change of every value against a fixed base price.
fn pct_change_series(slice: &[f64], base: f64) -> Vec<f64> {
    if base == 0.0 {
        return vec![0.0; slice.len()];
    }
    slice.iter().map(|v| v / base - 1.0).collect()
}

/// Population standard deviation of the slice's daily returns.
fn return_volatility(closes: &[f64]) -> f64 {
    if closes.len() < 2 {
        return 0.0;
    }
    let returns: Vec<f64> = closes
        .windows(2)
        .map(|w| if w[0] == 0.0 { 0.0 } else { w[1] / w[0] - 1.0 })
        .collect();
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / returns.len() as f64;
    variance.sqrt()
}

/// Worst running-peak drawdown over the slice, as a positive fraction.
fn max_drawdown_magnitude(closes: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst: f64 = 0.0;
    for &close in closes {
        if close > peak {
            peak = close;
        }
        if peak > 0.0 {
            worst = worst.max((peak - close) / peak);
        }
    }
    worst
}

/// Best running-trough advance over the slice, as a positive fraction.
fn max_excursion_magnitude(closes: &[f64]) -> f64 {
    let mut trough = f64::MAX;
    let mut best: f64 = 0.0;
    for &close in closes {
        if close < trough {
            trough = close;
        }
        if trough > 0.0 {
            best = best.max((close - trough) / trough);
        }
    }
    best
}

/// `min/max` ratio of two non-negative magnitudes with explicit zero
/// conventions: 1.0 when both are exactly zero, `one_zero_value` when
/// exactly one is.
///
/// The volatility comparison uses `one_zero_value = 0.0`, the drawdown-shape
/// comparison uses `0.5`. The asymmetry is observed behavior, preserved
/// as-is pending product review.
fn bounded_ratio(a: f64, b: f64, one_zero_value: f64) -> f64 {
    match (a == 0.0, b == 0.0) {
        (true, true) => 1.0,
        (true, false) | (false, true) => one_zero_value,
        (false, false) => a.min(b) / a.max(b),
    }
}

/// Classifies market phase at `end_idx` from 20-day and 50-day trailing
/// moving averages of the close.
fn classify_phase(candles: &[Candle], end_idx: usize) -> MarketPhase {
    if end_idx + 1 < 50 || end_idx >= candles.len() {
        return MarketPhase::Unknown;
    }

    let mean = |len: usize| -> f64 {
        candles[end_idx + 1 - len..=end_idx]
            .iter()
            .map(|c| c.close)
            .sum::<f64>()
            / len as f64
    };
    let ma20 = mean(20);
    let ma50 = mean(50);
    let price = candles[end_idx].close;

    if price > ma20 * 1.05 && price > ma50 * 1.05 {
        MarketPhase::Markup
    } else if price < ma20 * 0.95 && price < ma50 * 0.95 {
        MarketPhase::Markdown
    } else if price > ma20 && price < ma50 {
        MarketPhase::Recovery
    } else if price < ma20 && price > ma50 {
        MarketPhase::Distribution
    } else {
        MarketPhase::Accumulation
    }
}
