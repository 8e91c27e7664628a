use crate::error::MatcherError;
use crate::{AnalogMatcher, MatchQuery, MatchResponse};
use async_trait::async_trait;
use core_types::{Candle, RawMatch};
use std::cmp::Ordering;

/// The window lengths the built-in matcher can search for, in canonical
/// order. Ties during window resolution are broken toward the earlier entry.
pub const SUPPORTED_WINDOW_LENS: [usize; 3] = [30, 60, 90];

/// A built-in analog search engine: slides a window over the stored history
/// and ranks candidates by how closely their base-100 shape tracks the
/// current window.
///
/// This is deliberately a plain brute-force scanner. It exists so the
/// terminal runs self-contained; a production deployment can swap in a
/// remote engine behind the same [`AnalogMatcher`] trait.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    symbol: String,
    candles: Vec<Candle>,
}

impl PatternMatcher {
    pub fn new(symbol: impl Into<String>, candles: Vec<Candle>) -> Self {
        Self {
            symbol: symbol.into(),
            candles,
        }
    }

    /// Rescales a close slice so its first value is 100. A zero first value
    /// degenerates to a flat line at 100.
    fn base100(slice: &[f64]) -> Vec<f64> {
        let first = slice.first().copied().unwrap_or(0.0);
        if first == 0.0 {
            return vec![100.0; slice.len()];
        }
        slice.iter().map(|v| v / first * 100.0).collect()
    }

    /// Root-mean-square distance between two equal-length base-100 shapes,
    /// mapped into a (0, 1] similarity score.
    fn similarity(current: &[f64], candidate: &[f64]) -> f64 {
        let n = current.len().min(candidate.len());
        if n == 0 {
            return 0.0;
        }
        let sq_sum: f64 = current
            .iter()
            .zip(candidate)
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        let rmse = (sq_sum / n as f64).sqrt();
        1.0 / (1.0 + rmse / 10.0)
    }

    /// Counts how many of the ranked candidates are mutually non-overlapping
    /// (greedy, best-first). Overlapping windows sample the same episode and
    /// carry little independent information.
    fn effective_sample_size(ranked: &[(usize, f64)], window_len: usize) -> usize {
        let mut kept: Vec<usize> = Vec::new();
        for &(start, _) in ranked {
            if kept
                .iter()
                .all(|&k| start.abs_diff(k) >= window_len)
            {
                kept.push(start);
            }
        }
        kept.len()
    }
}

#[async_trait]
impl AnalogMatcher for PatternMatcher {
    fn supported_window_lens(&self) -> &[usize] {
        &SUPPORTED_WINDOW_LENS
    }

    async fn find_matches(&self, query: &MatchQuery) -> Result<MatchResponse, MatcherError> {
        if !query.symbol.eq_ignore_ascii_case(&self.symbol) {
            return Err(MatcherError::UnknownSymbol(query.symbol.clone()));
        }
        if !SUPPORTED_WINDOW_LENS.contains(&query.window_len) {
            return Err(MatcherError::UnsupportedWindowLen(query.window_len));
        }

        let w = query.window_len;
        let closes: Vec<f64> = self.candles.iter().map(|c| c.close).collect();
        let n = closes.len();
        if n < 2 * w {
            // Not enough history to form one candidate plus the current
            // window; an empty result, not an error.
            return Ok(MatchResponse::default());
        }

        let current = Self::base100(&closes[n - w..]);

        // Candidate windows must end before the current window starts, so a
        // match never overlaps the pattern it is being compared against.
        // Stride keeps adjacent near-duplicates out of the ranking.
        let stride = (w / 8).max(1);
        let last_start = n - 2 * w;
        let mut scored: Vec<(usize, f64)> = (0..=last_start)
            .step_by(stride)
            .map(|start| {
                let candidate = Self::base100(&closes[start..start + w]);
                (start, Self::similarity(&current, &candidate))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(query.candidate_count);

        let effective = Self::effective_sample_size(&scored, w);
        let matches = scored
            .into_iter()
            .map(|(start, similarity)| RawMatch {
                start_timestamp: self.candles[start].timestamp,
                similarity,
            })
            .collect();

        tracing::debug!(
            window_len = w,
            forward_horizon = query.forward_horizon,
            requested = query.candidate_count,
            effective,
            "Analog scan complete."
        );

        Ok(MatchResponse {
            matches,
            effective_sample_size: Some(effective),
        })
    }
}
