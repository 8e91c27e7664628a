use rand::Rng;

/// Scoring seam for the per-match stability heuristic.
///
/// The production score is a bounded placeholder, not a data-derived
/// invariant: it exists so the UI has a stable-looking confidence cell while
/// a real regime-persistence model is pending. Tests inject
/// [`FixedStability`] to keep packs deterministic.
pub trait StabilityScorer: Send + Sync {
    fn score(&self, window_normalized: &[f64], aftermath_normalized: &[f64]) -> f64;
}

/// The default scorer: uniform in `[0.85, 0.95)`, independent of the inputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomStability;

impl StabilityScorer for RandomStability {
    fn score(&self, _window_normalized: &[f64], _aftermath_normalized: &[f64]) -> f64 {
        rand::thread_rng().gen_range(0.85..0.95)
    }
}

/// A deterministic scorer returning a fixed value. Test-only in spirit, but
/// also useful for callers that want the heuristic pinned.
#[derive(Debug, Clone, Copy)]
pub struct FixedStability(pub f64);

impl StabilityScorer for FixedStability {
    fn score(&self, _window_normalized: &[f64], _aftermath_normalized: &[f64]) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_stability_stays_in_bounds() {
        let scorer = RandomStability;
        for _ in 0..200 {
            let s = scorer.score(&[], &[]);
            assert!((0.85..0.95).contains(&s));
        }
    }

    #[test]
    fn fixed_stability_is_deterministic() {
        let scorer = FixedStability(0.9);
        assert_eq!(scorer.score(&[1.0], &[2.0]), 0.9);
        assert_eq!(scorer.score(&[], &[]), 0.9);
    }
}
