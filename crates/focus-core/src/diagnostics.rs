use core_types::{FocusPackDiagnostics, OverlayMatch};

/// Scores sample adequacy, outcome uncertainty, reliability and overall data
/// quality for one pack. Every scalar is bounded and rounded to three
/// decimals on output.
pub fn build_diagnostics(
    matches: &[OverlayMatch],
    matcher_effective: Option<usize>,
    total_candles: usize,
) -> FocusPackDiagnostics {
    let sample_size = matches.len();
    let win_rate = if sample_size == 0 {
        0.0
    } else {
        matches.iter().filter(|m| m.ret > 0.0).count() as f64 / sample_size as f64
    };

    // Symmetric uncertainty: 1.0 at a 50/50 hit rate, 0.0 at either extreme.
    // Not information-theoretic entropy, despite the name.
    let entropy = 1.0 - (2.0 * win_rate - 1.0).abs();

    let effective_n = match matcher_effective {
        Some(reported) => sample_size.min(reported),
        None => sample_size,
    };
    let reliability = (effective_n as f64 / 20.0).min(1.0) * (1.0 - entropy * 0.3);

    let coverage_years = total_candles as f64 / 365.0;

    // Sample adequacy saturates at 10 matches, coverage at 5 years.
    let sample_term = (sample_size as f64 / 10.0).min(1.0);
    let coverage_term = (coverage_years / 5.0).min(1.0);
    let quality_score =
        (0.3 * sample_term + 0.4 * reliability + 0.3 * coverage_term).min(1.0);

    FocusPackDiagnostics {
        sample_size,
        effective_n,
        entropy: round3(entropy),
        reliability: round3(reliability),
        coverage_years: round3(coverage_years),
        quality_score: round3(quality_score),
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
