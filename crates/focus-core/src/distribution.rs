use core_types::{Direction, DistributionSeries, OverlayMatch, OverlayStats};
use std::cmp::Ordering;

/// Aggregates enriched matches into day-indexed percentile bands.
///
/// The output arrays are always exactly `aftermath_days` long regardless of
/// sample size; days with no contributing match stay at 0.0. That
/// fixed-length contract is load-bearing for every downstream consumer.
pub fn build_distribution(matches: &[OverlayMatch], aftermath_days: usize) -> DistributionSeries {
    let mut series = DistributionSeries::zeroed(aftermath_days);

    for day in 0..aftermath_days {
        let mut values: Vec<f64> = matches
            .iter()
            .filter_map(|m| m.aftermath_normalized.get(day).copied())
            .collect();
        if values.is_empty() {
            continue;
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        series.p10[day] = nearest_rank(&values, 0.10);
        series.p25[day] = nearest_rank(&values, 0.25);
        series.p50[day] = nearest_rank(&values, 0.50);
        series.p75[day] = nearest_rank(&values, 0.75);
        series.p90[day] = nearest_rank(&values, 0.90);
    }

    series
}

/// Aggregate statistics over the surviving matches' full-aftermath returns.
pub fn build_stats(matches: &[OverlayMatch]) -> OverlayStats {
    if matches.is_empty() {
        return OverlayStats {
            median_return: 0.0,
            p10_return: 0.0,
            p90_return: 0.0,
            avg_max_drawdown: 0.0,
            hit_rate: 0.0,
            sample_size: 0,
            direction: Direction::Neutral,
        };
    }

    let mut returns: Vec<f64> = matches.iter().map(|m| m.ret).collect();
    returns.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let wins = matches.iter().filter(|m| m.ret > 0.0).count();
    let avg_max_drawdown =
        matches.iter().map(|m| m.max_drawdown).sum::<f64>() / matches.len() as f64;
    let median_return = nearest_rank(&returns, 0.50);

    OverlayStats {
        median_return,
        p10_return: nearest_rank(&returns, 0.10),
        p90_return: nearest_rank(&returns, 0.90),
        avg_max_drawdown,
        hit_rate: wins as f64 / matches.len() as f64,
        sample_size: matches.len(),
        direction: Direction::from_return(median_return),
    }
}

/// Nearest-rank percentile over an ascending slice: `floor(p * (n - 1))`.
fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    let index = (p * (sorted.len() - 1) as f64).floor() as usize;
    sorted[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{MarketPhase, OutcomeReturns};

    fn overlay_match(aftermath: Vec<f64>) -> OverlayMatch {
        let ret = aftermath.last().copied().unwrap_or(0.0);
        OverlayMatch {
            id: 0,
            similarity: 0.9,
            phase: MarketPhase::Unknown,
            volatility_match: 1.0,
            drawdown_shape: 1.0,
            stability: 0.9,
            window_normalized: vec![100.0],
            aftermath_normalized: aftermath,
            ret,
            max_drawdown: 0.1,
            max_excursion: 0.1,
            outcomes: OutcomeReturns::default(),
        }
    }

    #[test]
    fn arrays_always_have_aftermath_length() {
        let series = build_distribution(&[], 30);
        assert_eq!(series.p10.len(), 30);
        assert_eq!(series.p25.len(), 30);
        assert_eq!(series.p50.len(), 30);
        assert_eq!(series.p75.len(), 30);
        assert_eq!(series.p90.len(), 30);
        assert!(series.p50.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn percentiles_use_nearest_rank_indexing() {
        // Eleven matches, day-0 values 0.00 .. 0.10. With n = 11,
        // floor(p * 10) picks exact positions.
        let matches: Vec<OverlayMatch> = (0..11)
            .map(|i| overlay_match(vec![i as f64 / 100.0]))
            .collect();
        let series = build_distribution(&matches, 1);
        assert!((series.p10[0] - 0.01).abs() < 1e-12);
        assert!((series.p25[0] - 0.02).abs() < 1e-12);
        assert!((series.p50[0] - 0.05).abs() < 1e-12);
        assert!((series.p75[0] - 0.07).abs() < 1e-12);
        assert!((series.p90[0] - 0.09).abs() < 1e-12);
    }

    #[test]
    fn bands_are_ordered_wherever_a_match_contributes() {
        let matches: Vec<OverlayMatch> = (0..7)
            .map(|i| {
                overlay_match(
                    (0..20)
                        .map(|d| (i as f64 - 3.0) * 0.01 + d as f64 * 0.001)
                        .collect(),
                )
            })
            .collect();
        let series = build_distribution(&matches, 20);
        for day in 0..20 {
            assert!(series.p10[day] <= series.p25[day]);
            assert!(series.p25[day] <= series.p50[day]);
            assert!(series.p50[day] <= series.p75[day]);
            assert!(series.p75[day] <= series.p90[day]);
        }
    }

    #[test]
    fn short_aftermaths_stop_contributing_past_their_length() {
        // One match covers 5 days, the other only 2; days 2..5 are fed by a
        // single match, days beyond 5 by none.
        let matches = vec![
            overlay_match(vec![0.01, 0.02, 0.03, 0.04, 0.05]),
            overlay_match(vec![0.10, 0.20]),
        ];
        let series = build_distribution(&matches, 8);
        // Two contributors on day 1: floor(0.5 * 1) picks the lower value.
        assert!((series.p50[1] - 0.02).abs() < 1e-12);
        assert_eq!(series.p50[4], 0.05);
        assert_eq!(series.p50[5], 0.0);
        assert_eq!(series.p90[7], 0.0);
    }

    #[test]
    fn stats_zero_sample_is_all_zero_and_neutral() {
        let stats = build_stats(&[]);
        assert_eq!(stats.sample_size, 0);
        assert_eq!(stats.median_return, 0.0);
        assert_eq!(stats.hit_rate, 0.0);
        assert_eq!(stats.direction, Direction::Neutral);
    }

    #[test]
    fn stats_aggregate_returns_and_hit_rate() {
        let matches = vec![
            overlay_match(vec![0.10]),
            overlay_match(vec![-0.02]),
            overlay_match(vec![0.05]),
        ];
        let stats = build_stats(&matches);
        assert_eq!(stats.sample_size, 3);
        assert!((stats.median_return - 0.05).abs() < 1e-12);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(stats.direction, Direction::Bull);
        assert!((stats.avg_max_drawdown - 0.1).abs() < 1e-12);
    }
}
