use chrono::{DateTime, Utc};
use core_types::{DistributionSeries, ForecastMarker, ForecastPack, HorizonKey};

/// Converts percentile bands into absolute-price paths, bands, markers and a
/// tail-risk floor.
///
/// The upper/lower bands sit halfway between the quartile and the decile, so
/// they widen with the outcome spread without being pinned to the extremes.
pub fn build_forecast(
    current_price: f64,
    start_ts: DateTime<Utc>,
    distribution: &DistributionSeries,
    focus: HorizonKey,
    avg_max_drawdown: f64,
) -> ForecastPack {
    let n = distribution.p50.len();

    let path: Vec<f64> = distribution
        .p50
        .iter()
        .map(|p50| current_price * (1.0 + p50))
        .collect();
    let upper_band: Vec<f64> = (0..n)
        .map(|i| {
            current_price
                * (1.0 + distribution.p75[i] + 0.5 * (distribution.p90[i] - distribution.p75[i]))
        })
        .collect();
    let lower_band: Vec<f64> = (0..n)
        .map(|i| {
            current_price
                * (1.0 + distribution.p25[i] - 0.5 * (distribution.p25[i] - distribution.p10[i]))
        })
        .collect();

    // Linear fade from full confidence at day 0 down to zero at the last
    // day of the aftermath.
    let confidence_decay: Vec<f64> = (0..n)
        .map(|i| {
            if n <= 1 {
                1.0
            } else {
                (1.0 - i as f64 / (n - 1) as f64).max(0.0)
            }
        })
        .collect();

    let focus_days = focus.days();
    let markers: Vec<ForecastMarker> = HorizonKey::ALL
        .iter()
        .filter(|key| key.days() <= focus_days && n > 0)
        .map(|key| {
            let days = key.days();
            let day_index = (days - 1).min(n - 1);
            let expected_return = distribution.p50[day_index];
            ForecastMarker {
                horizon: *key,
                days,
                day_index,
                expected_return,
                price: current_price * (1.0 + expected_return),
            }
        })
        .collect();

    ForecastPack {
        path,
        upper_band,
        lower_band,
        confidence_decay,
        markers,
        tail_floor: current_price * (1.0 - avg_max_drawdown.abs()),
        current_price,
        start_ts,
    }
}
