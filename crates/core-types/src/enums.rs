use crate::error::CoreError;
use crate::structs::HorizonConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of forward-looking horizons the terminal understands.
///
/// Every horizon carries a compile-time `HorizonConfig` (see [`HorizonKey::config`]),
/// so there is no runtime registry to misconfigure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HorizonKey {
    #[serde(rename = "7d")]
    D7,
    #[serde(rename = "14d")]
    D14,
    #[serde(rename = "30d")]
    D30,
    #[serde(rename = "90d")]
    D90,
    #[serde(rename = "180d")]
    D180,
    #[serde(rename = "365d")]
    D365,
}

impl HorizonKey {
    /// All horizons, in ascending order. This is the "extended" set the
    /// all-horizons build iterates over.
    pub const ALL: [HorizonKey; 6] = [
        HorizonKey::D7,
        HorizonKey::D14,
        HorizonKey::D30,
        HorizonKey::D90,
        HorizonKey::D180,
        HorizonKey::D365,
    ];

    /// The forward offsets (in days) used for per-match outcome returns and
    /// forecast markers, ascending.
    pub const OUTCOME_DAYS: [usize; 6] = [7, 14, 30, 90, 180, 365];

    /// Returns the immutable configuration row for this horizon.
    pub const fn config(self) -> HorizonConfig {
        match self {
            HorizonKey::D7 => HorizonConfig {
                window_len: 20,
                aftermath_days: 7,
                top_k: 20,
                min_history: 180,
            },
            HorizonKey::D14 => HorizonConfig {
                window_len: 30,
                aftermath_days: 14,
                top_k: 18,
                min_history: 240,
            },
            HorizonKey::D30 => HorizonConfig {
                window_len: 45,
                aftermath_days: 30,
                top_k: 15,
                min_history: 400,
            },
            HorizonKey::D90 => HorizonConfig {
                window_len: 60,
                aftermath_days: 90,
                top_k: 12,
                min_history: 600,
            },
            HorizonKey::D180 => HorizonConfig {
                window_len: 90,
                aftermath_days: 180,
                top_k: 10,
                min_history: 900,
            },
            HorizonKey::D365 => HorizonConfig {
                window_len: 120,
                aftermath_days: 365,
                top_k: 8,
                min_history: 1200,
            },
        }
    }

    /// The number of forward days this horizon looks ahead.
    pub const fn days(self) -> usize {
        self.config().aftermath_days
    }

    pub const fn tier(self) -> HorizonTier {
        match self {
            HorizonKey::D7 | HorizonKey::D14 => HorizonTier::Timing,
            HorizonKey::D30 | HorizonKey::D90 => HorizonTier::Tactical,
            HorizonKey::D180 | HorizonKey::D365 => HorizonTier::Structure,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            HorizonKey::D7 => "7d",
            HorizonKey::D14 => "14d",
            HorizonKey::D30 => "30d",
            HorizonKey::D90 => "90d",
            HorizonKey::D180 => "180d",
            HorizonKey::D365 => "365d",
        }
    }

    /// The valid horizon keys, for error messages listing the accepted set.
    pub fn valid_keys() -> Vec<&'static str> {
        Self::ALL.iter().map(|h| h.as_str()).collect()
    }
}

impl fmt::Display for HorizonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HorizonKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(HorizonKey::D7),
            "14d" => Ok(HorizonKey::D14),
            "30d" => Ok(HorizonKey::D30),
            "90d" => Ok(HorizonKey::D90),
            "180d" => Ok(HorizonKey::D180),
            "365d" => Ok(HorizonKey::D365),
            other => Err(CoreError::InvalidHorizon(other.to_string())),
        }
    }
}

/// Grouping of horizons by how a desk uses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizonTier {
    /// Short-lived entries and exits (7d, 14d).
    Timing,
    /// Swing positioning (30d, 90d).
    Tactical,
    /// Regime-level allocation (180d, 365d).
    Structure,
}

/// Market phase of a historical window, classified from 20/50-day trailing
/// moving averages at the window end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketPhase {
    /// Fewer than 50 preceding candles; no classification possible.
    Unknown,
    /// Price more than 5% above both averages.
    Markup,
    /// Price more than 5% below both averages.
    Markdown,
    /// Price above the 20-day but below the 50-day average.
    Recovery,
    /// Price below the 20-day but above the 50-day average.
    Distribution,
    /// Everything else: price inside the band around both averages.
    Accumulation,
}

/// Coarse directional read of an outcome distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Bull,
    Bear,
    Neutral,
}

impl Direction {
    /// Classifies a fractional return with a +/-1% neutral band.
    pub fn from_return(ret: f64) -> Self {
        if ret > 0.01 {
            Direction::Bull
        } else if ret < -0.01 {
            Direction::Bear
        } else {
            Direction::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_round_trips_through_str() {
        for key in HorizonKey::ALL {
            assert_eq!(key.as_str().parse::<HorizonKey>().unwrap(), key);
        }
    }

    #[test]
    fn unknown_horizon_is_rejected() {
        assert!("3d".parse::<HorizonKey>().is_err());
        assert!("".parse::<HorizonKey>().is_err());
    }

    #[test]
    fn tiers_cover_all_horizons() {
        assert_eq!(HorizonKey::D7.tier(), HorizonTier::Timing);
        assert_eq!(HorizonKey::D14.tier(), HorizonTier::Timing);
        assert_eq!(HorizonKey::D30.tier(), HorizonTier::Tactical);
        assert_eq!(HorizonKey::D90.tier(), HorizonTier::Tactical);
        assert_eq!(HorizonKey::D180.tier(), HorizonTier::Structure);
        assert_eq!(HorizonKey::D365.tier(), HorizonTier::Structure);
    }

    #[test]
    fn registry_rows_are_internally_consistent() {
        for key in HorizonKey::ALL {
            let cfg = key.config();
            // A horizon must always be able to fit one window plus its
            // aftermath inside the minimum required history.
            assert!(cfg.min_history >= cfg.window_len + cfg.aftermath_days);
            assert!(cfg.top_k > 0);
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&HorizonKey::D30).unwrap();
        assert_eq!(json, "\"30d\"");
        let back: HorizonKey = serde_json::from_str("\"180d\"").unwrap();
        assert_eq!(back, HorizonKey::D180);
    }

    #[test]
    fn direction_neutral_band() {
        assert_eq!(Direction::from_return(0.05), Direction::Bull);
        assert_eq!(Direction::from_return(-0.05), Direction::Bear);
        assert_eq!(Direction::from_return(0.004), Direction::Neutral);
        assert_eq!(Direction::from_return(0.0), Direction::Neutral);
    }
}
