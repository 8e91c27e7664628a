pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Direction, HorizonKey, HorizonTier, MarketPhase};
pub use error::CoreError;
pub use structs::{
    Candle, DistributionSeries, FocusPack, FocusPackDiagnostics, FocusPackMeta, ForecastMarker,
    ForecastPack, HorizonConfig, OutcomeReturns, OverlayMatch, OverlayPack, OverlayStats, RawMatch,
};

/// The contract version stamped on every focus pack. Consumers pin their
/// parsers against this string.
pub const CONTRACT_VERSION: &str = "v2.1.0";
