//! # Fractal Focus-Pack Pipeline
//!
//! This crate builds focus packs: empirical forward-outcome distributions
//! derived from historically similar price windows, turned into a forecast
//! plus a data-quality diagnostic.
//!
//! ## Architectural Principles
//!
//! - **Pure pipeline:** every stage is a stateless function over its inputs.
//!   The only I/O happens through the `CandleSource` and `AnalogMatcher`
//!   seams in the `providers` crate.
//! - **Degrade, don't abort:** a matcher failure reduces the sample to zero
//!   but still yields a pack; only missing history or a bad request aborts.
//!
//! ## Public API
//!
//! - `FocusPackBuilder`: the assembler orchestrating one build per request.
//! - Stage functions (`enrich_matches`, `build_distribution`,
//!   `build_forecast`, `build_diagnostics`) for direct use in tests.
//! - `FocusError`: the pipeline's error taxonomy.

pub mod builder;
pub mod diagnostics;
pub mod distribution;
pub mod enrich;
pub mod error;
pub mod forecast;
pub mod resolver;
pub mod stability;

// Re-export the key components to create a clean, public-facing API.
pub use builder::{AllHorizonsResult, BuilderSettings, FocusPackBuilder, ValidationReport};
pub use diagnostics::build_diagnostics;
pub use distribution::{build_distribution, build_stats};
pub use enrich::{enrich_matches, normalize_base100, EnrichParams};
pub use error::FocusError;
pub use forecast::build_forecast;
pub use resolver::resolve_window_len;
pub use stability::{FixedStability, RandomStability, StabilityScorer};
