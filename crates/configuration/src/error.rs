use thiserror::Error;

/// Failures while loading or validating `config.toml`.
///
/// The validation variants carry the offending value so the startup log
/// pinpoints what to edit.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("matcher.oversample_factor must be at least 1, got {0}")]
    InvalidOversample(usize),

    #[error("data.symbol must not be empty")]
    MissingSymbol,
}
