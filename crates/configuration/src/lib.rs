use crate::error::ConfigError;
use crate::settings::Settings;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DataSettings, MatcherSettings, ServerSettings, Settings as Config};

/// Loads the application configuration from a TOML file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Settings`
/// struct, validates it, and returns it.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(body: &str) -> tempfile_path::TempPath {
        tempfile_path::write_temp(body)
    }

    // Minimal scratch-file helper so the tests do not need an extra crate.
    mod tempfile_path {
        use std::io::Write;
        use std::path::PathBuf;

        pub struct TempPath(pub PathBuf);

        impl Drop for TempPath {
            fn drop(&mut self) {
                let _ = std::fs::remove_file(&self.0);
            }
        }

        pub fn write_temp(body: &str) -> TempPath {
            let mut path = std::env::temp_dir();
            let unique = format!(
                "fractal-config-test-{}-{:?}.toml",
                std::process::id(),
                std::thread::current().id()
            );
            path.push(unique);
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(body.as_bytes()).unwrap();
            TempPath(path)
        }
    }

    const VALID: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 3000

        [data]
        symbol = "BTC"
        timeframe = "1d"
        candles_path = "data/btc_daily.json"

        [matcher]
        oversample_factor = 2
    "#;

    #[test]
    fn loads_a_valid_config() {
        let tmp = write_config(VALID);
        let settings = load_settings(&tmp.0).unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.data.symbol, "BTC");
        assert_eq!(settings.matcher.oversample_factor, 2);
    }

    #[test]
    fn rejects_zero_oversample() {
        let tmp = write_config(&VALID.replace("oversample_factor = 2", "oversample_factor = 0"));
        let err = load_settings(&tmp.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOversample(0)));
        assert!(err.to_string().contains("oversample_factor"));
    }

    #[test]
    fn rejects_empty_symbol() {
        let tmp = write_config(&VALID.replace("symbol = \"BTC\"", "symbol = \"\""));
        let err = load_settings(&tmp.0).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSymbol));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_settings(Path::new("/nonexistent/fractal.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
