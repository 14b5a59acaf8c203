//! Heuristics configuration loading.
//!
//! Configuration is layered with the `config` crate: an optional file (format
//! picked from its extension), then `FLOWSCOPE__`-prefixed environment
//! variables, e.g. `FLOWSCOPE__FAN_IN__THRESHOLD=3`. Anything not set keeps
//! its default.

use flowscope_analysis::HeuristicsConfig;
use std::path::Path;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "FLOWSCOPE";

/// Loads heuristics from an optional file plus the environment.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed, or a value has the
/// wrong type.
pub fn load_heuristics(file: Option<&Path>) -> Result<HeuristicsConfig, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = file {
        builder = builder.add_source(config::File::from(path).required(true));
    }
    builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn toml_file_overrides_named_fields() {
        let file = write_temp(
            ".toml",
            "[fan_in]\nthreshold = 3\n\n[long_chain]\nhigh_above = 20\n",
        );
        let config = load_heuristics(Some(file.path())).expect("load");
        assert_eq!(config.fan_in.threshold, 3);
        assert_eq!(config.fan_in.high_above, 4);
        assert_eq!(config.long_chain.high_above, 20);
        assert_eq!(config.external_calls.rate_limit_threshold, 3);
    }

    #[test]
    fn json_file_is_accepted() {
        let file = write_temp(".json", r#"{"similarity": {"max_edit_distance": 2}}"#);
        let config = load_heuristics(Some(file.path())).expect("load");
        assert_eq!(config.similarity.max_edit_distance, 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let result = load_heuristics(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }
}
