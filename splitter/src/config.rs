//! Runtime settings read from the environment.
//!
//! Values come from process environment variables, after loading a `.env`
//! file if one is present. Command-line flags override them.
//!
//! | Variable                      | Default     |
//! |-------------------------------|-------------|
//! | `CSVSPLIT_OUTPUT_SUFFIX`      | `_modified` |
//! | `CSVSPLIT_INTERACTIVE_SUFFIX` | `_split`    |
//! | `CSVSPLIT_SAMPLE_ROWS`        | `3`         |
//! | `CSVSPLIT_STRICT`             | `false`     |
//! | `CSVSPLIT_LOG`                | `warn`      |

use std::env;

/// Suffix added to the input stem for `split` output.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_modified";

/// Suffix added to the input stem for interactive output.
pub const DEFAULT_INTERACTIVE_SUFFIX: &str = "_split";

/// Rows shown in inspection samples.
pub const DEFAULT_SAMPLE_ROWS: usize = 3;

/// Tracing filter used when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings shared by all commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output_suffix: String,
    pub interactive_suffix: String,
    pub sample_rows: usize,
    /// Reject rows longer than the header
    pub strict: bool,
    pub log_filter: String,
    /// Problems with the environment values, reported once logging is up
    pub warnings: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            interactive_suffix: DEFAULT_INTERACTIVE_SUFFIX.to_string(),
            sample_rows: DEFAULT_SAMPLE_ROWS,
            strict: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            warnings: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from the environment and an optional `.env` file.
    pub fn from_env() -> Self {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Unparsable values keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut warnings = Vec::new();

        let sample_rows = match lookup("CSVSPLIT_SAMPLE_ROWS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warnings.push(format!(
                    "Ignoring invalid CSVSPLIT_SAMPLE_ROWS '{}', using {}",
                    raw, defaults.sample_rows
                ));
                defaults.sample_rows
            }),
            None => defaults.sample_rows,
        };

        Self {
            output_suffix: lookup("CSVSPLIT_OUTPUT_SUFFIX").unwrap_or(defaults.output_suffix),
            interactive_suffix: lookup("CSVSPLIT_INTERACTIVE_SUFFIX")
                .unwrap_or(defaults.interactive_suffix),
            sample_rows,
            strict: lookup("CSVSPLIT_STRICT").map(|v| parse_flag(&v)).unwrap_or(defaults.strict),
            log_filter: lookup("CSVSPLIT_LOG").unwrap_or(defaults.log_filter),
            warnings,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.output_suffix, "_modified");
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("CSVSPLIT_OUTPUT_SUFFIX", "_out"),
            ("CSVSPLIT_SAMPLE_ROWS", "10"),
            ("CSVSPLIT_STRICT", "TRUE"),
        ]));

        assert_eq!(settings.output_suffix, "_out");
        assert_eq!(settings.sample_rows, 10);
        assert!(settings.strict);
    }

    #[test]
    fn test_invalid_sample_rows_falls_back() {
        let settings = Settings::from_lookup(lookup(&[("CSVSPLIT_SAMPLE_ROWS", "many")]));
        assert_eq!(settings.sample_rows, DEFAULT_SAMPLE_ROWS);
        assert_eq!(settings.warnings.len(), 1);
        assert!(settings.warnings[0].contains("CSVSPLIT_SAMPLE_ROWS 'many'"));
    }
}
