//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `--config <PATH>`
//! 2. `$PADCALC_CONFIG` environment variable
//! 3. `<config dir>/padcalc/config.toml`
//! 4. Built-in defaults (everything is optional)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use padcalc_core::KeypadSettings;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keypad: KeypadSettings,
    pub display: DisplayConfig,
}

/// Display panel settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
    pub prompt: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            prompt: "calc".into(),
        }
    }
}

/// Load config from disk. Returns defaults if no config file exists.
///
/// An explicitly given path must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(p) = explicit {
        return read_config(p);
    }

    match config_path() {
        Some(p) if p.exists() => read_config(&p),
        _ => Ok(Config::default()),
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("PADCALC_CONFIG") {
        return Some(PathBuf::from(p));
    }

    ProjectDirs::from("", "", "padcalc").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.keypad.max_input, 14);
        assert_eq!(config.keypad.precision, 3);
        assert!(config.display.color);
        assert_eq!(config.display.prompt, "calc");
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[keypad]
precision = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.keypad.precision, 5);
        // Other fields should be defaults
        assert_eq!(config.keypad.max_input, 14);
        assert!(config.display.color);
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[keypad]
max_input = 20

[display]
color = false
prompt = "pad"
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.keypad.max_input, 20);
        assert_eq!(config.keypad.precision, 3);
        assert!(!config.display.color);
        assert_eq!(config.display.prompt, "pad");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().starts_with("reading "));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[keypad]\nmax_input = \"many\"").unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().starts_with("parsing "));
    }
}
