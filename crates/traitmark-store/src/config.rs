//! traitmark configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use traitmark_core::interpretation::{InterpretationConfig, DEFAULT_SECONDARY_GAP};

/// Top-level traitmark configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitmarkConfig {
    /// Test file or directory of test files.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    /// Directory holding respondents and their results.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Maximum dominant/secondary distance for the secondary profile to be
    /// mentioned in interpretations.
    #[serde(default = "default_secondary_gap")]
    pub secondary_gap: f64,
}

fn default_catalog() -> PathBuf {
    PathBuf::from("./tests")
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./traitmark-data")
}
fn default_secondary_gap() -> f64 {
    DEFAULT_SECONDARY_GAP
}

impl Default for TraitmarkConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            data_dir: default_data_dir(),
            secondary_gap: default_secondary_gap(),
        }
    }
}

impl TraitmarkConfig {
    pub fn interpretation_config(&self) -> InterpretationConfig {
        InterpretationConfig {
            secondary_gap: self.secondary_gap,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables expand to the empty string. Substituted values are not
/// expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `traitmark.toml` in the current directory
/// 2. `~/.config/traitmark/config.toml`
///
/// Environment variable overrides: `TRAITMARK_CATALOG`, `TRAITMARK_DATA_DIR`.
pub fn load_config() -> Result<TraitmarkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TraitmarkConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("traitmark.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => TraitmarkConfig::default(),
    };

    if let Ok(catalog) = std::env::var("TRAITMARK_CATALOG") {
        config.catalog = PathBuf::from(catalog);
    }
    if let Ok(data_dir) = std::env::var("TRAITMARK_DATA_DIR") {
        config.data_dir = PathBuf::from(data_dir);
    }

    config.catalog = resolve_path(&config.catalog);
    config.data_dir = resolve_path(&config.data_dir);

    Ok(config)
}

/// Parse a configuration document.
pub fn parse_config(content: &str) -> Result<TraitmarkConfig> {
    let config: TraitmarkConfig = toml::from_str(content)?;
    if !config.secondary_gap.is_finite() || config.secondary_gap < 0.0 {
        anyhow::bail!(
            "secondary_gap must be a non-negative number, got {}",
            config.secondary_gap
        );
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("traitmark"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_TRAITMARK_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_TRAITMARK_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_TRAITMARK_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_TRAITMARK_UNSET_VAR}/x"), "/x");
        assert_eq!(resolve_env_vars("no_close_${VAR"), "no_close_${VAR");
        std::env::remove_var("_TRAITMARK_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_reexpand_values() {
        std::env::set_var("_TRAITMARK_SELF_REF", "${_TRAITMARK_SELF_REF}");
        assert_eq!(
            resolve_env_vars("a/${_TRAITMARK_SELF_REF}/b"),
            "a/${_TRAITMARK_SELF_REF}/b"
        );
        std::env::remove_var("_TRAITMARK_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = TraitmarkConfig::default();
        assert_eq!(config.catalog, PathBuf::from("./tests"));
        assert_eq!(config.data_dir, PathBuf::from("./traitmark-data"));
        assert_eq!(config.secondary_gap, 15.0);
        assert_eq!(config.interpretation_config().secondary_gap, 15.0);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
catalog = "assessments"
secondary_gap = 10
"#,
        )
        .unwrap();
        assert_eq!(config.catalog, PathBuf::from("assessments"));
        assert_eq!(config.data_dir, PathBuf::from("./traitmark-data"));
        assert_eq!(config.secondary_gap, 10.0);
    }

    #[test]
    fn negative_gap_is_rejected() {
        assert!(parse_config("secondary_gap = -1.0").is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traitmark.toml");
        std::fs::write(&path, "data_dir = \"${_TRAITMARK_DATA_ROOT}/results\"\n").unwrap();

        std::env::set_var("_TRAITMARK_DATA_ROOT", "/srv/traitmark");
        let config = load_config_from(Some(&path)).unwrap();
        std::env::remove_var("_TRAITMARK_DATA_ROOT");

        assert_eq!(config.data_dir, PathBuf::from("/srv/traitmark/results"));
    }
}
