//! Top-level querylens configuration with 4-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{BatchConfig, ExtractionConfig, ScoringConfig};
use crate::errors::ConfigError;

/// Name of the project-level config file.
pub const PROJECT_CONFIG_FILE: &str = "querylens.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`QUERYLENS_*`)
/// 3. Project config (`querylens.toml` in the project root)
/// 4. User config (`~/.querylens/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QueryLensConfig {
    pub extraction: ExtractionConfig,
    pub scoring: ScoringConfig,
    pub batch: BatchConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub batch_threads: Option<usize>,
    pub batch_parallel: Option<bool>,
    pub strip_legacy_org_code: Option<bool>,
}

impl QueryLensConfig {
    /// Load configuration with 4-layer resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &QueryLensConfig) -> Result<(), ConfigError> {
        let scoring = &config.scoring;
        let basic = scoring.effective_basic_exploratory_max();
        let focused = scoring.effective_focused_exploratory_max();
        let analytical = scoring.effective_analytical_max();
        if basic >= focused {
            return Err(ConfigError::ValidationFailed {
                field: "scoring.focused_exploratory_max".to_string(),
                message: format!("must be greater than basic_exploratory_max ({basic})"),
            });
        }
        if focused >= analytical {
            return Err(ConfigError::ValidationFailed {
                field: "scoring.analytical_max".to_string(),
                message: format!("must be greater than focused_exploratory_max ({focused})"),
            });
        }

        let extraction = &config.extraction;
        for (field, value) in [
            ("extraction.legacy_view_suffix", extraction.effective_legacy_view_suffix()),
            ("extraction.gridiron_schema_suffix", extraction.effective_gridiron_schema_suffix()),
            ("extraction.gridiron_table_prefix", extraction.effective_gridiron_table_prefix()),
        ] {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("'{value}' may only contain ASCII letters, digits and '_'"),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.querylens/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut QueryLensConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: QueryLensConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut QueryLensConfig, other: &QueryLensConfig) {
        // Extraction
        if other.extraction.legacy_view_suffix.is_some() {
            base.extraction.legacy_view_suffix = other.extraction.legacy_view_suffix.clone();
        }
        if other.extraction.gridiron_schema_suffix.is_some() {
            base.extraction.gridiron_schema_suffix =
                other.extraction.gridiron_schema_suffix.clone();
        }
        if other.extraction.gridiron_table_prefix.is_some() {
            base.extraction.gridiron_table_prefix = other.extraction.gridiron_table_prefix.clone();
        }
        if other.extraction.strip_legacy_org_code.is_some() {
            base.extraction.strip_legacy_org_code = other.extraction.strip_legacy_org_code;
        }

        // Scoring
        if other.scoring.basic_exploratory_max.is_some() {
            base.scoring.basic_exploratory_max = other.scoring.basic_exploratory_max;
        }
        if other.scoring.focused_exploratory_max.is_some() {
            base.scoring.focused_exploratory_max = other.scoring.focused_exploratory_max;
        }
        if other.scoring.analytical_max.is_some() {
            base.scoring.analytical_max = other.scoring.analytical_max;
        }

        // Batch
        if other.batch.threads.is_some() {
            base.batch.threads = other.batch.threads;
        }
        if other.batch.parallel.is_some() {
            base.batch.parallel = other.batch.parallel;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `QUERYLENS_BATCH_THREADS`, `QUERYLENS_SCORING_ANALYTICAL_MAX`, etc.
    fn apply_env_overrides(config: &mut QueryLensConfig) {
        if let Ok(val) = std::env::var("QUERYLENS_BATCH_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.batch.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("QUERYLENS_BATCH_PARALLEL") {
            if let Ok(v) = val.parse::<bool>() {
                config.batch.parallel = Some(v);
            }
        }
        if let Ok(val) = std::env::var("QUERYLENS_SCORING_BASIC_EXPLORATORY_MAX") {
            if let Ok(v) = val.parse::<u32>() {
                config.scoring.basic_exploratory_max = Some(v);
            }
        }
        if let Ok(val) = std::env::var("QUERYLENS_SCORING_FOCUSED_EXPLORATORY_MAX") {
            if let Ok(v) = val.parse::<u32>() {
                config.scoring.focused_exploratory_max = Some(v);
            }
        }
        if let Ok(val) = std::env::var("QUERYLENS_SCORING_ANALYTICAL_MAX") {
            if let Ok(v) = val.parse::<u32>() {
                config.scoring.analytical_max = Some(v);
            }
        }
        if let Ok(val) = std::env::var("QUERYLENS_EXTRACTION_STRIP_LEGACY_ORG_CODE") {
            if let Ok(v) = val.parse::<bool>() {
                config.extraction.strip_legacy_org_code = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut QueryLensConfig, cli: &CliOverrides) {
        if let Some(v) = cli.batch_threads {
            config.batch.threads = Some(v);
        }
        if let Some(v) = cli.batch_parallel {
            config.batch.parallel = Some(v);
        }
        if let Some(v) = cli.strip_legacy_org_code {
            config.extraction.strip_legacy_org_code = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level config directory: `~/.querylens/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".querylens"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
