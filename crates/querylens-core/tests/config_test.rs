//! Tests for the querylens configuration system.

use std::sync::Mutex;

use querylens_core::config::{CliOverrides, QueryLensConfig};
use querylens_core::errors::ConfigError;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all QUERYLENS_ env vars and point HOME at an empty directory so a
/// developer's own user config cannot leak into the assertions.
fn isolate_env(home: &std::path::Path) {
    for key in [
        "QUERYLENS_BATCH_THREADS",
        "QUERYLENS_BATCH_PARALLEL",
        "QUERYLENS_SCORING_BASIC_EXPLORATORY_MAX",
        "QUERYLENS_SCORING_FOCUSED_EXPLORATORY_MAX",
        "QUERYLENS_SCORING_ANALYTICAL_MAX",
        "QUERYLENS_EXTRACTION_STRIP_LEGACY_ORG_CODE",
    ] {
        std::env::remove_var(key);
    }
    std::env::set_var("HOME", home);
    std::env::remove_var("USERPROFILE");
}

#[test]
fn test_defaults_without_any_files() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let dir = tempdir();
    let config = QueryLensConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.extraction.effective_legacy_view_suffix(), "_vw");
    assert_eq!(config.extraction.effective_gridiron_schema_suffix(), "_ptc");
    assert_eq!(config.extraction.effective_gridiron_table_prefix(), "ptc_");
    assert!(!config.extraction.effective_strip_legacy_org_code());
    assert_eq!(config.scoring.effective_basic_exploratory_max(), 2);
    assert_eq!(config.scoring.effective_focused_exploratory_max(), 6);
    assert_eq!(config.scoring.effective_analytical_max(), 13);
    assert!(config.batch.effective_parallel());
    assert_eq!(config.batch.effective_threads(), 0);
}

#[test]
fn test_four_layer_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let user_dir = home.path().join(".querylens");
    std::fs::create_dir_all(&user_dir).unwrap();
    std::fs::write(
        user_dir.join("config.toml"),
        "[scoring]\nanalytical_max = 20\n\n[batch]\nthreads = 2\n",
    )
    .unwrap();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("querylens.toml"),
        "[batch]\nthreads = 4\nparallel = false\n",
    )
    .unwrap();

    std::env::set_var("QUERYLENS_BATCH_THREADS", "8");

    let cli = CliOverrides {
        batch_parallel: Some(true),
        ..Default::default()
    };
    let config = QueryLensConfig::load(dir.path(), Some(&cli)).unwrap();

    // User layer survives where nothing overrides it.
    assert_eq!(config.scoring.analytical_max, Some(20));
    // Env beats project beats user.
    assert_eq!(config.batch.threads, Some(8));
    // CLI beats project.
    assert_eq!(config.batch.parallel, Some(true));

    isolate_env(home.path());
}

#[test]
fn test_invalid_toml_syntax() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let dir = tempdir();
    std::fs::write(dir.path().join("querylens.toml"), "this is not valid toml {{{{").unwrap();

    match QueryLensConfig::load(dir.path(), None) {
        Err(ConfigError::ParseError { .. }) => {}
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn test_non_increasing_thresholds_rejected() {
    let result = QueryLensConfig::from_toml(
        "[scoring]\nbasic_exploratory_max = 5\nfocused_exploratory_max = 5\n",
    );
    match result {
        Err(ConfigError::ValidationFailed { field, .. }) => {
            assert_eq!(field, "scoring.focused_exploratory_max");
        }
        other => panic!("Expected ValidationFailed, got: {:?}", other),
    }

    let result = QueryLensConfig::from_toml("[scoring]\nanalytical_max = 4\n");
    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}

#[test]
fn test_bad_extraction_affix_rejected() {
    let result = QueryLensConfig::from_toml("[extraction]\nlegacy_view_suffix = \"_v.w\"\n");
    match result {
        Err(ConfigError::InvalidValue { field, .. }) => {
            assert_eq!(field, "extraction.legacy_view_suffix");
        }
        other => panic!("Expected InvalidValue, got: {:?}", other),
    }

    let result = QueryLensConfig::from_toml("[extraction]\ngridiron_table_prefix = \"\"\n");
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_unknown_keys_ignored() {
    let config = QueryLensConfig::from_toml(
        "[scoring]\nanalytical_max = 15\nsome_future_knob = true\n\n[reporting]\nformat = \"xlsx\"\n",
    )
    .unwrap();
    assert_eq!(config.scoring.effective_analytical_max(), 15);
}

#[test]
fn test_toml_round_trip_preserves_overrides() {
    let config = QueryLensConfig::from_toml(
        "[extraction]\nstrip_legacy_org_code = true\n\n[batch]\nthreads = 3\n",
    )
    .unwrap();
    let rendered = config.to_toml().unwrap();
    let reparsed = QueryLensConfig::from_toml(&rendered).unwrap();
    assert!(reparsed.extraction.effective_strip_legacy_org_code());
    assert_eq!(reparsed.batch.threads, Some(3));
}
