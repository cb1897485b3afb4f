//! No-mock configuration validation + resolution tests.
//!
//! Covers:
//! - Analysis config validation against real JSON files
//! - Resolution order (CLI > env > config dir > XDG)

use gr_config::resolve::{resolve_config, ConfigSource};
use gr_config::validate::{validate_analysis, ValidationError};
use gr_config::AnalysisConfig;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const VALID: &str = r#"{
    "schema_version": "1.0.0",
    "description": "Garhwal-Kumaon ISC catalog",
    "completeness_magnitude": 3.0,
    "bin_width": 0.1
}"#;

const ENV_KEYS: &[&str] = &["GR_BVALUE_CONFIG", "GR_BVALUE_CONFIG_DIR", "XDG_CONFIG_HOME"];

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .expect("env lock poisoned");
    f()
}

fn write_config(path: &Path, json: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create config parent");
    }
    fs::write(path, json).expect("write config");
}

#[test]
fn test_validate_config_file_ok() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("analysis.json");
    write_config(&path, VALID);

    let cfg = AnalysisConfig::from_file(&path).expect("read config");
    validate_analysis(&cfg).expect("valid config should pass validation");
    assert_eq!(cfg.completeness_magnitude, 3.0);
}

#[test]
fn test_validate_rejects_zero_bin_width() {
    let cfg = AnalysisConfig::from_json(
        r#"{"schema_version": "1.0.0", "completeness_magnitude": 3.0, "bin_width": 0.0}"#,
    )
    .expect("parse config");
    let err = validate_analysis(&cfg).expect_err("zero bin width should fail validation");
    assert!(matches!(err, ValidationError::InvalidValue { .. }));
}

#[test]
fn test_validate_rejects_wrong_version() {
    let cfg = AnalysisConfig::from_json(r#"{"schema_version": "2.0.0"}"#).expect("parse config");
    let err = validate_analysis(&cfg).expect_err("wrong version should fail validation");
    assert!(matches!(err, ValidationError::VersionMismatch { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let temp = TempDir::new().expect("temp dir");
    let err = AnalysisConfig::from_file(&temp.path().join("absent.json"))
        .expect_err("missing file should fail");
    assert!(matches!(err, ValidationError::IoError(_)));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("analysis.json");
    write_config(&path, "{ not json");
    let err = AnalysisConfig::from_file(&path).expect_err("malformed file should fail");
    assert!(matches!(err, ValidationError::ParseError(_)));
}

#[test]
fn test_resolve_config_cli_over_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);

        let temp = TempDir::new().expect("temp dir");
        let cli_path = temp.path().join("cli").join("analysis.json");
        let env_path = temp.path().join("env").join("analysis.json");
        write_config(&cli_path, VALID);
        write_config(&env_path, VALID);

        env::set_var("GR_BVALUE_CONFIG", env_path.display().to_string());
        env::set_var(
            "GR_BVALUE_CONFIG_DIR",
            temp.path().join("env").display().to_string(),
        );

        let paths = resolve_config(Some(&cli_path));
        assert_eq!(paths.analysis_source, ConfigSource::CliArgument);
        assert_eq!(paths.analysis.unwrap(), cli_path);
    });
}

#[test]
fn test_resolve_config_env_over_config_dir() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);

        let temp = TempDir::new().expect("temp dir");
        let env_path = temp.path().join("env").join("analysis.json");
        let config_dir = temp.path().join("config_dir");
        write_config(&env_path, VALID);
        write_config(&config_dir.join("analysis.json"), VALID);

        env::set_var("GR_BVALUE_CONFIG", env_path.display().to_string());
        env::set_var("GR_BVALUE_CONFIG_DIR", config_dir.display().to_string());

        let paths = resolve_config(None);
        assert_eq!(paths.analysis_source, ConfigSource::Environment);
        assert_eq!(paths.analysis.unwrap(), env_path);
    });
}

#[test]
fn test_resolve_config_dir_fallback() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);
        env::remove_var("GR_BVALUE_CONFIG");

        let temp = TempDir::new().expect("temp dir");
        let config_dir = temp.path().join("config_dir");
        write_config(&config_dir.join("analysis.json"), VALID);
        env::set_var("GR_BVALUE_CONFIG_DIR", config_dir.display().to_string());

        let paths = resolve_config(None);
        assert_eq!(paths.analysis_source, ConfigSource::Environment);
        assert_eq!(paths.analysis.unwrap(), config_dir.join("analysis.json"));
    });
}

#[cfg(target_os = "linux")]
#[test]
fn test_resolve_config_xdg_fallback() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);
        env::remove_var("GR_BVALUE_CONFIG");
        env::remove_var("GR_BVALUE_CONFIG_DIR");

        let temp = TempDir::new().expect("temp dir");
        let xdg_dir = temp.path().join("xdg");
        let app_dir = xdg_dir.join("gr-bvalue");
        write_config(&app_dir.join("analysis.json"), VALID);

        env::set_var("XDG_CONFIG_HOME", xdg_dir.display().to_string());

        let paths = resolve_config(None);
        assert_eq!(paths.analysis_source, ConfigSource::XdgConfig);
        assert_eq!(paths.analysis.unwrap(), app_dir.join("analysis.json"));
    });
}
