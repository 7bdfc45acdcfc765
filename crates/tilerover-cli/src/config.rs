//! Configuration – reads/writes `~/.tilerover/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use tilerover_engine::EngineConfig;

/// Persisted user configuration stored in `~/.tilerover/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Arena and behavior tunables, passed through to the engine.
    #[serde(default)]
    pub engine: EngineConfig,

    /// RNG seed for deterministic runs.  Absent = seeded from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Upper bound on rounds before the demo run gives up.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_max_rounds() -> u32 {
    200
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            seed: None,
            max_rounds: default_max_rounds(),
        }
    }
}

/// Return the path to `~/.tilerover/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".tilerover").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `TILEROVER_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `TILEROVER_SEED` | `seed` |
/// | `TILEROVER_MAX_ROUNDS` | `max_rounds` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("TILEROVER_SEED")
        && let Ok(seed) = v.parse::<u64>()
    {
        cfg.seed = Some(seed);
    }
    if let Ok(v) = std::env::var("TILEROVER_MAX_ROUNDS")
        && let Ok(rounds) = v.parse::<u32>()
    {
        cfg.max_rounds = rounds;
    }
}

/// Save the config to disk, creating `~/.tilerover/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilerover_engine::HeadingQuantum;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let cfg = Config::default();
        save_to(&cfg, &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.max_rounds, 200);
        assert_eq!(loaded.seed, None);
    }

    #[test]
    fn config_path_points_to_tilerover_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".tilerover"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let result = load_from(&path).expect("no error");
        assert!(result.is_none());
    }

    #[test]
    fn nested_engine_table_parses() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"
            seed = 42
            max_rounds = 50

            [engine]
            quantum = "eighth"
            "#,
        )
        .unwrap();

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.seed, Some(42));
        assert_eq!(loaded.max_rounds, 50);
        assert_eq!(loaded.engine.quantum, HeadingQuantum::Eighth);
        // Unnamed engine fields keep their defaults.
        assert_eq!(loaded.engine.tile_units, 300);
    }

    #[test]
    fn apply_env_overrides_sets_seed() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("TILEROVER_SEED", "1234") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.seed, Some(1234));
        unsafe { std::env::remove_var("TILEROVER_SEED") };
    }

    #[test]
    fn apply_env_overrides_ignores_invalid_values() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("TILEROVER_MAX_ROUNDS", "not-a-number") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.max_rounds, 200);
        unsafe { std::env::remove_var("TILEROVER_MAX_ROUNDS") };
    }
}
