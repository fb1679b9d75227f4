//! Combat configuration loading.
//!
//! Configuration comes from a TOML file, the process environment, or both:
//! the file is read first and `COMBAT_*` variables override it. The result
//! is validated before it is returned.

use std::env;
use std::path::Path;

use combat_core::CombatConfig;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Loader for [`CombatConfig`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Environment variable naming a config file for [`from_env`](Self::from_env).
    pub const PATH_VAR: &'static str = "COMBAT_CONFIG";

    /// Load config from a TOML file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    /// Parse config from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Construct configuration from process environment variables.
    ///
    /// If `COMBAT_CONFIG` names a file it is loaded first. Then:
    /// - `COMBAT_CRITICAL_MISS_THRESHOLD`
    /// - `COMBAT_HIT_THRESHOLD`
    /// - `COMBAT_COMBO_THRESHOLD`
    /// - `COMBAT_CRITICAL_HIT_THRESHOLD`
    /// - `COMBAT_MAX_EXPLOSIONS`
    /// - `COMBAT_HEALTH_THRESHOLD_PERCENT`
    pub fn from_env() -> LoadResult<CombatConfig> {
        let mut config = match env::var(Self::PATH_VAR) {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) => CombatConfig::default(),
        };
        Self::apply_overrides(&mut config, |key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies `COMBAT_*` overrides read through `lookup`. Unparseable
    /// values are ignored.
    pub fn apply_overrides<F>(config: &mut CombatConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).and_then(|raw| raw.trim().parse::<i32>().ok());
        let read_u32 = |key: &str| lookup(key).and_then(|raw| raw.trim().parse::<u32>().ok());

        if let Some(value) = read("COMBAT_CRITICAL_MISS_THRESHOLD") {
            config.thresholds.critical_miss = value;
        }
        if let Some(value) = read("COMBAT_HIT_THRESHOLD") {
            config.thresholds.hit = value;
        }
        if let Some(value) = read("COMBAT_COMBO_THRESHOLD") {
            config.thresholds.combo = value;
        }
        if let Some(value) = read("COMBAT_CRITICAL_HIT_THRESHOLD") {
            config.thresholds.critical_hit = value;
        }
        if let Some(value) = read_u32("COMBAT_MAX_EXPLOSIONS") {
            config.max_explosions = value;
        }
        if let Some(value) = read_u32("COMBAT_HEALTH_THRESHOLD_PERCENT") {
            config.health_threshold_percent = value;
        }
    }
}
