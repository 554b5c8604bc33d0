//! Runtime configuration
//!
//! Defaults point at the repository `data/` directory. Environment variables
//! override the defaults and CLI flags override both.

use crate::ExecutionMode;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "data/gradient_boosting_model.json";
pub const DEFAULT_ZONES_PATH: &str = "data/district.json";

pub const ENV_MODEL_PATH: &str = "HOTSPOT_MODEL_PATH";
pub const ENV_ZONES_PATH: &str = "HOTSPOT_ZONES_PATH";
pub const ENV_PARALLEL: &str = "HOTSPOT_PARALLEL";

/// Where the model and district coordinates live, and how to sweep
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub model_path: PathBuf,
    pub zones_path: PathBuf,
    pub mode: ExecutionMode,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            zones_path: PathBuf::from(DEFAULT_ZONES_PATH),
            mode: ExecutionMode::Sequential,
        }
    }
}

impl RuntimeConfig {
    /// Defaults with process environment overrides applied
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an arbitrary variable source
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = var(ENV_MODEL_PATH).filter(|p| !p.is_empty()) {
            config.model_path = PathBuf::from(path);
        }
        if let Some(path) = var(ENV_ZONES_PATH).filter(|p| !p.is_empty()) {
            config.zones_path = PathBuf::from(path);
        }
        if let Some(flag) = var(ENV_PARALLEL) {
            if parse_flag(&flag) {
                config.mode = ExecutionMode::Parallel;
            }
        }

        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_vars(vars(&[]));
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.mode, ExecutionMode::Sequential);
    }

    #[test]
    fn test_env_overrides() {
        let config = RuntimeConfig::from_vars(vars(&[
            (ENV_MODEL_PATH, "/models/gb.json"),
            (ENV_ZONES_PATH, "/ref/districts.json"),
            (ENV_PARALLEL, "TRUE"),
        ]));
        assert_eq!(config.model_path, PathBuf::from("/models/gb.json"));
        assert_eq!(config.zones_path, PathBuf::from("/ref/districts.json"));
        assert_eq!(config.mode, ExecutionMode::Parallel);
    }

    #[test]
    fn test_empty_and_false_values_ignored() {
        let config = RuntimeConfig::from_vars(vars(&[(ENV_MODEL_PATH, ""), (ENV_PARALLEL, "0")]));
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(config.mode, ExecutionMode::Sequential);
    }
}
