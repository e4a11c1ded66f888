//! Application-level configuration loading: game rules, rate-limit windows,
//! and the prompt pool contents.

use std::time::Duration;
use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{game::GameRules, rate_limit::RateLimitWindows};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GIF_BATTLE_BACK_CONFIG_PATH";

#[derive(Debug, Clone, Default)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Session limits applied to newly created games.
    pub rules: GameRules,
    /// Spacing enforced between guarded actions.
    pub rate_limits: RateLimitWindows,
    /// Prompt texts for the pool; empty means the built-in set.
    pub prompts: Vec<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in
    /// defaults when the file is missing or malformed.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        prompts = config.prompts.len(),
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file.
struct RawConfig {
    #[serde(default)]
    rules: Option<RawRules>,
    #[serde(default)]
    rate_limits: Option<RawRateLimits>,
    #[serde(default)]
    prompts: Vec<String>,
}

#[derive(Debug, Deserialize)]
/// Partial game-rule overrides; unset fields keep their defaults.
struct RawRules {
    max_players: Option<u32>,
    max_rounds: Option<u32>,
    max_score: Option<u32>,
}

#[derive(Debug, Deserialize)]
/// Partial rate-limit overrides in milliseconds.
struct RawRateLimits {
    create_ms: Option<u64>,
    join_ms: Option<u64>,
    submit_ms: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = GameRules::default();
        let rules = match raw.rules {
            Some(overrides) => GameRules {
                max_players: overrides.max_players.unwrap_or(defaults.max_players),
                max_rounds: overrides.max_rounds.unwrap_or(defaults.max_rounds),
                max_score: overrides.max_score.unwrap_or(defaults.max_score),
            },
            None => defaults,
        };

        let default_windows = RateLimitWindows::default();
        let rate_limits = match raw.rate_limits {
            Some(overrides) => RateLimitWindows {
                create: overrides
                    .create_ms
                    .map(Duration::from_millis)
                    .unwrap_or(default_windows.create),
                join: overrides
                    .join_ms
                    .map(Duration::from_millis)
                    .unwrap_or(default_windows.join),
                submit: overrides
                    .submit_ms
                    .map(Duration::from_millis)
                    .unwrap_or(default_windows.submit),
            },
            None => default_windows,
        };

        Self {
            rules,
            rate_limits,
            prompts: raw.prompts,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_overrides_everything() {
        let raw: RawConfig = serde_json::from_str(
            r#"{
                "rules": {"max_players": 4, "max_rounds": 3, "max_score": 2},
                "rate_limits": {"create_ms": 1000, "join_ms": 500, "submit_ms": 500},
                "prompts": ["a", "b"]
            }"#,
        )
        .unwrap();
        let config: AppConfig = raw.into();

        assert_eq!(config.rules.max_players, 4);
        assert_eq!(config.rules.max_rounds, 3);
        assert_eq!(config.rules.max_score, 2);
        assert_eq!(config.rate_limits.create, Duration::from_secs(1));
        assert_eq!(config.prompts, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"rules": {"max_score": 3}}"#).unwrap();
        let config: AppConfig = raw.into();

        assert_eq!(config.rules.max_players, 8);
        assert_eq!(config.rules.max_rounds, 10);
        assert_eq!(config.rules.max_score, 3);
        assert_eq!(config.rate_limits.join, Duration::from_secs(2));
        assert!(config.prompts.is_empty());
    }
}
