//! Application-level configuration loading, including the identity name pool.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the JSON configuration is looked up.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "ODD_ONE_OUT_CONFIG_PATH";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    names: NamePool,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in name pool when no file is present or parseable.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        adjectives = app_config.names.adjectives.len(),
                        nouns = app_config.names.nouns.len(),
                        "loaded identity name pool from config"
                    );
                    app_config
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

    /// Word lists used when minting pseudonymous identities.
    pub fn name_pool(&self) -> &NamePool {
        &self.names
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            names: NamePool::default(),
        }
    }
}

/// Adjective and noun lists an identity token is drawn from.
#[derive(Debug, Clone)]
pub struct NamePool {
    /// Leading adjectives ("Zany", "Bold", ...).
    pub adjectives: Vec<String>,
    /// Trailing nouns ("Fox", "Owl", ...).
    pub nouns: Vec<String>,
}

impl Default for NamePool {
    fn default() -> Self {
        Self {
            adjectives: default_adjectives(),
            nouns: default_nouns(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    adjectives: Vec<String>,
    nouns: Vec<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        // An empty list would leave the generator with nothing to draw from,
        // so treat it the same as a missing file.
        if value.adjectives.is_empty() || value.nouns.is_empty() {
            warn!("config name pool has an empty list; using built-in defaults");
            return Self::default();
        }

        Self {
            names: NamePool {
                adjectives: value.adjectives,
                nouns: value.nouns,
            },
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

fn default_adjectives() -> Vec<String> {
    [
        "Zany", "Epic", "Snug", "Bold", "Cheer", "Mild", "Wild", "Chic", "Perk", "Lush", "Neat",
        "Jolly", "Spicy", "Brisk", "Breez", "Spunk", "Quirk", "Happy", "Cool", "Wavy",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

fn default_nouns() -> Vec<String> {
    [
        "Fox", "Owl", "Frog", "Cat", "Dog", "Bee", "Duck", "Wolf", "Bat", "Fish", "Pony", "Goat",
        "Hawk", "Lion", "Crab", "Toad", "Bear", "Ant", "Mole", "Yak",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pool_is_non_empty() {
        let config = AppConfig::default();
        assert!(!config.name_pool().adjectives.is_empty());
        assert!(!config.name_pool().nouns.is_empty());
    }

    #[test]
    fn empty_raw_lists_fall_back_to_defaults() {
        let raw = RawConfig {
            adjectives: vec![],
            nouns: vec!["Fox".into()],
        };
        let config: AppConfig = raw.into();
        assert_eq!(
            config.name_pool().adjectives,
            AppConfig::default().name_pool().adjectives
        );
    }
}
