//! Stable pseudonymous client identity, generated once and cached locally.
//!
//! The identity is an "Adjective Noun" token drawn from the configured name
//! pool. There is no collision detection across clients; the pool size keeps
//! the probability acceptably low for a party game.

use std::{
    fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::NamePool;

/// How long a persisted identity stays valid before a fresh one is minted.
const IDENTITY_TTL: Duration = Duration::from_secs(180 * 24 * 60 * 60);

/// Supplies the stable client identity backed by local persistent storage.
#[derive(Debug, Clone)]
pub struct IdentityProvider {
    path: Option<PathBuf>,
    pool: NamePool,
}

/// On-disk representation of a minted identity.
#[derive(Debug, Serialize, Deserialize)]
struct StoredIdentity {
    name: String,
    /// Seconds since the Unix epoch at mint time.
    issued_at: u64,
}

impl IdentityProvider {
    /// Build a provider persisting under `path`. Pass `None` when no
    /// persistent storage is available yet; [`IdentityProvider::identity`]
    /// then returns the empty placeholder and callers must tolerate the
    /// placeholder-then-real transition.
    pub fn new(path: Option<PathBuf>, pool: NamePool) -> Self {
        Self { path, pool }
    }

    /// Return the cached identity, minting and persisting a new one when the
    /// cache is missing or expired.
    pub fn identity(&self) -> String {
        let Some(path) = &self.path else {
            return String::new();
        };

        if let Some(existing) = read_valid_identity(path) {
            return existing;
        }

        let name = generate_name(&self.pool);
        let stored = StoredIdentity {
            name: name.clone(),
            issued_at: unix_seconds(SystemTime::now()),
        };

        match serde_json::to_string(&stored) {
            Ok(contents) => {
                if let Err(err) = fs::write(path, contents) {
                    // Storage failures degrade to a session-local identity.
                    warn!(path = %path.display(), error = %err, "failed to persist identity");
                }
            }
            Err(err) => warn!(error = %err, "failed to encode identity"),
        }

        name
    }
}

/// Draw a fresh "Adjective Noun" token uniformly from the pool.
pub fn generate_name(pool: &NamePool) -> String {
    let mut rng = rand::rng();
    let adjective = &pool.adjectives[rng.random_range(0..pool.adjectives.len())];
    let noun = &pool.nouns[rng.random_range(0..pool.nouns.len())];
    format!("{adjective} {noun}")
}

fn read_valid_identity(path: &PathBuf) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    let stored: StoredIdentity = match serde_json::from_str(&contents) {
        Ok(stored) => stored,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "unreadable identity file; re-minting");
            return None;
        }
    };

    let now = unix_seconds(SystemTime::now());
    if now.saturating_sub(stored.issued_at) > IDENTITY_TTL.as_secs() {
        return None;
    }

    Some(stored.name)
}

fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn pool() -> NamePool {
        AppConfig::default().name_pool().clone()
    }

    #[test]
    fn identity_is_stable_across_calls() {
        let dir = tempfile::tempdir().unwrap();
        let provider = IdentityProvider::new(Some(dir.path().join("identity.json")), pool());

        let first = provider.identity();
        let second = provider.identity();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn missing_storage_returns_placeholder() {
        let provider = IdentityProvider::new(None, pool());
        assert_eq!(provider.identity(), "");
    }

    #[test]
    fn expired_identity_is_reminted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");

        let stale = StoredIdentity {
            name: "Zany Fox".into(),
            issued_at: 0,
        };
        fs::write(&path, serde_json::to_string(&stale).unwrap()).unwrap();

        let provider = IdentityProvider::new(Some(path.clone()), pool());
        let minted = provider.identity();
        assert!(!minted.is_empty());

        // The replacement must have been persisted with a fresh timestamp.
        let reread: StoredIdentity = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reread.name, minted);
        assert!(reread.issued_at > 0);
    }

    #[test]
    fn generated_names_come_from_the_pool() {
        let pool = pool();
        let name = generate_name(&pool);
        let (adjective, noun) = name.split_once(' ').unwrap();
        assert!(pool.adjectives.iter().any(|a| a == adjective));
        assert!(pool.nouns.iter().any(|n| n == noun));
    }
}
