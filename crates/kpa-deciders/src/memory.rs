//! InMemoryDeciders — process-local `Deciders` registry.
//!
//! Deciders live in a `HashMap` keyed by `{namespace}/{name}` behind a
//! tokio `RwLock`. The store is `Clone` (backed by `Arc`) and can be shared
//! across tasks. Each write bumps `resource_version`, and updates carrying
//! a stale version are refused. Watchers are called after the write lock
//! is released.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::decider::Decider;
use crate::error::{DecidersError, DecidersResult};
use crate::registry::{Deciders, Watcher};

#[derive(Clone, Default)]
pub struct InMemoryDeciders {
    deciders: Arc<RwLock<HashMap<String, Decider>>>,
    watchers: Arc<std::sync::RwLock<Vec<Watcher>>>,
}

impl InMemoryDeciders {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.deciders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.deciders.read().await.is_empty()
    }

    /// Snapshot of every stored Decider, sorted by key.
    pub async fn list(&self) -> Vec<Decider> {
        let deciders = self.deciders.read().await;
        let mut all: Vec<Decider> = deciders.values().cloned().collect();
        all.sort_by_key(Decider::key);
        all
    }

    fn notify(&self, key: &str) {
        let watchers = self
            .watchers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for watcher in &watchers {
            watcher(key);
        }
    }
}

/// Reject Deciders the control loop could not run on.
fn validate(key: &str, decider: &Decider) -> DecidersResult<()> {
    let invalid = |reason: &str| DecidersError::InvalidSpec {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    if decider.namespace().is_empty() || decider.name().is_empty() {
        return Err(invalid("namespace and name are required"));
    }
    if decider.spec.service_name.is_empty() {
        return Err(invalid("service name is required"));
    }
    if decider.spec.tick_interval.is_zero() {
        return Err(invalid("tick interval must be positive"));
    }
    if !decider.spec.target_concurrency.is_finite() || !decider.spec.panic_threshold.is_finite() {
        return Err(invalid("target concurrency and panic threshold must be finite"));
    }
    Ok(())
}

fn next_version(current: &str) -> String {
    (current.parse::<u64>().unwrap_or(0) + 1).to_string()
}

#[async_trait]
impl Deciders for InMemoryDeciders {
    async fn get(&self, namespace: &str, name: &str) -> DecidersResult<Decider> {
        let key = format!("{namespace}/{name}");
        let deciders = self.deciders.read().await;
        deciders
            .get(&key)
            .cloned()
            .ok_or(DecidersError::NotFound(key))
    }

    async fn create(&self, mut decider: Decider) -> DecidersResult<Decider> {
        let key = decider.key();
        validate(&key, &decider)?;
        {
            let mut deciders = self.deciders.write().await;
            match deciders.entry(key.clone()) {
                Entry::Occupied(_) => {
                    return Err(DecidersError::Conflict {
                        key,
                        reason: "already exists".to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    decider.metadata.resource_version = next_version("");
                    decider.metadata.generation = 1;
                    slot.insert(decider.clone());
                }
            }
        }
        debug!(%key, "decider created");
        self.notify(&key);
        Ok(decider)
    }

    async fn update(&self, mut decider: Decider) -> DecidersResult<Decider> {
        let key = decider.key();
        validate(&key, &decider)?;
        {
            let mut deciders = self.deciders.write().await;
            let stored = deciders
                .get_mut(&key)
                .ok_or_else(|| DecidersError::NotFound(key.clone()))?;

            let incoming = &decider.metadata.resource_version;
            if !incoming.is_empty() && *incoming != stored.metadata.resource_version {
                return Err(DecidersError::Conflict {
                    key,
                    reason: format!(
                        "resource version {incoming} does not match {}",
                        stored.metadata.resource_version
                    ),
                });
            }

            decider.metadata.resource_version = next_version(&stored.metadata.resource_version);
            decider.metadata.generation = stored.metadata.generation + 1;
            *stored = decider.clone();
        }
        debug!(%key, version = %decider.metadata.resource_version, "decider updated");
        self.notify(&key);
        Ok(decider)
    }

    async fn delete(&self, namespace: &str, name: &str) -> DecidersResult<()> {
        let key = format!("{namespace}/{name}");
        let existed = self.deciders.write().await.remove(&key).is_some();
        if !existed {
            return Err(DecidersError::NotFound(key));
        }
        debug!(%key, "decider deleted");
        self.notify(&key);
        Ok(())
    }

    fn watch(&self, watcher: Watcher) {
        self.watchers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(watcher);
    }
}
