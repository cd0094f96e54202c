//! Deciders — the registry contract the reconciler applies Deciders against.
//!
//! All operations are keyed by `(namespace, name)`. Watchers receive the
//! `namespace/name` key of every Decider that is created, updated or
//! deleted. Delivery is at-least-once and unordered across keys; events for
//! one key arrive in the order the changes happened. Subscribers must
//! tolerate duplicates.

use std::sync::Arc;

use async_trait::async_trait;

use crate::decider::Decider;
use crate::error::DecidersResult;

/// Change-notification callback, called with a `namespace/name` key.
pub type Watcher = Arc<dyn Fn(&str) + Send + Sync>;

#[async_trait]
pub trait Deciders: Send + Sync {
    /// Current Decider for the key. `NotFound` if absent.
    async fn get(&self, namespace: &str, name: &str) -> DecidersResult<Decider>;

    /// Store a new Decider, returning it with store-populated fields.
    /// `Conflict` if the key exists, `InvalidSpec` if rejected.
    async fn create(&self, decider: Decider) -> DecidersResult<Decider>;

    /// Replace an existing Decider. `NotFound` if absent, `Conflict` on a
    /// stale `resource_version`.
    async fn update(&self, decider: Decider) -> DecidersResult<Decider>;

    /// Remove the Decider for the key. `NotFound` if absent.
    async fn delete(&self, namespace: &str, name: &str) -> DecidersResult<()>;

    /// Register a callback for Decider changes.
    fn watch(&self, watcher: Watcher);
}
