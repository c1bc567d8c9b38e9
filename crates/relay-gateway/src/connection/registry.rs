//! Connection registry
//!
//! The set of live connections, keyed by `ConnectionId`. Backed by `DashMap`
//! so sessions can register and unregister concurrently while broadcasts
//! iterate over snapshots.

use std::sync::Arc;

use dashmap::DashMap;

use super::{Connection, ConnectionId};

/// Tracks every live connection
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Arc<Connection>>,
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Add a newly accepted connection
    ///
    /// Returns `false` (and leaves the registry unchanged) if the id is already present.
    pub fn register(&self, connection: Arc<Connection>) -> bool {
        let id = connection.id();
        let mut inserted = false;
        self.connections.entry(id).or_insert_with(|| {
            inserted = true;
            connection
        });

        if inserted {
            tracing::debug!(connection_id = %id, "Connection registered");
        }

        inserted
    }

    /// Bind a display name to a registered connection
    ///
    /// Only the first bind for a connection sticks. Returns `false` when the
    /// connection already has a name or is not registered.
    pub fn bind_name(&self, id: ConnectionId, name: &str) -> bool {
        let Some(connection) = self.get(id) else {
            return false;
        };

        let bound = connection.bind_username(name);
        if bound {
            tracing::debug!(connection_id = %id, username = %name, "Display name bound");
        }
        bound
    }

    /// Remove a connection; removing an absent id is a no-op
    ///
    /// Returns the removed connection so exactly one caller observes the removal.
    pub fn unregister(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        let removed = self.connections.remove(&id).map(|(_, conn)| conn);
        if removed.is_some() {
            tracing::debug!(connection_id = %id, "Connection unregistered");
        }
        removed
    }

    /// Independent copy of the registered connections at this instant
    ///
    /// Cloning the `Arc`s is the only work done while shard locks are held,
    /// so delivery to the returned connections never blocks registration.
    pub fn snapshot(&self) -> Vec<Arc<Connection>> {
        self.connections.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn get(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(&id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("connections", &self.connections.len())
            .finish()
    }
}
