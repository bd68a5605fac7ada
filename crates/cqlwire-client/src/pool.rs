//! Connection pool that hands out a uniformly random live connection.

use std::sync::{PoisonError, RwLock};

use rand::seq::SliceRandom;

use cqlwire_core::error::{ClientError, Result};
use cqlwire_core::{Connection, ConnectionPool};

/// Set of currently usable connections.
///
/// No affinity: every call may return a different connection.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    connections: RwLock<Vec<Connection>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_connections(connections: Vec<Connection>) -> Self {
        Self {
            connections: RwLock::new(connections),
        }
    }

    pub fn add_connection(&self, connection: Connection) {
        let mut connections = self.connections.write().unwrap_or_else(PoisonError::into_inner);
        if !connections.contains(&connection) {
            tracing::debug!(connection = %connection, "connection added");
            connections.push(connection);
        }
    }

    /// Remove a closed connection. Returns `true` if it was present.
    pub fn remove_connection(&self, id: u64) -> bool {
        let mut connections = self.connections.write().unwrap_or_else(PoisonError::into_inner);
        let before = connections.len();
        connections.retain(|c| c.id() != id);
        before != connections.len()
    }

    pub fn len(&self) -> usize {
        self.connections.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConnectionPool for ConnectionManager {
    fn random_connection(&self) -> Result<Connection> {
        let connections = self.connections.read().unwrap_or_else(PoisonError::into_inner);
        connections
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(ClientError::NoConnections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn empty_pool_fails() {
        let pool = ConnectionManager::new();
        assert!(matches!(pool.random_connection(), Err(ClientError::NoConnections)));
    }

    #[test]
    fn picks_among_all_connections() {
        let pool = ConnectionManager::from_connections(vec![
            Connection::new(1, "10.0.0.1:9042"),
            Connection::new(2, "10.0.0.2:9042"),
            Connection::new(3, "10.0.0.3:9042"),
        ]);
        let seen: HashSet<u64> = (0..200)
            .map(|_| pool.random_connection().unwrap().id())
            .collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn add_and_remove() {
        let pool = ConnectionManager::new();
        pool.add_connection(Connection::new(1, "a"));
        pool.add_connection(Connection::new(1, "a"));
        assert_eq!(pool.len(), 1);
        assert!(pool.remove_connection(1));
        assert!(!pool.remove_connection(1));
        assert!(pool.is_empty());
    }
}
