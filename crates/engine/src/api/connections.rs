//! Connection management for WebSocket clients.
//!
//! Tracks connected games and the outbound channel of each.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Information about a connected client.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    /// Unique ID for this connection
    pub connection_id: Uuid,
    pub connected_at: DateTime<Utc>,
}

/// Manages all active WebSocket connections.
///
/// Each entry holds a sender for already-encoded JSON text frames.
pub struct ConnectionManager {
    connections: DashMap<Uuid, (ConnectionInfo, mpsc::Sender<String>)>,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a new connection.
    pub fn register(&self, connection_id: Uuid, connected_at: DateTime<Utc>, sender: mpsc::Sender<String>) {
        let info = ConnectionInfo {
            connection_id,
            connected_at,
        };
        self.connections.insert(connection_id, (info, sender));
        tracing::debug!(connection_id = %connection_id, "Connection registered");
    }

    /// Unregister a connection.
    pub fn unregister(&self, connection_id: Uuid) {
        if self.connections.remove(&connection_id).is_some() {
            tracing::debug!(connection_id = %connection_id, "Connection unregistered");
        }
    }

    pub fn get(&self, connection_id: Uuid) -> Option<ConnectionInfo> {
        self.connections
            .get(&connection_id)
            .map(|entry| entry.value().0.clone())
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Send a text frame to every connection. Returns how many accepted it.
    pub fn broadcast(&self, frame: &str) -> usize {
        let mut delivered = 0;
        for entry in self.connections.iter() {
            let (info, sender) = entry.value();
            match sender.try_send(frame.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    connection_id = %info.connection_id,
                    error = %e,
                    "Failed to broadcast message"
                ),
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_every_connection() {
        let manager = ConnectionManager::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        manager.register(Uuid::new_v4(), Utc::now(), tx_a);
        manager.register(Uuid::new_v4(), Utc::now(), tx_b);

        assert_eq!(manager.broadcast(r#"{"command":"ping"}"#), 2);
        assert_eq!(rx_a.recv().await.as_deref(), Some(r#"{"command":"ping"}"#));
        assert_eq!(rx_b.recv().await.as_deref(), Some(r#"{"command":"ping"}"#));
    }

    #[tokio::test]
    async fn closed_connections_are_not_counted() {
        let manager = ConnectionManager::new();
        let (tx, rx) = mpsc::channel(4);
        let id = Uuid::new_v4();
        manager.register(id, Utc::now(), tx);
        drop(rx);

        assert_eq!(manager.broadcast("{}"), 0);
        manager.unregister(id);
        assert!(manager.is_empty());
    }
}
