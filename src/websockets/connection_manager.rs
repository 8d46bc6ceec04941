use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

/// Outbound side of every participant channel.
///
/// Rooms only know participant handles; this maps a handle to the queue
/// feeding that participant's socket.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, handle: String, sender: mpsc::UnboundedSender<String>);

    async fn remove_connection(&self, handle: &str);

    /// Unicast to one participant
    async fn send_to_player(&self, handle: &str, message: &str);

    /// Broadcast to a room, in the order given
    async fn send_to_players(&self, handles: &[String], message: &str);
}

pub struct InMemoryConnectionManager {
    // handle -> sender
    connections: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<String>>>>,
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

fn deliver(handle: &str, sender: &mpsc::UnboundedSender<String>, message: &str) {
    // A closed receiver means the socket task is already tearing down
    if sender.send(message.to_string()).is_err() {
        debug!(handle = %handle, "Dropping message for closed connection");
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, handle: String, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        if connections.insert(handle.clone(), sender).is_some() {
            warn!(handle = %handle, "Replaced existing connection for handle");
        }
    }

    async fn remove_connection(&self, handle: &str) {
        let mut connections = self.connections.write().await;
        connections.remove(handle);
    }

    async fn send_to_player(&self, handle: &str, message: &str) {
        let connections = self.connections.read().await;
        match connections.get(handle) {
            Some(sender) => deliver(handle, sender, message),
            None => debug!(handle = %handle, "No connection registered for handle"),
        }
    }

    async fn send_to_players(&self, handles: &[String], message: &str) {
        let connections = self.connections.read().await;
        for handle in handles {
            if let Some(sender) = connections.get(handle) {
                deliver(handle, sender, message);
            }
        }
    }
}
