#![allow(dead_code)] // Test utilities may not all be used in every test

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use typerace::{
    race::{TextSupplier, TextSupplyError},
    ConnectionManager,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

#[derive(Clone, Default)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<String, VecDeque<String>>>>,
    connected: Arc<RwLock<Vec<String>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_messages_for(&self, handle: &str) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(handle)
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Pops the oldest undelivered frame for `handle`
    pub async fn consume_message_for(&self, handle: &str) -> Option<String> {
        self.sent_messages
            .write()
            .await
            .get_mut(handle)
            .and_then(|queue| queue.pop_front())
    }

    pub async fn is_connected(&self, handle: &str) -> bool {
        self.connected.read().await.iter().any(|h| h == handle)
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(&self, handle: String, _sender: mpsc::UnboundedSender<String>) {
        self.connected.write().await.push(handle);
    }

    async fn remove_connection(&self, handle: &str) {
        self.connected.write().await.retain(|h| h != handle);
    }

    async fn send_to_player(&self, handle: &str, message: &str) {
        self.sent_messages
            .write()
            .await
            .entry(handle.to_string())
            .or_default()
            .push_back(message.to_string());
    }

    async fn send_to_players(&self, handles: &[String], message: &str) {
        for handle in handles {
            self.send_to_player(handle, message).await;
        }
    }
}

/// Text supplier returning queued texts in order, then repeating the last one
pub struct MockTextSupplier {
    texts: RwLock<VecDeque<Result<String, TextSupplyError>>>,
    last: RwLock<Option<String>>,
    fetches: RwLock<usize>,
}

impl MockTextSupplier {
    pub fn new(texts: Vec<Result<String, TextSupplyError>>) -> Self {
        Self {
            texts: RwLock::new(texts.into()),
            last: RwLock::new(None),
            fetches: RwLock::new(0),
        }
    }

    pub async fn fetch_count(&self) -> usize {
        *self.fetches.read().await
    }
}

#[async_trait]
impl TextSupplier for MockTextSupplier {
    async fn fetch_reference_text(&self) -> Result<String, TextSupplyError> {
        *self.fetches.write().await += 1;

        match self.texts.write().await.pop_front() {
            Some(Ok(text)) => {
                *self.last.write().await = Some(text.clone());
                Ok(text)
            }
            Some(Err(e)) => Err(e),
            None => self
                .last
                .read()
                .await
                .clone()
                .ok_or_else(|| TextSupplyError::Unavailable("no texts queued".to_string())),
        }
    }
}
