//! Test assertion helpers - fluent API for verifying what participants were sent
#![allow(dead_code)] // Test utilities may not all be used in every test

use typerace::{room::Participant, MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    handles: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for specific participant handles
    pub fn for_players(setup: &'a TestSetup, handles: Vec<&'a str>) -> Self {
        Self { setup, handles }
    }

    async fn consume(&self, handle: &str) -> WebSocketMessage {
        let message = self
            .setup
            .mock_conn_manager
            .consume_message_for(handle)
            .await
            .unwrap_or_else(|| panic!("{} should have received a message", handle));
        serde_json::from_str(&message)
            .unwrap_or_else(|e| panic!("Failed to parse message for {}: {}", handle, e))
    }

    /// Assert that every handle's next message has this type and the same payload
    /// (consumes the message from each queue)
    pub async fn received_message_type(&self, expected_type: MessageType) -> MessageContent {
        let mut messages = vec![];

        for handle in &self.handles {
            let msg = self.consume(handle).await;
            assert_eq!(
                msg.message_type, expected_type,
                "{} received wrong message type",
                handle
            );
            messages.push(msg);
        }

        let first_payload = &messages[0].payload;
        for (i, msg) in messages.iter().enumerate().skip(1) {
            assert_eq!(
                &msg.payload, first_payload,
                "{} payload differs from {}",
                self.handles[i], self.handles[0]
            );
        }

        MessageContent {
            payload: messages[0].payload.clone(),
        }
    }

    /// Assert that every handle's next messages have these types, in order
    /// (consumes them). Payloads are returned from the first handle.
    pub async fn received_message_sequence(
        self,
        expected_types: Vec<MessageType>,
    ) -> Vec<MessageContent> {
        let mut result_messages = vec![];

        for handle in &self.handles {
            for (i, expected_type) in expected_types.iter().enumerate() {
                let msg = self.consume(handle).await;
                assert_eq!(
                    msg.message_type, *expected_type,
                    "{} message {} has wrong type: expected {:?}, got {:?}",
                    handle, i, expected_type, msg.message_type
                );

                if handle == &self.handles[0] {
                    result_messages.push(MessageContent {
                        payload: msg.payload,
                    });
                }
            }
        }

        result_messages
    }

    /// Assert that the handles have nothing left in their queues
    pub async fn received_no_messages(self) {
        for handle in &self.handles {
            let messages = self.setup.mock_conn_manager.get_messages_for(handle).await;
            assert!(
                messages.is_empty(),
                "{} should not have received any more messages, got {:?}",
                handle,
                messages
            );
        }
    }

    /// Count how many messages of a type a handle has pending (non-consuming)
    pub async fn count_message_type(&self, handle: &str, msg_type: MessageType) -> usize {
        let messages = self.setup.mock_conn_manager.get_messages_for(handle).await;
        messages
            .iter()
            .filter_map(|msg_str| serde_json::from_str::<WebSocketMessage>(msg_str).ok())
            .filter(|msg| msg.message_type == msg_type)
            .count()
    }
}

// ============================================================================
// Message Content Assertions
// ============================================================================

pub struct MessageContent {
    payload: serde_json::Value,
}

impl MessageContent {
    /// Assert the message names a specific participant handle
    pub fn with_handle(&self, expected_handle: &str) -> &Self {
        assert_eq!(self.payload["handle"], expected_handle);
        self
    }

    /// Assert the message carries a specific display name
    pub fn with_name(&self, expected_name: &str) -> &Self {
        assert_eq!(self.payload["name"], expected_name);
        self
    }

    pub fn with_score(&self, expected_score: usize) -> &Self {
        assert_eq!(self.payload["score"], expected_score);
        self
    }

    /// Assert the round text
    pub fn with_text(&self, expected_text: &str) -> &Self {
        assert_eq!(self.payload["text"], expected_text);
        self
    }

    /// Assert the error message shown to the client
    pub fn with_error(&self, expected_message: &str) -> &Self {
        assert_eq!(self.payload["message"], expected_message);
        self
    }

    /// Assert a participant list as (handle, score) pairs, in join order
    pub fn with_scores(&self, expected: Vec<(&str, usize)>) -> &Self {
        let participants = self.participants();
        let actual: Vec<(&str, usize)> = participants
            .iter()
            .map(|p| (p.handle.as_str(), p.score))
            .collect();
        assert_eq!(actual, expected);
        self
    }

    pub fn participants(&self) -> Vec<Participant> {
        serde_json::from_value(self.payload["participants"].clone())
            .expect("payload should carry a participant list")
    }
}
