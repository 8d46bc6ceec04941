use std::sync::Arc;

use typerace::{
    race::TextSupplyError, InMemoryRoomRegistry, RoomService, WebsocketReceiveHandler,
};

use super::mocks::{MockConnectionManager, MockTextSupplier};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub text_supplier: Arc<MockTextSupplier>,
    pub room_service: Arc<RoomService>,
    pub input_handler: WebsocketReceiveHandler,
}

pub struct TestSetupBuilder {
    texts: Vec<Result<String, TextSupplyError>>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self { texts: vec![] }
    }

    /// Queue a reference text for the next round start
    pub fn with_text(mut self, text: &str) -> Self {
        self.texts.push(Ok(text.to_string()));
        self
    }

    /// Queue a failed fetch for the next round start
    pub fn with_text_failure(mut self) -> Self {
        self.texts
            .push(Err(TextSupplyError::Unavailable("service down".to_string())));
        self
    }

    pub fn build(self) -> TestSetup {
        let mock_conn_manager = Arc::new(MockConnectionManager::new());
        let text_supplier = Arc::new(MockTextSupplier::new(self.texts));

        let registry = Arc::new(InMemoryRoomRegistry::new(
            mock_conn_manager.clone(),
            text_supplier.clone(),
        ));
        let room_service = Arc::new(RoomService::new(registry));
        let input_handler =
            WebsocketReceiveHandler::new(room_service.clone(), mock_conn_manager.clone());

        TestSetup {
            mock_conn_manager,
            text_supplier,
            room_service,
            input_handler,
        }
    }
}
