use std::sync::Arc;

use crate::db::Storage;
use crate::llm_client::CompletionClient;
use crate::store_client::StoreClient;

/// State for the keyword store service, injected into its handlers.
#[derive(Clone)]
pub struct StoreState {
    pub storage: Storage,
}

/// State for the save proxy service.
#[derive(Clone)]
pub struct SaveState {
    pub store: StoreClient,
}

/// State for the narrative generator service.
///
/// The completion provider sits behind a trait object so the two-stage flow
/// can run against a scripted implementation in tests.
#[derive(Clone)]
pub struct GenerateState {
    pub store: StoreClient,
    pub completion: Arc<dyn CompletionClient>,
}
