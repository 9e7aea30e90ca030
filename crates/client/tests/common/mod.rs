#![allow(dead_code)]

use std::sync::Arc;

use civic_client::{CivicClient, ClientConfig, MemoryTokenStore, TokenStore};
use civic_core::tokens::TokenPair;
use civic_testkit::MockBackend;
use serde_json::{json, Value};

/// Start a mock backend and a client pointed at it with the given tokens
/// already stored.
pub async fn setup(tokens: Option<TokenPair>) -> (MockBackend, CivicClient, Arc<MemoryTokenStore>) {
    let backend = MockBackend::start().await;
    let store = Arc::new(match tokens {
        Some(pair) => MemoryTokenStore::with_tokens(&pair),
        None => MemoryTokenStore::new(),
    });
    let config = ClientConfig::new(backend.base_url()).unwrap();
    let client = CivicClient::new(config, Arc::clone(&store) as Arc<dyn TokenStore>).unwrap();
    (backend, client, store)
}

pub fn alice() -> Value {
    json!({"id": 1, "username": "alice", "email": "alice@example.com", "is_staff": false})
}

pub fn complaint(id: i64, code: &str) -> Value {
    json!({
        "id": id,
        "complaint_id": code,
        "title": "Pothole on Main Street",
        "category": "road",
        "category_display": "Road Issues",
        "description": "Large pothole near the intersection.",
        "location": "Main Street, Ward 5",
        "status": "Submitted",
        "date": "2025-02-10",
        "upvote_count": 0,
        "is_upvoted": false
    })
}

pub fn expired() -> Value {
    json!({"detail": "Given token not valid for any token type", "code": "token_not_valid"})
}
