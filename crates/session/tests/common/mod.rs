#![allow(dead_code)]

use std::sync::Arc;

use civic_client::{CivicClient, ClientConfig, MemoryTokenStore, TokenStore};
use civic_core::tokens::TokenPair;
use civic_session::Session;
use civic_testkit::MockBackend;
use serde_json::{json, Value};

pub async fn setup(tokens: Option<TokenPair>) -> (MockBackend, Session, Arc<MemoryTokenStore>) {
    let backend = MockBackend::start().await;
    let store = Arc::new(match tokens {
        Some(pair) => MemoryTokenStore::with_tokens(&pair),
        None => MemoryTokenStore::new(),
    });
    let config = ClientConfig::new(backend.base_url()).unwrap();
    let client = CivicClient::new(config, Arc::clone(&store) as Arc<dyn TokenStore>).unwrap();
    (backend, Session::new(client), store)
}

pub fn user(id: i64, username: &str, is_staff: bool) -> Value {
    json!({"id": id, "username": username, "is_staff": is_staff})
}

pub fn auth_response(user: Value, access: &str, refresh: &str) -> Value {
    json!({"user": user, "tokens": {"access": access, "refresh": refresh}})
}
