// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use ap_prep_backend::{
    ai::{DisabledTutor, DynTutor, Tutor, TutorPrompt},
    config::Config,
    error::AppError,
    routes,
    state::AppState,
    store::{MemoryStore, Store},
    utils::jwt::sign_jwt,
};
use async_trait::async_trait;

pub const JWT_SECRET: &str = "test_secret_for_integration_tests";

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Creates a user directly in the store and returns a bearer token for it.
    pub async fn token_for(&self, role: &str) -> String {
        let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);
        let user = self
            .store
            .create_user(&username, "not-a-real-hash", role)
            .await
            .expect("Failed to create user");
        sign_jwt(user.id, role, JWT_SECRET, 600).expect("Failed to sign token")
    }

    /// Creates a question through the admin API and returns its JSON.
    pub async fn create_question(
        &self,
        admin_token: &str,
        subject_id: &str,
        section_code: &str,
        correct_index: usize,
    ) -> serde_json::Value {
        let response = self
            .client
            .post(self.url("/api/admin/questions"))
            .bearer_auth(admin_token)
            .json(&serde_json::json!({
                "subject_id": subject_id,
                "section_code": section_code,
                "prompt": format!("Question in {}", section_code),
                "choices": ["first", "second", "third", "fourth"],
                "correct_index": correct_index,
                "explanation": "Because.",
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Failed to parse question json")
    }
}

/// Replies with a canned explanation that echoes the last user turn.
pub struct EchoTutor;

#[async_trait]
impl Tutor for EchoTutor {
    async fn reply(&self, prompt: &TutorPrompt) -> Result<String, AppError> {
        let last = prompt.turns.last().map(|t| t.content.clone()).unwrap_or_default();
        Ok(format!("You asked: {}", last))
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_tutor(Arc::new(DisabledTutor)).await
}

/// Spawns the app on a random port backed by the in-memory store.
pub async fn spawn_app_with_tutor(tutor: DynTutor) -> TestApp {
    let store = Arc::new(MemoryStore::new());

    let config = Config {
        database_url: None,
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        admin_username: None,
        admin_password: None,
        gemini_api_key: None,
        gemini_model: "test-model".to_string(),
        gemini_base_url: "http://127.0.0.1:9".to_string(),
        port: 0,
    };

    let state = AppState {
        store: store.clone(),
        config,
        tutor,
    };
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        store,
        client: reqwest::Client::new(),
    }
}
