// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Sentinel section code meaning "the whole test".
pub const ALL_SECTIONS: &str = "all";

/// Upper bound on the number of choices a question may carry (A-E).
pub const MAX_CHOICES: usize = 5;

/// Upper bound on the number of questions served for one attempt.
pub const MAX_QUESTIONS_PER_TEST: usize = 200;

/// Number of prior chat turns forwarded to the tutor.
pub const MAX_CHAT_HISTORY_TURNS: usize = 10;

/// Shown to the user whenever the tutor cannot answer.
pub const CHAT_FALLBACK_MESSAGE: &str =
    "Sorry, I couldn't generate an explanation right now. Please try again in a moment.";

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When absent the in-memory store is used.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty());

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let admin_username = env::var("ADMIN_USERNAME").ok();
        let admin_password = env::var("ADMIN_PASSWORD").ok();

        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|v| !v.trim().is_empty());
        let gemini_model = env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| "gemini-1.5-flash".to_string());
        let gemini_base_url = env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            admin_username,
            admin_password,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
            port,
        }
    }
}
