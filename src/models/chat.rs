// src/models/chat.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of an explanation conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// DTO for asking the tutor a follow-up question about one question.
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    pub question_id: i64,
    /// The label the student picked, if any.
    pub user_answer: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub history: Vec<ChatTurn>,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Conversation after this exchange. Unchanged when `fallback` is set.
    pub history: Vec<ChatTurn>,
    pub fallback: bool,
}
