// src/ai/gemini.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Tutor, TutorPrompt};
use crate::{
    config::Config,
    error::AppError,
    models::chat::{ChatRole, ChatTurn},
};

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiTutor {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiTutor {
    /// `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.gemini_api_key.clone()?;
        Some(Self {
            client: Client::new(),
            base_url: config.gemini_base_url.clone(),
            api_key,
            model: config.gemini_model.clone(),
        })
    }
}

#[async_trait]
impl Tutor for GeminiTutor {
    async fn reply(&self, prompt: &TutorPrompt) -> Result<String, AppError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let payload = GenerateRequest::from_prompt(prompt);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ServiceUnavailable(format!(
                "Gemini returned {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response.json().await?;
        body.text()
            .ok_or_else(|| AppError::ServiceUnavailable("Gemini returned no text".to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GenerateRequest {
    fn from_prompt(prompt: &TutorPrompt) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: prompt.system.clone(),
                }],
            },
            contents: prompt.turns.iter().map(Content::from_turn).collect(),
            generation_config: GenerationConfig { temperature: 0.4 },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn from_turn(turn: &ChatTurn) -> Self {
        let role = match turn.role {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        };
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: turn.content.clone(),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, trimmed. `None` if empty.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}
