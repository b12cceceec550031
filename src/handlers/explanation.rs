// src/handlers/explanation.rs

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    ai::{DynTutor, build_prompt},
    config::CHAT_FALLBACK_MESSAGE,
    error::AppError,
    models::chat::{ChatRequest, ChatResponse, ChatTurn},
    store::DynStore,
};

/// Forwards a follow-up question about a quiz question to the tutor.
///
/// A tutor failure is not an error for the client: it gets the fallback
/// message and its conversation back unchanged.
pub async fn chat(
    State(store): State<DynStore>,
    State(tutor): State<DynTutor>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let question = store
        .get_question(req.question_id)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    if let Some(answer) = req.user_answer.as_deref() {
        if !question.has_choice(answer) {
            return Err(AppError::BadRequest(format!(
                "'{}' is not an available choice for this question",
                answer
            )));
        }
    }

    let prompt = build_prompt(
        &question,
        req.user_answer.as_deref(),
        &req.history,
        &req.message,
    );

    let response = match tutor.reply(&prompt).await {
        Ok(reply) => {
            let mut history = req.history;
            history.push(ChatTurn::user(req.message));
            history.push(ChatTurn::assistant(reply.clone()));
            ChatResponse {
                reply,
                history,
                fallback: false,
            }
        }
        Err(e) => {
            tracing::warn!("Explanation chat failed for question {}: {}", question.id, e);
            ChatResponse {
                reply: CHAT_FALLBACK_MESSAGE.to_string(),
                history: req.history,
                fallback: true,
            }
        }
    };

    Ok(Json(response))
}
