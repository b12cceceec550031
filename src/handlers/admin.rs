// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{error::AppError, models::question::CreateQuestionRequest, store::DynStore};

/// Creates a new question.
/// Admin only.
pub async fn create_question(
    State(store): State<DynStore>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let question = store.insert_question(payload.into_new_question()?).await?;

    tracing::info!(
        "Created question {} in {}/{}",
        question.id,
        question.subject_id,
        question.section_code
    );
    Ok((StatusCode::CREATED, Json(question)))
}

/// Replaces the content of an existing question.
/// Admin only.
pub async fn update_question(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let question = store
        .update_question(id, payload.into_new_question()?)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

/// Deletes a question. Stored test results keep their own snapshot of it.
/// Admin only.
pub async fn delete_question(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_question(id).await? {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
