// src/handlers/questions.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    config::{ALL_SECTIONS, MAX_QUESTIONS_PER_TEST},
    error::AppError,
    handlers::subjects::require_subject,
    models::question::{PublicQuestion, QuestionListParams},
    store::DynStore,
};

/// Lists questions of a subject without their answer keys.
/// Optionally restricted to one section.
pub async fn list_questions(
    State(store): State<DynStore>,
    Path(subject_id): Path<String>,
    Query(params): Query<QuestionListParams>,
) -> Result<impl IntoResponse, AppError> {
    require_subject(&subject_id)?;

    let section = params.section.as_deref().filter(|s| *s != ALL_SECTIONS);
    let limit = params
        .limit
        .unwrap_or(MAX_QUESTIONS_PER_TEST)
        .min(MAX_QUESTIONS_PER_TEST);

    let questions: Vec<PublicQuestion> = store
        .list_questions(&subject_id, section, limit)
        .await?
        .iter()
        .map(|q| q.to_public())
        .collect();

    Ok(Json(questions))
}

/// Fetches one question by its composite key subject / section / id.
pub async fn get_question(
    State(store): State<DynStore>,
    Path((subject_id, section_code, question_id)): Path<(String, String, i64)>,
) -> Result<impl IntoResponse, AppError> {
    require_subject(&subject_id)?;

    let question = store
        .get_question(question_id)
        .await?
        .filter(|q| q.subject_id == subject_id && q.section_code == section_code)
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question.to_public()))
}
