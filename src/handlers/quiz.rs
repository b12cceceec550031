// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    config::{ALL_SECTIONS, MAX_QUESTIONS_PER_TEST},
    error::AppError,
    handlers::subjects::require_subject,
    models::attempt::{AttemptResponse, QuizAttempt, StartTestRequest, SubmitTestRequest},
    quiz::QuizSession,
    store::DynStore,
    utils::jwt::Claims,
};

/// Rebuilds a session from an attempt posted by the client or loaded from the store.
///
/// Fails with 400 when the attempt belongs to another subject, is too long,
/// or references questions, indices or labels that do not exist.
async fn restore_session(
    store: &DynStore,
    subject_id: &str,
    attempt: QuizAttempt,
) -> Result<QuizSession, AppError> {
    if attempt.subject_id != subject_id {
        return Err(AppError::BadRequest(format!(
            "Attempt is for subject '{}', not '{}'",
            attempt.subject_id, subject_id
        )));
    }
    if attempt.question_ids.len() > MAX_QUESTIONS_PER_TEST {
        return Err(AppError::BadRequest("Attempt has too many questions".to_string()));
    }

    let questions = store.get_questions_by_ids(&attempt.question_ids).await?;
    QuizSession::resume(attempt, &questions)
}

fn attempt_response(session: QuizSession) -> AttemptResponse {
    let progress = session.progress();
    let questions = session.questions().iter().map(|q| q.to_public()).collect();
    AttemptResponse {
        attempt: session.into_attempt(),
        questions,
        progress,
    }
}

/// Starts a new attempt for a subject, full-length or for one section.
///
/// The fresh attempt is saved immediately so it can be resumed, replacing
/// any previously saved attempt for the subject.
pub async fn start_test(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(subject_id): Path<String>,
    Json(req): Json<StartTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_subject(&subject_id)?;
    let user_id = claims.user_id()?;

    let section = req.section.filter(|s| s != ALL_SECTIONS);
    let count = req
        .count
        .unwrap_or(MAX_QUESTIONS_PER_TEST)
        .min(MAX_QUESTIONS_PER_TEST);

    let questions = store
        .list_questions(&subject_id, section.as_deref(), count)
        .await?;
    if questions.is_empty() {
        return Err(AppError::NotFound(
            "No questions available for this selection".to_string(),
        ));
    }

    let session = QuizSession::new(&subject_id, section, questions);
    store.save_progress(user_id, session.attempt()).await?;

    tracing::info!(
        "User {} started a {}-question attempt for {}",
        user_id,
        session.questions().len(),
        subject_id
    );
    Ok((StatusCode::CREATED, Json(attempt_response(session))))
}

/// Persists an in-progress attempt. Last write wins.
pub async fn save_quiz_progress(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(subject_id): Path<String>,
    Json(attempt): Json<QuizAttempt>,
) -> Result<impl IntoResponse, AppError> {
    require_subject(&subject_id)?;
    let user_id = claims.user_id()?;

    let session = restore_session(&store, &subject_id, attempt).await?;
    store.save_progress(user_id, session.attempt()).await?;

    Ok(Json(json!({
        "message": "Progress saved",
        "progress": session.progress(),
    })))
}

/// Returns the saved attempt for a subject together with its questions.
pub async fn get_quiz_progress(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(subject_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_subject(&subject_id)?;
    let user_id = claims.user_id()?;

    let attempt = store
        .load_progress(user_id, &subject_id)
        .await?
        .ok_or(AppError::NotFound("No saved progress".to_string()))?;

    let session = restore_session(&store, &subject_id, attempt).await?;
    Ok(Json(attempt_response(session)))
}

/// Discards the saved attempt for a subject.
pub async fn delete_quiz_progress(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(subject_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_subject(&subject_id)?;
    let user_id = claims.user_id()?;

    let deleted = store.clear_progress(user_id, &subject_id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

/// Finalizes an attempt into a stored test result.
///
/// * Replays the posted attempt through the session model (validation).
/// * Computes score and per-section breakdown.
/// * Stores the result and clears the saved progress for the subject.
pub async fn submit_test(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(subject_id): Path<String>,
    Json(req): Json<SubmitTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_subject(&subject_id)?;
    let user_id = claims.user_id()?;

    let session = restore_session(&store, &subject_id, req.attempt).await?;
    let snapshot = session.finalize(req.completed);
    let result = store
        .insert_test_result(user_id, &subject_id, snapshot)
        .await?;

    if let Err(e) = store.clear_progress(user_id, &subject_id).await {
        tracing::warn!("Result {} stored but progress not cleared: {}", result.id, e);
    }

    tracing::info!(
        "User {} finished {} with {}/{}",
        user_id,
        subject_id,
        result.score.correct,
        result.score.total
    );
    Ok((StatusCode::CREATED, Json(result)))
}
