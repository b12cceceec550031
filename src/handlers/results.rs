// src/handlers/results.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    handlers::subjects::require_subject,
    models::test_result::{TestResult, TestResultSummary},
    quiz::section_view,
    store::DynStore,
    utils::jwt::Claims,
};

async fn load_result(
    store: &DynStore,
    claims: &Claims,
    subject_id: &str,
    test_id: i64,
) -> Result<TestResult, AppError> {
    require_subject(subject_id)?;
    let user_id = claims.user_id()?;

    store
        .get_test_result(user_id, subject_id, test_id)
        .await?
        .ok_or(AppError::NotFound("Test result not found".to_string()))
}

/// Lists the current user's results for a subject, newest first.
pub async fn list_test_results(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(subject_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_subject(&subject_id)?;
    let user_id = claims.user_id()?;

    let results: Vec<TestResultSummary> = store
        .list_test_results(user_id, &subject_id)
        .await?
        .iter()
        .map(TestResult::summary)
        .collect();

    Ok(Json(results))
}

/// Full stored result.
pub async fn get_test_result(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path((subject_id, test_id)): Path<(String, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let result = load_result(&store, &claims, &subject_id, test_id).await?;
    Ok(Json(result))
}

/// One section of a stored result, re-indexed for review.
/// `all` returns the whole test.
pub async fn get_section_review(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path((subject_id, test_id, section_code)): Path<(String, i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let result = load_result(&store, &claims, &subject_id, test_id).await?;
    Ok(Json(section_view(&result, &section_code)))
}

/// Removes a stored result entirely.
pub async fn delete_test(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path((subject_id, test_id)): Path<(String, i64)>,
) -> Result<impl IntoResponse, AppError> {
    require_subject(&subject_id)?;
    let user_id = claims.user_id()?;

    if !store.delete_test_result(user_id, &subject_id, test_id).await? {
        return Err(AppError::NotFound("Test result not found".to_string()));
    }

    tracing::info!("User {} deleted test result {}", user_id, test_id);
    Ok(Json(json!({ "success": true })))
}
