// src/handlers/subjects.rs

use axum::{Json, extract::Path, response::IntoResponse};

use crate::{
    error::AppError,
    models::subject::{Subject, SubjectSummary, all_subjects, find_subject},
};

/// Resolves a subject id from a path, or 404.
pub(crate) fn require_subject(subject_id: &str) -> Result<&'static Subject, AppError> {
    find_subject(subject_id)
        .ok_or_else(|| AppError::NotFound(format!("Subject '{}' not found", subject_id)))
}

/// Lists every subject in the catalog.
pub async fn list_subjects() -> impl IntoResponse {
    let subjects: Vec<SubjectSummary> = all_subjects().iter().map(Subject::summary).collect();
    Json(subjects)
}

/// Full subject metadata: units, section codes, exam weights and format.
pub async fn get_subject(Path(subject_id): Path<String>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(require_subject(&subject_id)?))
}
