// src/models/attempt.rs

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{models::question::PublicQuestion, quiz::session::Progress};

/// The document describing one in-progress quiz attempt.
///
/// Owned by a single user and mutated only by that user's client; the server
/// keeps at most one saved attempt per (user, subject).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizAttempt {
    pub subject_id: String,
    /// Section the attempt was drawn from. `None` means full-length.
    #[serde(default)]
    pub section: Option<String>,
    /// Question ids in the order they are presented.
    pub question_ids: Vec<i64>,
    #[serde(default)]
    pub current_index: usize,
    /// Question index -> chosen label ("A".."E").
    #[serde(default)]
    pub answers: BTreeMap<usize, String>,
    #[serde(default)]
    pub flagged: BTreeSet<usize>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub elapsed_seconds: u64,
    #[serde(default)]
    pub completed: bool,
}

/// DTO for starting a new attempt.
#[derive(Debug, Deserialize)]
pub struct StartTestRequest {
    /// Restrict the attempt to one section; omitted or "all" means full-length.
    pub section: Option<String>,
    /// Maximum number of questions to draw.
    pub count: Option<usize>,
}

/// DTO for submitting (or saving and exiting) an attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitTestRequest {
    pub attempt: QuizAttempt,
    /// `false` stores the result as paused instead of completed.
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

/// Attempt together with the questions needed to render it.
#[derive(Debug, Serialize)]
pub struct AttemptResponse {
    pub attempt: QuizAttempt,
    pub questions: Vec<PublicQuestion>,
    pub progress: Progress,
}
