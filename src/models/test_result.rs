// src/models/test_result.rs

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// Score of an attempt or of a subset of it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    /// `round(100 * correct / total)`, 0 for an empty test.
    pub percentage: u32,
}

impl Score {
    pub fn new(correct: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (100.0 * correct as f64 / total as f64).round() as u32
        };
        Self {
            correct,
            total,
            percentage,
        }
    }
}

/// Per-section statistics stored with a result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionBreakdown {
    pub unit_number: Option<u32>,
    pub section_name: Option<String>,
    pub correct: usize,
    pub total: usize,
}

/// Frozen copy of a question as it was when the test was taken.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultQuestion {
    pub question_id: i64,
    pub section_code: String,
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_index: usize,
    pub explanation: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl From<&Question> for ResultQuestion {
    fn from(q: &Question) -> Self {
        Self {
            question_id: q.id,
            section_code: q.section_code.clone(),
            prompt: q.prompt.clone(),
            choices: q.choices.clone(),
            correct_index: q.correct_index,
            explanation: q.explanation.clone(),
            image_urls: q.image_urls.clone(),
        }
    }
}

/// Everything about a finished attempt except its identity.
/// This is the JSON document persisted by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultSnapshot {
    pub section: Option<String>,
    pub questions: Vec<ResultQuestion>,
    pub answers: BTreeMap<usize, String>,
    #[serde(default)]
    pub flagged: BTreeSet<usize>,
    pub score: Score,
    pub section_breakdown: BTreeMap<String, SectionBreakdown>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub elapsed_seconds: u64,
    pub completed: bool,
}

/// A stored test result. Read-only after creation except for deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub id: i64,
    pub user_id: i64,
    pub subject_id: String,
    pub section: Option<String>,
    pub questions: Vec<ResultQuestion>,
    pub answers: BTreeMap<usize, String>,
    pub flagged: BTreeSet<usize>,
    pub score: Score,
    pub section_breakdown: BTreeMap<String, SectionBreakdown>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub elapsed_seconds: u64,
    pub completed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl TestResult {
    pub fn from_snapshot(
        id: i64,
        user_id: i64,
        subject_id: String,
        snapshot: ResultSnapshot,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            subject_id,
            section: snapshot.section,
            questions: snapshot.questions,
            answers: snapshot.answers,
            flagged: snapshot.flagged,
            score: snapshot.score,
            section_breakdown: snapshot.section_breakdown,
            started_at: snapshot.started_at,
            elapsed_seconds: snapshot.elapsed_seconds,
            completed: snapshot.completed,
            created_at,
        }
    }

    pub fn summary(&self) -> TestResultSummary {
        TestResultSummary {
            id: self.id,
            subject_id: self.subject_id.clone(),
            section: self.section.clone(),
            score: self.score,
            completed: self.completed,
            elapsed_seconds: self.elapsed_seconds,
            created_at: self.created_at,
        }
    }
}

/// Row of the result history listing.
#[derive(Debug, Serialize)]
pub struct TestResultSummary {
    pub id: i64,
    pub subject_id: String,
    pub section: Option<String>,
    pub score: Score,
    pub completed: bool,
    pub elapsed_seconds: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
