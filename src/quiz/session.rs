// src/quiz/session.rs

//! In-progress quiz state: answers, flags, navigation, timing and scoring.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::{
    config::ALL_SECTIONS,
    error::AppError,
    models::{
        attempt::QuizAttempt,
        question::Question,
        subject::find_subject,
        test_result::{ResultQuestion, ResultSnapshot, Score, SectionBreakdown},
    },
};

/// Aggregated view of attempt progress, useful for UI.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub answered: usize,
    pub flagged: usize,
    pub remaining: usize,
    pub current_index: usize,
}

/// A quiz attempt bound to the questions it refers to.
///
/// `questions[i]` is always the question whose id is `attempt.question_ids[i]`.
#[derive(Debug, Clone)]
pub struct QuizSession {
    attempt: QuizAttempt,
    questions: Vec<Question>,
}

impl QuizSession {
    /// Starts a fresh attempt over `questions`, in the given order.
    pub fn new(subject_id: &str, section: Option<String>, questions: Vec<Question>) -> Self {
        let attempt = QuizAttempt {
            subject_id: subject_id.to_string(),
            section,
            question_ids: questions.iter().map(|q| q.id).collect(),
            current_index: 0,
            answers: BTreeMap::new(),
            flagged: BTreeSet::new(),
            started_at: chrono::Utc::now(),
            elapsed_seconds: 0,
            completed: false,
        };
        Self { attempt, questions }
    }

    /// Rebuilds a session from a saved or client-posted attempt.
    ///
    /// Every question id must resolve among `available`, and every stored
    /// answer and flag is re-validated against the resolved questions.
    pub fn resume(mut attempt: QuizAttempt, available: &[Question]) -> Result<Self, AppError> {
        let by_id: HashMap<i64, &Question> = available.iter().map(|q| (q.id, q)).collect();

        let mut questions = Vec::with_capacity(attempt.question_ids.len());
        for id in &attempt.question_ids {
            let question = by_id
                .get(id)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown question id {}", id)))?;
            if question.subject_id != attempt.subject_id {
                return Err(AppError::BadRequest(format!(
                    "Question {} does not belong to subject '{}'",
                    id, attempt.subject_id
                )));
            }
            if let Some(section) = attempt.section.as_deref() {
                if section != ALL_SECTIONS && question.section_code != section {
                    return Err(AppError::BadRequest(format!(
                        "Question {} is not in section '{}'",
                        id, section
                    )));
                }
            }
            questions.push((*question).clone());
        }

        let answers = std::mem::take(&mut attempt.answers);
        let flagged = std::mem::take(&mut attempt.flagged);
        let mut session = Self { attempt, questions };

        for (index, label) in answers {
            session.select_answer(index, &label)?;
        }
        for index in flagged {
            session.ensure_index(index)?;
            session.attempt.flagged.insert(index);
        }

        let last = session.questions.len().saturating_sub(1);
        session.attempt.current_index = session.attempt.current_index.min(last);

        Ok(session)
    }

    pub fn attempt(&self) -> &QuizAttempt {
        &self.attempt
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn into_attempt(self) -> QuizAttempt {
        self.attempt
    }

    fn ensure_index(&self, index: usize) -> Result<&Question, AppError> {
        self.questions.get(index).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Question index {} is outside the attempt ({} questions)",
                index,
                self.questions.len()
            ))
        })
    }

    /// Records or overwrites the answer for a question index.
    pub fn select_answer(&mut self, index: usize, label: &str) -> Result<(), AppError> {
        let question = self.ensure_index(index)?;
        if !question.has_choice(label) {
            return Err(AppError::BadRequest(format!(
                "'{}' is not an available choice for question {}",
                label,
                index + 1
            )));
        }
        self.attempt.answers.insert(index, label.to_string());
        Ok(())
    }

    pub fn clear_answer(&mut self, index: usize) -> Option<String> {
        self.attempt.answers.remove(&index)
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.attempt.answers.get(&index).map(String::as_str)
    }

    /// Flags or unflags a question. Returns whether it is flagged afterwards.
    pub fn toggle_flag(&mut self, index: usize) -> Result<bool, AppError> {
        self.ensure_index(index)?;
        if self.attempt.flagged.remove(&index) {
            Ok(false)
        } else {
            self.attempt.flagged.insert(index);
            Ok(true)
        }
    }

    pub fn is_flagged(&self, index: usize) -> bool {
        self.attempt.flagged.contains(&index)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.attempt.current_index)
    }

    pub fn go_to(&mut self, index: usize) -> Result<&Question, AppError> {
        self.ensure_index(index)?;
        self.attempt.current_index = index;
        Ok(&self.questions[index])
    }

    /// Moves forward one question. Stays put (and returns `None`) on the last one.
    pub fn next(&mut self) -> Option<&Question> {
        let next = self.attempt.current_index + 1;
        if next >= self.questions.len() {
            return None;
        }
        self.attempt.current_index = next;
        self.questions.get(next)
    }

    /// Moves back one question. Stays put (and returns `None`) on the first one.
    pub fn previous(&mut self) -> Option<&Question> {
        let prev = self.attempt.current_index.checked_sub(1)?;
        self.attempt.current_index = prev;
        self.questions.get(prev)
    }

    /// Elapsed time never goes backwards.
    pub fn record_elapsed(&mut self, seconds: u64) {
        self.attempt.elapsed_seconds = self.attempt.elapsed_seconds.max(seconds);
    }

    pub fn progress(&self) -> Progress {
        let total = self.questions.len();
        let answered = self.attempt.answers.len();
        Progress {
            total,
            answered,
            flagged: self.attempt.flagged.len(),
            remaining: total - answered,
            current_index: self.attempt.current_index,
        }
    }

    fn is_correct(&self, index: usize) -> bool {
        match (self.questions.get(index), self.answer(index)) {
            (Some(q), Some(label)) => q.correct_label() == label,
            _ => false,
        }
    }

    /// Unanswered questions count as incorrect.
    pub fn compute_score(&self) -> Score {
        let correct = (0..self.questions.len())
            .filter(|&i| self.is_correct(i))
            .count();
        Score::new(correct, self.questions.len())
    }

    /// Freezes the attempt into a result snapshot with its section breakdown.
    pub fn finalize(mut self, completed: bool) -> ResultSnapshot {
        self.attempt.completed = completed;
        let subject = find_subject(&self.attempt.subject_id);

        let mut section_breakdown: BTreeMap<String, SectionBreakdown> = BTreeMap::new();
        for (index, question) in self.questions.iter().enumerate() {
            let entry = section_breakdown
                .entry(question.section_code.clone())
                .or_insert_with(|| {
                    let unit = subject.and_then(|s| s.unit_for_section(&question.section_code));
                    SectionBreakdown {
                        unit_number: unit.map(|u| u.number),
                        section_name: unit.map(|u| u.name.to_string()),
                        correct: 0,
                        total: 0,
                    }
                });
            entry.total += 1;
            if self.is_correct(index) {
                entry.correct += 1;
            }
        }

        let score = self.compute_score();
        tracing::debug!(
            subject = %self.attempt.subject_id,
            correct = score.correct,
            total = score.total,
            "Finalized quiz attempt"
        );

        ResultSnapshot {
            section: self.attempt.section,
            questions: self.questions.iter().map(ResultQuestion::from).collect(),
            answers: self.attempt.answers,
            flagged: self.attempt.flagged,
            score,
            section_breakdown,
            started_at: self.attempt.started_at,
            elapsed_seconds: self.attempt.elapsed_seconds,
            completed: self.attempt.completed,
        }
    }
}
