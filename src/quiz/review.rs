// src/quiz/review.rs

//! Read-time reconstruction of one section (or the whole test) from a stored
//! result, for the review screens.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    config::ALL_SECTIONS,
    models::test_result::{ResultQuestion, Score, TestResult},
    utils::choice::index_to_label,
};

/// An answer re-keyed into a filtered view, remembering where it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewAnswer {
    pub answer: String,
    pub original_index: usize,
}

/// Output of [`filter_by_section`].
#[derive(Debug, Clone, PartialEq)]
pub struct SectionFilter {
    pub questions: Vec<ResultQuestion>,
    /// Keyed by index within `questions`.
    pub answers: BTreeMap<usize, ReviewAnswer>,
    /// `original_indices[i]` is the position of `questions[i]` in the full test.
    pub original_indices: Vec<usize>,
}

impl SectionFilter {
    /// The filtered answers keyed by filtered index, without back-references.
    pub fn answer_labels(&self) -> BTreeMap<usize, String> {
        self.answers
            .iter()
            .map(|(i, a)| (*i, a.answer.clone()))
            .collect()
    }
}

/// Keeps the questions tagged with `section_code`, in their original order.
///
/// The sentinel [`ALL_SECTIONS`] keeps everything. A code that matches
/// nothing yields an empty filter.
pub fn filter_by_section(
    questions: &[ResultQuestion],
    answers: &BTreeMap<usize, String>,
    section_code: &str,
) -> SectionFilter {
    let keep_all = section_code == ALL_SECTIONS;

    let mut filter = SectionFilter {
        questions: Vec::new(),
        answers: BTreeMap::new(),
        original_indices: Vec::new(),
    };

    for (original_index, question) in questions.iter().enumerate() {
        if !keep_all && question.section_code != section_code {
            continue;
        }
        let index = filter.questions.len();
        if let Some(answer) = answers.get(&original_index) {
            filter.answers.insert(
                index,
                ReviewAnswer {
                    answer: answer.clone(),
                    original_index,
                },
            );
        }
        filter.questions.push(question.clone());
        filter.original_indices.push(original_index);
    }

    filter
}

/// Display metadata for the reviewed section. Fields are absent when the
/// stored breakdown has no entry for the section.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SectionMeta {
    pub section_code: String,
    pub unit_number: Option<u32>,
    pub section_name: Option<String>,
    pub correct: Option<usize>,
    pub total: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewQuestion {
    pub index: usize,
    pub original_index: usize,
    /// 1-based number matching the full-length test.
    pub question_number: usize,
    #[serde(flatten)]
    pub question: ResultQuestion,
    pub correct_answer: String,
    pub user_answer: Option<String>,
    pub is_correct: bool,
    pub flagged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub test_id: i64,
    pub subject_id: String,
    pub section_code: String,
    pub questions: Vec<ReviewQuestion>,
    pub answers: BTreeMap<usize, ReviewAnswer>,
    pub original_indices: Vec<usize>,
    pub metadata: SectionMeta,
    /// Score recomputed over the filtered questions.
    pub score: Score,
}

/// Builds the review view of one section of a stored result.
pub fn section_view(result: &TestResult, section_code: &str) -> SectionView {
    let filter = filter_by_section(&result.questions, &result.answers, section_code);

    let questions: Vec<ReviewQuestion> = filter
        .questions
        .iter()
        .zip(&filter.original_indices)
        .enumerate()
        .map(|(index, (question, &original_index))| {
            let correct_answer = index_to_label(question.correct_index).unwrap_or_default();
            let user_answer = filter.answers.get(&index).map(|a| a.answer.clone());
            ReviewQuestion {
                index,
                original_index,
                question_number: original_index + 1,
                question: question.clone(),
                is_correct: user_answer.as_deref() == Some(correct_answer.as_str()),
                correct_answer,
                user_answer,
                flagged: result.flagged.contains(&original_index),
            }
        })
        .collect();

    let correct = questions.iter().filter(|q| q.is_correct).count();
    let score = Score::new(correct, questions.len());

    let metadata = if section_code == ALL_SECTIONS {
        SectionMeta {
            section_code: section_code.to_string(),
            unit_number: None,
            section_name: None,
            correct: Some(result.score.correct),
            total: Some(result.score.total),
        }
    } else {
        let entry = result.section_breakdown.get(section_code);
        SectionMeta {
            section_code: section_code.to_string(),
            unit_number: entry.and_then(|e| e.unit_number),
            section_name: entry.and_then(|e| e.section_name.clone()),
            correct: entry.map(|e| e.correct),
            total: entry.map(|e| e.total),
        }
    };

    SectionView {
        test_id: result.id,
        subject_id: result.subject_id.clone(),
        section_code: section_code.to_string(),
        questions,
        answers: filter.answers,
        original_indices: filter.original_indices,
        metadata,
        score,
    }
}
