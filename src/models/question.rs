// src/models/question.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use crate::{
    config::MAX_CHOICES,
    error::AppError,
    models::subject::find_subject,
    utils::{
        choice::{index_to_label, letter_to_index},
        html::{clean_all, clean_html},
    },
};

static SECTION_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("valid section code regex"));

/// A multiple-choice question as held by the question store.
/// Addressed by subject / section / id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: i64,
    pub subject_id: String,
    pub section_code: String,
    /// Prompt content (sanitized HTML).
    pub prompt: String,
    /// Ordered choices; index 0 is labelled 'A'.
    pub choices: Vec<String>,
    /// Zero-based index of the correct choice.
    pub correct_index: usize,
    pub explanation: Option<String>,
    pub image_urls: Vec<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Question {
    /// Letter of the correct choice, e.g. "C".
    pub fn correct_label(&self) -> String {
        index_to_label(self.correct_index).unwrap_or_default()
    }

    /// A label is available when it names a non-empty choice of this question.
    pub fn has_choice(&self, label: &str) -> bool {
        letter_to_index(label)
            .and_then(|i| self.choices.get(i))
            .is_some_and(|c| !c.trim().is_empty())
    }

    pub fn to_public(&self) -> PublicQuestion {
        PublicQuestion {
            id: self.id,
            subject_id: self.subject_id.clone(),
            section_code: self.section_code.clone(),
            prompt: self.prompt.clone(),
            choices: self.choices.clone(),
            image_urls: self.image_urls.clone(),
        }
    }
}

/// DTO for sending a question to a test taker (excludes answer key and explanation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub subject_id: String,
    pub section_code: String,
    pub prompt: String,
    pub choices: Vec<String>,
    pub image_urls: Vec<String>,
}

/// Sanitized question content ready to be written to the store.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub subject_id: String,
    pub section_code: String,
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_index: usize,
    pub explanation: Option<String>,
    pub image_urls: Vec<String>,
}

/// DTO for creating or replacing a question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(custom(function = validate_subject))]
    pub subject_id: String,
    #[validate(regex(path = *SECTION_CODE_RE, message = "Section code must be 1-32 letters, digits, '-' or '_'."))]
    pub section_code: String,
    #[validate(length(min = 1, max = 5000), custom(function = validate_not_blank))]
    pub prompt: String,
    #[validate(custom(function = validate_choices))]
    pub choices: Vec<String>,
    pub correct_index: usize,
    #[validate(length(max = 10000))]
    pub explanation: Option<String>,
    #[serde(default)]
    #[validate(custom(function = validate_image_urls))]
    pub image_urls: Vec<String>,
}

impl CreateQuestionRequest {
    /// Sanitizes the content, then validates what would be stored and checks
    /// the answer key.
    pub fn into_new_question(mut self) -> Result<NewQuestion, AppError> {
        self.prompt = clean_html(&self.prompt);
        self.choices = clean_all(&self.choices);
        self.explanation = self.explanation.as_deref().map(clean_html);
        self.validate()?;

        if self.correct_index >= self.choices.len() {
            return Err(AppError::BadRequest(format!(
                "correct_index {} is outside the {} available choices",
                self.correct_index,
                self.choices.len()
            )));
        }

        Ok(NewQuestion {
            subject_id: self.subject_id,
            section_code: self.section_code,
            prompt: self.prompt,
            choices: self.choices,
            correct_index: self.correct_index,
            explanation: self.explanation,
            image_urls: self.image_urls,
        })
    }
}

/// Query parameters for listing questions of a subject.
#[derive(Debug, Deserialize)]
pub struct QuestionListParams {
    pub section: Option<String>,
    pub limit: Option<usize>,
}

fn validate_subject(subject_id: &str) -> Result<(), validator::ValidationError> {
    if find_subject(subject_id).is_none() {
        return Err(validator::ValidationError::new("unknown_subject"));
    }
    Ok(())
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_choices(choices: &[String]) -> Result<(), validator::ValidationError> {
    if choices.is_empty() {
        return Err(validator::ValidationError::new("choices_cannot_be_empty"));
    }
    if choices.len() > MAX_CHOICES {
        return Err(validator::ValidationError::new("too_many_choices"));
    }
    for choice in choices {
        if choice.trim().is_empty() {
            return Err(validator::ValidationError::new("blank_choice"));
        }
        if choice.len() > 1000 {
            return Err(validator::ValidationError::new("choice_too_long"));
        }
    }
    Ok(())
}

fn validate_image_urls(urls: &[String]) -> Result<(), validator::ValidationError> {
    for url in urls {
        if url.len() > 500 {
            return Err(validator::ValidationError::new("url_too_long"));
        }
        if Url::parse(url).is_err() {
            return Err(validator::ValidationError::new("invalid_url"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateQuestionRequest {
        CreateQuestionRequest {
            subject_id: "ap-calculus-ab".to_string(),
            section_code: "unit-1".to_string(),
            prompt: "lim x->0 sin(x)/x = ?".to_string(),
            choices: vec!["0".into(), "1".into(), "Does not exist".into()],
            correct_index: 1,
            explanation: Some("Squeeze theorem.<script>x</script>".to_string()),
            image_urls: vec!["https://cdn.example.com/graph.png".to_string()],
        }
    }

    #[test]
    fn test_valid_request_is_sanitized() {
        let q = request().into_new_question().unwrap();
        assert_eq!(q.correct_index, 1);
        assert_eq!(q.explanation.as_deref(), Some("Squeeze theorem."));
    }

    #[test]
    fn test_content_that_sanitizes_to_empty_is_rejected() {
        let mut req = request();
        req.choices = vec!["0".into(), "<script>x</script>".into()];
        req.correct_index = 1;
        assert!(matches!(req.into_new_question(), Err(AppError::BadRequest(_))));

        let mut req = request();
        req.prompt = "<script>alert(1)</script>".to_string();
        assert!(matches!(req.into_new_question(), Err(AppError::BadRequest(_))));

        let mut req = request();
        req.choices = vec!["<b>0</b>".into(), "1".into()];
        let q = req.into_new_question().unwrap();
        assert!(q.choices.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_answer_key_must_be_in_range() {
        let mut req = request();
        req.correct_index = 3;
        assert!(matches!(req.into_new_question(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_rejects_six_choices_and_bad_codes() {
        let mut req = request();
        req.choices = (0..6).map(|i| i.to_string()).collect();
        assert!(req.into_new_question().is_err());

        let mut req = request();
        req.section_code = "unit 1!".to_string();
        assert!(req.into_new_question().is_err());

        let mut req = request();
        req.subject_id = "ap-alchemy".to_string();
        assert!(req.into_new_question().is_err());

        let mut req = request();
        req.image_urls = vec!["not a url".to_string()];
        assert!(req.into_new_question().is_err());
    }

    #[test]
    fn test_has_choice() {
        let q = Question {
            id: 1,
            subject_id: "ap-biology".into(),
            section_code: "unit-2".into(),
            prompt: "p".into(),
            choices: vec!["a".into(), "b".into(), " ".into()],
            correct_index: 1,
            explanation: None,
            image_urls: vec![],
            created_at: None,
        };
        assert!(q.has_choice("A"));
        assert!(q.has_choice("B"));
        assert!(!q.has_choice("C"));
        assert!(!q.has_choice("D"));
        assert!(!q.has_choice("b"));
        assert_eq!(q.correct_label(), "B");
    }
}
