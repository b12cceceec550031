// src/ai/mod.rs

//! Explanation chat: context assembly and the generative-AI seam.

pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::MAX_CHAT_HISTORY_TURNS,
    error::AppError,
    models::{chat::ChatTurn, question::Question},
    utils::choice::index_to_letter,
};

pub use gemini::GeminiTutor;

pub type DynTutor = Arc<dyn Tutor>;

/// What is sent to the model for one exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct TutorPrompt {
    /// Question context and tutoring instructions.
    pub system: String,
    /// Bounded prior turns followed by the new user message.
    pub turns: Vec<ChatTurn>,
}

/// A text generator able to answer tutoring questions. Stateless per call.
#[async_trait]
pub trait Tutor: Send + Sync {
    async fn reply(&self, prompt: &TutorPrompt) -> Result<String, AppError>;
}

/// Used when no API key is configured; every call fails.
pub struct DisabledTutor;

#[async_trait]
impl Tutor for DisabledTutor {
    async fn reply(&self, _prompt: &TutorPrompt) -> Result<String, AppError> {
        Err(AppError::ServiceUnavailable(
            "Explanation chat is not configured".to_string(),
        ))
    }
}

/// Assembles the prompt for a follow-up question about `question`.
///
/// Only the most recent [`MAX_CHAT_HISTORY_TURNS`] turns of `history` are kept.
pub fn build_prompt(
    question: &Question,
    user_answer: Option<&str>,
    history: &[ChatTurn],
    message: &str,
) -> TutorPrompt {
    let mut system = String::from(
        "You are a patient AP exam tutor. Explain concepts step by step, refer to the \
         question below, and keep answers focused and concise.\n\n",
    );
    system.push_str(&format!("Question:\n{}\n\nChoices:\n", question.prompt));
    for (i, choice) in question.choices.iter().enumerate() {
        if let Some(letter) = index_to_letter(i) {
            system.push_str(&format!("{}. {}\n", letter, choice));
        }
    }
    system.push_str(&format!("\nCorrect answer: {}\n", question.correct_label()));
    if let Some(explanation) = &question.explanation {
        system.push_str(&format!("Explanation: {}\n", explanation));
    }
    match user_answer {
        Some(answer) => system.push_str(&format!("The student answered: {}\n", answer)),
        None => system.push_str("The student did not answer this question.\n"),
    }

    let start = history.len().saturating_sub(MAX_CHAT_HISTORY_TURNS);
    let mut turns: Vec<ChatTurn> = history[start..].to_vec();
    turns.push(ChatTurn::user(message));

    TutorPrompt { system, turns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::ChatRole;

    fn question() -> Question {
        Question {
            id: 3,
            subject_id: "ap-chemistry".into(),
            section_code: "unit-8".into(),
            prompt: "Which is a strong acid?".into(),
            choices: vec!["HF".into(), "HCl".into(), "CH3COOH".into()],
            correct_index: 1,
            explanation: Some("HCl dissociates completely.".into()),
            image_urls: vec![],
            created_at: None,
        }
    }

    #[test]
    fn test_prompt_carries_question_context() {
        let prompt = build_prompt(&question(), Some("A"), &[], "Why not HF?");
        assert!(prompt.system.contains("Which is a strong acid?"));
        assert!(prompt.system.contains("B. HCl"));
        assert!(prompt.system.contains("Correct answer: B"));
        assert!(prompt.system.contains("HCl dissociates completely."));
        assert!(prompt.system.contains("The student answered: A"));
        assert_eq!(prompt.turns, vec![ChatTurn::user("Why not HF?")]);
    }

    #[test]
    fn test_history_is_bounded() {
        let history: Vec<ChatTurn> = (0..25)
            .map(|i| {
                if i % 2 == 0 {
                    ChatTurn::user(format!("q{}", i))
                } else {
                    ChatTurn::assistant(format!("a{}", i))
                }
            })
            .collect();
        let prompt = build_prompt(&question(), None, &history, "last");

        assert_eq!(prompt.turns.len(), MAX_CHAT_HISTORY_TURNS + 1);
        assert_eq!(prompt.turns[0].content, "a15");
        let last = prompt.turns.last().unwrap();
        assert_eq!(last.role, ChatRole::User);
        assert_eq!(last.content, "last");
    }

    #[tokio::test]
    async fn test_disabled_tutor_fails() {
        let prompt = build_prompt(&question(), None, &[], "hi");
        assert!(matches!(
            DisabledTutor.reply(&prompt).await,
            Err(AppError::ServiceUnavailable(_))
        ));
    }
}
