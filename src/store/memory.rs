// src/store/memory.rs

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Store;
use crate::{
    error::AppError,
    models::{
        attempt::QuizAttempt,
        question::{NewQuestion, Question},
        test_result::{ResultSnapshot, TestResult},
        user::User,
    },
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    questions: BTreeMap<i64, Question>,
    progress: HashMap<(i64, String), QuizAttempt>,
    results: BTreeMap<i64, TestResult>,
    next_user_id: i64,
    next_question_id: i64,
    next_result_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Process-local store. Data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn build_question(id: i64, q: NewQuestion, created_at: chrono::DateTime<chrono::Utc>) -> Question {
    Question {
        id,
        subject_id: q.subject_id,
        section_code: q.section_code,
        prompt: q.prompt,
        choices: q.choices,
        correct_index: q.correct_index,
        explanation: q.explanation,
        image_urls: q.image_urls,
        created_at: Some(created_at),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == username) {
            return Err(AppError::Conflict(format!(
                "Username '{}' already exists",
                username
            )));
        }
        let id = Tables::next_id(&mut tables.next_user_id);
        let user = User {
            id,
            username: username.to_string(),
            password: password_hash.to_string(),
            role: role.to_string(),
            created_at: Some(chrono::Utc::now()),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn insert_question(&self, question: NewQuestion) -> Result<Question, AppError> {
        let mut tables = self.tables.write().await;
        let id = Tables::next_id(&mut tables.next_question_id);
        let question = build_question(id, question, chrono::Utc::now());
        tables.questions.insert(id, question.clone());
        Ok(question)
    }

    async fn update_question(
        &self,
        id: i64,
        question: NewQuestion,
    ) -> Result<Option<Question>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.questions.get_mut(&id) else {
            return Ok(None);
        };
        let created_at = existing.created_at.unwrap_or_else(chrono::Utc::now);
        *existing = build_question(id, question, created_at);
        Ok(Some(existing.clone()))
    }

    async fn delete_question(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.questions.remove(&id).is_some())
    }

    async fn get_question(&self, id: i64) -> Result<Option<Question>, AppError> {
        Ok(self.tables.read().await.questions.get(&id).cloned())
    }

    async fn list_questions(
        &self,
        subject_id: &str,
        section_code: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Question>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .values()
            .filter(|q| q.subject_id == subject_id)
            .filter(|q| section_code.is_none_or(|code| q.section_code == code))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, AppError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.questions.get(id))
            .cloned()
            .collect())
    }

    async fn save_progress(&self, user_id: i64, attempt: &QuizAttempt) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .progress
            .insert((user_id, attempt.subject_id.clone()), attempt.clone());
        Ok(())
    }

    async fn load_progress(
        &self,
        user_id: i64,
        subject_id: &str,
    ) -> Result<Option<QuizAttempt>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .progress
            .get(&(user_id, subject_id.to_string()))
            .cloned())
    }

    async fn clear_progress(&self, user_id: i64, subject_id: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .progress
            .remove(&(user_id, subject_id.to_string()))
            .is_some())
    }

    async fn insert_test_result(
        &self,
        user_id: i64,
        subject_id: &str,
        snapshot: ResultSnapshot,
    ) -> Result<TestResult, AppError> {
        let mut tables = self.tables.write().await;
        let id = Tables::next_id(&mut tables.next_result_id);
        let result = TestResult::from_snapshot(
            id,
            user_id,
            subject_id.to_string(),
            snapshot,
            chrono::Utc::now(),
        );
        tables.results.insert(id, result.clone());
        Ok(result)
    }

    async fn list_test_results(
        &self,
        user_id: i64,
        subject_id: &str,
    ) -> Result<Vec<TestResult>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .results
            .values()
            .rev()
            .filter(|r| r.user_id == user_id && r.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn get_test_result(
        &self,
        user_id: i64,
        subject_id: &str,
        id: i64,
    ) -> Result<Option<TestResult>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .results
            .get(&id)
            .filter(|r| r.user_id == user_id && r.subject_id == subject_id)
            .cloned())
    }

    async fn delete_test_result(
        &self,
        user_id: i64,
        subject_id: &str,
        id: i64,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .results
            .get(&id)
            .is_some_and(|r| r.user_id == user_id && r.subject_id == subject_id);
        if owned {
            tables.results.remove(&id);
        }
        Ok(owned)
    }
}
