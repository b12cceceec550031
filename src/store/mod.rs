// src/store/mod.rs

//! Persistence behind a trait so the backing store can be swapped:
//! Postgres in production, memory for development and tests.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        attempt::QuizAttempt,
        question::{NewQuestion, Question},
        test_result::{ResultSnapshot, TestResult},
        user::User,
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type DynStore = Arc<dyn Store>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `Conflict` when the username is taken.
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn insert_question(&self, question: NewQuestion) -> Result<Question, AppError>;

    /// Replaces a question's content. `None` when it does not exist.
    async fn update_question(
        &self,
        id: i64,
        question: NewQuestion,
    ) -> Result<Option<Question>, AppError>;

    async fn delete_question(&self, id: i64) -> Result<bool, AppError>;

    async fn get_question(&self, id: i64) -> Result<Option<Question>, AppError>;

    /// Questions of a subject ordered by id, optionally restricted to one section.
    async fn list_questions(
        &self,
        subject_id: &str,
        section_code: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Question>, AppError>;

    async fn get_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, AppError>;

    /// Last write wins.
    async fn save_progress(&self, user_id: i64, attempt: &QuizAttempt) -> Result<(), AppError>;

    async fn load_progress(
        &self,
        user_id: i64,
        subject_id: &str,
    ) -> Result<Option<QuizAttempt>, AppError>;

    async fn clear_progress(&self, user_id: i64, subject_id: &str) -> Result<bool, AppError>;

    async fn insert_test_result(
        &self,
        user_id: i64,
        subject_id: &str,
        snapshot: ResultSnapshot,
    ) -> Result<TestResult, AppError>;

    /// Newest first.
    async fn list_test_results(
        &self,
        user_id: i64,
        subject_id: &str,
    ) -> Result<Vec<TestResult>, AppError>;

    async fn get_test_result(
        &self,
        user_id: i64,
        subject_id: &str,
        id: i64,
    ) -> Result<Option<TestResult>, AppError>;

    /// Removes the whole result. `false` when nothing matched.
    async fn delete_test_result(
        &self,
        user_id: i64,
        subject_id: &str,
        id: i64,
    ) -> Result<bool, AppError>;
}
