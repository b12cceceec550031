// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, types::Json};

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

/// Represents the 'questions' table in the database.
#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    subject_id: String,
    section_code: String,
    prompt: String,
    choices: Json<Vec<String>>,
    correct_index: i32,
    explanation: Option<String>,
    image_urls: Json<Vec<String>>,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Question {
            id: row.id,
            subject_id: row.subject_id,
            section_code: row.section_code,
            prompt: row.prompt,
            choices: row.choices.0,
            correct_index: row.correct_index.max(0) as usize,
            explanation: row.explanation,
            image_urls: row.image_urls.0,
            created_at: row.created_at,
        }
    }
}

/// Represents the 'test_results' table. The result body is a JSONB document.
#[derive(FromRow)]
struct TestResultRow {
    id: i64,
    user_id: i64,
    subject_id: String,
    snapshot: Json<ResultSnapshot>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<TestResultRow> for TestResult {
    fn from(row: TestResultRow) -> Self {
        TestResult::from_snapshot(
            row.id,
            row.user_id,
            row.subject_id,
            row.snapshot.0,
            row.created_at,
        )
    }
}

const QUESTION_COLUMNS: &str = "id, subject_id, section_code, prompt, choices, correct_index, \
                                explanation, image_urls, created_at";

const RESULT_COLUMNS: &str = "id, user_id, subject_id, snapshot, created_at";

/// Postgres-backed store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password, role, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Username '{}' already exists", username))
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::from(e)
            }
        })
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, role, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_question(&self, question: NewQuestion) -> Result<Question, AppError> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            r#"
            INSERT INTO questions
                (subject_id, section_code, prompt, choices, correct_index, explanation, image_urls)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(&question.subject_id)
        .bind(&question.section_code)
        .bind(&question.prompt)
        .bind(Json(&question.choices))
        .bind(question.correct_index as i32)
        .bind(&question.explanation)
        .bind(Json(&question.image_urls))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert question: {:?}", e);
            AppError::from(e)
        })?;

        Ok(row.into())
    }

    async fn update_question(
        &self,
        id: i64,
        question: NewQuestion,
    ) -> Result<Option<Question>, AppError> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            r#"
            UPDATE questions SET
                subject_id = $1, section_code = $2, prompt = $3, choices = $4,
                correct_index = $5, explanation = $6, image_urls = $7
            WHERE id = $8
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(&question.subject_id)
        .bind(&question.section_code)
        .bind(&question.prompt)
        .bind(Json(&question.choices))
        .bind(question.correct_index as i32)
        .bind(&question.explanation)
        .bind(Json(&question.image_urls))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Question::from))
    }

    async fn delete_question(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_question(&self, id: i64) -> Result<Option<Question>, AppError> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Question::from))
    }

    async fn list_questions(
        &self,
        subject_id: &str,
        section_code: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            r#"
            SELECT {QUESTION_COLUMNS}
            FROM questions
            WHERE subject_id = $1
              AND ($2::TEXT IS NULL OR section_code = $2)
            ORDER BY id
            LIMIT $3
            "#
        ))
        .bind(subject_id)
        .bind(section_code)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list questions: {:?}", e);
            AppError::from(e)
        })?;

        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn get_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // Use QueryBuilder for dynamic IN clause
        let mut query_builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id IN ("
        ));
        let mut separated = query_builder.separated(",");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows: Vec<QuestionRow> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn save_progress(&self, user_id: i64, attempt: &QuizAttempt) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO quiz_progress (user_id, subject_id, attempt)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, subject_id) DO UPDATE SET
                attempt = EXCLUDED.attempt,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(user_id)
        .bind(&attempt.subject_id)
        .bind(Json(attempt))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert quiz progress: {:?}", e);
            AppError::from(e)
        })?;

        Ok(())
    }

    async fn load_progress(
        &self,
        user_id: i64,
        subject_id: &str,
    ) -> Result<Option<QuizAttempt>, AppError> {
        let attempt: Option<Json<QuizAttempt>> = sqlx::query_scalar(
            "SELECT attempt FROM quiz_progress WHERE user_id = $1 AND subject_id = $2",
        )
        .bind(user_id)
        .bind(subject_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attempt.map(|a| a.0))
    }

    async fn clear_progress(&self, user_id: i64, subject_id: &str) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM quiz_progress WHERE user_id = $1 AND subject_id = $2")
                .bind(user_id)
                .bind(subject_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_test_result(
        &self,
        user_id: i64,
        subject_id: &str,
        snapshot: ResultSnapshot,
    ) -> Result<TestResult, AppError> {
        let row = sqlx::query_as::<_, TestResultRow>(&format!(
            r#"
            INSERT INTO test_results (user_id, subject_id, snapshot)
            VALUES ($1, $2, $3)
            RETURNING {RESULT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(subject_id)
        .bind(Json(&snapshot))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert test result: {:?}", e);
            AppError::from(e)
        })?;

        Ok(row.into())
    }

    async fn list_test_results(
        &self,
        user_id: i64,
        subject_id: &str,
    ) -> Result<Vec<TestResult>, AppError> {
        let rows = sqlx::query_as::<_, TestResultRow>(&format!(
            r#"
            SELECT {RESULT_COLUMNS}
            FROM test_results
            WHERE user_id = $1 AND subject_id = $2
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(user_id)
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TestResult::from).collect())
    }

    async fn get_test_result(
        &self,
        user_id: i64,
        subject_id: &str,
        id: i64,
    ) -> Result<Option<TestResult>, AppError> {
        let row = sqlx::query_as::<_, TestResultRow>(&format!(
            "SELECT {RESULT_COLUMNS} FROM test_results \
             WHERE id = $1 AND user_id = $2 AND subject_id = $3"
        ))
        .bind(id)
        .bind(user_id)
        .bind(subject_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TestResult::from))
    }

    async fn delete_test_result(
        &self,
        user_id: i64,
        subject_id: &str,
        id: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM test_results WHERE id = $1 AND user_id = $2 AND subject_id = $3",
        )
        .bind(id)
        .bind(user_id)
        .bind(subject_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete test result: {:?}", e);
            AppError::from(e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
