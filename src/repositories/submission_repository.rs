// src/repositories/submission_repository.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::submission::{NewResponse, QuestionResponse, Submission},
};

/// Every call is a single-row statement; nothing here spans a transaction.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Inserts a submission with a NULL score.
    async fn create_submission(
        &self,
        quiz_id: &str,
        user_id: Option<i64>,
    ) -> Result<Submission, AppError>;

    async fn update_submission_score(&self, submission_id: i64, score: i32)
    -> Result<(), AppError>;

    async fn create_response(&self, response: NewResponse) -> Result<QuestionResponse, AppError>;

    async fn find_submission(&self, submission_id: i64) -> Result<Option<Submission>, AppError>;

    /// Responses of a submission ordered by id.
    async fn list_responses_by_submission(
        &self,
        submission_id: i64,
    ) -> Result<Vec<QuestionResponse>, AppError>;
}

pub struct PgSubmissionRepository {
    pool: PgPool,
}

impl PgSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionRepository for PgSubmissionRepository {
    async fn create_submission(
        &self,
        quiz_id: &str,
        user_id: Option<i64>,
    ) -> Result<Submission, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (quiz_id, user_id)
            VALUES ($1, $2)
            RETURNING id, quiz_id, user_id, score, created_at
            "#,
        )
        .bind(quiz_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn update_submission_score(
        &self,
        submission_id: i64,
        score: i32,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE submissions SET score = $1 WHERE id = $2")
            .bind(score)
            .bind(submission_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::InternalServerError(format!(
                "Submission {} vanished before its score was written",
                submission_id
            )));
        }
        Ok(())
    }

    async fn create_response(&self, response: NewResponse) -> Result<QuestionResponse, AppError> {
        let row = sqlx::query_as::<_, QuestionResponse>(
            r#"
            INSERT INTO responses (quiz_id, question_id, submission_id, user_id, selected, is_correct)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, quiz_id, question_id, submission_id, user_id, selected, is_correct, created_at
            "#,
        )
        .bind(&response.quiz_id)
        .bind(response.question_id)
        .bind(response.submission_id)
        .bind(response.user_id)
        .bind(&response.selected)
        .bind(response.is_correct)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_submission(&self, submission_id: i64) -> Result<Option<Submission>, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            "SELECT id, quiz_id, user_id, score, created_at FROM submissions WHERE id = $1",
        )
        .bind(submission_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn list_responses_by_submission(
        &self,
        submission_id: i64,
    ) -> Result<Vec<QuestionResponse>, AppError> {
        let responses = sqlx::query_as::<_, QuestionResponse>(
            r#"
            SELECT id, quiz_id, question_id, submission_id, user_id, selected, is_correct, created_at
            FROM responses
            WHERE submission_id = $1
            ORDER BY id
            "#,
        )
        .bind(submission_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(responses)
    }
}
