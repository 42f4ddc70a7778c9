// src/repositories/quiz_repository.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::is_unique_violation;
use crate::{
    error::AppError,
    models::quiz::{NewQuiz, Question, Quiz, QuizOption},
};

#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Stores the quiz with its questions and options.
    /// Fails with `Conflict` when the id is taken.
    async fn create_quiz(&self, quiz: NewQuiz) -> Result<Quiz, AppError>;

    /// All quizzes, newest first.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, AppError>;

    /// Loads a quiz with its questions and options in their stored order.
    async fn find_quiz(&self, id: &str) -> Result<Option<Quiz>, AppError>;
}

#[derive(FromRow)]
struct QuizRow {
    id: String,
    title: String,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct QuestionRow {
    quiz_id: String,
    id: i64,
    text: String,
    multiple: bool,
    answers: Vec<i32>,
}

#[derive(FromRow)]
struct OptionRow {
    id: i64,
    quiz_id: String,
    question_id: i64,
    position: i32,
    text: String,
}

/// Rebuilds the quiz hierarchy from flat rows.
/// Question and option rows must arrive in position order.
fn assemble(
    quizzes: Vec<QuizRow>,
    questions: Vec<QuestionRow>,
    options: Vec<OptionRow>,
) -> Vec<Quiz> {
    let mut options_by_question: HashMap<(String, i64), Vec<QuizOption>> = HashMap::new();
    for o in options {
        options_by_question
            .entry((o.quiz_id, o.question_id))
            .or_default()
            .push(QuizOption {
                id: o.id,
                text: o.text,
                position: o.position,
            });
    }

    let mut questions_by_quiz: HashMap<String, Vec<Question>> = HashMap::new();
    for q in questions {
        let options = options_by_question
            .remove(&(q.quiz_id.clone(), q.id))
            .unwrap_or_default();
        questions_by_quiz.entry(q.quiz_id).or_default().push(Question {
            id: q.id,
            text: q.text,
            options,
            multiple: q.multiple,
            answers: q.answers,
        });
    }

    quizzes
        .into_iter()
        .map(|row| Quiz {
            questions: questions_by_quiz.remove(&row.id).unwrap_or_default(),
            id: row.id,
            title: row.title,
            created_at: row.created_at,
        })
        .collect()
}

pub struct PgQuizRepository {
    pool: PgPool,
}

impl PgQuizRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_children(
        &self,
        quiz_ids: &[String],
    ) -> Result<(Vec<QuestionRow>, Vec<OptionRow>), AppError> {
        let questions = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT quiz_id, id, text, multiple, answers
            FROM questions
            WHERE quiz_id = ANY($1)
            ORDER BY quiz_id, position
            "#,
        )
        .bind(quiz_ids)
        .fetch_all(&self.pool)
        .await?;

        let options = sqlx::query_as::<_, OptionRow>(
            r#"
            SELECT id, quiz_id, question_id, position, text
            FROM options
            WHERE quiz_id = ANY($1)
            ORDER BY quiz_id, question_id, position
            "#,
        )
        .bind(quiz_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok((questions, options))
    }
}

#[async_trait]
impl QuizRepository for PgQuizRepository {
    async fn create_quiz(&self, quiz: NewQuiz) -> Result<Quiz, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO quizzes (id, title, created_at) VALUES ($1, $2, $3)")
            .bind(&quiz.id)
            .bind(&quiz.title)
            .bind(quiz.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict(format!("Quiz '{}' already exists", quiz.id))
                } else {
                    tracing::error!("Failed to insert quiz: {:?}", e);
                    AppError::from(e)
                }
            })?;

        let mut questions = Vec::with_capacity(quiz.questions.len());
        for (position, q) in quiz.questions.into_iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO questions (quiz_id, id, position, text, multiple, answers)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&quiz.id)
            .bind(q.id)
            .bind(position as i32)
            .bind(&q.text)
            .bind(q.multiple)
            .bind(&q.answers)
            .execute(&mut *tx)
            .await?;

            let mut options = Vec::with_capacity(q.options.len());
            for (opt_position, text) in q.options.into_iter().enumerate() {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO options (quiz_id, question_id, position, text)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(&quiz.id)
                .bind(q.id)
                .bind(opt_position as i32)
                .bind(&text)
                .fetch_one(&mut *tx)
                .await?;

                options.push(QuizOption {
                    id,
                    text,
                    position: opt_position as i32,
                });
            }

            questions.push(Question {
                id: q.id,
                text: q.text,
                options,
                multiple: q.multiple,
                answers: q.answers,
            });
        }

        tx.commit().await?;
        tracing::info!("Created quiz {} with {} questions", quiz.id, questions.len());

        Ok(Quiz {
            id: quiz.id,
            title: quiz.title,
            questions,
            created_at: quiz.created_at,
        })
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, AppError> {
        let quizzes = sqlx::query_as::<_, QuizRow>(
            "SELECT id, title, created_at FROM quizzes ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<String> = quizzes.iter().map(|q| q.id.clone()).collect();
        let (questions, options) = self.load_children(&ids).await?;

        Ok(assemble(quizzes, questions, options))
    }

    async fn find_quiz(&self, id: &str) -> Result<Option<Quiz>, AppError> {
        let quiz = sqlx::query_as::<_, QuizRow>(
            "SELECT id, title, created_at FROM quizzes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(quiz) = quiz else {
            return Ok(None);
        };

        let (questions, options) = self.load_children(&[quiz.id.clone()]).await?;
        Ok(assemble(vec![quiz], questions, options).pop())
    }
}
