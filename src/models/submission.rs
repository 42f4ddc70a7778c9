// src/models/submission.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'submissions' table.
/// `score` stays NULL until every answer has been graded.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    pub quiz_id: String,
    pub user_id: Option<i64>,
    pub score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Represents the 'responses' table: one answered question of a submission.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: i64,
    pub quiz_id: String,
    pub question_id: i64,
    pub submission_id: i64,
    pub user_id: Option<i64>,
    /// Indices exactly as submitted, duplicates included.
    pub selected: Vec<i32>,
    /// Correctness at submit time. Never read back for results.
    pub is_correct: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a response row.
#[derive(Debug, Clone)]
pub struct NewResponse {
    pub submission_id: i64,
    pub quiz_id: String,
    pub question_id: i64,
    pub selected: Vec<i32>,
    pub user_id: Option<i64>,
    pub is_correct: bool,
}

/// DTO for submitting answers to a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    #[validate(length(max = 1000, message = "Too many answers in one submission"))]
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: i64,
    #[serde(default)]
    pub selected: Vec<i32>,
}

/// Returned by a successful submit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    pub submission_id: i64,
    pub quiz_id: String,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

/// Graded breakdown of a stored submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResults {
    pub submission_id: i64,
    pub quiz_id: String,
    pub score: Option<i32>,
    pub per_question: Vec<QuestionResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: i64,
    pub selected: Vec<i32>,
    pub correct: Vec<i32>,
    #[serde(rename = "correctBool")]
    pub is_correct: bool,
}
