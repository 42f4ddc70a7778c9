// src/models/quiz.rs

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

/// A quiz with its ordered questions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique within the owning quiz.
    pub id: i64,
    pub text: String,
    pub options: Vec<QuizOption>,
    /// Whether more than one option may be selected.
    pub multiple: bool,
    /// Correct option indices. Order carries no meaning for grading.
    pub answers: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizOption {
    pub id: i64,
    pub text: String,
    /// 0-based position within the question.
    pub position: i32,
}

/// A fully resolved quiz ready to be stored.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub id: String,
    pub title: String,
    pub questions: Vec<NewQuestion>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub id: i64,
    pub text: String,
    pub options: Vec<String>,
    pub multiple: bool,
    pub answers: Vec<i32>,
}

/// DTO for creating a quiz.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[validate(length(max = 200, message = "Quiz id must be at most 200 characters"))]
    pub id: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Title length must be between 1 and 200 chars"))]
    pub title: String,

    #[serde(default)]
    #[validate(nested)]
    pub questions: Vec<CreateQuestionRequest>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 1000))]
    pub text: String,

    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,

    #[serde(default)]
    pub multiple: bool,

    /// Correct indices are stored as given, without checking them against `options`.
    #[serde(default)]
    pub answers: Vec<i32>,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.is_empty() {
        return Err(validator::ValidationError::new("options_cannot_be_empty"));
    }
    for opt in options {
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

impl CreateQuizRequest {
    /// Resolves generated fields. Text is trimmed and otherwise stored as submitted.
    ///
    /// * A missing or blank quiz id becomes `<title>-<YYYYMMDDHHMMSS.ffffff>`.
    /// * A missing question id defaults to the question's 1-based position.
    /// * Duplicate question ids are rejected.
    pub fn into_new_quiz(self, now: DateTime<Utc>) -> Result<NewQuiz, AppError> {
        let title = self.title.trim().to_string();
        let id = match self.id.map(|id| id.trim().to_string()) {
            Some(id) if !id.is_empty() => id,
            _ => format!("{}-{}", title, now.format("%Y%m%d%H%M%S%.6f")),
        };

        let mut seen = HashSet::new();
        let mut questions = Vec::with_capacity(self.questions.len());
        for (idx, q) in self.questions.into_iter().enumerate() {
            let question_id = q.id.unwrap_or(idx as i64 + 1);
            if !seen.insert(question_id) {
                return Err(AppError::BadRequest(format!(
                    "Duplicate question id {}",
                    question_id
                )));
            }
            questions.push(NewQuestion {
                id: question_id,
                text: q.text.trim().to_string(),
                options: q.options.iter().map(|o| o.trim().to_string()).collect(),
                multiple: q.multiple,
                answers: q.answers,
            });
        }

        Ok(NewQuiz {
            id,
            title,
            questions,
            created_at: now,
        })
    }
}
