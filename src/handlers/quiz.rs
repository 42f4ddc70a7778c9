// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use crate::{error::AppError, models::quiz::CreateQuizRequest, state::AppState};

/// Lists all quizzes, newest first.
pub async fn list_quizzes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let quizzes = state.quizzes.list_quizzes().await.map_err(|e| {
        tracing::error!("Failed to list quizzes: {:?}", e);
        e
    })?;

    Ok(Json(quizzes))
}

/// Creates a quiz.
///
/// Generates the id and timestamp when they are not supplied.
/// Returns 201 Created with the stored quiz, including option ids.
pub async fn create_quiz(
    State(state): State<AppState>,
    payload: Result<Json<CreateQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let new_quiz = payload.into_new_quiz(Utc::now())?;
    let quiz = state.quizzes.create_quiz(new_quiz).await?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Retrieves a single quiz by ID.
pub async fn get_quiz(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path?;

    let quiz = state
        .quizzes
        .find_quiz(&id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(quiz))
}
