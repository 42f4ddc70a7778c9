// src/handlers/submission.rs

use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::submission::SubmitRequest,
    services::SubmissionService,
    utils::jwt::OptionalClaims,
};

/// Submits answers to a quiz and returns the score.
///
/// * Anonymous unless a valid bearer token was sent.
/// * Malformed payloads are rejected before anything is written.
pub async fn submit(
    State(service): State<SubmissionService>,
    Extension(OptionalClaims(claims)): Extension<OptionalClaims>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(quiz_id) = path?;
    let Json(req) = payload?;
    req.validate()?;

    let user_id = claims.map(|c| c.user_id()).transpose()?;

    let result = service.submit(&quiz_id, &req.answers, user_id).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// Returns the graded breakdown of a submission.
pub async fn get_results(
    State(service): State<SubmissionService>,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path((quiz_id, submission_id)) = path?;

    let results = service.results(&quiz_id, submission_id).await?;

    Ok(Json(results))
}
