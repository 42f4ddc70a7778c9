// src/repositories/mod.rs

pub mod quiz_repository;
pub mod submission_repository;
pub mod user_repository;

pub use quiz_repository::{PgQuizRepository, QuizRepository};
pub use submission_repository::{PgSubmissionRepository, SubmissionRepository};
pub use user_repository::{PgUserRepository, UserRepository};

/// Postgres error code 23505.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
