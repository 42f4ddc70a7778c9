use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    config::Config,
    repositories::{
        PgQuizRepository, PgSubmissionRepository, PgUserRepository, QuizRepository,
        SubmissionRepository, UserRepository,
    },
    services::SubmissionService,
};

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub quizzes: Arc<dyn QuizRepository>,
    pub users: Arc<dyn UserRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub config: Config,
}

impl AppState {
    /// State backed by PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        Self {
            quizzes: Arc::new(PgQuizRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            submissions: Arc::new(PgSubmissionRepository::new(pool)),
            config,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for SubmissionService {
    fn from_ref(state: &AppState) -> Self {
        SubmissionService::new(state.quizzes.clone(), state.submissions.clone())
    }
}
