// tests/common/mod.rs
#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicI64, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quiz_backend::{
    config::Config,
    error::AppError,
    models::{
        quiz::{NewQuestion, NewQuiz, Question, Quiz, QuizOption},
        submission::{NewResponse, QuestionResponse, Submission},
        user::User,
    },
    repositories::{QuizRepository, SubmissionRepository, UserRepository},
    routes,
    services::SubmissionService,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test_secret_for_integration_tests";

fn storage_error(what: &str) -> AppError {
    AppError::InternalServerError(format!("injected failure: {}", what))
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: RwLock<Vec<Quiz>>,
    next_option_id: AtomicI64,
    pub fail_reads: AtomicBool,
}

impl InMemoryQuizRepository {
    /// Overwrites the correct answers of one question in place.
    pub async fn set_answers(&self, quiz_id: &str, question_id: i64, answers: Vec<i32>) {
        let mut quizzes = self.quizzes.write().await;
        let question = quizzes
            .iter_mut()
            .find(|q| q.id == quiz_id)
            .and_then(|q| q.questions.iter_mut().find(|q| q.id == question_id))
            .expect("question exists");
        question.answers = answers;
    }

    pub async fn remove(&self, quiz_id: &str) {
        self.quizzes.write().await.retain(|q| q.id != quiz_id);
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create_quiz(&self, quiz: NewQuiz) -> Result<Quiz, AppError> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.iter().any(|q| q.id == quiz.id) {
            return Err(AppError::Conflict(format!(
                "Quiz '{}' already exists",
                quiz.id
            )));
        }

        let questions = quiz
            .questions
            .into_iter()
            .map(|q| Question {
                id: q.id,
                text: q.text,
                options: q
                    .options
                    .into_iter()
                    .enumerate()
                    .map(|(position, text)| QuizOption {
                        id: self.next_option_id.fetch_add(1, Ordering::SeqCst) + 1,
                        text,
                        position: position as i32,
                    })
                    .collect(),
                multiple: q.multiple,
                answers: q.answers,
            })
            .collect();

        let stored = Quiz {
            id: quiz.id,
            title: quiz.title,
            questions,
            created_at: quiz.created_at,
        };
        quizzes.push(stored.clone());
        Ok(stored)
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(storage_error("list_quizzes"));
        }
        let mut quizzes = self.quizzes.read().await.clone();
        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(quizzes)
    }

    async fn find_quiz(&self, id: &str) -> Result<Option<Quiz>, AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(storage_error("find_quiz"));
        }
        Ok(self.quizzes.read().await.iter().find(|q| q.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
    next_id: AtomicI64,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            display_name: display_name.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemorySubmissionRepository {
    submissions: RwLock<HashMap<i64, Submission>>,
    responses: RwLock<Vec<QuestionResponse>>,
    next_submission_id: AtomicI64,
    next_response_id: AtomicI64,
    pub fail_create_submission: AtomicBool,
    pub fail_score_update: AtomicBool,
    /// Response writes for these question ids fail.
    pub fail_responses_for: Mutex<HashSet<i64>>,
}

impl InMemorySubmissionRepository {
    pub fn fail_response_writes_for(&self, question_id: i64) {
        self.fail_responses_for
            .lock()
            .expect("lock")
            .insert(question_id);
    }

    pub async fn submission_count(&self) -> usize {
        self.submissions.read().await.len()
    }

    pub async fn response_count(&self) -> usize {
        self.responses.read().await.len()
    }

    /// Rewrites the stored correctness flag of every response.
    pub async fn overwrite_flags(&self, is_correct: bool) {
        for r in self.responses.write().await.iter_mut() {
            r.is_correct = Some(is_correct);
        }
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn create_submission(
        &self,
        quiz_id: &str,
        user_id: Option<i64>,
    ) -> Result<Submission, AppError> {
        if self.fail_create_submission.load(Ordering::SeqCst) {
            return Err(storage_error("create_submission"));
        }
        let submission = Submission {
            id: self.next_submission_id.fetch_add(1, Ordering::SeqCst) + 1,
            quiz_id: quiz_id.to_string(),
            user_id,
            score: None,
            created_at: Utc::now(),
        };
        self.submissions
            .write()
            .await
            .insert(submission.id, submission.clone());
        Ok(submission)
    }

    async fn update_submission_score(
        &self,
        submission_id: i64,
        score: i32,
    ) -> Result<(), AppError> {
        if self.fail_score_update.load(Ordering::SeqCst) {
            return Err(storage_error("update_submission_score"));
        }
        let mut submissions = self.submissions.write().await;
        let submission = submissions
            .get_mut(&submission_id)
            .ok_or_else(|| storage_error("missing submission"))?;
        submission.score = Some(score);
        Ok(())
    }

    async fn create_response(&self, response: NewResponse) -> Result<QuestionResponse, AppError> {
        if self
            .fail_responses_for
            .lock()
            .expect("lock")
            .contains(&response.question_id)
        {
            return Err(storage_error("create_response"));
        }
        let row = QuestionResponse {
            id: self.next_response_id.fetch_add(1, Ordering::SeqCst) + 1,
            quiz_id: response.quiz_id,
            question_id: response.question_id,
            submission_id: response.submission_id,
            user_id: response.user_id,
            selected: response.selected,
            is_correct: Some(response.is_correct),
            created_at: Utc::now(),
        };
        self.responses.write().await.push(row.clone());
        Ok(row)
    }

    async fn find_submission(&self, submission_id: i64) -> Result<Option<Submission>, AppError> {
        Ok(self.submissions.read().await.get(&submission_id).cloned())
    }

    async fn list_responses_by_submission(
        &self,
        submission_id: i64,
    ) -> Result<Vec<QuestionResponse>, AppError> {
        let mut rows: Vec<QuestionResponse> = self
            .responses
            .read()
            .await
            .iter()
            .filter(|r| r.submission_id == submission_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }
}

/// In-memory repositories plus the state built from them.
pub struct TestStore {
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub submissions: Arc<InMemorySubmissionRepository>,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(InMemoryQuizRepository::default()),
            users: Arc::new(InMemoryUserRepository::default()),
            submissions: Arc::new(InMemorySubmissionRepository::default()),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            quizzes: self.quizzes.clone(),
            users: self.users.clone(),
            submissions: self.submissions.clone(),
            config: test_config(),
        }
    }

    pub fn service(&self) -> SubmissionService {
        SubmissionService::new(self.quizzes.clone(), self.submissions.clone())
    }

    /// Stores a quiz whose questions are `(id, option count, correct indices)`.
    pub async fn seed_quiz(&self, id: &str, questions: Vec<(i64, usize, Vec<i32>)>) -> Quiz {
        let quiz = NewQuiz {
            id: id.to_string(),
            title: format!("Quiz {}", id),
            questions: questions
                .into_iter()
                .map(|(qid, option_count, answers)| NewQuestion {
                    id: qid,
                    text: format!("Question {}", qid),
                    options: (0..option_count).map(|i| format!("Option {}", i)).collect(),
                    multiple: answers.len() > 1,
                    answers,
                })
                .collect(),
            created_at: Utc::now(),
        };
        self.quizzes.create_quiz(quiz).await.expect("seed quiz")
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
    }
}

pub struct TestApp {
    pub address: String,
    pub store: TestStore,
}

/// Spawns the app on a random port for testing, backed by in-memory storage.
pub async fn spawn_app() -> TestApp {
    let store = TestStore::new();
    let app = routes::create_router(store.state());

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, store }
}
