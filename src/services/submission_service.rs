// src/services/submission_service.rs

use std::sync::Arc;

use crate::{
    error::AppError,
    models::submission::{
        NewResponse, QuestionResult, SubmissionResults, SubmitResult, SubmittedAnswer,
    },
    repositories::{QuizRepository, SubmissionRepository},
    services::grading::{self, AnswerKey},
};

/// Records graded submissions and rebuilds their results.
///
/// Holds no state of its own beyond repository handles, so each request gets
/// an independent clone.
#[derive(Clone)]
pub struct SubmissionService {
    quizzes: Arc<dyn QuizRepository>,
    submissions: Arc<dyn SubmissionRepository>,
}

impl SubmissionService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        submissions: Arc<dyn SubmissionRepository>,
    ) -> Self {
        Self {
            quizzes,
            submissions,
        }
    }

    /// Grades and stores a submission.
    ///
    /// * The submission row is created first, with a NULL score.
    /// * Each answer gets its own response row. A failed response write is
    ///   logged and skipped; the answer still counts towards the score.
    /// * The final score is written last.
    pub async fn submit(
        &self,
        quiz_id: &str,
        answers: &[SubmittedAnswer],
        user_id: Option<i64>,
    ) -> Result<SubmitResult, AppError> {
        let submission = self
            .submissions
            .create_submission(quiz_id, user_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create submission for quiz {}: {:?}", quiz_id, e);
                e
            })?;

        let quiz = self.quizzes.find_quiz(quiz_id).await?.ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Quiz {} could not be loaded for submission {}",
                quiz_id, submission.id
            ))
        })?;
        let key = grading::answer_key(&quiz);

        let mut outcomes = Vec::with_capacity(answers.len());
        for answer in answers {
            let correct = grading::grade(&key, answer.question_id, &answer.selected);
            outcomes.push(correct);

            let response = NewResponse {
                submission_id: submission.id,
                quiz_id: quiz_id.to_string(),
                question_id: answer.question_id,
                selected: answer.selected.clone(),
                user_id,
                is_correct: correct,
            };
            if let Err(e) = self.submissions.create_response(response).await {
                tracing::error!(
                    "Failed to store response for question {} of submission {}: {:?}",
                    answer.question_id,
                    submission.id,
                    e
                );
            }
        }

        let score = grading::score(outcomes);
        self.submissions
            .update_submission_score(submission.id, score)
            .await?;

        tracing::info!(
            "Submission {} for quiz {} scored {}/{}",
            submission.id,
            quiz_id,
            score,
            answers.len()
        );

        Ok(SubmitResult {
            submission_id: submission.id,
            quiz_id: submission.quiz_id,
            score,
            created_at: submission.created_at,
        })
    }

    /// Rebuilds the per-question breakdown of a stored submission.
    ///
    /// Correctness is recomputed from the quiz's current answers; the flags
    /// stored at submit time are ignored. If the quiz cannot be loaded every
    /// question is graded against an empty key.
    pub async fn results(
        &self,
        quiz_id: &str,
        submission_id: i64,
    ) -> Result<SubmissionResults, AppError> {
        let submission = self
            .submissions
            .find_submission(submission_id)
            .await?
            .filter(|s| s.quiz_id == quiz_id)
            .ok_or(AppError::NotFound("Submission not found".to_string()))?;

        let responses = self
            .submissions
            .list_responses_by_submission(submission.id)
            .await?;

        let key = self.answer_key_or_empty(&submission.quiz_id).await;

        let per_question = responses
            .into_iter()
            .map(|r| {
                let is_correct = grading::grade(&key, r.question_id, &r.selected);
                QuestionResult {
                    question_id: r.question_id,
                    correct: key.get(&r.question_id).cloned().unwrap_or_default(),
                    selected: r.selected,
                    is_correct,
                }
            })
            .collect();

        Ok(SubmissionResults {
            submission_id: submission.id,
            quiz_id: submission.quiz_id,
            score: submission.score,
            per_question,
        })
    }

    async fn answer_key_or_empty(&self, quiz_id: &str) -> AnswerKey {
        match self.quizzes.find_quiz(quiz_id).await {
            Ok(Some(quiz)) => grading::answer_key(&quiz),
            Ok(None) => {
                tracing::warn!("Quiz {} not found while building results", quiz_id);
                AnswerKey::new()
            }
            Err(e) => {
                tracing::warn!("Failed to load quiz {} for results: {:?}", quiz_id, e);
                AnswerKey::new()
            }
        }
    }
}
