// src/services/grading.rs

//! All-or-nothing grading of multiple-choice answers.

use std::collections::{HashMap, HashSet};

use crate::models::quiz::Quiz;

/// Question id -> correct option indices, as stored on the quiz.
pub type AnswerKey = HashMap<i64, Vec<i32>>;

/// Builds the answer key of a quiz.
pub fn answer_key(quiz: &Quiz) -> AnswerKey {
    quiz.questions
        .iter()
        .map(|q| (q.id, q.answers.clone()))
        .collect()
}

/// Collapses submitted and correct indices into sets.
///
/// Duplicates count once. Indices are not checked against the option count,
/// so out-of-range values simply never match. A missing correct list is empty.
pub fn normalize(selected: &[i32], correct: Option<&[i32]>) -> (HashSet<i32>, HashSet<i32>) {
    let submitted = selected.iter().copied().collect();
    let correct = correct.unwrap_or_default().iter().copied().collect();
    (submitted, correct)
}

/// Equal size and every correct index present in the submission.
pub fn is_correct(submitted: &HashSet<i32>, correct: &HashSet<i32>) -> bool {
    submitted.len() == correct.len() && correct.iter().all(|idx| submitted.contains(idx))
}

/// Grades one answer against the key. Unknown questions have an empty key.
pub fn grade(key: &AnswerKey, question_id: i64, selected: &[i32]) -> bool {
    let (submitted, correct) = normalize(selected, key.get(&question_id).map(Vec::as_slice));
    is_correct(&submitted, &correct)
}

/// Number of correct outcomes.
pub fn score<I>(outcomes: I) -> i32
where
    I: IntoIterator<Item = bool>,
{
    outcomes.into_iter().filter(|&ok| ok).count() as i32
}
