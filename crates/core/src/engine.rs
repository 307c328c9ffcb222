//! Quiz engine: navigation, answer recording and scoring over a [`SessionState`].
//!
//! Every operation validates before mutating, so a failed call leaves the session
//! exactly as it was.

use chrono::{DateTime, Utc};

use crate::model::{Answer, Question, QuestionId, QuizError, SessionState};

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Aggregate result of a session.
///
/// Invariant: `correct <= answered <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
}

impl Score {
    /// Share of all questions answered correctly, in percent.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 * 100.0 / self.total as f64
    }

    /// Whether the score reaches `pass_mark_percent` of all questions.
    #[must_use]
    pub fn passed(&self, pass_mark_percent: u8) -> bool {
        self.total > 0 && self.correct * 100 >= usize::from(pass_mark_percent) * self.total
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.total - self.answered
    }
}

/// Score `answers` against `questions`.
///
/// Recomputed from scratch on every call. Answers whose question id is not in
/// `questions` are ignored.
#[must_use]
pub fn score(questions: &[Question], answers: &[(QuestionId, Answer)]) -> Score {
    let mut correct = 0;
    let mut answered = 0;
    for (id, answer) in answers {
        let Some(question) = questions.iter().find(|q| q.id() == *id) else {
            continue;
        };
        answered += 1;
        if question.is_correct(answer) {
            correct += 1;
        }
    }
    Score {
        correct,
        answered,
        total: questions.len(),
    }
}

/// `(correct, answered, total)` for the session.
#[must_use]
pub fn compute_score(session: &SessionState) -> Score {
    score(session.questions(), session.answers())
}

//
// ─── ANSWERS ───────────────────────────────────────────────────────────────────
//

/// Record (or overwrite) the answer to `question_id`.
///
/// With auto-advance on, the cursor then moves one question forward, stopping at
/// the last question. Recording never completes the session.
///
/// # Errors
///
/// - `QuizError::Completed` once the session is completed
/// - `QuizError::UnknownQuestion` if the id is not in the session
/// - `QuizError::EmptySelection` for an empty key set
/// - `QuizError::UnknownOption` if a key is not an option of the question
/// - `QuizError::TooManySelections` for several keys on a single-select question
pub fn record_answer(
    session: &mut SessionState,
    question_id: QuestionId,
    selected: Answer,
) -> Result<(), QuizError> {
    if session.is_completed() {
        return Err(QuizError::Completed);
    }
    let question = session
        .question(question_id)
        .ok_or(QuizError::UnknownQuestion(question_id))?;

    if selected.is_empty() {
        return Err(QuizError::EmptySelection);
    }
    if let Some(key) = selected.keys().find(|key| !question.has_option(key)) {
        return Err(QuizError::UnknownOption {
            question: question_id,
            key: key.clone(),
        });
    }

    let selected = if question.is_multi_select() {
        selected
    } else {
        match selected {
            Answer::Single(key) => Answer::Single(key),
            Answer::Multiple(keys) if keys.len() == 1 => {
                let key = keys.into_iter().next().ok_or(QuizError::EmptySelection)?;
                Answer::Single(key)
            }
            Answer::Multiple(keys) => {
                return Err(QuizError::TooManySelections {
                    question: question_id,
                    count: keys.len(),
                });
            }
        }
    };

    session.store_answer(question_id, selected);

    if session.auto_advance() && session.current_index() < session.last_index() {
        session.set_current_index(session.current_index() + 1);
    }
    Ok(())
}

/// Record an answer for the question under the cursor.
///
/// # Errors
///
/// Same as [`record_answer`].
pub fn answer_current(session: &mut SessionState, selected: Answer) -> Result<(), QuizError> {
    let id = session.current_question().id();
    record_answer(session, id, selected)
}

//
// ─── NAVIGATION ────────────────────────────────────────────────────────────────
//

/// Move forward; at the last question this completes the session instead.
///
/// A completed session is left untouched.
pub fn next_question(session: &mut SessionState, now: DateTime<Utc>) {
    if session.is_completed() {
        return;
    }
    if session.current_index() < session.last_index() {
        session.set_current_index(session.current_index() + 1);
    } else {
        session.mark_completed(now);
    }
}

/// Move back one question, stopping at the first.
pub fn previous_question(session: &mut SessionState) {
    session.set_current_index(session.current_index().saturating_sub(1));
}

/// Put the cursor on `index` (zero-based), answered or not.
///
/// # Errors
///
/// Returns `QuizError::IndexOutOfRange` if `index >= total`.
pub fn jump_to(session: &mut SessionState, index: usize) -> Result<(), QuizError> {
    if index >= session.total() {
        return Err(QuizError::IndexOutOfRange {
            index,
            len: session.total(),
        });
    }
    session.set_current_index(index);
    Ok(())
}

/// Complete the session regardless of how many questions were answered.
pub fn finish(session: &mut SessionState, now: DateTime<Utc>) {
    session.mark_completed(now);
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
