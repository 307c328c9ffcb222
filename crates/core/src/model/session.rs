use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    answer::{Answer, OptionKey},
    ids::QuestionId,
    question::Question,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Validation failures of quiz operations. The session is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("a session needs at least one question")]
    EmptySession,

    #[error("index {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("question {0} is not part of this session")]
    UnknownQuestion(QuestionId),

    #[error("question {question} has no option {key}")]
    UnknownOption { question: QuestionId, key: OptionKey },

    #[error("question {question} takes one answer, got {count}")]
    TooManySelections { question: QuestionId, count: usize },

    #[error("an answer needs at least one option")]
    EmptySelection,

    #[error("session already completed")]
    Completed,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// One user's attempt at a quiz.
///
/// Invariant: `current_index < questions.len()` and `questions` is never empty.
/// The score is not stored; see [`crate::engine::compute_score`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<(QuestionId, Answer)>,
    completed: bool,
    auto_advance: bool,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Start a session over an ordered list of questions.
    ///
    /// `started_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptySession` if `questions` is empty.
    pub fn new(
        questions: Vec<Question>,
        auto_advance: bool,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptySession);
        }
        Ok(Self {
            questions,
            current_index: 0,
            answers: Vec::new(),
            completed: false,
            auto_advance,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Recorded answers in the order questions were first answered.
    #[must_use]
    pub fn answers(&self) -> &[(QuestionId, Answer)] {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, id: QuestionId) -> Option<&Answer> {
        self.answers
            .iter()
            .find(|(answered, _)| *answered == id)
            .map(|(_, answer)| answer)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    pub fn set_auto_advance(&mut self, auto_advance: bool) {
        self.auto_advance = auto_advance;
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Clear answers and position; optionally swap in a new question list.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptySession` if `new_subset` is empty; nothing changes then.
    pub fn reset(&mut self, new_subset: Option<Vec<Question>>) -> Result<(), QuizError> {
        if let Some(questions) = new_subset {
            if questions.is_empty() {
                return Err(QuizError::EmptySession);
            }
            self.questions = questions;
        }
        self.answers.clear();
        self.current_index = 0;
        self.completed = false;
        self.completed_at = None;
        Ok(())
    }

    // Mutators for `crate::engine`; they do not validate.

    pub(crate) fn set_current_index(&mut self, index: usize) {
        self.current_index = index;
    }

    pub(crate) fn store_answer(&mut self, id: QuestionId, answer: Answer) {
        match self.answers.iter_mut().find(|(answered, _)| *answered == id) {
            Some((_, existing)) => *existing = answer,
            None => self.answers.push((id, answer)),
        }
    }

    pub(crate) fn mark_completed(&mut self, at: DateTime<Utc>) {
        if !self.completed {
            self.completed = true;
            self.completed_at = Some(at);
        }
    }
}
