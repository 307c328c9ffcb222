use std::sync::Arc;

use quiz_core::engine;
use quiz_core::model::{
    Answer, Question, QuestionBank, QuestionId, QuizError, QuizSettings, SessionState,
};
use quiz_core::{Clock, Score};

use super::progress::SessionProgress;
use super::view::{AnswerFeedback, QuestionView, ResultsView};
use crate::error::SessionServiceError;

/// One learner's quiz over a bank.
///
/// Owns the clock, so timestamps never come from the caller. Every method that
/// fails leaves the session in its last valid state.
#[derive(Debug, Clone)]
pub struct QuizSession {
    bank: Arc<QuestionBank>,
    settings: QuizSettings,
    state: SessionState,
    clock: Clock,
    // Bumped on every reselection so a seeded session does not repeat its subset.
    generation: u64,
}

impl QuizSession {
    /// Select a subset of `bank` and start a session over it.
    ///
    /// A question count larger than the bank is clamped to the bank size.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Bank` if selection fails and
    /// `SessionServiceError::Quiz` if the selection is empty.
    pub fn start(
        bank: Arc<QuestionBank>,
        settings: QuizSettings,
        clock: Clock,
    ) -> Result<Self, SessionServiceError> {
        let count = clamp_count(&bank, settings.question_count());
        let questions = bank.select_subset(count, settings.seed())?;
        let state = SessionState::new(questions, settings.auto_advance(), clock.now())?;
        tracing::info!(
            bank = %bank.id(),
            questions = state.total(),
            seed = ?settings.seed(),
            "quiz session started"
        );
        Ok(Self {
            bank,
            settings,
            state,
            clock,
            generation: 0,
        })
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.is_completed()
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        self.state.current_question()
    }

    #[must_use]
    pub fn current_view(&self) -> QuestionView {
        QuestionView::current(&self.state)
    }

    /// Answer the question on screen and return its feedback.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Quiz` when the answer is rejected.
    pub fn answer_current(
        &mut self,
        selected: Answer,
    ) -> Result<AnswerFeedback, SessionServiceError> {
        let id = self.state.current_question().id();
        self.record_answer(id, selected)
    }

    /// Answer any question of the session by id.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Quiz` when the answer is rejected.
    pub fn record_answer(
        &mut self,
        id: QuestionId,
        selected: Answer,
    ) -> Result<AnswerFeedback, SessionServiceError> {
        engine::record_answer(&mut self.state, id, selected)?;
        let question = self
            .state
            .question(id)
            .ok_or(QuizError::UnknownQuestion(id))?;
        let stored = self
            .state
            .answer_for(id)
            .ok_or(QuizError::UnknownQuestion(id))?;
        let feedback = AnswerFeedback::for_answer(question, stored);
        tracing::debug!(question = %id, correct = feedback.is_correct, "answer recorded");
        Ok(feedback)
    }

    /// Move forward; on the last question this completes the session.
    pub fn next(&mut self) {
        let was_complete = self.state.is_completed();
        engine::next_question(&mut self.state, self.clock.now());
        if !was_complete && self.state.is_completed() {
            self.log_finished();
        }
    }

    pub fn previous(&mut self) {
        engine::previous_question(&mut self.state);
    }

    /// Jump to a 0-based position.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Quiz` for an out-of-range index.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionServiceError> {
        engine::jump_to(&mut self.state, index)?;
        Ok(())
    }

    /// Complete the session and build the results page.
    pub fn finish(&mut self) -> ResultsView {
        if !self.state.is_completed() {
            engine::finish(&mut self.state, self.clock.now());
            self.log_finished();
        }
        self.results()
    }

    #[must_use]
    pub fn score(&self) -> Score {
        engine::compute_score(&self.state)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::from_state(&self.state)
    }

    #[must_use]
    pub fn results(&self) -> ResultsView {
        ResultsView::build(&self.state, self.settings.pass_mark_percent())
    }

    /// Start over with the same questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Quiz` if the state refuses the reset.
    pub fn reset(&mut self) -> Result<(), SessionServiceError> {
        self.state.reset(None)?;
        tracing::debug!(bank = %self.bank.id(), "quiz session reset");
        Ok(())
    }

    /// Start over with a freshly selected subset of the same size.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError` if selection fails; the session is unchanged then.
    pub fn reshuffle(&mut self) -> Result<(), SessionServiceError> {
        let count = self.state.total();
        self.reselect(count)
    }

    /// Change the number of questions; reselects and resets the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Settings` for zero, or a selection error.
    pub fn resize(&mut self, question_count: usize) -> Result<(), SessionServiceError> {
        let settings = self.settings.with_question_count(question_count)?;
        let count = clamp_count(&self.bank, settings.question_count());
        self.reselect(count)?;
        self.settings = settings;
        tracing::info!(
            bank = %self.bank.id(),
            requested = question_count,
            questions = count,
            "quiz session resized"
        );
        Ok(())
    }

    pub fn set_auto_advance(&mut self, auto_advance: bool) {
        self.state.set_auto_advance(auto_advance);
        self.settings = self.settings.clone().with_auto_advance(auto_advance);
    }

    fn reselect(&mut self, count: usize) -> Result<(), SessionServiceError> {
        let generation = self.generation.wrapping_add(1);
        let seed = self.settings.seed().map(|seed| seed.wrapping_add(generation));
        let questions = self.bank.select_subset(count, seed)?;
        self.state.reset(Some(questions))?;
        self.generation = generation;
        Ok(())
    }

    fn log_finished(&self) {
        let score = engine::compute_score(&self.state);
        tracing::info!(
            bank = %self.bank.id(),
            correct = score.correct,
            answered = score.answered,
            total = score.total,
            passed = score.passed(self.settings.pass_mark_percent()),
            "quiz session finished"
        );
    }
}

fn clamp_count(bank: &QuestionBank, requested: usize) -> usize {
    if requested > bank.len() {
        tracing::debug!(
            bank = %bank.id(),
            requested,
            available = bank.len(),
            "question count clamped to bank size"
        );
    }
    requested.min(bank.len())
}
