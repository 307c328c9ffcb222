use quiz_core::model::SessionState;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// 1-based position of the current question.
    pub current_number: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn from_state(state: &SessionState) -> Self {
        let total = state.total();
        let answered = state.answers().len();
        Self {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            current_number: state.current_index() + 1,
            is_complete: state.is_completed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::engine;
    use quiz_core::model::{Answer, OptionKey, QuestionDraft, QuestionId};
    use quiz_core::time::fixed_now;

    #[test]
    fn progress_tracks_answers_and_position() {
        let questions = (1..=3)
            .map(|id| {
                QuestionDraft::new(id, format!("Q{id}"))
                    .option("A", "a")
                    .option("B", "b")
                    .correct("A")
                    .validate()
                    .unwrap()
            })
            .collect();
        let mut state = SessionState::new(questions, false, fixed_now()).unwrap();
        let key = OptionKey::new("B").unwrap();
        engine::record_answer(&mut state, QuestionId::new(1), Answer::single(key)).unwrap();
        engine::next_question(&mut state, fixed_now());

        let progress = SessionProgress::from_state(&state);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert_eq!(progress.current_number, 2);
        assert!(!progress.is_complete);
    }
}
