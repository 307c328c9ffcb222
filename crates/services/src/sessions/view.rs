use chrono::{DateTime, Duration, Utc};

use quiz_core::Score;
use quiz_core::engine;
use quiz_core::model::{Answer, Category, OptionKey, Question, QuestionId, SessionState};

/// One option as shown to the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub key: OptionKey,
    pub text: String,
    pub selected: bool,
}

/// Feedback revealed once a question has an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_answer: Answer,
    /// Per-option explanations in display order.
    pub explanations: Vec<(OptionKey, String)>,
}

impl AnswerFeedback {
    #[must_use]
    pub fn for_answer(question: &Question, selected: &Answer) -> Self {
        Self {
            is_correct: question.is_correct(selected),
            correct_answer: question.correct_answer().clone(),
            explanations: question
                .explanations()
                .iter()
                .map(|(key, text)| (key.clone(), text.clone()))
                .collect(),
        }
    }
}

/// Presentation-agnostic snapshot of the question at one position.
///
/// No pre-formatted strings; the UI decides how to render keys and numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: QuestionId,
    /// 1-based.
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub category: Category,
    pub options: Vec<OptionView>,
    pub multi_select: bool,
    pub selection: Option<Answer>,
    pub feedback: Option<AnswerFeedback>,
}

impl QuestionView {
    /// Build the view for the question at `index`.
    ///
    /// Returns `None` if `index` is out of range.
    #[must_use]
    pub fn at(state: &SessionState, index: usize) -> Option<Self> {
        let question = state.questions().get(index)?;
        Some(Self::build(state, index, question))
    }

    #[must_use]
    pub fn current(state: &SessionState) -> Self {
        Self::build(state, state.current_index(), state.current_question())
    }

    fn build(state: &SessionState, index: usize, question: &Question) -> Self {
        let selection = state.answer_for(question.id()).cloned();
        let options = question
            .options()
            .iter()
            .map(|option| OptionView {
                key: option.key.clone(),
                text: option.text.clone(),
                selected: selection
                    .as_ref()
                    .is_some_and(|answer| answer.contains(&option.key)),
            })
            .collect();
        let feedback = selection
            .as_ref()
            .map(|answer| AnswerFeedback::for_answer(question, answer));

        Self {
            id: question.id(),
            number: index + 1,
            total: state.total(),
            text: question.text().to_string(),
            category: question.category().clone(),
            options,
            multi_select: question.is_multi_select(),
            selection,
            feedback,
        }
    }
}

/// Per-category tally on the results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScore {
    pub category: Category,
    pub correct: usize,
    pub total: usize,
}

/// One row of the post-quiz review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub number: usize,
    pub text: String,
    pub category: Category,
    pub selection: Option<Answer>,
    pub correct_answer: Answer,
    pub is_correct: bool,
    pub explanations: Vec<(OptionKey, String)>,
}

/// Results page: score, pass/fail, breakdown by category and a full review.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub score: Score,
    pub percentage: f64,
    pub pass_mark_percent: u8,
    pub passed: bool,
    pub categories: Vec<CategoryScore>,
    pub items: Vec<ReviewItem>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ResultsView {
    #[must_use]
    pub fn build(state: &SessionState, pass_mark_percent: u8) -> Self {
        let score = engine::compute_score(state);

        let mut categories: Vec<CategoryScore> = Vec::new();
        let mut items = Vec::with_capacity(state.total());
        for (index, question) in state.questions().iter().enumerate() {
            let selection = state.answer_for(question.id()).cloned();
            let is_correct = selection
                .as_ref()
                .is_some_and(|answer| question.is_correct(answer));

            match categories
                .iter_mut()
                .find(|entry| &entry.category == question.category())
            {
                Some(entry) => {
                    entry.total += 1;
                    entry.correct += usize::from(is_correct);
                }
                None => categories.push(CategoryScore {
                    category: question.category().clone(),
                    correct: usize::from(is_correct),
                    total: 1,
                }),
            }

            items.push(ReviewItem {
                number: index + 1,
                text: question.text().to_string(),
                category: question.category().clone(),
                selection,
                correct_answer: question.correct_answer().clone(),
                is_correct,
                explanations: question
                    .explanations()
                    .iter()
                    .map(|(key, text)| (key.clone(), text.clone()))
                    .collect(),
            });
        }

        Self {
            score,
            percentage: score.percentage(),
            pass_mark_percent,
            passed: score.passed(pass_mark_percent),
            categories,
            items,
            started_at: state.started_at(),
            completed_at: state.completed_at(),
        }
    }

    /// Time from start to completion; `None` while the session is open.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }
}
