use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

use crate::model::{
    answer::{Answer, OptionKey, OptionKeyError},
    category::Category,
    ids::QuestionId,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs at least two options, got {count}")]
    TooFewOptions { count: usize },

    #[error("invalid option key: {0}")]
    InvalidOptionKey(#[from] OptionKeyError),

    #[error("duplicate option key {0}")]
    DuplicateOption(OptionKey),

    #[error("option {0} has no text")]
    EmptyOptionText(OptionKey),

    #[error("question has no correct answer")]
    NoCorrectAnswer,

    #[error("correct answer {0} is not one of the options")]
    UnknownCorrectKey(OptionKey),

    #[error("single-select question must have exactly one correct answer, got {count}")]
    SingleSelectArity { count: usize },

    #[error("explanation given for unknown option {0}")]
    UnknownExplanationKey(OptionKey),
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it comes out of a bank file or a test fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: u32,
    pub text: String,
    /// `(key, text)` pairs in display order.
    pub options: Vec<(String, String)>,
    pub correct: Vec<String>,
    pub explanations: Vec<(String, String)>,
    pub category: Option<String>,
    pub multi_select: bool,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(id: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn option(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.options.push((key.into(), text.into()));
        self
    }

    #[must_use]
    pub fn correct(mut self, key: impl Into<String>) -> Self {
        self.correct.push(key.into());
        self
    }

    #[must_use]
    pub fn explain(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.explanations.push((key.into(), text.into()));
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn multi_select(mut self, multi_select: bool) -> Self {
        self.multi_select = multi_select;
        self
    }

    /// Validate the draft into a [`Question`].
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when text or options are empty, keys are duplicated,
    /// the correct answer references unknown options, or a single-select question
    /// does not have exactly one correct key.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let text = self.text.trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                count: self.options.len(),
            });
        }

        let mut seen = HashSet::with_capacity(self.options.len());
        let mut options = Vec::with_capacity(self.options.len());
        for (raw_key, raw_text) in self.options {
            let key = OptionKey::new(raw_key)?;
            if !seen.insert(key.clone()) {
                return Err(QuestionError::DuplicateOption(key));
            }
            let option_text = raw_text.trim().to_string();
            if option_text.is_empty() {
                return Err(QuestionError::EmptyOptionText(key));
            }
            options.push(AnswerOption {
                key,
                text: option_text,
            });
        }

        let mut correct = BTreeSet::new();
        for raw in self.correct {
            let key = OptionKey::new(raw)?;
            if !seen.contains(&key) {
                return Err(QuestionError::UnknownCorrectKey(key));
            }
            correct.insert(key);
        }
        if correct.is_empty() {
            return Err(QuestionError::NoCorrectAnswer);
        }

        let correct_answer = if self.multi_select {
            Answer::Multiple(correct)
        } else {
            if correct.len() != 1 {
                return Err(QuestionError::SingleSelectArity {
                    count: correct.len(),
                });
            }
            let key = correct
                .into_iter()
                .next()
                .ok_or(QuestionError::NoCorrectAnswer)?;
            Answer::Single(key)
        };

        let mut explanations = BTreeMap::new();
        for (raw_key, raw_text) in self.explanations {
            let key = OptionKey::new(raw_key)?;
            if !seen.contains(&key) {
                return Err(QuestionError::UnknownExplanationKey(key));
            }
            let rationale = raw_text.trim();
            if !rationale.is_empty() {
                explanations.insert(key, rationale.to_string());
            }
        }

        Ok(Question {
            id: QuestionId::new(self.id),
            text,
            options,
            correct_answer,
            explanations,
            category: Category::from_optional(self.category),
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub key: OptionKey,
    pub text: String,
}

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<AnswerOption>,
    correct_answer: Answer,
    explanations: BTreeMap<OptionKey, String>,
    category: Category,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn option_text(&self, key: &OptionKey) -> Option<&str> {
        self.options
            .iter()
            .find(|opt| &opt.key == key)
            .map(|opt| opt.text.as_str())
    }

    #[must_use]
    pub fn has_option(&self, key: &OptionKey) -> bool {
        self.options.iter().any(|opt| &opt.key == key)
    }

    #[must_use]
    pub fn correct_answer(&self) -> &Answer {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanations(&self) -> &BTreeMap<OptionKey, String> {
        &self.explanations
    }

    #[must_use]
    pub fn explanation_for(&self, key: &OptionKey) -> Option<&str> {
        self.explanations.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    #[must_use]
    pub fn is_multi_select(&self) -> bool {
        matches!(self.correct_answer, Answer::Multiple(_))
    }

    /// Copy of this question under a new id.
    #[must_use]
    pub fn with_id(&self, id: QuestionId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    /// Whether `selected` is exactly the correct answer.
    ///
    /// Multi-select questions compare sets: every correct key and nothing else.
    #[must_use]
    pub fn is_correct(&self, selected: &Answer) -> bool {
        match &self.correct_answer {
            Answer::Single(correct) => matches!(selected, Answer::Single(key) if key == correct),
            Answer::Multiple(_) => self.correct_answer.key_set() == selected.key_set(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> OptionKey {
        OptionKey::new(k).unwrap()
    }

    fn single() -> QuestionDraft {
        QuestionDraft::new(1, "Which service stores objects?")
            .option("A", "Amazon EBS")
            .option("B", "Amazon S3")
            .option("C", "Amazon EFS")
            .correct("B")
            .explain("A", "Block storage.")
            .explain("B", "Object storage.")
            .category("Storage")
    }

    fn multi() -> QuestionDraft {
        QuestionDraft::new(2, "Pick the serverless services.")
            .option("A", "AWS Lambda")
            .option("B", "Amazon EC2")
            .option("C", "Amazon RDS")
            .option("D", "AWS Fargate")
            .correct("A")
            .correct("D")
            .multi_select(true)
    }

    #[test]
    fn valid_single_select_question() {
        let q = single().validate().unwrap();
        assert_eq!(q.id(), QuestionId::new(1));
        assert!(!q.is_multi_select());
        assert_eq!(q.correct_answer(), &Answer::Single(key("B")));
        assert_eq!(q.option_text(&key("b")), Some("Amazon S3"));
        assert_eq!(q.explanation_for(&key("C")), None);
        assert_eq!(q.category().as_str(), "Storage");
    }

    #[test]
    fn missing_category_defaults() {
        let q = multi().validate().unwrap();
        assert!(q.category().is_uncategorized());
    }

    #[test]
    fn rejects_empty_text() {
        let err = QuestionDraft::new(1, "  ")
            .option("A", "x")
            .option("B", "y")
            .correct("A")
            .validate()
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn rejects_too_few_options() {
        let err = QuestionDraft::new(1, "Q")
            .option("A", "only")
            .correct("A")
            .validate()
            .unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { count: 1 });
    }

    #[test]
    fn rejects_duplicate_option_keys() {
        let err = QuestionDraft::new(1, "Q")
            .option("A", "x")
            .option("a", "y")
            .correct("A")
            .validate()
            .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption(key("A")));
    }

    #[test]
    fn correct_answer_must_be_an_option() {
        let err = single().correct("E").multi_select(true).validate().unwrap_err();
        assert_eq!(err, QuestionError::UnknownCorrectKey(key("E")));
    }

    #[test]
    fn single_select_needs_exactly_one_answer() {
        let err = single().correct("C").validate().unwrap_err();
        assert_eq!(err, QuestionError::SingleSelectArity { count: 2 });
    }

    #[test]
    fn explanation_keys_must_be_options() {
        let err = single().explain("Z", "nope").validate().unwrap_err();
        assert_eq!(err, QuestionError::UnknownExplanationKey(key("Z")));
    }

    #[test]
    fn single_select_requires_exact_match() {
        let q = single().validate().unwrap();
        assert!(q.is_correct(&Answer::Single(key("B"))));
        assert!(!q.is_correct(&Answer::Single(key("A"))));
        assert!(!q.is_correct(&Answer::from_keys([key("A"), key("B")])));
    }

    #[test]
    fn multi_select_is_order_independent_without_partial_credit() {
        let q = multi().validate().unwrap();
        assert!(q.is_multi_select());
        assert!(q.is_correct(&Answer::from_keys([key("D"), key("A")])));
        assert!(!q.is_correct(&Answer::from_keys([key("A")])));
        assert!(!q.is_correct(&Answer::Single(key("A"))));
        assert!(!q.is_correct(&Answer::from_keys([key("A"), key("B"), key("D")])));
    }

    #[test]
    fn with_id_renumbers_only_the_id() {
        let q = single().validate().unwrap();
        let renumbered = q.with_id(QuestionId::new(9));
        assert_eq!(renumbered.id(), QuestionId::new(9));
        assert_eq!(renumbered.text(), q.text());
    }
}
