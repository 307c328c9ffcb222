use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::model::{
    category::Category,
    ids::{BankId, QuestionId},
    question::Question,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank has no questions")]
    Empty,

    #[error("bank title cannot be empty")]
    EmptyTitle,

    #[error("duplicate question id {0}")]
    DuplicateId(QuestionId),

    #[error("requested {requested} questions but the bank only has {available}")]
    InsufficientQuestions { requested: usize, available: usize },
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Validated, read-only collection of questions for one exam.
///
/// A bank is shared immutably across sessions; selection never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    id: BankId,
    title: String,
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Create a bank from validated questions.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Empty` if there are no questions, `BankError::EmptyTitle`
    /// for a blank title, and `BankError::DuplicateId` if two questions share an id.
    pub fn new(
        id: BankId,
        title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, BankError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(BankError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        let mut ids = HashSet::with_capacity(questions.len());
        if let Some(dup) = questions.iter().map(Question::id).find(|id| !ids.insert(*id)) {
            return Err(BankError::DuplicateId(dup));
        }

        Ok(Self {
            id,
            title,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> &BankId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    pub fn questions_in<'a>(
        &'a self,
        category: &'a Category,
    ) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions.iter().filter(move |q| q.category() == category)
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn all_categories(&self) -> Categories<'_> {
        Categories {
            questions: &self.questions,
            position: 0,
            seen: HashSet::new(),
        }
    }

    /// Pick `n` questions with every category represented when possible.
    ///
    /// One random question per category is taken first (in shuffled category order),
    /// then the rest is filled randomly without replacement. When `n` is smaller than
    /// the number of categories, the shuffled representatives are truncated, so which
    /// categories are dropped is decided by the RNG. The result is renumbered `1..=n`.
    ///
    /// `seed` makes the selection reproducible.
    ///
    /// # Errors
    ///
    /// Returns `BankError::InsufficientQuestions` if `n` exceeds the bank size.
    pub fn select_subset(&self, n: usize, seed: Option<u64>) -> Result<Vec<Question>, BankError> {
        if n > self.questions.len() {
            return Err(BankError::InsufficientQuestions {
                requested: n,
                available: self.questions.len(),
            });
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut by_category: HashMap<&Category, Vec<usize>> = HashMap::new();
        for (idx, question) in self.questions.iter().enumerate() {
            by_category.entry(question.category()).or_default().push(idx);
        }

        // Walk categories in bank order so a fixed seed gives a fixed result.
        let mut representatives = Vec::with_capacity(by_category.len());
        for category in self.all_categories() {
            if let Some(indices) = by_category.get(category) {
                if let Some(&pick) = indices.choose(&mut rng) {
                    representatives.push(pick);
                }
            }
        }
        representatives.shuffle(&mut rng);
        representatives.truncate(n);

        let taken: HashSet<usize> = representatives.iter().copied().collect();
        let mut rest: Vec<usize> = (0..self.questions.len())
            .filter(|idx| !taken.contains(idx))
            .collect();
        rest.shuffle(&mut rng);

        let fill = n - representatives.len();
        let selected = representatives
            .into_iter()
            .chain(rest.into_iter().take(fill))
            .zip(1_u32..)
            .map(|(idx, number)| self.questions[idx].with_id(QuestionId::new(number)))
            .collect();

        Ok(selected)
    }
}

/// Iterator over the distinct categories of a bank.
///
/// Finite; call [`QuestionBank::all_categories`] again (or clone before iterating)
/// for another pass.
#[derive(Debug, Clone)]
pub struct Categories<'a> {
    questions: &'a [Question],
    position: usize,
    seen: HashSet<&'a Category>,
}

impl<'a> Iterator for Categories<'a> {
    type Item = &'a Category;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(question) = self.questions.get(self.position) {
            self.position += 1;
            let category = question.category();
            if self.seen.insert(category) {
                return Some(category);
            }
        }
        None
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
