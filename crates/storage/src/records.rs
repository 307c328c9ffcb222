//! On-disk shape of a question bank.
//!
//! These records mirror the JSON files under `banks/` and are converted into
//! validated domain types; nothing outside this crate sees them.

use quiz_core::model::{BankId, QuestionBank, QuestionDraft};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

/// A whole bank file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankFile {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

/// One question as written in a bank file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: u32,
    #[serde(alias = "text")]
    pub question: String,
    /// Keyed by option label, in file order; that order is the display order.
    #[serde(with = "ordered_pairs")]
    pub options: Vec<(String, String)>,
    pub correct_answer: AnswerRecord,
    #[serde(default, alias = "explanations", with = "ordered_pairs")]
    pub explanation: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_select: Option<bool>,
}

/// `"B"` or `["A", "D"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerRecord {
    One(String),
    Many(Vec<String>),
}

impl AnswerRecord {
    fn into_keys(self) -> Vec<String> {
        match self {
            AnswerRecord::One(key) => vec![key],
            AnswerRecord::Many(keys) => keys,
        }
    }
}

impl QuestionRecord {
    /// Convert into a draft; `multi_select` defaults to "the answer was given as a list".
    #[must_use]
    pub fn into_draft(self) -> QuestionDraft {
        let multi_select = self
            .multi_select
            .unwrap_or(matches!(self.correct_answer, AnswerRecord::Many(_)));
        QuestionDraft {
            id: self.id,
            text: self.question,
            options: self.options,
            correct: self.correct_answer.into_keys(),
            explanations: self.explanation,
            category: self.category,
            multi_select,
        }
    }
}

impl BankFile {
    /// Validate every question and build the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidId`, `StorageError::InvalidQuestion` (naming the
    /// offending question id) or `StorageError::InvalidBank`.
    pub fn into_bank(self) -> Result<QuestionBank, StorageError> {
        let id = BankId::new(self.id)?;
        let questions = self
            .questions
            .into_iter()
            .map(|record| {
                let question_id = record.id;
                record
                    .into_draft()
                    .validate()
                    .map_err(|source| StorageError::InvalidQuestion {
                        bank: id.clone(),
                        question: question_id,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        QuestionBank::new(id.clone(), self.title, questions)
            .map_err(|source| StorageError::InvalidBank { bank: id, source })
    }
}

/// A JSON object of string values kept as `(key, value)` pairs in document order.
/// Duplicate keys are passed through for draft validation to reject.
mod ordered_pairs {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (key, value) in pairs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PairsVisitor)
    }

    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of string values")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry::<String, String>()? {
                pairs.push(entry);
            }
            Ok(pairs)
        }
    }
}
